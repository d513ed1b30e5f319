// Thumbnail preview - fetch, decode and resize to the fixed preview size

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::imageops::FilterType;
use std::io::Cursor;
use std::time::Duration;

use super::errors::ClipError;

pub const PREVIEW_WIDTH: u32 = 150;
pub const PREVIEW_HEIGHT: u32 = 90;

/// Fetch the thumbnail and return it as a PNG data URL at preview size
pub async fn fetch_preview(url: &str, proxy: Option<&str>) -> Result<String, ClipError> {
    if url.is_empty() {
        return Err(ClipError::Network("No thumbnail advertised".to_string()));
    }

    let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(10));
    if let Some(proxy_url) = proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| ClipError::Network(format!("Invalid proxy URL: {}", e)))?;
        builder = builder.proxy(proxy);
    }
    let client = builder
        .build()
        .map_err(|e| ClipError::Network(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ClipError::Network(format!("Thumbnail fetch failed: {}", e)))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClipError::Network(format!("Thumbnail read failed: {}", e)))?;

    let png = preview_png(&bytes)?;
    Ok(to_data_url(&png))
}

/// Decode image bytes and re-encode as a fixed-size PNG preview
pub fn preview_png(bytes: &[u8]) -> Result<Vec<u8>, ClipError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ClipError::Parse(format!("Thumbnail decode failed: {}", e)))?;

    let preview = decoded.resize_exact(PREVIEW_WIDTH, PREVIEW_HEIGHT, FilterType::Lanczos3);

    let mut out = Vec::new();
    preview
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| ClipError::Parse(format!("Thumbnail encode failed: {}", e)))?;
    Ok(out)
}

fn to_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 40, 200]),
        ));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    #[test]
    fn test_preview_is_resized_to_fixed_dimensions() {
        let png = preview_png(&sample_jpeg(320, 180)).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), PREVIEW_WIDTH);
        assert_eq!(decoded.height(), PREVIEW_HEIGHT);
    }

    #[test]
    fn test_preview_resizes_even_tiny_inputs() {
        let png = preview_png(&sample_jpeg(8, 8)).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), PREVIEW_WIDTH);
        assert_eq!(decoded.height(), PREVIEW_HEIGHT);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = preview_png(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ClipError::Parse(_)));
    }

    #[test]
    fn test_data_url_prefix() {
        let url = to_data_url(&[1, 2, 3]);
        assert!(url.starts_with("data:image/png;base64,"));
    }
}
