// Stream source - queries the platform for advertised encodings via yt-dlp

use async_trait::async_trait;

use super::errors::ClipError;
use super::models::{SourceMetadata, StreamFormat};
use super::utils::{find_tool, run_output_with_timeout};

/// Configuration for a metadata fetch
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            proxy: None,
        }
    }
}

impl FetchConfig {
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Trait for stream-list providers
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Name of the source (for logging)
    fn name(&self) -> &'static str;

    /// Query the platform for metadata and the advertised stream list
    async fn fetch(&self, url: &str, config: &FetchConfig) -> Result<SourceMetadata, ClipError>;
}

/// yt-dlp backed stream source
pub struct YtDlpSource {
    ytdlp_path: String,
}

impl YtDlpSource {
    pub fn new() -> Self {
        Self {
            ytdlp_path: find_tool("yt-dlp"),
        }
    }

    fn build_args(&self, url: &str, config: &FetchConfig) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            config.timeout_seconds.to_string(),
        ];

        if let Some(proxy) = &config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args.push(url.to_string());
        args
    }
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamSource for YtDlpSource {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch(&self, url: &str, config: &FetchConfig) -> Result<SourceMetadata, ClipError> {
        let args = self.build_args(url, config);
        let output =
            run_output_with_timeout(&self.ytdlp_path, args, config.timeout_seconds).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            eprintln!("[Source] yt-dlp metadata query failed: {}", stderr);
            return Err(ClipError::from(stderr));
        }

        parse_metadata(&output.stdout)
    }
}

/// Parse the single-line JSON document yt-dlp prints for a video
pub fn parse_metadata(stdout: &[u8]) -> Result<SourceMetadata, ClipError> {
    let json_str = String::from_utf8_lossy(stdout);
    let json: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| ClipError::Parse(format!("Invalid JSON from yt-dlp: {}", e)))?;

    let formats = json["formats"]
        .as_array()
        .map(|array| {
            array
                .iter()
                .map(|f| StreamFormat {
                    ext: f["ext"].as_str().unwrap_or("").to_string(),
                    vcodec: f["vcodec"].as_str().map(|s| s.to_string()),
                    acodec: f["acodec"].as_str().map(|s| s.to_string()),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(SourceMetadata {
        id: json["id"].as_str().unwrap_or("unknown").to_string(),
        title: json["title"].as_str().unwrap_or("Unknown").to_string(),
        uploader: json["uploader"].as_str().unwrap_or("Unknown").to_string(),
        duration_seconds: json["duration"].as_f64().unwrap_or(0.0) as u64,
        thumbnail_url: json["thumbnail"].as_str().unwrap_or("").to_string(),
        formats,
    })
}
