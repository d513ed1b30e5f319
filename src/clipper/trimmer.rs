// Trimmer - extracts the [start, end) sub-range via ffmpeg

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

use super::errors::ClipError;
use super::models::{OutputFormat, TrimRange};
use super::traits::Trimmer;
use super::utils::find_tool;

/// Encoder arguments for a video container
fn video_codec_args(container: &str) -> Vec<String> {
    match container {
        "webm" => vec![
            "-c:v".to_string(),
            "libvpx-vp9".to_string(),
            "-c:a".to_string(),
            "libopus".to_string(),
        ],
        // mp4/mkv/mov all take H.264 + AAC
        _ => vec![
            "-c:v".to_string(),
            "libx264".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
        ],
    }
}

/// Encoder arguments for an audio-only container
fn audio_codec_args(container: &str) -> Vec<String> {
    let codec = match container {
        "m4a" | "aac" => "aac",
        "opus" => "libopus",
        "ogg" => "libvorbis",
        "flac" => "flac",
        "wav" => "pcm_s16le",
        _ => "libmp3lame",
    };
    vec![
        "-vn".to_string(),
        "-c:a".to_string(),
        codec.to_string(),
    ]
}

/// Build the full ffmpeg invocation for one trim.
/// `-ss start` + `-t (end - start)` yields the half-open [start, end) range.
pub fn build_trim_args(
    source: &Path,
    range: &TrimRange,
    format: &OutputFormat,
    output: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-ss".to_string(),
        range.start().to_string(),
        "-i".to_string(),
        source.to_string_lossy().to_string(),
        "-t".to_string(),
        range.duration().to_string(),
    ];

    if format.is_audio() {
        args.extend(audio_codec_args(format.container()));
    } else {
        args.extend(video_codec_args(format.container()));
    }

    args.push(output.to_string_lossy().to_string());
    args
}

/// ffmpeg backed trimmer
pub struct FfmpegTrimmer {
    ffmpeg_path: String,
}

impl FfmpegTrimmer {
    pub fn new() -> Self {
        Self {
            ffmpeg_path: find_tool("ffmpeg"),
        }
    }
}

impl Default for FfmpegTrimmer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Trimmer for FfmpegTrimmer {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn trim(
        &self,
        source: &Path,
        range: &TrimRange,
        format: &OutputFormat,
        output: &Path,
    ) -> Result<(), ClipError> {
        if !source.exists() {
            return Err(ClipError::Io(format!(
                "Source file not found: {}",
                source.display()
            )));
        }

        let args = build_trim_args(source, range, format, output);
        eprintln!(
            "[Trimmer] Extracting [{}, {}) into {}",
            range.start(),
            range.end(),
            output.display()
        );

        // No deadline here: encoding time scales with the clip, and a trim
        // failure is only ever reported by ffmpeg itself.
        let result = TokioCommand::new(&self.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ClipError::ToolNotFound(format!("Failed to start {}: {}", self.ffmpeg_path, e))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(3).collect();
            return Err(ClipError::Processing(
                tail.into_iter().rev().collect::<Vec<_>>().join(" | "),
            ));
        }

        eprintln!("[Trimmer] Wrote {}", output.display());
        Ok(())
    }
}
