// Media retriever - downloads the full source media via yt-dlp

use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command as TokioCommand;

use super::errors::ClipError;
use super::models::DownloadProgress;
use super::traits::{MediaRetriever, ProgressSink};
use super::utils::find_tool;

/// Parse a yt-dlp progress line like:
/// [download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32
/// Returns (percent, status_string)
pub fn parse_download_progress(line: &str) -> Option<(f32, String)> {
    lazy_static::lazy_static! {
        static ref PROGRESS_RE: Regex = Regex::new(
            r"\[download\]\s+(\d+\.?\d*)%\s+of\s+~?\s*(\d+\.?\d*\s*\w+)\s+at\s+(\d+\.?\d*\s*\w+/s)(?:\s+ETA\s+(\S+))?"
        ).unwrap();
        static ref DEST_RE: Regex = Regex::new(r"\[download\]\s+Destination:\s+(.+)").unwrap();
        static ref MERGE_RE: Regex = Regex::new(r"\[Merger?\]\s+Merging").unwrap();
        static ref ALREADY_RE: Regex = Regex::new(r"has already been downloaded").unwrap();
    }

    if let Some(caps) = PROGRESS_RE.captures(line) {
        let percent: f32 = caps.get(1)?.as_str().parse().ok()?;
        let size = caps.get(2).map(|m| m.as_str()).unwrap_or("?");
        let speed = caps.get(3).map(|m| m.as_str()).unwrap_or("?");
        let eta = caps.get(4).map(|m| m.as_str()).unwrap_or("");

        let status = if eta.is_empty() {
            format!("⬇️ {:.1}% of {} @ {}", percent, size, speed)
        } else {
            format!("⬇️ {:.1}% of {} @ {} ETA {}", percent, size, speed, eta)
        };
        return Some((percent, status));
    }

    if let Some(caps) = DEST_RE.captures(line) {
        let filename = caps.get(1).map(|m| m.as_str()).unwrap_or("file");
        let short_name: String = filename
            .split('/')
            .next_back()
            .unwrap_or(filename)
            .chars()
            .take(50)
            .collect();
        return Some((0.0, format!("Starting: {}", short_name)));
    }

    if MERGE_RE.is_match(line) {
        return Some((99.0, "🔄 Merging video and audio...".to_string()));
    }

    if ALREADY_RE.is_match(line) {
        return Some((100.0, "✅ File already downloaded".to_string()));
    }

    None
}

/// yt-dlp backed retriever, preferring the mp4 container
pub struct YtDlpRetriever {
    ytdlp_path: String,
}

impl YtDlpRetriever {
    pub fn new() -> Self {
        Self {
            ytdlp_path: find_tool("yt-dlp"),
        }
    }

    /// Stream selection policy: prefer an mp4 container, first match wins.
    /// The fallback chain mirrors picking the first mp4 stream and only then
    /// settling for anything downloadable.
    fn build_args(&self, url: &str, dest: &Path) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            "b[ext=mp4]/bv*[ext=mp4]+ba[ext=m4a]/b".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--newline".to_string(),
            "--socket-timeout".to_string(),
            "30".to_string(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "--force-overwrites".to_string(),
            "-o".to_string(),
            dest.to_string_lossy().to_string(),
        ];

        args.push(url.to_string());
        args
    }
}

impl Default for YtDlpRetriever {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaRetriever for YtDlpRetriever {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn retrieve(
        &self,
        url: &str,
        dest: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<(), ClipError> {
        let args = self.build_args(url, dest);
        eprintln!("[Retriever] Starting yt-dlp download to {}", dest.display());

        let mut child = TokioCommand::new(&self.ytdlp_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ClipError::ToolNotFound(format!("Failed to start {}: {}", self.ytdlp_path, e))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClipError::Unknown("Failed to capture yt-dlp stdout".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ClipError::Unknown("Failed to capture yt-dlp stderr".to_string()))?;

        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some((percent, status)) = parse_download_progress(&line) {
                progress.emit(DownloadProgress { percent, status });
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ClipError::Unknown(format!("yt-dlp process error: {}", e)))?;
        let stderr_output = stderr_task.await.unwrap_or_default();

        if !status.success() {
            eprintln!("[Retriever] yt-dlp failed: {}", stderr_output);
            return Err(ClipError::from(stderr_output));
        }

        if !dest.exists() {
            return Err(ClipError::Io(format!(
                "Download reported success but {} was not written",
                dest.display()
            )));
        }

        eprintln!("[Retriever] Download complete: {}", dest.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_progress_line() {
        let line = "[download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32";
        let (percent, status) = parse_download_progress(line).unwrap();
        assert!((percent - 6.2).abs() < f32::EPSILON);
        assert!(status.contains("6.2%"));
        assert!(status.contains("ETA 12:32"));
    }

    #[test]
    fn test_parse_progress_line_without_eta() {
        let line = "[download] 100.0% of 12.00MiB at 1.20MiB/s";
        let (percent, status) = parse_download_progress(line).unwrap();
        assert!((percent - 100.0).abs() < f32::EPSILON);
        assert!(!status.contains("ETA"));
    }

    #[test]
    fn test_parse_destination_line() {
        let line = "[download] Destination: /tmp/source-abc.mp4";
        let (percent, status) = parse_download_progress(line).unwrap();
        assert_eq!(percent, 0.0);
        assert!(status.contains("source-abc.mp4"));
    }

    #[test]
    fn test_parse_merge_line() {
        let line = "[Merger] Merging formats into \"out.mp4\"";
        let (percent, _) = parse_download_progress(line).unwrap();
        assert_eq!(percent, 99.0);
    }

    #[test]
    fn test_unrelated_line_ignored() {
        assert!(parse_download_progress("[info] Extracting URL").is_none());
    }

    #[test]
    fn test_build_args_prefer_mp4_first_match() {
        let retriever = YtDlpRetriever {
            ytdlp_path: "yt-dlp".to_string(),
        };
        let dest = PathBuf::from("/tmp/source-x.mp4");
        let args = retriever.build_args("https://youtu.be/dQw4w9WgXcQ", &dest);

        let format_spec = &args[args.iter().position(|a| a == "-f").unwrap() + 1];
        assert!(format_spec.starts_with("b[ext=mp4]"));
        assert!(args.contains(&"--force-overwrites".to_string()));
        assert!(args.contains(&"/tmp/source-x.mp4".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn test_build_args_merge_to_mp4() {
        let retriever = YtDlpRetriever {
            ytdlp_path: "yt-dlp".to_string(),
        };
        let args = retriever.build_args("https://youtu.be/dQw4w9WgXcQ", Path::new("out.mp4"));
        let merge = args.iter().position(|a| a == "--merge-output-format").unwrap();
        assert_eq!(args[merge + 1], "mp4");
    }
}
