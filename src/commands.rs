// Tauri command surface - glue between the webview form and the pipeline

use tauri::Emitter;

use crate::clipper::errors::ClipError;
use crate::clipper::formats;
use crate::clipper::models::{format_duration, DownloadProgress, OutputFormat, TrimRange, VideoInfo};
use crate::clipper::retriever::YtDlpRetriever;
use crate::clipper::session::{MetadataGate, SessionController};
use crate::clipper::source::{FetchConfig, StreamSource, YtDlpSource};
use crate::clipper::thumbnail;
use crate::clipper::traits::ProgressSink;
use crate::clipper::trimmer::FfmpegTrimmer;
use crate::validator;

/// Per-process session state managed by Tauri
pub struct AppSession {
    pub gate: MetadataGate,
    pub controller: SessionController,
}

impl AppSession {
    pub fn new() -> Self {
        // Artifacts land in the working directory; fall back to the user's
        // download directory when the process has none.
        let work_dir = std::env::current_dir()
            .ok()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| std::path::PathBuf::from("."));

        Self {
            gate: MetadataGate::new(),
            controller: SessionController::new(
                Box::new(YtDlpSource::new()),
                Box::new(YtDlpRetriever::new()),
                Box::new(FfmpegTrimmer::new()),
                work_dir,
            ),
        }
    }
}

impl Default for AppSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards progress updates to the webview as `download-progress` events
pub struct EventProgressSink {
    app_handle: tauri::AppHandle,
}

impl EventProgressSink {
    pub fn new(app_handle: tauri::AppHandle) -> Self {
        Self { app_handle }
    }
}

impl ProgressSink for EventProgressSink {
    fn emit(&self, progress: DownloadProgress) {
        let _ = self.app_handle.emit("download-progress", progress);
    }
}

/// Pure structural check, called on every keystroke in the URL field
#[tauri::command]
pub fn validate_url(url: String) -> bool {
    validator::is_valid_video_url(&url)
}

/// Format options offered before any metadata fetch has run
#[tauri::command]
pub fn default_formats() -> Vec<String> {
    formats::default_format_options()
}

/// Fetch formats and thumbnail for a validated URL.
/// Returns Ok(None) when a newer fetch superseded this one while it ran.
#[tauri::command]
pub async fn get_video_info(
    url: String,
    proxy: Option<String>,
    state: tauri::State<'_, AppSession>,
) -> Result<Option<VideoInfo>, String> {
    if !validator::is_valid_video_url(&url) {
        return Err(ClipError::InvalidUrl(url).to_string());
    }
    if let Some(id) = validator::extract_video_id(&url) {
        eprintln!("[Metadata] Fetching info for video {}", id);
    }

    let generation = state.gate.begin();

    let source = YtDlpSource::new();
    let config = FetchConfig::default().with_proxy(proxy.clone());
    let metadata = source.fetch(&url, &config).await.map_err(|e| e.to_string())?;

    // Thumbnail failure never blocks the format options
    let thumbnail = match thumbnail::fetch_preview(&metadata.thumbnail_url, proxy.as_deref()).await
    {
        Ok(data_url) => Some(data_url),
        Err(e) => {
            eprintln!("[Metadata] Thumbnail skipped: {}", e);
            None
        }
    };

    if !state.gate.is_current(generation) {
        eprintln!(
            "[Metadata] Discarding superseded fetch (generation {})",
            generation
        );
        return Ok(None);
    }

    Ok(Some(VideoInfo {
        title: metadata.title,
        uploader: metadata.uploader,
        duration_seconds: metadata.duration_seconds,
        duration_label: format_duration(metadata.duration_seconds),
        formats: formats::distinct_containers(&metadata.formats),
        thumbnail,
    }))
}

/// Run one download-and-trim cycle. The returned message (or error string)
/// is the single user-facing notification for the cycle.
#[tauri::command]
pub async fn download_and_trim(
    url: String,
    start_seconds: u64,
    end_seconds: u64,
    format: String,
    app_handle: tauri::AppHandle,
    state: tauri::State<'_, AppSession>,
) -> Result<String, String> {
    let range = TrimRange::new(start_seconds, end_seconds).map_err(|e| e.to_string())?;
    let format = OutputFormat::from_id(&format);
    let sink = EventProgressSink::new(app_handle);

    state
        .controller
        .run_cycle(&url, range, format, &sink)
        .await
        .map_err(|e| e.to_string())
}
