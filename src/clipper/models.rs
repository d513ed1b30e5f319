// Common data models for the clip pipeline

use serde::{Deserialize, Serialize};

use super::errors::ClipError;

/// Format options offered before any metadata fetch has populated the set
pub const DEFAULT_FORMAT_OPTIONS: [&str; 2] = ["mp4", "mp3"];

/// Containers that take the audio-only output path
const AUDIO_CONTAINERS: [&str; 7] = ["mp3", "m4a", "aac", "opus", "ogg", "wav", "flac"];

/// The [start, end) second interval to extract from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimRange {
    start: u64,
    end: u64,
}

impl TrimRange {
    /// Build a range, rejecting start >= end up front
    pub fn new(start: u64, end: u64) -> Result<Self, ClipError> {
        if start >= end {
            return Err(ClipError::InvalidRange(format!(
                "start ({}) must be less than end ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Length of the extracted sub-range in seconds
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    /// Reject a range that reaches past the end of the source media.
    /// Never clamps; an out-of-range request is an explicit error.
    pub fn validate_against(&self, source_duration: u64) -> Result<(), ClipError> {
        if self.end > source_duration {
            return Err(ClipError::InvalidRange(format!(
                "end ({}) exceeds the source duration ({}s)",
                self.end, source_duration
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Video,
    Audio,
}

/// Requested output container plus whether it keeps the video track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
    container: String,
    kind: OutputKind,
}

impl OutputFormat {
    /// Map a container identifier from the format selector to an output mode.
    /// Audio containers drop the video track; everything else keeps it.
    pub fn from_id(id: &str) -> Self {
        let container = id.trim().to_ascii_lowercase();
        let kind = if AUDIO_CONTAINERS.contains(&container.as_str()) {
            OutputKind::Audio
        } else {
            OutputKind::Video
        };
        Self { container, kind }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn is_audio(&self) -> bool {
        self.kind == OutputKind::Audio
    }

    /// Fixed output name in the working directory; ownership of the file
    /// passes to the user once written.
    pub fn output_filename(&self) -> String {
        match self.kind {
            OutputKind::Audio => format!("trimmed_audio.{}", self.container),
            OutputKind::Video => format!("trimmed_video.{}", self.container),
        }
    }
}

/// One advertised stream encoding from the source platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamFormat {
    pub ext: String,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

impl StreamFormat {
    /// Storyboard/manifest pseudo-formats explicitly advertise no codecs.
    /// Missing codec fields are treated as media; only an explicit
    /// "none"/"none" pair marks a non-media entry.
    pub fn is_media(&self) -> bool {
        let is_none = |codec: &Option<String>| codec.as_deref().map_or(false, |c| c == "none");
        !(is_none(&self.vcodec) && is_none(&self.acodec))
    }
}

/// Everything the source platform tells us about a video
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub id: String,
    pub title: String,
    pub uploader: String,
    pub duration_seconds: u64,
    pub thumbnail_url: String,
    pub formats: Vec<StreamFormat>,
}

/// Payload handed to the UI after a metadata fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub uploader: String,
    pub duration_seconds: u64,
    pub duration_label: String,
    pub formats: Vec<String>,
    /// PNG preview as a base64 data URL, if the thumbnail fetch succeeded
    pub thumbnail: Option<String>,
}

/// Progress event emitted while a download cycle runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub percent: f32,
    pub status: String,
}

/// Render whole seconds as m:ss for the UI
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_start_not_before_end() {
        assert!(TrimRange::new(10, 10).is_err());
        assert!(TrimRange::new(15, 5).is_err());
    }

    #[test]
    fn test_range_duration() {
        let range = TrimRange::new(5, 15).unwrap();
        assert_eq!(range.duration(), 10);
    }

    #[test]
    fn test_range_rejects_end_past_source() {
        let range = TrimRange::new(5, 40).unwrap();
        let err = range.validate_against(30).unwrap_err();
        assert!(matches!(err, ClipError::InvalidRange(_)));
    }

    #[test]
    fn test_range_accepts_exact_end() {
        let range = TrimRange::new(5, 30).unwrap();
        assert!(range.validate_against(30).is_ok());
    }

    #[test]
    fn test_mp3_is_audio_output() {
        let format = OutputFormat::from_id("mp3");
        assert!(format.is_audio());
        assert_eq!(format.output_filename(), "trimmed_audio.mp3");
    }

    #[test]
    fn test_mp4_is_video_output() {
        let format = OutputFormat::from_id("MP4");
        assert!(!format.is_audio());
        assert_eq!(format.output_filename(), "trimmed_video.mp4");
    }

    #[test]
    fn test_webm_is_video_output() {
        let format = OutputFormat::from_id("webm");
        assert!(!format.is_audio());
    }

    #[test]
    fn test_format_duration_label() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(75), "1:15");
        assert_eq!(format_duration(3600), "60:00");
    }
}
