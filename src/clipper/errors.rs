// Error types for the download-and-trim pipeline

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    /// The string is not a recognized video-sharing URL
    InvalidUrl(String),

    /// Trim range rejected before any download was attempted
    InvalidRange(String),

    /// yt-dlp or ffmpeg not found on this system
    ToolNotFound(String),

    /// Network timeout while talking to the source platform
    NetworkTimeout,

    /// Remote fetch failed (platform rejected the request, transfer error)
    Network(String),

    /// No downloadable stream matched the container preference
    NoMatchingStream,

    /// Failed to parse metadata returned by yt-dlp
    Parse(String),

    /// Local filesystem read/write error
    Io(String),

    /// Trim/encode step failed
    Processing(String),

    /// A download-and-trim cycle is already in flight
    Busy,

    /// Unknown error with details
    Unknown(String),
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "Invalid video URL: {}", url),
            Self::InvalidRange(msg) => write!(f, "Invalid trim range: {}", msg),
            Self::ToolNotFound(tool) => write!(f, "Tool not found: {}", tool),
            Self::NetworkTimeout => write!(f, "Network timeout: the source is not responding"),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::NoMatchingStream => {
                write!(f, "No downloadable stream matched the requested container")
            }
            Self::Parse(msg) => write!(f, "Metadata parse error: {}", msg),
            Self::Io(msg) => write!(f, "File error: {}", msg),
            Self::Processing(msg) => write!(f, "Trim failed: {}", msg),
            Self::Busy => write!(f, "A download is already in progress"),
            Self::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for ClipError {}

impl From<std::io::Error> for ClipError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

// Classify raw subprocess stderr into an error variant
impl From<String> for ClipError {
    fn from(s: String) -> Self {
        if s.contains("Requested format is not available")
            || s.contains("No video formats found")
        {
            return Self::NoMatchingStream;
        }

        if s.contains("timeout") || s.contains("timed out") {
            return Self::NetworkTimeout;
        }

        if s.contains("not found") || s.contains("No such file") || s.contains("command not found")
        {
            return Self::ToolNotFound(s);
        }

        if s.contains("Unsupported URL") || s.contains("is not a valid URL") {
            return Self::InvalidUrl(s);
        }

        if s.contains("JSON") || s.contains("parse") {
            return Self::Parse(s);
        }

        if s.contains("HTTP Error") || s.contains("Unable to download") || s.contains("403") {
            return Self::Network(s);
        }

        Self::Unknown(s)
    }
}
