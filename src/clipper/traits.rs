// Pipeline stage traits - the seams the session controller is tested through

use async_trait::async_trait;
use std::path::Path;

use super::errors::ClipError;
use super::models::{DownloadProgress, OutputFormat, TrimRange};

/// Sink for progress updates emitted during a download cycle
pub trait ProgressSink: Send + Sync {
    fn emit(&self, progress: DownloadProgress);
}

/// Fetches the full source media to a local path
#[async_trait]
pub trait MediaRetriever: Send + Sync {
    /// Name of the retriever (for logging)
    fn name(&self) -> &'static str;

    /// Download the source media to `dest`, overwriting any prior file there
    async fn retrieve(
        &self,
        url: &str,
        dest: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<(), ClipError>;
}

/// Extracts a sub-range of a local media file into an output artifact
#[async_trait]
pub trait Trimmer: Send + Sync {
    /// Name of the trimmer (for logging)
    fn name(&self) -> &'static str;

    /// Write the [start, end) sub-range of `source` to `output`
    async fn trim(
        &self,
        source: &Path,
        range: &TrimRange,
        format: &OutputFormat,
        output: &Path,
    ) -> Result<(), ClipError>;
}
