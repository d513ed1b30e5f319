// Session controller - sequences retrieve -> trim and owns temporary files

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;
use uuid::Uuid;

use super::errors::ClipError;
use super::models::{DownloadProgress, OutputFormat, TrimRange};
use super::source::{FetchConfig, StreamSource};
use super::traits::{MediaRetriever, ProgressSink, Trimmer};
use crate::validator::is_valid_video_url;

/// Phases of the heavy download-and-trim cycle.
/// Error paths from any active phase return to Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Idle,
    Downloading,
    Trimming,
    Cleanup,
}

/// Tracks the cycle phase and rejects a second cycle while one is in flight
pub struct PhaseTracker {
    phase: Mutex<SessionPhase>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(SessionPhase::Idle),
        }
    }

    pub fn current(&self) -> SessionPhase {
        *self.phase.lock().unwrap()
    }

    /// Claim the cycle; fails with Busy unless currently Idle
    fn begin(&self) -> Result<CycleGuard<'_>, ClipError> {
        let mut phase = self.phase.lock().unwrap();
        if *phase != SessionPhase::Idle {
            return Err(ClipError::Busy);
        }
        *phase = SessionPhase::Downloading;
        Ok(CycleGuard { tracker: self })
    }

    fn set(&self, phase: SessionPhase) {
        *self.phase.lock().unwrap() = phase;
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the tracker to Idle on every exit path
struct CycleGuard<'a> {
    tracker: &'a PhaseTracker,
}

impl CycleGuard<'_> {
    fn advance(&self, phase: SessionPhase) {
        self.tracker.set(phase);
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.tracker.set(SessionPhase::Idle);
    }
}

/// Generation counter for metadata fetches. A fetch whose generation is no
/// longer current when it completes must be discarded, not applied.
pub struct MetadataGate {
    current: AtomicU64,
}

impl MetadataGate {
    pub fn new() -> Self {
        Self {
            current: AtomicU64::new(0),
        }
    }

    /// Stamp a new fetch, superseding all earlier ones
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current.load(Ordering::SeqCst) == generation
    }
}

impl Default for MetadataGate {
    fn default() -> Self {
        Self::new()
    }
}

/// The full downloaded source media, uniquely named per cycle and owned for
/// exactly one download-trim cycle. Deleted on drop, success or failure;
/// deletion failures are logged only.
pub struct TempMedia {
    path: PathBuf,
}

impl TempMedia {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("source-{}.mp4", Uuid::new_v4())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempMedia {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                eprintln!(
                    "[Session] Failed to delete temporary file {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Orchestrates one download-and-trim cycle per user trigger
pub struct SessionController {
    source: Box<dyn StreamSource>,
    retriever: Box<dyn MediaRetriever>,
    trimmer: Box<dyn Trimmer>,
    fetch_config: FetchConfig,
    work_dir: PathBuf,
    phase: PhaseTracker,
}

impl SessionController {
    pub fn new(
        source: Box<dyn StreamSource>,
        retriever: Box<dyn MediaRetriever>,
        trimmer: Box<dyn Trimmer>,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            source,
            retriever,
            trimmer,
            fetch_config: FetchConfig::default(),
            work_dir,
            phase: PhaseTracker::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase.current()
    }

    /// Run one cycle: duration check, retrieve, trim, cleanup. The temporary
    /// file is removed on every path, and the returned Result is the single
    /// success/failure notification for this invocation.
    pub async fn run_cycle(
        &self,
        url: &str,
        range: TrimRange,
        format: OutputFormat,
        progress: &dyn ProgressSink,
    ) -> Result<String, ClipError> {
        if !is_valid_video_url(url) {
            return Err(ClipError::InvalidUrl(url.to_string()));
        }

        let cycle = self.phase.begin()?;

        progress.emit(DownloadProgress {
            percent: 0.0,
            status: "Checking source...".to_string(),
        });

        let metadata = self.source.fetch(url, &self.fetch_config).await?;
        range.validate_against(metadata.duration_seconds)?;

        let temp = TempMedia::new(&self.work_dir);
        eprintln!(
            "[Session] Cycle start: {} -> [{}, {}) as {}",
            metadata.id,
            range.start(),
            range.end(),
            format.container()
        );

        self.retriever.retrieve(url, temp.path(), progress).await?;

        cycle.advance(SessionPhase::Trimming);
        progress.emit(DownloadProgress {
            percent: 99.0,
            status: "Trimming clip...".to_string(),
        });

        let output = self.work_dir.join(format.output_filename());
        self.trimmer
            .trim(temp.path(), &range, &format, &output)
            .await?;

        cycle.advance(SessionPhase::Cleanup);
        drop(temp);

        progress.emit(DownloadProgress {
            percent: 100.0,
            status: "✅ Done".to_string(),
        });
        Ok(format!("Clip saved as {}", format.output_filename()))
    }
}
