//! Download handoff and torrent transfer
//!
//! - Handoff: resolve a selection into one URI plus a destination
//! - Torrent: embedded librqbit client doing the actual transfer
//! - Progress: push-based progress events and their terminal rendering

pub mod handoff;
pub mod progress;
pub mod torrent;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

pub use handoff::{resolve_uri, DownloadRequest, HandoffError};
pub use progress::{format_duration, ProgressBar};
pub use torrent::LibrqbitDownloader;

/// Errors reported by a downloader
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to start torrent session: {0}")]
    Session(String),

    #[error("Failed to add torrent: {0}")]
    AddTorrent(String),

    #[error("Timed out after {0:?} waiting for torrent metadata")]
    MetadataTimeout(Duration),

    #[error("Torrent error: {0}")]
    Torrent(String),
}

/// Snapshot of a running transfer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadProgress {
    /// Completed fraction in [0, 1]
    pub fraction: f64,
    pub downloaded_bytes: u64,
    pub total_bytes: u64,
    /// Bytes per second
    pub download_speed: u64,
    /// None while the speed is zero or the size is unknown
    pub eta: Option<Duration>,
}

impl DownloadProgress {
    pub fn new(downloaded_bytes: u64, total_bytes: u64, download_speed: u64) -> Self {
        let fraction = if total_bytes > 0 {
            (downloaded_bytes as f64 / total_bytes as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let eta = (download_speed > 0 && total_bytes > 0).then(|| {
            Duration::from_secs(total_bytes.saturating_sub(downloaded_bytes) / download_speed)
        });
        Self {
            fraction,
            downloaded_bytes,
            total_bytes,
            download_speed,
            eta,
        }
    }

    /// Whole percent, floored
    pub fn percent(&self) -> u8 {
        (self.fraction * 100.0).floor() as u8
    }

    /// Download speed in MB/s
    pub fn speed_mbps(&self) -> f64 {
        self.download_speed as f64 / 1024.0 / 1024.0
    }
}

/// Events pushed by a downloader while it runs
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    /// Metadata resolved, transfer started
    Started { name: String },
    Progress(DownloadProgress),
    Completed,
    Failed(String),
}

/// Sender half handed to a downloader
pub type EventSender = mpsc::UnboundedSender<DownloadEvent>;

/// A torrent client that can fetch a URI into a directory
///
/// Implementations push `Started` and `Progress` events while they run and
/// return once the transfer is finished or failed; [`run_download`] sends
/// the terminal event. A closed receiver must not abort the transfer.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, request: DownloadRequest, events: EventSender) -> Result<(), DownloadError>;
}

/// Run a download and send the terminal `Completed` or `Failed` event
pub async fn run_download(
    downloader: &dyn Downloader,
    request: DownloadRequest,
    events: EventSender,
) -> Result<(), DownloadError> {
    let result = downloader.download(request, events.clone()).await;
    match result {
        Ok(()) => {
            let _ = events.send(DownloadEvent::Completed);
        }
        Err(ref e) => {
            let _ = events.send(DownloadEvent::Failed(e.to_string()));
        }
    }
    result
}
