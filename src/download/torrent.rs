//! Torrent transfer via an embedded librqbit session

use std::time::Duration;

use async_trait::async_trait;
use librqbit::{AddTorrent, AddTorrentOptions, AddTorrentResponse, Session, SessionOptions, TorrentStatsState};
use tracing::{debug, info, warn};

use super::{DownloadError, DownloadEvent, DownloadProgress, DownloadRequest, Downloader, EventSender};

/// Default wait for magnet metadata (DHT lookups can stall on rare torrents)
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(60);

/// How often torrent stats are sampled
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Downloader backed by librqbit
///
/// Each download runs in its own session rooted at the request's
/// destination. Files are kept when the torrent is forgotten after
/// completion.
#[derive(Debug, Clone)]
pub struct LibrqbitDownloader {
    metadata_timeout: Duration,
}

impl LibrqbitDownloader {
    pub fn new() -> Self {
        Self {
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
        }
    }

    pub fn with_metadata_timeout(mut self, timeout: Duration) -> Self {
        self.metadata_timeout = timeout;
        self
    }
}

impl Default for LibrqbitDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Downloader for LibrqbitDownloader {
    async fn download(&self, request: DownloadRequest, events: EventSender) -> Result<(), DownloadError> {
        let opts = SessionOptions::default();

        info!(
            title = %request.title,
            source = ?request.source,
            destination = %request.destination.display(),
            "Starting torrent download"
        );

        let session = Session::new_with_opts(request.destination.clone(), opts)
            .await
            .map_err(|e| DownloadError::Session(e.to_string()))?;

        let add_opts = AddTorrentOptions {
            output_folder: Some(request.destination.to_string_lossy().into_owned()),
            overwrite: true,
            ..Default::default()
        };

        let add_future = session.add_torrent(AddTorrent::from_url(request.uri.as_str()), Some(add_opts));
        let response = tokio::time::timeout(self.metadata_timeout, add_future)
            .await
            .map_err(|_| DownloadError::MetadataTimeout(self.metadata_timeout))?
            .map_err(|e| DownloadError::AddTorrent(e.to_string()))?;

        let handle = match response {
            AddTorrentResponse::Added(_, handle) => handle,
            AddTorrentResponse::AlreadyManaged(_, handle) => {
                warn!(title = %request.title, "Torrent already managed by this session");
                handle
            }
            AddTorrentResponse::ListOnly(_) => {
                return Err(DownloadError::AddTorrent(
                    "torrent was added in list-only mode".to_string(),
                ))
            }
        };

        let name = handle
            .name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| request.title.clone());
        info!(name = %name, "Started downloading");
        let _ = events.send(DownloadEvent::Started { name });

        let mut interval = tokio::time::interval(POLL_INTERVAL);
        let outcome = loop {
            interval.tick().await;
            let stats = handle.stats();

            if matches!(stats.state, TorrentStatsState::Error) {
                let message = stats
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown torrent error".to_string());
                break Err(DownloadError::Torrent(message));
            }

            // librqbit reports MiB/s in the `mbps` field
            let speed = stats
                .live
                .as_ref()
                .map(|live| (live.download_speed.mbps * 1024.0 * 1024.0) as u64)
                .unwrap_or(0);
            let progress = DownloadProgress::new(stats.progress_bytes, stats.total_bytes, speed);
            let _ = events.send(DownloadEvent::Progress(progress));

            if stats.finished {
                break Ok(());
            }
        };

        if let Err(e) = session.delete(handle.id().into(), false).await {
            debug!(error = %e, "Failed to forget finished torrent");
        }

        match outcome {
            Ok(()) => info!(title = %request.title, "Download complete"),
            Err(ref e) => warn!(title = %request.title, error = %e, "Download failed"),
        }
        outcome
    }
}
