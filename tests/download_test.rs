//! Download Handoff Tests
//!
//! Selection handoff, progress events and the CLI download driver, with a
//! scripted downloader standing in for the torrent client.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use repackgrab::cli::{ExitCode, Output};
use repackgrab::commands::download_with_progress;
use repackgrab::download::{
    format_duration, run_download, DownloadError, DownloadEvent, DownloadProgress, DownloadRequest,
    Downloader, EventSender, HandoffError, ProgressBar,
};
use repackgrab::GameRecord;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Pushes a fixed script of progress events, then succeeds or fails
struct ScriptedDownloader {
    progress: Vec<DownloadProgress>,
    fail_with: Option<String>,
    requests: Mutex<Vec<DownloadRequest>>,
}

impl ScriptedDownloader {
    fn succeeding() -> Self {
        Self {
            progress: vec![
                DownloadProgress::new(0, 1000, 100),
                DownloadProgress::new(500, 1000, 100),
            ],
            fail_with: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            progress: Vec::new(),
            fail_with: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Downloader for ScriptedDownloader {
    async fn download(&self, request: DownloadRequest, events: EventSender) -> Result<(), DownloadError> {
        let _ = events.send(DownloadEvent::Started {
            name: request.title.clone(),
        });
        self.requests.lock().unwrap().push(request);
        for p in &self.progress {
            let _ = events.send(DownloadEvent::Progress(p.clone()));
        }
        match self.fail_with {
            Some(ref message) => Err(DownloadError::Torrent(message.clone())),
            None => Ok(()),
        }
    }
}

fn request(dir: &TempDir) -> DownloadRequest {
    let record = GameRecord::new("Hades", vec!["magnet:?xt=urn:btih:HADES".into()], "dodi");
    DownloadRequest::from_selection(&record, None, dir.path()).unwrap()
}

fn quiet() -> Output {
    Output {
        json: false,
        quiet: true,
    }
}

async fn collect(mut rx: mpsc::UnboundedReceiver<DownloadEvent>) -> Vec<DownloadEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

// =============================================================================
// Handoff Tests
// =============================================================================

/// Test: a record without URIs is refused before any download starts
#[test]
fn test_handoff_refuses_empty_uris() {
    let dir = TempDir::new().unwrap();
    let record = GameRecord::new("Hades", Vec::new(), "dodi");

    let err = DownloadRequest::from_selection(&record, None, dir.path()).unwrap_err();
    assert!(matches!(err, HandoffError::NoUris { .. }));
}

/// Test: a multi-URI record needs an explicit choice
#[test]
fn test_handoff_multi_uri_choice() {
    let dir = TempDir::new().unwrap();
    let record = GameRecord::new("Hades", vec!["magnet:a".into(), "magnet:b".into()], "dodi");

    assert!(matches!(
        DownloadRequest::from_selection(&record, None, dir.path()),
        Err(HandoffError::UriChoiceRequired { available: 2, .. })
    ));
    let request = DownloadRequest::from_selection(&record, Some(1), dir.path()).unwrap();
    assert_eq!(request.uri, "magnet:b");
    assert_eq!(request.source.as_deref(), Some("dodi"));
    assert!(request.destination.is_absolute());
}

/// Test: the destination must already exist
#[test]
fn test_handoff_missing_destination() {
    let dir = TempDir::new().unwrap();
    let record = GameRecord::new("Hades", vec!["magnet:a".into()], "dodi");
    let missing = dir.path().join("missing");

    assert_eq!(
        DownloadRequest::from_selection(&record, None, &missing),
        Err(HandoffError::InvalidDestination(missing.clone()))
    );
}

// =============================================================================
// Progress Event Tests
// =============================================================================

/// Test: a successful run ends with exactly one Completed event
#[tokio::test]
async fn test_run_download_completed() {
    let dir = TempDir::new().unwrap();
    let downloader = ScriptedDownloader::succeeding();
    let (tx, rx) = mpsc::unbounded_channel();

    run_download(&downloader, request(&dir), tx).await.unwrap();
    let events = collect(rx).await;

    assert_eq!(events.first(), Some(&DownloadEvent::Started { name: "Hades".into() }));
    assert_eq!(events.last(), Some(&DownloadEvent::Completed));
    assert_eq!(events.iter().filter(|e| **e == DownloadEvent::Completed).count(), 1);
    assert_eq!(downloader.requests.lock().unwrap()[0].uri, "magnet:?xt=urn:btih:HADES");
}

/// Test: a failing run ends with Failed carrying the reason
#[tokio::test]
async fn test_run_download_failed() {
    let dir = TempDir::new().unwrap();
    let downloader = ScriptedDownloader::failing("tracker unreachable");
    let (tx, rx) = mpsc::unbounded_channel();

    assert!(run_download(&downloader, request(&dir), tx).await.is_err());
    match collect(rx).await.last() {
        Some(DownloadEvent::Failed(message)) => assert!(message.contains("tracker unreachable")),
        other => panic!("unexpected last event: {:?}", other),
    }
}

/// Test: a dropped receiver does not fail the download
#[tokio::test]
async fn test_run_download_without_listener() {
    let dir = TempDir::new().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);

    assert!(run_download(&ScriptedDownloader::succeeding(), request(&dir), tx).await.is_ok());
}

// =============================================================================
// CLI Driver Tests
// =============================================================================

#[tokio::test]
async fn test_download_with_progress_exit_codes() {
    let dir = TempDir::new().unwrap();
    let ok = ScriptedDownloader::succeeding();
    let failing = ScriptedDownloader::failing("disk full");
    let output = quiet();

    let codes = futures::future::join_all([
        download_with_progress(&ok, request(&dir), &output),
        download_with_progress(&failing, request(&dir), &output),
    ])
    .await;

    assert_eq!(codes, vec![ExitCode::Success, ExitCode::DownloadFailed]);
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn test_progress_bar_render() {
    let bar = ProgressBar::new(10);
    let line = bar.render(&DownloadProgress::new(512, 1024, 1024 * 1024));
    assert_eq!(line, "█████░░░░░ | 50% | 1.00 MB/s | ETA: 0s");
}

#[test]
fn test_progress_bar_draw_completed() {
    let bar = ProgressBar::new(4);
    let mut out = Vec::new();
    bar.draw(&mut out, &DownloadEvent::Completed).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("████ | 100%"));
    assert!(text.contains("Download complete!"));
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(Duration::from_secs(0)), "0s");
    assert_eq!(format_duration(Duration::from_secs(64)), "1m 4s");
    assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
}

/// Test: the blocking test runtime drives a download to completion
#[test]
fn test_run_download_blocking() {
    let dir = TempDir::new().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    let events = tokio_test::block_on(async {
        run_download(&ScriptedDownloader::succeeding(), request(&dir), tx).await.unwrap();
        collect(rx).await
    });
    assert_eq!(events.len(), 4);
}
