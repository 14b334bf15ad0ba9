//! repackgrab - find game repacks and download them
//!
//! # Modules
//!
//! - `models` - Game records and ranked results
//! - `catalog` - Provider catalogs on disk and substring search over them
//! - `api` - FitGirl Repacks lookup with bounded retry
//! - `search` - Similarity ranking and the combined search engine
//! - `download` - Selection handoff and the embedded torrent client
//! - `providers` / `library` - Catalog and games folder management
//! - `app` / `ui` / `tasks` - Interactive TUI
//! - `cli` / `commands` - Scriptable command line

pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod download;
pub mod library;
pub mod logging;
pub mod models;
pub mod providers;
pub mod search;
pub mod tasks;
pub mod ui;

// Re-export commonly used types
pub use api::{FitgirlClient, RemoteError};
pub use app::{App, AppState};
pub use catalog::{load_catalogs, search_catalogs, LocalSearch};
pub use config::Config;
pub use download::{DownloadEvent, DownloadRequest, Downloader, LibrqbitDownloader};
pub use models::{GameRecord, RankedEntry};
pub use search::{rank, similarity, SearchEngine, SearchResults};
