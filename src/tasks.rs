//! Background work for the TUI
//!
//! Runs the [`Action`]s returned by key handling and reports back through
//! an [`AppEvent`] channel.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::app::{Action, AppEvent};
use crate::config::Config;
use crate::download::handoff::resolve_destination;
use crate::download::{run_download, LibrqbitDownloader};
use crate::library::Library;
use crate::providers::Providers;
use crate::search::SearchEngine;

pub type AppEventSender = mpsc::UnboundedSender<AppEvent>;

/// Services the TUI actions run against
#[derive(Clone)]
pub struct Services {
    pub engine: SearchEngine,
    pub downloader: LibrqbitDownloader,
    pub providers: Providers,
    /// Where a new games folder is saved
    pub config_path: Option<PathBuf>,
}

impl Services {
    pub fn from_config(config: &Config, config_path: Option<PathBuf>) -> Self {
        Self {
            engine: SearchEngine::from_config(config, true),
            downloader: LibrqbitDownloader::new().with_metadata_timeout(config.metadata_timeout()),
            providers: Providers::new(config.catalog_dir()),
            config_path,
        }
    }
}

/// Run `action` on a tokio task
pub fn spawn_action(
    action: Action,
    services: &Services,
    games_folder: Option<PathBuf>,
    events: AppEventSender,
) {
    let services = services.clone();
    tokio::spawn(async move {
        perform(action, &services, games_folder.as_deref(), &events).await;
    });
}

/// Run `action` to completion, sending its events
pub async fn perform(
    action: Action,
    services: &Services,
    games_folder: Option<&Path>,
    events: &AppEventSender,
) {
    debug!(?action, "Running action");
    let event = match action {
        Action::Search(query) => AppEvent::SearchFinished(services.engine.search(&query).await),
        Action::Download(request) => {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let forward = events.clone();
            let forwarder = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    let _ = forward.send(AppEvent::Download(event));
                }
            });
            // run_download already sends the terminal event
            let _ = run_download(&services.downloader, request, tx).await;
            let _ = forwarder.await;
            return;
        }
        Action::AddProvider(url) => AppEvent::ProviderAdded(
            services
                .providers
                .add(&url)
                .await
                .map(|info| info.name)
                .map_err(|e| e.to_string()),
        ),
        Action::SaveGamesFolder(path) => {
            AppEvent::GamesFolderSaved(save_games_folder(&path, services.config_path.as_deref()))
        }
        Action::LoadLibrary(folder) => {
            AppEvent::LibraryLoaded(Library::new(folder).list().map_err(|e| e.to_string()))
        }
        Action::Uninstall(name) => AppEvent::Uninstalled(
            library_for(games_folder)
                .and_then(|lib| lib.uninstall(&name).map_err(|e| e.to_string()))
                .map(|()| name),
        ),
        Action::Reinstall(name) => AppEvent::Reinstalled(
            library_for(games_folder).and_then(|lib| lib.reinstall(&name).map_err(|e| e.to_string())),
        ),
    };

    if events.send(event).is_err() {
        warn!("App closed before an action finished");
    }
}

fn library_for(games_folder: Option<&Path>) -> Result<Library, String> {
    Library::from_setting(games_folder).map_err(|e| e.to_string())
}

/// Validate and persist a new games folder
fn save_games_folder(path: &Path, config_path: Option<&Path>) -> Result<PathBuf, String> {
    let folder = resolve_destination(path).map_err(|e| e.to_string())?;
    let config_path = config_path
        .map(Path::to_path_buf)
        .or_else(Config::path)
        .ok_or_else(|| "Could not determine config path".to_string())?;

    let mut config = Config::load_from(&config_path);
    config.games_folder = Some(folder.clone());
    config.save_to(&config_path).map_err(|e| format!("{:#}", e))?;
    Ok(folder)
}
