//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the search, download, provider and
//! library services. Each handler takes CLI args and Output, returns ExitCode.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::mpsc;

use crate::cli::{
    DownloadCmd, DownloadResponse, ExitCode, FetchCmd, LibraryCmd, Output, ProvidersCmd,
    ResultRow, SearchCmd,
};
use crate::config::Config;
use crate::download::handoff::resolve_destination;
use crate::download::{
    run_download, DownloadRequest, Downloader, HandoffError, LibrqbitDownloader, ProgressBar,
};
use crate::library::{Library, LibraryError};
use crate::models::GameRecord;
use crate::providers::{ProviderError, Providers};
use crate::search::{SearchEngine, SearchResults};

/// Settings shared by every command
pub struct Context {
    pub config: Config,
    /// Where `library set-folder` persists changes
    pub config_path: Option<PathBuf>,
}

impl Context {
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        Self { config, config_path }
    }

    fn engine(&self, no_remote: bool) -> SearchEngine {
        SearchEngine::from_config(&self.config, !no_remote)
    }

    fn downloader(&self) -> LibrqbitDownloader {
        LibrqbitDownloader::new().with_metadata_timeout(self.config.metadata_timeout())
    }

    fn providers(&self) -> Providers {
        Providers::new(self.config.catalog_dir())
    }
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, ctx: &Context, output: &Output) -> ExitCode {
    warn_if_no_providers(ctx, output);
    output.info(format!("Searching for: {}", cmd.query));

    let results = ctx.engine(cmd.no_remote).search(&cmd.query).await;
    if results.is_empty() {
        return output.error(
            "No game found in local databases or on FitGirl Repacks.",
            ExitCode::NoResults,
        );
    }

    let rows: Vec<ResultRow> = results
        .entries
        .iter()
        .take(cmd.limit)
        .enumerate()
        .map(|(i, entry)| ResultRow {
            index: i + 1,
            entry,
        })
        .collect();

    if output.json {
        if let Err(e) = output.print(&rows) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        for row in &rows {
            output.line(format!("{}. {}", row.index, row.entry.label()));
        }
    }
    ExitCode::Success
}

fn warn_if_no_providers(ctx: &Context, output: &Output) {
    if ctx.providers().is_empty() {
        output.info(
            "No providers set. Add one with `repackgrab providers add <url>` \
             (copy a source link from https://hydralinks.cloud).",
        );
    }
}

// =============================================================================
// Download Commands
// =============================================================================

pub async fn download_cmd(cmd: DownloadCmd, ctx: &Context, output: &Output) -> ExitCode {
    let destination = cmd
        .path
        .clone()
        .unwrap_or_else(|| ctx.config.download_dir());

    let results = ctx.engine(cmd.no_remote).search(&cmd.query).await;
    let record = match pick_result(&results, cmd.result_index(), output) {
        Ok(record) => record,
        Err(code) => return code,
    };

    let request = match DownloadRequest::from_selection(record, cmd.uri_choice(), &destination) {
        Ok(request) => request,
        Err(e) => return handoff_error(&e, record, output),
    };

    print_details(record, output);
    download_with_progress(&ctx.downloader(), request, output).await
}

pub async fn fetch_cmd(cmd: FetchCmd, ctx: &Context, output: &Output) -> ExitCode {
    let destination = cmd.path.unwrap_or_else(|| ctx.config.download_dir());
    let title = cmd.title.unwrap_or_else(|| "magnet download".to_string());

    let request = match DownloadRequest::from_uri(cmd.magnet, &destination, title) {
        Ok(request) => request,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };
    download_with_progress(&ctx.downloader(), request, output).await
}

/// Pick a ranked result by 0-based index
fn pick_result<'a>(
    results: &'a SearchResults,
    index: Option<usize>,
    output: &Output,
) -> Result<&'a GameRecord, ExitCode> {
    if results.is_empty() {
        return Err(output.error(
            "No game found in local databases or on FitGirl Repacks.",
            ExitCode::NoResults,
        ));
    }
    index
        .and_then(|i| results.get(i))
        .map(|entry| &entry.record)
        .ok_or_else(|| {
            output.error(
                format!("Result index must be between 1 and {}", results.len()),
                ExitCode::InvalidArgs,
            )
        })
}

fn handoff_error(err: &HandoffError, record: &GameRecord, output: &Output) -> ExitCode {
    if let HandoffError::UriChoiceRequired { .. } | HandoffError::UriOutOfRange { .. } = err {
        for (i, uri) in record.uris.iter().enumerate() {
            output.info(format!("{}. {}", i + 1, uri));
        }
        output.info("Select one with --uri N");
    }
    output.error(err.to_string(), ExitCode::InvalidArgs)
}

fn print_details(record: &GameRecord, output: &Output) {
    output.info("\nGame Details:");
    for (label, value) in record.details() {
        output.info(format!("{}: {}", label, value));
    }
}

/// Run a download, drawing progress on stderr unless quiet or JSON
pub async fn download_with_progress(
    downloader: &dyn Downloader,
    request: DownloadRequest,
    output: &Output,
) -> ExitCode {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let draw = !output.quiet && !output.json;
    let printer = tokio::spawn(async move {
        let bar = ProgressBar::default();
        let mut stderr = std::io::stderr();
        while let Some(event) = rx.recv().await {
            if draw {
                let _ = bar.draw(&mut stderr, &event);
            }
        }
    });

    let response = DownloadResponse {
        status: "completed".to_string(),
        title: request.title.clone(),
        destination: request.destination.clone(),
        source: request.source.clone(),
    };
    let result = run_download(downloader, request, tx).await;
    let _ = printer.await;

    match result {
        Ok(()) => {
            if output.json {
                if let Err(e) = output.print(&response) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Download failed: {}", e), ExitCode::DownloadFailed),
    }
}

// =============================================================================
// Providers Commands
// =============================================================================

pub async fn providers_cmd(cmd: ProvidersCmd, ctx: &Context, output: &Output) -> ExitCode {
    let providers = ctx.providers();
    match cmd {
        ProvidersCmd::List => match providers.list() {
            Ok(list) => {
                if output.json {
                    if let Err(e) = output.print(&list) {
                        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                    }
                } else if list.is_empty() {
                    output.info(format!("No providers in {}", providers.dir().display()));
                } else {
                    for p in &list {
                        output.line(format!("{} ({} bytes)", p.name, p.size_bytes));
                    }
                }
                ExitCode::Success
            }
            Err(e) => output.error(e.to_string(), ExitCode::Error),
        },
        ProvidersCmd::Add { url } => match providers.add(&url).await {
            Ok(info) => {
                if output.json {
                    if let Err(e) = output.print(&info) {
                        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                    }
                } else {
                    output.line(format!("Provider {} added.", info.name));
                }
                ExitCode::Success
            }
            Err(e) => {
                let code = provider_exit_code(&e);
                output.error(e.to_string(), code)
            }
        },
    }
}

pub fn provider_exit_code(err: &ProviderError) -> ExitCode {
    match err {
        ProviderError::InvalidUrl(_) => ExitCode::InvalidArgs,
        ProviderError::Fetch(_) | ProviderError::Status(_) => ExitCode::NetworkError,
        ProviderError::InvalidCatalog(_) | ProviderError::Io(_) => ExitCode::Error,
    }
}

// =============================================================================
// Library Commands
// =============================================================================

#[derive(Serialize)]
struct LibraryListing<'a> {
    games_folder: &'a Path,
    games: Vec<String>,
}

pub async fn library_cmd(cmd: LibraryCmd, ctx: &Context, output: &Output) -> ExitCode {
    match cmd {
        LibraryCmd::List => {
            let library = match open_library(ctx, output) {
                Ok(library) => library,
                Err(code) => return code,
            };
            match library.list() {
                Ok(games) => {
                    if output.json {
                        let listing = LibraryListing {
                            games_folder: library.root(),
                            games,
                        };
                        if let Err(e) = output.print(&listing) {
                            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                        }
                    } else if games.is_empty() {
                        output.info("No game folders found in the specified games folder.");
                    } else {
                        for (i, game) in games.iter().enumerate() {
                            output.line(format!("{}. {}", i + 1, game));
                        }
                    }
                    ExitCode::Success
                }
                Err(e) => output.error(e.to_string(), ExitCode::Error),
            }
        }
        LibraryCmd::Uninstall { name } => {
            let library = match open_library(ctx, output) {
                Ok(library) => library,
                Err(code) => return code,
            };
            match library.uninstall(&name) {
                Ok(()) => {
                    if output.json {
                        let done = serde_json::json!({ "status": "uninstalled", "game": name });
                        if let Err(e) = output.print(done) {
                            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                        }
                    } else {
                        output.line(format!("Game folder '{}' uninstalled.", name));
                    }
                    ExitCode::Success
                }
                Err(e) => output.error(e.to_string(), library_exit_code(&e)),
            }
        }
        LibraryCmd::Reinstall { name, index } => {
            let library = match open_library(ctx, output) {
                Ok(library) => library,
                Err(code) => return code,
            };
            let query = match library.reinstall(&name) {
                Ok(query) => query,
                Err(e) => return output.error(e.to_string(), library_exit_code(&e)),
            };
            output.info(format!("Game folder '{}' removed. Reinstalling...", name));

            let download = DownloadCmd {
                query,
                index,
                uri: None,
                path: Some(library.root().to_path_buf()),
                no_remote: false,
            };
            download_cmd(download, ctx, output).await
        }
        LibraryCmd::SetFolder { path } => set_folder(&path, ctx, output),
    }
}

fn open_library(ctx: &Context, output: &Output) -> Result<Library, ExitCode> {
    Library::from_setting(ctx.config.games_folder.as_deref()).map_err(|e| {
        output.error(
            format!("{}. Use `repackgrab library set-folder <path>`", e),
            ExitCode::InvalidArgs,
        )
    })
}

fn library_exit_code(err: &LibraryError) -> ExitCode {
    match err {
        LibraryError::NotConfigured | LibraryError::InvalidName(_) | LibraryError::NotFound(_) => {
            ExitCode::InvalidArgs
        }
        LibraryError::Unreadable { .. } | LibraryError::Remove { .. } => ExitCode::Error,
    }
}

fn set_folder(path: &Path, ctx: &Context, output: &Output) -> ExitCode {
    let folder = match resolve_destination(path) {
        Ok(folder) => folder,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };

    let Some(config_path) = ctx.config_path.clone().or_else(Config::path) else {
        return output.error("Could not determine config path", ExitCode::Error);
    };

    // Reload so command-line overrides are not persisted
    let mut config = Config::load_from(&config_path);
    config.games_folder = Some(folder.clone());
    if let Err(e) = config.save_to(&config_path) {
        return output.error(format!("{:#}", e), ExitCode::Error);
    }

    output.line(format!("Games folder updated to {}", folder.display()));
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_output() -> Output {
        Output {
            json: false,
            quiet: true,
        }
    }

    #[test]
    fn test_provider_exit_codes() {
        assert_eq!(
            provider_exit_code(&ProviderError::InvalidUrl(String::new())),
            ExitCode::InvalidArgs
        );
        assert_eq!(provider_exit_code(&ProviderError::Status(500)), ExitCode::NetworkError);
    }

    #[test]
    fn test_pick_result_bounds() {
        let output = quiet_output();
        let empty = SearchResults::default();
        assert_eq!(pick_result(&empty, Some(0), &output).unwrap_err(), ExitCode::NoResults);

        let results = SearchResults {
            entries: crate::search::rank(
                "hades",
                vec![GameRecord::new("Hades", vec!["magnet:a".into()], "dodi")],
                None,
            ),
            ..Default::default()
        };
        assert_eq!(pick_result(&results, Some(0), &output).unwrap().title, "Hades");
        assert_eq!(pick_result(&results, Some(1), &output).unwrap_err(), ExitCode::InvalidArgs);
        assert_eq!(pick_result(&results, None, &output).unwrap_err(), ExitCode::InvalidArgs);
    }

    #[test]
    fn test_set_folder_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let ctx = Context::new(Config::default(), Some(config_path.clone()));

        let code = set_folder(dir.path(), &ctx, &quiet_output());
        assert_eq!(code, ExitCode::Success);

        let saved = Config::load_from(&config_path);
        assert!(saved.games_folder.is_some());
    }

    #[test]
    fn test_set_folder_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(Config::default(), Some(dir.path().join("config.toml")));
        let code = set_folder(&dir.path().join("missing"), &ctx, &quiet_output());
        assert_eq!(code, ExitCode::InvalidArgs);
    }
}
