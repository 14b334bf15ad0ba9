//! CLI - Command Line Interface for repackgrab
//!
//! Every interactive action is scriptable. Output is JSON-parseable with
//! `--json`, which is also the default when stdout is not a terminal.
//!
//! # Examples
//!
//! ```bash
//! # Search local catalogs and FitGirl Repacks
//! repackgrab search "cyberpunk 2077" --json
//!
//! # Download the top result into a folder
//! repackgrab download "doom 3" --index 1 --path ~/Games
//!
//! # Manage providers and installed games
//! repackgrab providers add https://hydralinks.cloud/sources/dodi.json
//! repackgrab library list
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::RankedEntry;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Nothing matched the query
    NoResults = 4,
    /// Torrent transfer failed
    DownloadFailed = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// repackgrab - search game repacks and download them
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "repackgrab",
    version,
    about = "Search game repack catalogs and download them over BitTorrent",
    long_about = "Searches provider catalogs on disk together with FitGirl Repacks, \
                  ranks the matches and downloads the chosen release.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  repackgrab                                Launch interactive TUI\n\
                  repackgrab search \"doom 3\"                Search for a game\n\
                  repackgrab download \"doom 3\" -i 1 -p .    Download the top result\n\
                  repackgrab library list --json            List installed games"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Directory of provider catalogs (overrides config)
    #[arg(long, global = true)]
    pub catalog_dir: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search catalogs and FitGirl Repacks for a game
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Search for a game and download one result
    #[command(visible_alias = "dl")]
    Download(DownloadCmd),

    /// Download a raw magnet link
    Fetch(FetchCmd),

    /// Manage provider catalogs
    #[command(subcommand, visible_alias = "p")]
    Providers(ProvidersCmd),

    /// Manage installed games
    #[command(subcommand, visible_alias = "lib")]
    Library(LibraryCmd),
}

// =============================================================================
// Search Command
// =============================================================================

/// Search for a game by title
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Game title or keywords
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Only search local catalogs
    #[arg(long)]
    pub no_remote: bool,
}

// =============================================================================
// Download Commands
// =============================================================================

/// Search for a game and download the chosen result
#[derive(Args, Debug)]
pub struct DownloadCmd {
    /// Game title or keywords
    #[arg(required = true)]
    pub query: String,

    /// Result number from `search` output (1 = top result)
    #[arg(long, short = 'i', default_value = "1")]
    pub index: usize,

    /// URI number when the release has several (1-based)
    #[arg(long, short = 'u')]
    pub uri: Option<usize>,

    /// Destination directory (default: config download_dir or cwd)
    #[arg(long, short = 'p')]
    pub path: Option<PathBuf>,

    /// Only search local catalogs
    #[arg(long)]
    pub no_remote: bool,
}

impl DownloadCmd {
    /// 0-based result index, None for an index of 0
    pub fn result_index(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }

    /// 0-based URI choice; an explicit 0 stays out of range
    pub fn uri_choice(&self) -> Option<usize> {
        self.uri.map(|n| n.checked_sub(1).unwrap_or(usize::MAX))
    }
}

/// Download a magnet link without searching
#[derive(Args, Debug)]
pub struct FetchCmd {
    /// Magnet link URL
    #[arg(required = true)]
    pub magnet: String,

    /// Destination directory (default: config download_dir or cwd)
    #[arg(long, short = 'p')]
    pub path: Option<PathBuf>,

    /// Display title
    #[arg(long, short = 't')]
    pub title: Option<String>,
}

// =============================================================================
// Providers Commands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum ProvidersCmd {
    /// List installed provider catalogs
    #[command(visible_alias = "ls")]
    List,

    /// Download a provider catalog from hydralinks
    Add {
        /// Catalog URL (https://hydralinks.cloud/sources/...)
        url: String,
    },
}

// =============================================================================
// Library Commands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum LibraryCmd {
    /// List game folders
    #[command(visible_alias = "ls")]
    List,

    /// Delete a game folder
    #[command(visible_alias = "rm")]
    Uninstall {
        /// Game folder name
        name: String,
    },

    /// Delete a game folder and download the game again
    Reinstall {
        /// Game folder name
        name: String,

        /// Result number to download (1 = top result)
        #[arg(long, short = 'i', default_value = "1")]
        index: usize,
    },

    /// Set the games folder
    SetFolder {
        /// Existing directory holding one folder per game
        path: PathBuf,
    },
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// One numbered search result
#[derive(Debug, Serialize)]
pub struct ResultRow<'a> {
    /// 1-based, as accepted by `download --index`
    pub index: usize,
    #[serde(flatten)]
    pub entry: &'a RankedEntry,
}

/// Finished download response
#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub status: String,
    pub title: String,
    pub destination: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a line of human-readable output (skipped in JSON mode)
    pub fn line(&self, msg: impl std::fmt::Display) {
        if !self.json {
            println!("{}", msg);
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
