//! Configuration management for repackgrab
//!
//! Settings are stored at ~/.config/repackgrab/config.toml unless another
//! path is given with `--config`. The file is read once at startup and the
//! resulting [`Config`] is passed to whatever needs it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::api::fitgirl::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::download::torrent::DEFAULT_METADATA_TIMEOUT;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Folder holding installed games, one sub-directory per game
    pub games_folder: Option<PathBuf>,
    /// Directory of provider catalog JSON files
    pub catalog_dir: Option<PathBuf>,
    /// Default download destination
    pub download_dir: Option<PathBuf>,
    /// Whether to query FitGirl Repacks (default: true)
    pub remote_enabled: Option<bool>,
    /// Override for the FitGirl Repacks address
    pub remote_base_url: Option<String>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// How long to wait for magnet metadata, in seconds
    pub metadata_timeout_secs: Option<u64>,
}

impl Config {
    /// Default config file path (~/.config/repackgrab/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("repackgrab").join("config.toml"))
    }

    /// Load from the default path, or return defaults if missing
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`, or return defaults if missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
                Self::default()
            }
        }
    }

    /// Save to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Catalog directory (~/.local/share/repackgrab/catalogs by default)
    pub fn catalog_dir(&self) -> PathBuf {
        self.catalog_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("repackgrab")
                .join("catalogs")
        })
    }

    /// Default download destination (current directory by default)
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote_enabled.unwrap_or(true)
    }

    pub fn remote_base_url(&self) -> &str {
        self.remote_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn metadata_timeout(&self) -> Duration {
        self.metadata_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_METADATA_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.games_folder.is_none());
        assert!(config.remote_enabled());
        assert_eq!(config.remote_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.metadata_timeout(), Duration::from_secs(60));
        assert!(config.catalog_dir().ends_with("repackgrab/catalogs"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            games_folder: Some(PathBuf::from("/games")),
            remote_enabled: Some(false),
            request_timeout_secs: Some(5),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded, config);
        assert!(!loaded.remote_enabled());
        assert_eq!(loaded.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_or_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("nope.toml")), Config::default());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "games_folder = [").unwrap();
        assert_eq!(Config::load_from(&bad), Config::default());
    }
}
