//! Provider catalog management
//!
//! Providers are JSON catalogs published on hydralinks. Adding one downloads
//! the catalog into the catalog directory, where the local search picks it up.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::api::build_client_or_default;
use crate::catalog::{is_catalog_file, Catalog};

/// Only catalogs published under this prefix can be added
pub const HYDRALINKS_SOURCES: &str = "https://hydralinks.cloud/sources/";

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid URL. Please input a URL that starts with {0}")]
    InvalidUrl(String),

    #[error("Error fetching provider: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Provider returned HTTP {0}")]
    Status(u16),

    #[error("Provider data is not a game catalog: {0}")]
    InvalidCatalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An installed provider catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Provider catalogs stored in one directory
#[derive(Debug, Clone)]
pub struct Providers {
    dir: PathBuf,
    sources_prefix: String,
    client: reqwest::Client,
}

impl Providers {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let client = build_client_or_default(reqwest::Client::builder().timeout(Duration::from_secs(60)));

        Self {
            dir: dir.into(),
            sources_prefix: HYDRALINKS_SOURCES.to_string(),
            client,
        }
    }

    /// Accept catalogs from another address (for testing)
    pub fn with_sources_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sources_prefix = prefix.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the catalog directory if missing
    pub fn ensure_dir(&self) -> Result<(), ProviderError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Installed catalogs, sorted by file name
    pub fn list(&self) -> Result<Vec<ProviderInfo>, ProviderError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut providers = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !is_catalog_file(&path) {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            providers.push(ProviderInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                size_bytes: metadata.len(),
            });
        }
        providers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(providers)
    }

    /// True when no catalog is installed yet
    pub fn is_empty(&self) -> bool {
        self.list().map(|p| p.is_empty()).unwrap_or(true)
    }

    /// File name a provider URL is stored under
    ///
    /// A `.json` extension is appended when missing so the catalog loader
    /// picks the file up.
    pub fn file_name_for(&self, url: &str) -> Result<String, ProviderError> {
        let url = url.trim();
        if !url.starts_with(&self.sources_prefix) {
            return Err(ProviderError::InvalidUrl(self.sources_prefix.clone()));
        }
        let name = url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .ok_or_else(|| ProviderError::InvalidUrl(self.sources_prefix.clone()))?;

        if is_catalog_file(Path::new(name)) {
            Ok(name.to_string())
        } else {
            Ok(format!("{}.json", name))
        }
    }

    /// Download a provider catalog and install it
    ///
    /// Existing files with the same name are replaced.
    pub async fn add(&self, url: &str) -> Result<ProviderInfo, ProviderError> {
        let name = self.file_name_for(url)?;

        debug!(url = %url, "Fetching provider catalog");
        let response = self.client.get(url.trim()).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }
        let text = response.text().await?;

        let path = self.dir.join(&name);
        let catalog = Catalog::parse(&name, path.clone(), &text)
            .map_err(|e| ProviderError::InvalidCatalog(e.to_string()))?;

        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ProviderError::InvalidCatalog(e.to_string()))?;
        let pretty =
            serde_json::to_string_pretty(&value).map_err(|e| ProviderError::InvalidCatalog(e.to_string()))?;

        self.ensure_dir()?;
        tokio::fs::write(&path, pretty.as_bytes()).await?;

        info!(
            provider = %name,
            records = catalog.records.len(),
            "Provider added"
        );
        Ok(ProviderInfo {
            name,
            path,
            size_bytes: pretty.len() as u64,
        })
    }
}
