//! Provider catalogs on disk
//!
//! A catalog is one JSON file in the catalog directory, either
//! `{"downloads": [...]}` or a bare `[...]` of game records. Loading never
//! fails as a whole: unreadable, malformed or oddly shaped files are logged,
//! reported as [`CatalogIssue`]s and skipped.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::models::GameRecord;

/// Why a catalog file (or the whole directory) was skipped
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog directory unavailable: {0}")]
    DirectoryUnavailable(#[source] std::io::Error),

    #[error("failed to read file: {0}")]
    Read(#[source] std::io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("unexpected JSON structure (expected {{\"downloads\": [...]}} or [...])")]
    Structure,
}

/// A skipped file and the reason
#[derive(Debug)]
pub struct CatalogIssue {
    pub file: PathBuf,
    pub error: CatalogError,
}

/// Top-level shapes a catalog document may take
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogShape {
    Bare(Vec<Value>),
    Wrapped { downloads: Vec<Value> },
}

impl CatalogShape {
    fn into_records(self) -> Vec<Value> {
        match self {
            CatalogShape::Wrapped { downloads } => downloads,
            CatalogShape::Bare(records) => records,
        }
    }
}

/// One loaded provider catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    /// File stem, stamped as `source` on every record
    pub name: String,
    pub path: PathBuf,
    pub records: Vec<GameRecord>,
    /// Entries that were not valid game records (e.g. no title)
    pub skipped: usize,
}

impl Catalog {
    /// Parse catalog text, stamping records with `name`
    pub fn parse(name: &str, path: PathBuf, text: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(text).map_err(CatalogError::Parse)?;
        let shape: CatalogShape =
            serde_json::from_value(value).map_err(|_| CatalogError::Structure)?;

        let mut records = Vec::new();
        let mut skipped = 0;
        for raw in shape.into_records() {
            match serde_json::from_value::<GameRecord>(raw) {
                Ok(mut record) => {
                    record.source = name.to_string();
                    records.push(record);
                }
                Err(e) => {
                    debug!(catalog = name, error = %e, "Skipping malformed record");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!(catalog = name, skipped, "Some catalog entries were not valid game records");
        }

        Ok(Self {
            name: name.to_string(),
            path,
            records,
            skipped,
        })
    }
}

/// Everything found in a catalog directory
#[derive(Debug, Default)]
pub struct CatalogSet {
    pub catalogs: Vec<Catalog>,
    pub issues: Vec<CatalogIssue>,
}

impl CatalogSet {
    /// Total number of records across catalogs
    pub fn record_count(&self) -> usize {
        self.catalogs.iter().map(|c| c.records.len()).sum()
    }

    /// Iterate all records in catalog order
    pub fn records(&self) -> impl Iterator<Item = &GameRecord> {
        self.catalogs.iter().flat_map(|c| c.records.iter())
    }
}

/// Whether a path looks like a catalog file (`*.json`, any case)
pub fn is_catalog_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Load every catalog directly inside `dir`
///
/// Files are visited in file-name order. Sub-directories are ignored.
pub async fn load_catalogs(dir: &Path) -> CatalogSet {
    let mut set = CatalogSet::default();

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(dir = %dir.display(), error = %e, "Error reading catalog directory");
            set.issues.push(CatalogIssue {
                file: dir.to_path_buf(),
                error: CatalogError::DirectoryUnavailable(e),
            });
            return set;
        }
    };

    let mut files = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
                if is_file && is_catalog_file(&path) {
                    files.push(path);
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!(dir = %dir.display(), error = %e, "Error listing catalog directory");
                set.issues.push(CatalogIssue {
                    file: dir.to_path_buf(),
                    error: CatalogError::DirectoryUnavailable(e),
                });
                break;
            }
        }
    }
    files.sort();

    for path in files {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) => {
                error!(file = %path.display(), error = %e, "Error reading catalog");
                set.issues.push(CatalogIssue {
                    file: path,
                    error: CatalogError::Read(e),
                });
                continue;
            }
        };

        match Catalog::parse(&name, path.clone(), &text) {
            Ok(catalog) => {
                debug!(catalog = %catalog.name, records = catalog.records.len(), "Loaded catalog");
                set.catalogs.push(catalog);
            }
            Err(e) => {
                match &e {
                    CatalogError::Structure => {
                        warn!(file = %path.display(), "Skipping catalog: unexpected JSON structure")
                    }
                    other => {
                        error!(file = %path.display(), error = %other, "Error parsing catalog")
                    }
                }
                set.issues.push(CatalogIssue { file: path, error: e });
            }
        }
    }

    set
}

/// Case-insensitive substring match of `query` against every record title
///
/// Matches keep catalog order and are not deduplicated across catalogs.
pub fn search_catalogs(query: &str, set: &CatalogSet) -> Vec<GameRecord> {
    let needle = query.to_lowercase();
    // blank queries match nothing, same as SearchEngine::search
    if needle.trim().is_empty() {
        return Vec::new();
    }

    set.records()
        .filter(|r| r.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Local search over a catalog directory, re-reading disk on every call
#[derive(Debug, Clone)]
pub struct LocalSearch {
    dir: PathBuf,
}

impl LocalSearch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Matching records plus the number of files that had to be skipped
    pub async fn search(&self, query: &str) -> (Vec<GameRecord>, usize) {
        let set = load_catalogs(&self.dir).await;
        (search_catalogs(query, &set), set.issues.len())
    }
}
