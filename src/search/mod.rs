//! Search aggregation
//!
//! Runs the local catalog search and the remote lookup side by side, drops
//! candidates that have nothing to download, and ranks what is left.

pub mod rank;

use serde::Serialize;
use tracing::{info, warn};

use crate::api::FitgirlClient;
use crate::catalog::LocalSearch;
use crate::config::Config;
use crate::models::RankedEntry;

pub use rank::{rank, similarity};

/// Outcome of one search
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub query: String,
    /// Ranked candidates, best first
    pub entries: Vec<RankedEntry>,
    /// Number of local catalog matches that made it into `entries`
    pub local_matches: usize,
    /// Whether the remote lookup produced the first entry
    pub remote_hit: bool,
    /// Catalog files skipped while loading
    pub catalog_issues: usize,
    /// Matches dropped because they carry no URIs
    pub dropped_without_uris: usize,
}

impl SearchResults {
    /// True when neither source produced anything
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&RankedEntry> {
        self.entries.get(index)
    }
}

/// Local + remote search with ranking
#[derive(Clone)]
pub struct SearchEngine {
    local: LocalSearch,
    remote: Option<FitgirlClient>,
}

impl SearchEngine {
    pub fn new(local: LocalSearch, remote: Option<FitgirlClient>) -> Self {
        Self { local, remote }
    }

    /// Engine that only searches local catalogs
    pub fn local_only(local: LocalSearch) -> Self {
        Self::new(local, None)
    }

    /// Engine over the configured catalog directory and remote site
    pub fn from_config(config: &Config, remote: bool) -> Self {
        let local = LocalSearch::new(config.catalog_dir());
        let remote = (remote && config.remote_enabled()).then(|| {
            FitgirlClient::with_base_url(config.remote_base_url()).with_timeout(config.request_timeout())
        });
        Self::new(local, remote)
    }

    /// Search both sources and rank the merged candidates
    ///
    /// Never fails: problems in either source shrink the result set.
    pub async fn search(&self, query: &str) -> SearchResults {
        let mut results = SearchResults {
            query: query.to_string(),
            ..Default::default()
        };
        if query.trim().is_empty() {
            return results;
        }

        let remote_lookup = async {
            match self.remote {
                Some(ref client) => client.search(query).await,
                None => None,
            }
        };
        let ((mut local, issues), remote) = tokio::join!(self.local.search(query), remote_lookup);

        let before = local.len();
        local.retain(|r| r.has_uris());
        results.dropped_without_uris = before - local.len();
        if results.dropped_without_uris > 0 {
            warn!(
                dropped = results.dropped_without_uris,
                "Ignoring matches without download URIs"
            );
        }

        results.local_matches = local.len();
        results.remote_hit = remote.is_some();
        results.catalog_issues = issues;
        results.entries = rank(query, local, remote);

        info!(
            query,
            local = results.local_matches,
            remote = results.remote_hit,
            skipped_catalogs = results.catalog_issues,
            "Search complete"
        );
        results
    }
}
