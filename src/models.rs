//! Core data models for repackgrab
//!
//! Game records as they come out of provider catalogs and the remote
//! repack site, plus the ranked view handed to the selection flow.

use serde::{Deserialize, Serialize};

/// Source label stamped on every record found on the remote repack site
pub const REMOTE_SOURCE: &str = "FitGirl Repacks";

// =============================================================================
// GameRecord
// =============================================================================

/// A downloadable game release
///
/// Field names follow the provider catalog format (`uploadDate`, `fileSize`,
/// `repackLinkSource`). `source` is never read from catalog JSON; it is
/// stamped by whoever produced the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Display title, also the match key for local search
    pub title: String,
    /// Candidate download identifiers, usually magnet URIs
    #[serde(default)]
    pub uris: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repack_link_source: Option<String>,
    /// Originating catalog name or the remote provider label
    #[serde(skip_deserializing)]
    pub source: String,
}

impl GameRecord {
    /// Create a record with a title and URIs, no metadata
    pub fn new(title: impl Into<String>, uris: Vec<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uris,
            upload_date: None,
            file_size: None,
            repack_link_source: None,
            source: source.into(),
        }
    }

    /// Record for a remote hit: the query as title, one magnet link
    pub fn remote(title: impl Into<String>, magnet: impl Into<String>) -> Self {
        Self::new(title, vec![magnet.into()], REMOTE_SOURCE)
    }

    /// Whether there is anything to hand to the downloader
    pub fn has_uris(&self) -> bool {
        !self.uris.is_empty()
    }

    /// Whether this record came from the remote repack site
    pub fn is_remote(&self) -> bool {
        self.source == REMOTE_SOURCE
    }

    /// Lines describing the release, shown before a download starts
    pub fn details(&self) -> Vec<(&'static str, &str)> {
        let mut lines = vec![("Title", self.title.as_str()), ("Source", self.source.as_str())];
        if let Some(ref date) = self.upload_date {
            lines.push(("Upload Date", date));
        }
        if let Some(ref size) = self.file_size {
            lines.push(("File Size", size));
        }
        if let Some(ref link) = self.repack_link_source {
            lines.push(("Repack Link", link));
        }
        lines
    }
}

// =============================================================================
// RankedEntry
// =============================================================================

/// A candidate in the ranked result list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    #[serde(flatten)]
    pub record: GameRecord,
    /// Word-overlap similarity with the query, in [0, 1]
    pub score: f64,
    /// Set on the live remote lookup, which is always listed first
    pub top: bool,
}

impl RankedEntry {
    /// Label used in result lists, e.g. "★ Top Result: Doom 3 (FitGirl Repacks)"
    pub fn label(&self) -> String {
        let prefix = if self.top { "★ Top Result: " } else { "" };
        format!("{}{} ({})", prefix, self.record.title, self.record.source)
    }
}
