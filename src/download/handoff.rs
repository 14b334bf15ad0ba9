//! Selection to download handoff
//!
//! Turns a chosen record into exactly one URI and a destination directory.
//! A record without URIs is an error here, never a silent no-op.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::GameRecord;

/// Why a selection cannot be handed to the downloader
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HandoffError {
    #[error("'{title}' has no download URIs")]
    NoUris { title: String },

    #[error("URI choice {choice} is out of range ({available} available)")]
    UriOutOfRange { choice: usize, available: usize },

    #[error("'{title}' has {available} URIs, one must be chosen")]
    UriChoiceRequired { title: String, available: usize },

    #[error("Invalid path '{0}'. Please enter a valid directory.")]
    InvalidDestination(PathBuf),
}

/// Resolve the URI to download
///
/// `choice` is a 0-based index into `record.uris`. A single-URI record
/// resolves without a choice; a multi-URI record requires one.
pub fn resolve_uri(record: &GameRecord, choice: Option<usize>) -> Result<&str, HandoffError> {
    match (record.uris.len(), choice) {
        (0, _) => Err(HandoffError::NoUris {
            title: record.title.clone(),
        }),
        (1, None) => Ok(&record.uris[0]),
        (available, None) => Err(HandoffError::UriChoiceRequired {
            title: record.title.clone(),
            available,
        }),
        (available, Some(choice)) => record
            .uris
            .get(choice)
            .map(String::as_str)
            .ok_or(HandoffError::UriOutOfRange { choice, available }),
    }
}

/// Check that `path` is an existing directory and make it absolute
pub fn resolve_destination(path: &Path) -> Result<PathBuf, HandoffError> {
    if !path.is_dir() {
        return Err(HandoffError::InvalidDestination(path.to_path_buf()));
    }
    std::path::absolute(path).map_err(|_| HandoffError::InvalidDestination(path.to_path_buf()))
}

/// Everything the downloader needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Magnet URI (or other identifier the torrent client accepts)
    pub uri: String,
    /// Existing directory the files are written into
    pub destination: PathBuf,
    /// Display title
    pub title: String,
    /// Catalog or provider the release came from
    pub source: Option<String>,
}

impl DownloadRequest {
    /// Build a request from a selected record
    pub fn from_selection(
        record: &GameRecord,
        uri_choice: Option<usize>,
        destination: &Path,
    ) -> Result<Self, HandoffError> {
        let uri = resolve_uri(record, uri_choice)?.to_string();
        let destination = resolve_destination(destination)?;
        Ok(Self {
            uri,
            destination,
            title: record.title.clone(),
            source: (!record.source.is_empty()).then(|| record.source.clone()),
        })
    }

    /// Build a request for a raw URI
    pub fn from_uri(
        uri: impl Into<String>,
        destination: &Path,
        title: impl Into<String>,
    ) -> Result<Self, HandoffError> {
        let uri = uri.into();
        let title = title.into();
        if uri.trim().is_empty() {
            return Err(HandoffError::NoUris { title });
        }
        Ok(Self {
            uri,
            destination: resolve_destination(destination)?,
            title,
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(uris: &[&str]) -> GameRecord {
        GameRecord::new("Hades", uris.iter().map(|s| s.to_string()).collect(), "dodi")
    }

    #[test]
    fn test_empty_uris_fail_loudly() {
        let err = resolve_uri(&record(&[]), None).unwrap_err();
        assert_eq!(err, HandoffError::NoUris { title: "Hades".into() });
        assert!(resolve_uri(&record(&[]), Some(0)).is_err());
    }

    #[test]
    fn test_single_uri_needs_no_choice() {
        assert_eq!(resolve_uri(&record(&["magnet:a"]), None).unwrap(), "magnet:a");
        assert_eq!(resolve_uri(&record(&["magnet:a"]), Some(0)).unwrap(), "magnet:a");
    }

    #[test]
    fn test_multiple_uris_need_a_choice() {
        let r = record(&["magnet:a", "magnet:b"]);
        assert!(matches!(
            resolve_uri(&r, None),
            Err(HandoffError::UriChoiceRequired { available: 2, .. })
        ));
        assert_eq!(resolve_uri(&r, Some(1)).unwrap(), "magnet:b");
        assert_eq!(
            resolve_uri(&r, Some(2)).unwrap_err(),
            HandoffError::UriOutOfRange { choice: 2, available: 2 }
        );
    }

    #[test]
    fn test_destination_must_exist() {
        let err = resolve_destination(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, HandoffError::InvalidDestination(_)));
    }
}
