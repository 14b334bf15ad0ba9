//! Installed games
//!
//! The games folder holds one directory per installed game. Reinstalling
//! removes the folder; the caller then searches for the game by the folder
//! name and downloads it back into the games folder.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Games folder is not set")]
    NotConfigured,

    #[error("Error reading your games folder {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid game name '{0}'")]
    InvalidName(String),

    #[error("No game folder named '{0}'")]
    NotFound(String),

    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// View over the games folder
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn new(games_folder: impl Into<PathBuf>) -> Self {
        Self {
            root: games_folder.into(),
        }
    }

    /// Library for an optional configured folder
    pub fn from_setting(games_folder: Option<&Path>) -> Result<Self, LibraryError> {
        games_folder.map(Self::new).ok_or(LibraryError::NotConfigured)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the game folders, sorted
    pub fn list(&self) -> Result<Vec<String>, LibraryError> {
        let unreadable = |source| LibraryError::Unreadable {
            path: self.root.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Path of a game folder, checking the name stays inside the library
    pub fn game_path(&self, name: &str) -> Result<PathBuf, LibraryError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(LibraryError::InvalidName(name.to_string())),
        }
        if name.contains('/') || name.contains('\\') {
            return Err(LibraryError::InvalidName(name.to_string()));
        }

        let path = self.root.join(name);
        if !path.is_dir() {
            return Err(LibraryError::NotFound(name.to_string()));
        }
        Ok(path)
    }

    /// Delete a game folder and everything in it
    pub fn uninstall(&self, name: &str) -> Result<(), LibraryError> {
        let path = self.game_path(name)?;
        std::fs::remove_dir_all(&path).map_err(|source| LibraryError::Remove {
            path: path.clone(),
            source,
        })?;
        info!(game = %name, "Game folder uninstalled");
        Ok(())
    }

    /// Delete a game folder and return the query to download it again
    pub fn reinstall(&self, name: &str) -> Result<String, LibraryError> {
        self.uninstall(name)?;
        info!(game = %name, "Game folder removed, reinstalling");
        Ok(name.to_string())
    }
}
