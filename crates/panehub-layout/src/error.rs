//! Error types for layout persistence.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while reading or writing layout files and favorites.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed layout file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Favorite name cannot be empty")]
    EmptyName,

    #[error("A favorite named '{0}' already exists")]
    DuplicateName(String),

    #[error("No favorite named '{0}'")]
    UnknownFavorite(String),

    #[error("At most {0} favorite layouts can be saved")]
    FavoriteLimit(usize),

    #[error("Layout file for '{name}' not found: {path}")]
    FavoriteFileMissing { name: String, path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl LayoutError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn malformed(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Malformed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
