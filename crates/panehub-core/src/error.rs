//! Error types for file operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while executing or undoing a file operation.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Path vanished between selection and execution.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// The destination name is already taken.
    #[error("'{path}' already exists")]
    NameConflict { path: PathBuf },

    /// The safety copy taken before a delete could not be made.
    #[error("Backup of {path} failed, nothing was deleted: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: Box<OperationError>,
    },

    /// The safety copy a delete relies on for undo is gone.
    #[error("Backup {backup} for {path} is missing, cannot restore")]
    BackupMissing { path: PathBuf, backup: PathBuf },

    /// A deleted item cannot go back because its original path is taken.
    /// The backup is left where it is.
    #[error("Cannot restore {path}, it already exists; the deleted item is kept at {backup}")]
    RestoreBlocked { path: PathBuf, backup: PathBuf },

    /// Removing a directory failed after part of it was already gone.
    #[error("Delete of {path} stopped part way, its full copy is kept at {backup}: {source}")]
    PartialDelete {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: Box<OperationError>,
    },

    /// A name that cannot be used for a file or directory.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A directory cannot be copied or moved into itself.
    #[error("Cannot copy or move {path} into itself")]
    SourceIsAncestor { path: PathBuf },

    /// The undo log is empty.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OperationError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Wrap the error that stopped a backup copy.
    pub fn backup_failed(path: impl Into<PathBuf>, source: OperationError) -> Self {
        Self::BackupFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Create an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// The kind of this error, for matching without the payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NameConflict { .. } => ErrorKind::NameConflict,
            Self::BackupFailed { .. } => ErrorKind::BackupFailed,
            Self::BackupMissing { .. } => ErrorKind::BackupMissing,
            Self::RestoreBlocked { .. } => ErrorKind::NameConflict,
            Self::PartialDelete { source, .. } => source.kind(),
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::SourceIsAncestor { .. } => ErrorKind::SourceIsAncestor,
            Self::NothingToUndo => ErrorKind::NothingToUndo,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// The offending path, if the error has one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::NameConflict { path }
            | Self::BackupFailed { path, .. }
            | Self::BackupMissing { path, .. }
            | Self::RestoreBlocked { path, .. }
            | Self::PartialDelete { path, .. }
            | Self::SourceIsAncestor { path }
            | Self::Io { path, .. } => Some(path.as_path()),
            Self::InvalidName { .. } | Self::NothingToUndo => None,
        }
    }

    /// Where the backup of a deleted item is, when the error leaves one
    /// behind that no undo record points to any more.
    pub fn backup(&self) -> Option<&Path> {
        match self {
            Self::BackupMissing { backup, .. }
            | Self::RestoreBlocked { backup, .. }
            | Self::PartialDelete { backup, .. } => Some(backup.as_path()),
            _ => None,
        }
    }
}

/// Kind of operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    NameConflict,
    BackupFailed,
    BackupMissing,
    InvalidName,
    SourceIsAncestor,
    NothingToUndo,
    /// OS-level denial, permission or lock failure.
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Not found"),
            Self::NameConflict => write!(f, "Name conflict"),
            Self::BackupFailed => write!(f, "Backup failed"),
            Self::BackupMissing => write!(f, "Backup missing"),
            Self::InvalidName => write!(f, "Invalid name"),
            Self::SourceIsAncestor => write!(f, "Source is ancestor of destination"),
            Self::NothingToUndo => write!(f, "Nothing to undo"),
            Self::Io => write!(f, "I/O failure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let err = OperationError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.path(), Some(Path::new("/test/path")));
    }

    #[test]
    fn test_io_permission_denied_stays_io() {
        let err = OperationError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/test/path"));
    }

    #[test]
    fn test_blocked_restore_points_at_backup() {
        let err = OperationError::RestoreBlocked {
            path: PathBuf::from("/docs/a.txt"),
            backup: PathBuf::from("/tmp/undo/a.txt_x1/a.txt"),
        };
        assert_eq!(err.kind(), ErrorKind::NameConflict);
        assert_eq!(err.backup(), Some(Path::new("/tmp/undo/a.txt_x1/a.txt")));
        assert!(err.to_string().contains("/tmp/undo/a.txt_x1/a.txt"));
    }

    #[test]
    fn test_partial_delete_takes_kind_of_cause() {
        let cause = OperationError::io(
            "/docs/tree/locked",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let err = OperationError::PartialDelete {
            path: PathBuf::from("/docs/tree"),
            backup: PathBuf::from("/tmp/undo/tree_x1/tree"),
            source: Box::new(cause),
        };
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.path(), Some(Path::new("/docs/tree")));
        assert_eq!(err.backup(), Some(Path::new("/tmp/undo/tree_x1/tree")));
        assert!(OperationError::NothingToUndo.backup().is_none());
    }

    #[test]
    fn test_invalid_name_has_no_path() {
        let err = OperationError::invalid_name("", "Name cannot be empty");
        assert_eq!(err.kind(), ErrorKind::InvalidName);
        assert!(err.path().is_none());
        assert!(err.to_string().contains("cannot be empty"));
    }
}
