//! File operation records.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A completed file operation, carrying what is needed to reverse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileOperationRecord {
    /// A file or directory tree was copied to `created_path`.
    Copy { created_path: PathBuf },
    /// An item was moved from `original_path` to `current_path`.
    Move {
        original_path: PathBuf,
        current_path: PathBuf,
    },
    /// An item was deleted after being copied to `backup_path`.
    Delete {
        original_path: PathBuf,
        backup_path: PathBuf,
    },
    /// An item was renamed in place.
    Rename { old_path: PathBuf, new_path: PathBuf },
    /// A directory was created.
    MakeDirectory { created_path: PathBuf },
}

impl FileOperationRecord {
    /// Human-readable description of what was done.
    pub fn description(&self) -> String {
        match self {
            Self::Copy { created_path } => format!("Copied '{}'", display_name(created_path)),
            Self::Move {
                original_path,
                current_path,
            } => format!(
                "Moved '{}' to {}",
                display_name(original_path),
                parent_display(current_path)
            ),
            Self::Delete { original_path, .. } => {
                format!("Deleted '{}'", display_name(original_path))
            }
            Self::Rename { old_path, new_path } => format!(
                "Renamed '{}' to '{}'",
                display_name(old_path),
                display_name(new_path)
            ),
            Self::MakeDirectory { created_path } => {
                format!("Created directory '{}'", display_name(created_path))
            }
        }
    }

    /// Get a description of how to undo this operation.
    pub fn undo_description(&self) -> String {
        match self {
            Self::Copy { created_path } => format!("Delete copied '{}'", display_name(created_path)),
            Self::Move { original_path, .. } => format!(
                "Move '{}' back to {}",
                display_name(original_path),
                parent_display(original_path)
            ),
            Self::Delete { original_path, .. } => {
                format!("Restore '{}' from backup", display_name(original_path))
            }
            Self::Rename { old_path, .. } => {
                format!("Rename back to '{}'", display_name(old_path))
            }
            Self::MakeDirectory { created_path } => {
                format!("Delete the created directory '{}'", display_name(created_path))
            }
        }
    }

    /// The path this operation left behind on disk.
    pub fn resulting_path(&self) -> &Path {
        match self {
            Self::Copy { created_path } | Self::MakeDirectory { created_path } => {
                created_path.as_path()
            }
            Self::Move { current_path, .. } => current_path.as_path(),
            Self::Delete { backup_path, .. } => backup_path.as_path(),
            Self::Rename { new_path, .. } => new_path.as_path(),
        }
    }
}

/// Whether a transfer copies or moves its sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferIntent {
    Copy,
    Move,
}

impl std::fmt::Display for TransferIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "Copy"),
            Self::Move => write!(f, "Move"),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn parent_display(path: &Path) -> String {
    path.parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
