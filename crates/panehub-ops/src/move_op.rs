//! Move operation.

use std::fs;
use std::path::Path;

use panehub_core::OperationError;

use crate::copy::{copy_path, is_ancestor, remove_path, CopyOptions};
use crate::naming::exists;
use crate::operation::FileOperationRecord;

/// Move `source` to `dest`, which must not exist yet.
pub(crate) fn move_to(
    source: &Path,
    dest: &Path,
    options: &CopyOptions,
) -> Result<FileOperationRecord, OperationError> {
    move_item(source, dest, options)?;
    tracing::debug!(source = %source.display(), dest = %dest.display(), "Moved");

    Ok(FileOperationRecord::Move {
        original_path: source.to_path_buf(),
        current_path: dest.to_path_buf(),
    })
}

/// Move a single item (file or directory).
///
/// Uses a rename when possible and falls back to copy + delete when the
/// destination is on another filesystem.
pub(crate) fn move_item(
    source: &Path,
    dest: &Path,
    options: &CopyOptions,
) -> Result<(), OperationError> {
    if !exists(source) {
        return Err(OperationError::NotFound {
            path: source.to_path_buf(),
        });
    }
    if exists(dest) {
        return Err(OperationError::NameConflict {
            path: dest.to_path_buf(),
        });
    }
    if is_ancestor(source, dest) {
        return Err(OperationError::SourceIsAncestor {
            path: source.to_path_buf(),
        });
    }

    // Try rename first (fast path for same filesystem)
    match fs::rename(source, dest) {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            tracing::debug!(source = %source.display(), "Cross-device move, copying instead");
        }
        Err(e) => return Err(OperationError::io(source, e)),
    }

    copy_path(source, dest, options)?;
    remove_path(source)
}
