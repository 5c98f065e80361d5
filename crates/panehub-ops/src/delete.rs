//! Reversible delete backed by a per-run backup area.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use panehub_core::OperationError;
use tempfile::TempDir;

use crate::copy::{copy_path, remove_path, CopyOptions};
use crate::move_op::move_item;
use crate::naming::exists;
use crate::operation::FileOperationRecord;

/// Length of the random token in each backup directory name.
const BACKUP_TOKEN_LEN: usize = 8;

/// Private directory holding the safety copies of deleted items.
///
/// The whole area is removed when it is dropped, so backups never outlive
/// the process that made them.
#[derive(Debug)]
pub struct BackupArea {
    dir: TempDir,
}

impl BackupArea {
    /// Create a fresh backup area under `root` (or the OS temp dir).
    pub fn create(root: Option<&Path>, prefix: &str) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        tracing::debug!(path = %dir.path().display(), "Created backup area");
        Ok(Self { dir })
    }

    /// Root of the backup area.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Reserve a unique location for a backup of an item called `name`.
    ///
    /// The returned path is `<area>/<name>_<token>/<name>`; its parent
    /// directory exists, the path itself does not.
    fn reserve(&self, name: &OsString) -> std::io::Result<PathBuf> {
        let mut prefix = name.clone();
        prefix.push("_");
        let slot = tempfile::Builder::new()
            .prefix(&prefix)
            .rand_bytes(BACKUP_TOKEN_LEN)
            .tempdir_in(self.dir.path())?
            .keep();
        Ok(slot.join(name))
    }
}

/// Delete `path` after copying it into the backup area.
///
/// The original is only removed once the backup copy succeeded.
pub(crate) fn delete(
    path: &Path,
    backups: &BackupArea,
    options: &CopyOptions,
) -> Result<FileOperationRecord, OperationError> {
    if !exists(path) {
        return Err(OperationError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| OperationError::invalid_name(path.display().to_string(), "Cannot delete a root"))?;

    let backup = backups
        .reserve(&name)
        .map_err(|e| OperationError::backup_failed(path, OperationError::io(backups.path(), e)))?;

    if let Err(e) = copy_path(path, &backup, options) {
        discard_backup(&backup);
        return Err(OperationError::backup_failed(path, e));
    }

    let is_dir = fs::symlink_metadata(path).is_ok_and(|m| m.is_dir());
    if let Err(e) = remove_path(path) {
        if is_dir && exists(path) {
            // Part of the tree may already be gone; the backup is all that is left of it.
            tracing::warn!(
                path = %path.display(),
                backup = %backup.display(),
                "Delete failed part way, keeping backup"
            );
            return Err(OperationError::PartialDelete {
                path: path.to_path_buf(),
                backup,
                source: Box::new(e),
            });
        }
        discard_backup(&backup);
        return Err(e);
    }

    tracing::debug!(path = %path.display(), backup = %backup.display(), "Deleted");

    Ok(FileOperationRecord::Delete {
        original_path: path.to_path_buf(),
        backup_path: backup,
    })
}

/// Move a backup back to where it was deleted from.
///
/// If the original path has been taken in the meantime the backup stays in
/// place and the error says where it is.
pub(crate) fn restore_backup(
    original: &Path,
    backup: &Path,
    options: &CopyOptions,
) -> Result<(), OperationError> {
    if !exists(backup) {
        return Err(OperationError::BackupMissing {
            path: original.to_path_buf(),
            backup: backup.to_path_buf(),
        });
    }

    let blocked = || OperationError::RestoreBlocked {
        path: original.to_path_buf(),
        backup: backup.to_path_buf(),
    };
    if exists(original) {
        return Err(blocked());
    }
    move_item(backup, original, options).map_err(|e| match e {
        OperationError::NameConflict { .. } => blocked(),
        other => other,
    })?;
    remove_slot(backup);
    Ok(())
}

/// Remove a backup and its slot directory. Failures are only logged.
pub(crate) fn discard_backup(backup: &Path) {
    if exists(backup) {
        if let Err(e) = remove_path(backup) {
            tracing::warn!(backup = %backup.display(), "Could not remove stale backup: {}", e);
            return;
        }
    }
    remove_slot(backup);
}

fn remove_slot(backup: &Path) {
    if let Some(slot) = backup.parent() {
        // Only succeeds once the slot is empty.
        let _ = fs::remove_dir(slot);
    }
}
