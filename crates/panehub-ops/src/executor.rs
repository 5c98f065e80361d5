//! Operation executor: performs single file actions and reverses them.

use std::ffi::OsStr;
use std::path::Path;

use panehub_core::{HubConfig, OperationError};

use crate::copy::{self, remove_path, CopyOptions};
use crate::create::make_directory;
use crate::delete::{self, restore_backup, BackupArea};
use crate::move_op;
use crate::operation::FileOperationRecord;
use crate::rename;

/// Executor for file operations.
///
/// Each method performs one action to completion and returns the record
/// needed to undo it. Nothing is recorded here; callers push the record to an
/// [`UndoLog`](crate::UndoLog) once the method returns `Ok`.
#[derive(Debug)]
pub struct OperationExecutor {
    options: CopyOptions,
    new_folder_name: String,
    backups: BackupArea,
}

impl OperationExecutor {
    /// Create an executor with its own backup area.
    pub fn new(config: &HubConfig) -> Result<Self, OperationError> {
        let backups = BackupArea::create(config.backup_root.as_deref(), &config.backup_prefix)
            .map_err(|e| {
                let root = config
                    .backup_root
                    .clone()
                    .unwrap_or_else(std::env::temp_dir);
                OperationError::io(root, e)
            })?;

        Ok(Self {
            options: CopyOptions {
                preserve_timestamps: config.preserve_timestamps,
            },
            new_folder_name: config.new_folder_name.clone(),
            backups,
        })
    }

    /// Copy options used for every action and for undo.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Root of the backup area used by [`delete`](Self::delete).
    pub fn backup_dir(&self) -> &Path {
        self.backups.path()
    }

    /// Copy `source` to `dest_dir/name`.
    pub fn copy(
        &self,
        source: &Path,
        dest_dir: &Path,
        name: &OsStr,
    ) -> Result<FileOperationRecord, OperationError> {
        copy::copy(source, dest_dir, name, &self.options)
    }

    /// Move `source` to `dest`.
    pub fn move_to(&self, source: &Path, dest: &Path) -> Result<FileOperationRecord, OperationError> {
        move_op::move_to(source, dest, &self.options)
    }

    /// Delete `path`, keeping a backup for undo.
    pub fn delete(&self, path: &Path) -> Result<FileOperationRecord, OperationError> {
        delete::delete(path, &self.backups, &self.options)
    }

    /// Rename `path` to `new_name` in the same directory.
    pub fn rename(&self, path: &Path, new_name: &str) -> Result<FileOperationRecord, OperationError> {
        rename::rename(path, new_name)
    }

    /// Create a directory in `parent` named after `base_name`, or the
    /// configured default name when `None`.
    pub fn make_directory(
        &self,
        parent: &Path,
        base_name: Option<&str>,
    ) -> Result<FileOperationRecord, OperationError> {
        make_directory(parent, base_name.unwrap_or(&self.new_folder_name))
    }

    /// Reverse `record` with this executor's copy options.
    pub fn undo(&self, record: &FileOperationRecord) -> Result<(), OperationError> {
        execute_undo(record, &self.options)
    }
}

/// Reverse a completed operation.
///
/// The reversal is not itself recorded, so it cannot be undone in turn.
pub fn execute_undo(
    record: &FileOperationRecord,
    options: &CopyOptions,
) -> Result<(), OperationError> {
    match record {
        FileOperationRecord::Copy { created_path }
        | FileOperationRecord::MakeDirectory { created_path } => remove_path(created_path),
        FileOperationRecord::Move {
            original_path,
            current_path,
        } => move_op::move_item(current_path, original_path, options),
        FileOperationRecord::Delete {
            original_path,
            backup_path,
        } => restore_backup(original_path, backup_path, options),
        FileOperationRecord::Rename { old_path, new_path } => {
            if old_path.symlink_metadata().is_ok() {
                return Err(OperationError::NameConflict {
                    path: old_path.clone(),
                });
            }
            std::fs::rename(new_path, old_path).map_err(|e| OperationError::io(new_path, e))
        }
    }
}
