//! Batch copy/move of a path list into a destination directory.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use panehub_core::OperationError;

use crate::copy::path_size;
use crate::executor::OperationExecutor;
use crate::naming::{exists, resolve_name};
use crate::operation::TransferIntent;
use crate::report::{OperationType, TransferFailure, TransferResult};
use crate::undo::UndoLog;

/// Copy or move every source into `dest_dir`.
///
/// Sources are processed in order. Each one gets a collision-free name in
/// `dest_dir`, and each success is pushed to `undo_log`. A failing item is
/// recorded and the batch carries on with the next one.
pub fn transfer(
    executor: &OperationExecutor,
    undo_log: &mut UndoLog,
    sources: &[PathBuf],
    dest_dir: &Path,
    intent: TransferIntent,
) -> TransferResult {
    let mut result = TransferResult::new(intent.into());

    if !dest_dir.is_dir() {
        tracing::warn!(dest = %dest_dir.display(), "Transfer destination is not a directory");
        for source in sources {
            result.failures.push(TransferFailure::new(
                source,
                OperationError::NotFound {
                    path: dest_dir.to_path_buf(),
                },
            ));
        }
        return result;
    }

    for source in sources {
        if !exists(source) {
            tracing::warn!(source = %source.display(), "Source vanished before {}", intent);
            result.failures.push(TransferFailure::new(
                source,
                OperationError::NotFound {
                    path: source.clone(),
                },
            ));
            continue;
        }

        let Some(name) = source.file_name() else {
            result.failures.push(TransferFailure::new(
                source,
                OperationError::invalid_name(source.display().to_string(), "Path has no file name"),
            ));
            continue;
        };

        if intent == TransferIntent::Move && same_dir(source, dest_dir) {
            tracing::debug!(source = %source.display(), "Already in destination, skipping");
            result.skipped += 1;
            continue;
        }

        let final_name = resolve_name(dest_dir, name);
        let bytes = path_size(source);

        let outcome = match intent {
            TransferIntent::Copy => executor.copy(source, dest_dir, &final_name),
            TransferIntent::Move => executor.move_to(source, &dest_dir.join(&final_name)),
        };

        match outcome {
            Ok(record) => {
                undo_log.push(record);
                result.succeeded += 1;
                result.bytes_processed += bytes;
            }
            Err(e) => {
                tracing::warn!(source = %source.display(), "{} failed: {}", intent, e);
                result.failures.push(TransferFailure::new(source, e));
            }
        }
    }

    result
}

/// Delete every path, keeping backups so each delete can be undone.
///
/// Paths are de-duplicated and sorted first. A path that no longer exists is
/// skipped, which also covers children of a directory deleted earlier in the
/// same batch.
pub(crate) fn delete_all(
    executor: &OperationExecutor,
    undo_log: &mut UndoLog,
    paths: &[PathBuf],
) -> TransferResult {
    let mut result = TransferResult::new(OperationType::Delete);

    for path in paths.iter().sorted().dedup() {
        if !exists(path) {
            result.skipped += 1;
            continue;
        }

        let bytes = path_size(path);
        match executor.delete(path) {
            Ok(record) => {
                undo_log.push(record);
                result.succeeded += 1;
                result.bytes_processed += bytes;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Delete failed: {}", e);
                result.failures.push(TransferFailure::new(path, e));
            }
        }
    }

    result
}

/// Whether `source` lives directly inside `dir`.
fn same_dir(source: &Path, dir: &Path) -> bool {
    let parent = match source.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), dir.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => parent == dir,
    }
}
