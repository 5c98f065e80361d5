//! Directory creation.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use panehub_core::OperationError;

use crate::naming::resolve_name;
use crate::operation::FileOperationRecord;
use crate::rename::validate_filename;

/// Create a new directory in `parent`, named after `base_name` or the
/// first free numbered variant of it.
pub(crate) fn make_directory(
    parent: &Path,
    base_name: &str,
) -> Result<FileOperationRecord, OperationError> {
    validate_filename(base_name).map_err(|reason| OperationError::invalid_name(base_name, reason))?;

    if !parent.is_dir() {
        return Err(OperationError::NotFound {
            path: parent.to_path_buf(),
        });
    }

    let name = resolve_name(parent, OsStr::new(base_name));
    let path = parent.join(&name);

    match fs::create_dir(&path) {
        Ok(()) => {}
        // Someone else took the name after it was resolved
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(OperationError::NameConflict { path });
        }
        Err(e) => return Err(OperationError::io(&path, e)),
    }

    tracing::debug!(path = %path.display(), "Created directory");

    Ok(FileOperationRecord::MakeDirectory { created_path: path })
}
