//! Rename operation.

use std::fs;
use std::path::Path;

use panehub_core::OperationError;

use crate::naming::exists;
use crate::operation::FileOperationRecord;

/// Rename `source` within its directory.
pub(crate) fn rename(source: &Path, new_name: &str) -> Result<FileOperationRecord, OperationError> {
    let old_name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if new_name == old_name {
        return Err(OperationError::invalid_name(new_name, "Name is unchanged"));
    }
    validate_filename(new_name).map_err(|reason| OperationError::invalid_name(new_name, reason))?;

    if !exists(source) {
        return Err(OperationError::NotFound {
            path: source.to_path_buf(),
        });
    }

    // Construct the new path
    let parent = source.parent().unwrap_or(Path::new(""));
    let new_path = parent.join(new_name);

    if exists(&new_path) {
        return Err(OperationError::NameConflict { path: new_path });
    }

    fs::rename(source, &new_path).map_err(|e| OperationError::io(source, e))?;
    tracing::debug!(from = %source.display(), to = %new_path.display(), "Renamed");

    Ok(FileOperationRecord::Rename {
        old_path: source.to_path_buf(),
        new_path,
    })
}

/// Validate a filename for cross-platform compatibility.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.len() > 255 {
        return Err("Name is too long (max 255 characters)".into());
    }

    // Check for invalid characters
    let invalid_chars = ['/', '\0'];
    for c in invalid_chars {
        if name.contains(c) {
            return Err(format!("Name cannot contain '{}'", c));
        }
    }

    #[cfg(target_os = "windows")]
    {
        let windows_invalid = ['\\', ':', '*', '?', '"', '<', '>', '|'];
        for c in windows_invalid {
            if name.contains(c) {
                return Err(format!("Name cannot contain '{}'", c));
            }
        }
    }

    if name.starts_with(' ') || name.ends_with(' ') {
        return Err("Name cannot start or end with spaces".into());
    }

    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }

    if name.ends_with('.') {
        return Err("Name cannot end with a dot".into());
    }

    Ok(())
}
