//! Copy operation and the recursive copy primitives shared by move and delete.

use std::ffi::OsStr;
use std::fs::{self, File, FileTimes, Metadata};
use std::path::{Path, PathBuf};

use panehub_core::OperationError;

use crate::naming::exists;
use crate::operation::FileOperationRecord;

/// Options for copy operations.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Whether to carry access and modification times over to the copy.
    pub preserve_timestamps: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            preserve_timestamps: true,
        }
    }
}

/// Copy `source` to `dest_dir/name`.
///
/// Directories are copied recursively. A failed recursive copy stops at the
/// first error and leaves what was already copied in place.
pub(crate) fn copy(
    source: &Path,
    dest_dir: &Path,
    name: &OsStr,
    options: &CopyOptions,
) -> Result<FileOperationRecord, OperationError> {
    let dest = dest_dir.join(name);

    if !exists(source) {
        return Err(OperationError::NotFound {
            path: source.to_path_buf(),
        });
    }
    if exists(&dest) {
        return Err(OperationError::NameConflict { path: dest });
    }
    if is_ancestor(source, &dest) {
        return Err(OperationError::SourceIsAncestor {
            path: source.to_path_buf(),
        });
    }

    let bytes = copy_path(source, &dest, options)?;
    tracing::debug!(
        source = %source.display(),
        dest = %dest.display(),
        bytes,
        "Copied"
    );

    Ok(FileOperationRecord::Copy { created_path: dest })
}

/// Whether `dest` would end up inside the directory `source`.
///
/// Both sides are resolved first so that symlinked or relative spellings of
/// the same directory are caught. `dest` itself usually does not exist yet,
/// so only its parent is resolved.
pub(crate) fn is_ancestor(source: &Path, dest: &Path) -> bool {
    let is_dir = fs::symlink_metadata(source).is_ok_and(|m| m.is_dir());
    if !is_dir {
        return false;
    }
    if dest.starts_with(source) {
        return true;
    }

    match (fs::canonicalize(source), resolve_new_path(dest)) {
        (Ok(source), Some(dest)) => dest.starts_with(source),
        _ => false,
    }
}

fn resolve_new_path(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Some(resolved);
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Some(fs::canonicalize(parent).ok()?.join(path.file_name()?))
}

/// Copy a file, symlink or whole directory tree to `dest`, which must not
/// exist. Symlinks are recreated as links, never followed.
///
/// Returns the number of bytes copied.
pub(crate) fn copy_path(
    source: &Path,
    dest: &Path,
    options: &CopyOptions,
) -> Result<u64, OperationError> {
    let metadata = fs::symlink_metadata(source).map_err(|e| OperationError::io(source, e))?;
    copy_entry(source, dest, &metadata, options)
}

fn copy_entry(
    source: &Path,
    dest: &Path,
    metadata: &Metadata,
    options: &CopyOptions,
) -> Result<u64, OperationError> {
    if metadata.is_symlink() {
        copy_symlink(source, dest)?;
        Ok(0)
    } else if metadata.is_dir() {
        copy_dir_recursive(source, dest, options)
    } else {
        copy_file(source, dest, metadata, options)
    }
}

/// Recreate the link at `source` as `dest`, pointing at the same target.
fn copy_symlink(source: &Path, dest: &Path) -> Result<(), OperationError> {
    let target = fs::read_link(source).map_err(|e| OperationError::io(source, e))?;
    make_symlink(&target, source, dest).map_err(|e| OperationError::io(dest, e))
}

#[cfg(unix)]
fn make_symlink(target: &Path, _source: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(windows)]
fn make_symlink(target: &Path, source: &Path, dest: &Path) -> std::io::Result<()> {
    // Windows needs to know whether the link points at a directory.
    if fs::metadata(source).is_ok_and(|m| m.is_dir()) {
        std::os::windows::fs::symlink_dir(target, dest)
    } else {
        std::os::windows::fs::symlink_file(target, dest)
    }
}

/// Copy a single file, keeping permissions and optionally timestamps.
fn copy_file(
    source: &Path,
    dest: &Path,
    metadata: &Metadata,
    options: &CopyOptions,
) -> Result<u64, OperationError> {
    let bytes = fs::copy(source, dest).map_err(|e| OperationError::io(source, e))?;

    if options.preserve_timestamps {
        if let Err(e) = copy_times(metadata, dest) {
            // Read-only copies cannot be reopened for writing.
            tracing::debug!(dest = %dest.display(), "Timestamps not preserved: {}", e);
        }
    }

    Ok(bytes)
}

fn copy_times(metadata: &Metadata, dest: &Path) -> std::io::Result<()> {
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    File::options().write(true).open(dest)?.set_times(times)
}

/// Recursively copy a directory.
fn copy_dir_recursive(
    source: &Path,
    dest: &Path,
    options: &CopyOptions,
) -> Result<u64, OperationError> {
    fs::create_dir(dest).map_err(|e| OperationError::io(dest, e))?;

    let mut total_bytes = 0u64;

    let entries = fs::read_dir(source).map_err(|e| OperationError::io(source, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| OperationError::io(source, e))?;
        let path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let metadata = fs::symlink_metadata(&path).map_err(|e| OperationError::io(&path, e))?;

        total_bytes += copy_entry(&path, &dest_path, &metadata, options)?;
    }

    Ok(total_bytes)
}

/// Remove a file, symlink or directory tree.
pub(crate) fn remove_path(path: &Path) -> Result<(), OperationError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| OperationError::io(path, e))?;
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| OperationError::io(path, e))
}

/// Get the size of a file or directory tree, 0 if it cannot be read.
///
/// Symlinks count as zero bytes and are not followed.
pub fn path_size(path: &Path) -> u64 {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_symlink() => 0,
        Ok(metadata) if metadata.is_dir() => dir_size(path),
        Ok(metadata) => metadata.len(),
        Err(_) => 0,
    }
}

fn dir_size(dir: &Path) -> u64 {
    let mut size = 0u64;
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            size += path_size(&entry.path());
        }
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn test_copy_file_creates_destination() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "hello").unwrap();
        let dest_dir = dir.path().join("out");
        fs::create_dir(&dest_dir).unwrap();

        let record = copy(&src, &dest_dir, OsStr::new("a.txt"), &CopyOptions::default()).unwrap();

        assert_eq!(
            record,
            FileOperationRecord::Copy {
                created_path: dest_dir.join("a.txt")
            }
        );
        assert_eq!(fs::read_to_string(dest_dir.join("a.txt")).unwrap(), "hello");
        assert!(src.exists());
    }

    #[test]
    fn test_copy_directory_tree() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("tree");
        fs::create_dir_all(src.join("nested/deeper")).unwrap();
        fs::write(src.join("top.txt"), "12345").unwrap();
        fs::write(src.join("nested/deeper/leaf.txt"), "123").unwrap();

        let bytes = copy_path(&src, &dir.path().join("copy"), &CopyOptions::default()).unwrap();

        assert_eq!(bytes, 8);
        assert_eq!(
            fs::read_to_string(dir.path().join("copy/nested/deeper/leaf.txt")).unwrap(),
            "123"
        );
        assert_eq!(path_size(&src), 8);
    }

    #[test]
    fn test_copy_preserves_modified_time() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("old.txt");
        fs::write(&src, "x").unwrap();
        let past = SystemTime::now() - Duration::from_secs(86_400);
        File::options()
            .write(true)
            .open(&src)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let dest = dir.path().join("new.txt");
        copy_path(&src, &dest, &CopyOptions::default()).unwrap();

        let modified = fs::metadata(&dest).unwrap().modified().unwrap();
        assert_eq!(modified, fs::metadata(&src).unwrap().modified().unwrap());
    }

    #[test]
    fn test_copy_into_itself_rejected() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("tree");
        fs::create_dir(&src).unwrap();

        let err = copy(&src, &src, OsStr::new("tree"), &CopyOptions::default()).unwrap_err();
        assert_eq!(err.kind(), panehub_core::ErrorKind::SourceIsAncestor);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_into_itself_through_symlink_rejected() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("tree");
        fs::create_dir_all(src.join("sub")).unwrap();
        let alias = dir.path().join("alias");
        std::os::unix::fs::symlink(&src, &alias).unwrap();

        let err = copy(&src, &alias.join("sub"), OsStr::new("tree"), &CopyOptions::default())
            .unwrap_err();

        assert_eq!(err.kind(), panehub_core::ErrorKind::SourceIsAncestor);
        assert!(!src.join("sub/tree").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_copied_as_links() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("tree");
        fs::create_dir(&src).unwrap();
        fs::write(dir.path().join("target.txt"), "far away").unwrap();
        std::os::unix::fs::symlink(dir.path().join("target.txt"), src.join("link")).unwrap();
        std::os::unix::fs::symlink("nowhere", src.join("dangling")).unwrap();
        std::os::unix::fs::symlink(&src, src.join("loop")).unwrap();

        let copy_root = dir.path().join("copy");
        let bytes = copy_path(&src, &copy_root, &CopyOptions::default()).unwrap();

        assert_eq!(bytes, 0);
        for name in ["link", "dangling", "loop"] {
            let copied = copy_root.join(name);
            assert!(fs::symlink_metadata(&copied).unwrap().is_symlink());
            assert_eq!(
                fs::read_link(&copied).unwrap(),
                fs::read_link(src.join(name)).unwrap()
            );
        }
        assert_eq!(path_size(&src), 0);
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = copy(
            &dir.path().join("missing"),
            dir.path(),
            OsStr::new("other"),
            &CopyOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), panehub_core::ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_path_handles_files_and_trees() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f");
        let tree = dir.path().join("t");
        fs::write(&file, "x").unwrap();
        fs::create_dir_all(tree.join("sub")).unwrap();

        remove_path(&file).unwrap();
        remove_path(&tree).unwrap();

        assert!(!file.exists());
        assert!(!tree.exists());
    }
}
