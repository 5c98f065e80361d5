//! Non-conflicting name resolution.
//!
//! The check is not a reservation: a name returned here can still be taken by
//! someone else before the caller creates it. Executors report that case as a
//! `NameConflict` instead of retrying.

use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Build the `n`-th alternative for a name.
///
/// For "file.txt" this is "file (n).txt"; for "file" it is "file (n)".
pub fn numbered_name(name: &OsStr, n: u64) -> OsString {
    let path = Path::new(name);
    let stem = path.file_stem().unwrap_or(name);

    let mut numbered = stem.to_os_string();
    numbered.push(format!(" ({n})"));
    if let Some(extension) = path.extension() {
        numbered.push(".");
        numbered.push(extension);
    }
    numbered
}

/// Resolve a name that does not exist yet inside `dest_dir`.
///
/// Returns `desired` unchanged when it is free, otherwise the first free
/// `numbered_name(desired, n)` for `n = 1, 2, ...`.
pub fn resolve_name(dest_dir: &Path, desired: &OsStr) -> OsString {
    if !exists(&dest_dir.join(desired)) {
        return desired.to_os_string();
    }

    let mut n = 1;
    loop {
        let candidate = numbered_name(desired, n);
        if !exists(&dest_dir.join(&candidate)) {
            return candidate;
        }
        n += 1;
    }
}

/// Whether anything, including a dangling symlink, occupies `path`.
pub(crate) fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}
