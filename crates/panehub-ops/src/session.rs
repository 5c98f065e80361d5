//! File-operation session: the executor, the undo log and the clipboard
//! selection shared by every panel.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use panehub_core::{HubConfig, OperationError};

use crate::executor::OperationExecutor;
use crate::operation::{FileOperationRecord, TransferIntent};
use crate::report::TransferResult;
use crate::transfer::{delete_all, transfer};
use crate::undo::UndoLog;

/// The last cut or copied selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardSelection {
    /// Selected paths, sorted and without duplicates.
    pub paths: Vec<PathBuf>,
    /// What a paste of this selection does.
    pub intent: TransferIntent,
}

impl ClipboardSelection {
    fn new(paths: &[PathBuf], intent: TransferIntent) -> Self {
        Self {
            paths: paths.iter().cloned().sorted().dedup().collect(),
            intent,
        }
    }
}

/// Owner of all mutable file-operation state.
///
/// Every request runs to completion before returning. Successful actions
/// are pushed to the undo log here, so the log is only ever mutated through
/// a session.
#[derive(Debug)]
pub struct Session {
    executor: OperationExecutor,
    undo_log: UndoLog,
    clipboard: Option<ClipboardSelection>,
}

impl Session {
    pub fn new(config: &HubConfig) -> Result<Self, OperationError> {
        Ok(Self {
            executor: OperationExecutor::new(config)?,
            undo_log: UndoLog::new(config.max_undo),
            clipboard: None,
        })
    }

    /// Copy or move `sources` into `dest_dir`.
    pub fn request_transfer(
        &mut self,
        sources: &[PathBuf],
        dest_dir: &Path,
        intent: TransferIntent,
    ) -> TransferResult {
        let result = transfer(&self.executor, &mut self.undo_log, sources, dest_dir, intent);
        tracing::debug!("{}", result.summary());
        result
    }

    /// Delete `paths`, backing each one up first.
    pub fn request_delete(&mut self, paths: &[PathBuf]) -> TransferResult {
        let result = delete_all(&self.executor, &mut self.undo_log, paths);
        tracing::debug!("{}", result.summary());
        result
    }

    pub fn request_rename(
        &mut self,
        path: &Path,
        new_name: &str,
    ) -> Result<FileOperationRecord, OperationError> {
        let record = self.executor.rename(path, new_name)?;
        self.undo_log.push(record.clone());
        Ok(record)
    }

    /// Create a new directory in `parent`. Without a name the configured
    /// default is used, numbered if it is taken.
    pub fn request_make_directory(
        &mut self,
        parent: &Path,
        name: Option<&str>,
    ) -> Result<FileOperationRecord, OperationError> {
        let record = self.executor.make_directory(parent, name)?;
        self.undo_log.push(record.clone());
        Ok(record)
    }

    /// Reverse the most recent operation.
    pub fn request_undo(&mut self) -> Result<FileOperationRecord, OperationError> {
        self.undo_log.undo(&self.executor)
    }

    /// Remember `paths` for a later copy-paste.
    pub fn copy_selection(&mut self, paths: &[PathBuf]) {
        self.clipboard = Some(ClipboardSelection::new(paths, TransferIntent::Copy));
    }

    /// Remember `paths` for a later move-paste.
    pub fn cut_selection(&mut self, paths: &[PathBuf]) {
        self.clipboard = Some(ClipboardSelection::new(paths, TransferIntent::Move));
    }

    pub fn clipboard(&self) -> Option<&ClipboardSelection> {
        self.clipboard.as_ref()
    }

    /// Paste the clipboard selection into `dest_dir`.
    ///
    /// Returns `None` when nothing is selected. A cut selection is cleared
    /// once a paste has moved at least one item.
    pub fn paste_into(&mut self, dest_dir: &Path) -> Option<TransferResult> {
        let selection = self.clipboard.clone()?;
        let result = self.request_transfer(&selection.paths, dest_dir, selection.intent);

        if selection.intent == TransferIntent::Move && result.succeeded > 0 {
            self.clipboard = None;
        }

        Some(result)
    }

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo_log
    }

    pub fn executor(&self) -> &OperationExecutor {
        &self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panehub_core::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn session(root: &Path) -> Session {
        let config = HubConfig::builder()
            .backup_root(Some(root.join(".backups")))
            .max_undo(3usize)
            .build()
            .unwrap();
        Session::new(&config).unwrap()
    }

    #[test]
    fn test_selection_is_sorted_and_deduplicated() {
        let dir = TempDir::new().unwrap();
        let mut s = session(dir.path());

        s.copy_selection(&[
            PathBuf::from("/b"),
            PathBuf::from("/a"),
            PathBuf::from("/b"),
        ]);

        let selection = s.clipboard().unwrap();
        assert_eq!(selection.paths, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(selection.intent, TransferIntent::Copy);
    }

    #[test]
    fn test_paste_without_selection() {
        let dir = TempDir::new().unwrap();
        let mut s = session(dir.path());
        assert!(s.paste_into(dir.path()).is_none());
    }

    #[test]
    fn test_copy_selection_can_be_pasted_twice() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("dest");
        fs::create_dir(&dest).unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "a").unwrap();

        let mut s = session(dir.path());
        s.copy_selection(&[src]);

        assert_eq!(s.paste_into(&dest).unwrap().succeeded, 1);
        assert_eq!(s.paste_into(&dest).unwrap().succeeded, 1);
        assert!(dest.join("a.txt").exists());
        assert!(dest.join("a (1).txt").exists());
        assert!(s.clipboard().is_some());
        assert_eq!(s.undo_log().len(), 2);
    }

    #[test]
    fn test_cut_selection_is_cleared_after_paste() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("dest");
        fs::create_dir(&dest).unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "a").unwrap();

        let mut s = session(dir.path());
        s.cut_selection(&[src.clone()]);

        let result = s.paste_into(&dest).unwrap();
        assert_eq!(result.succeeded, 1);
        assert!(!src.exists());
        assert!(dest.join("a.txt").exists());
        assert!(s.clipboard().is_none());
    }

    #[test]
    fn test_failed_cut_paste_keeps_selection() {
        let dir = TempDir::new().unwrap();
        let mut s = session(dir.path());
        s.cut_selection(&[dir.path().join("gone.txt")]);

        let result = s.paste_into(dir.path()).unwrap();
        assert_eq!(result.failures[0].kind(), ErrorKind::NotFound);
        assert!(s.clipboard().is_some());
    }

    #[test]
    fn test_requests_are_undoable_in_reverse_order() {
        let dir = TempDir::new().unwrap();
        let mut s = session(dir.path());

        let created = s.request_make_directory(dir.path(), None).unwrap();
        let renamed = s
            .request_rename(created.resulting_path(), "Archive")
            .unwrap();
        assert_eq!(renamed.resulting_path(), dir.path().join("Archive"));

        s.request_undo().unwrap();
        assert!(dir.path().join("New Folder").is_dir());
        s.request_undo().unwrap();
        assert!(!dir.path().join("New Folder").exists());

        assert_eq!(
            s.request_undo().unwrap_err().kind(),
            ErrorKind::NothingToUndo
        );
    }

    #[test]
    fn test_failed_request_is_not_recorded() {
        let dir = TempDir::new().unwrap();
        let mut s = session(dir.path());

        let err = s.request_rename(&dir.path().join("missing"), "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(s.undo_log().is_empty());
    }

    #[test]
    fn test_undo_log_uses_configured_limit() {
        let dir = TempDir::new().unwrap();
        let mut s = session(dir.path());

        for _ in 0..5 {
            s.request_make_directory(dir.path(), Some("d")).unwrap();
        }
        assert_eq!(s.undo_log().len(), 3);
        assert_eq!(s.undo_log().capacity(), 3);
    }
}
