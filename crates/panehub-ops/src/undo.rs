//! Undo log for file operations.

use std::collections::VecDeque;
use std::time::SystemTime;

use panehub_core::OperationError;

use crate::delete::discard_backup;
use crate::executor::OperationExecutor;
use crate::operation::FileOperationRecord;

/// Default number of operations that can be undone.
pub const DEFAULT_MAX_UNDO: usize = 10;

/// An entry in the undo log.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    /// Unique ID for this entry.
    pub id: u64,
    /// When the operation was performed.
    pub timestamp: SystemTime,
    /// The operation that was performed.
    pub record: FileOperationRecord,
}

impl UndoEntry {
    /// Create a new undo entry.
    pub fn new(id: u64, record: FileOperationRecord) -> Self {
        Self {
            id,
            timestamp: SystemTime::now(),
            record,
        }
    }
}

/// Bounded stack of completed operations.
///
/// The oldest entry is evicted when the log is full. Undo pops the newest
/// entry; an undone operation is gone from the log for good, there is no redo.
#[derive(Debug)]
pub struct UndoLog {
    entries: VecDeque<UndoEntry>,
    max_entries: usize,
    next_id: u64,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO)
    }
}

impl UndoLog {
    /// Create a new undo log with the specified maximum entries.
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1000)),
            max_entries,
            next_id: 0,
        }
    }

    /// Record a completed operation.
    ///
    /// Returns the ID assigned to this entry. If an evicted entry was a
    /// delete, its backup is discarded since it can no longer be restored.
    pub fn push(&mut self, record: FileOperationRecord) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        tracing::debug!(id, "{}", record.description());
        self.entries.push_back(UndoEntry::new(id, record));

        while self.entries.len() > self.max_entries {
            if let Some(evicted) = self.entries.pop_front() {
                release(&evicted.record);
            }
        }

        id
    }

    /// Undo the most recent operation through `executor`.
    ///
    /// The entry is removed even if reversing it fails, and the error is
    /// returned so the caller can report it. A delete that cannot be put back
    /// leaves its backup in place and the error names it.
    pub fn undo(
        &mut self,
        executor: &OperationExecutor,
    ) -> Result<FileOperationRecord, OperationError> {
        let entry = self.entries.pop_back().ok_or(OperationError::NothingToUndo)?;

        match executor.undo(&entry.record) {
            Ok(()) => {
                tracing::info!(id = entry.id, "{}", entry.record.undo_description());
                Ok(entry.record)
            }
            Err(e) => {
                tracing::warn!(id = entry.id, "Undo failed: {}", e);
                Err(e)
            }
        }
    }

    /// Peek at the most recent entry without removing it.
    pub fn peek(&self) -> Option<&UndoEntry> {
        self.entries.back()
    }

    /// Get the number of entries in the log.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Clear all entries from the log, discarding delete backups.
    pub fn clear(&mut self) {
        for entry in self.entries.drain(..) {
            release(&entry.record);
        }
    }

    /// Get an iterator over all entries (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &UndoEntry> {
        self.entries.iter()
    }
}

/// Free whatever an unreachable record still holds on disk.
fn release(record: &FileOperationRecord) {
    if let FileOperationRecord::Delete { backup_path, .. } = record {
        tracing::debug!(backup = %backup_path.display(), "Discarding evicted backup");
        discard_backup(backup_path);
    }
}
