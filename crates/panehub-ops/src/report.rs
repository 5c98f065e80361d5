//! Batch results reported back to the caller.

use std::path::PathBuf;

use panehub_core::{ErrorKind, OperationError};
use serde::{Deserialize, Serialize};

use crate::operation::TransferIntent;

/// The type of operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Copy,
    Move,
    Delete,
    Rename,
    MakeDirectory,
}

impl From<TransferIntent> for OperationType {
    fn from(intent: TransferIntent) -> Self {
        match intent {
            TransferIntent::Copy => Self::Copy,
            TransferIntent::Move => Self::Move,
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "Copy"),
            Self::Move => write!(f, "Move"),
            Self::Delete => write!(f, "Delete"),
            Self::Rename => write!(f, "Rename"),
            Self::MakeDirectory => write!(f, "Create directory"),
        }
    }
}

/// One item of a batch that could not be processed.
#[derive(Debug)]
pub struct TransferFailure {
    /// The source path that failed.
    pub path: PathBuf,
    /// Why it failed.
    pub error: OperationError,
}

impl TransferFailure {
    pub fn new(path: impl Into<PathBuf>, error: OperationError) -> Self {
        Self {
            path: path.into(),
            error,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl std::fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// Result of a completed batch operation.
#[derive(Debug)]
pub struct TransferResult {
    /// The type of operation.
    pub operation_type: OperationType,
    /// Number of items successfully processed.
    pub succeeded: usize,
    /// Number of items left alone because there was nothing to do.
    pub skipped: usize,
    /// Total bytes processed by successful items.
    pub bytes_processed: u64,
    /// Items that failed, in input order.
    pub failures: Vec<TransferFailure>,
}

impl TransferResult {
    /// Create an empty result for an operation type.
    pub fn new(operation_type: OperationType) -> Self {
        Self {
            operation_type,
            succeeded: 0,
            skipped: 0,
            bytes_processed: 0,
            failures: Vec::new(),
        }
    }

    /// Number of items that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Check if the operation was fully successful.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get a human-readable summary of the operation.
    pub fn summary(&self) -> String {
        let action = match self.operation_type {
            OperationType::Copy => "Copied",
            OperationType::Move => "Moved",
            OperationType::Delete => "Deleted",
            OperationType::Rename => "Renamed",
            OperationType::MakeDirectory => "Created",
        };

        let mut summary = format!("{} {} items", action, self.succeeded);
        if self.skipped > 0 {
            summary.push_str(&format!(", {} skipped", self.skipped));
        }
        if !self.failures.is_empty() {
            summary.push_str(&format!(", {} failed", self.failures.len()));
        }
        summary
    }
}
