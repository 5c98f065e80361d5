//! File operations engine for panehub.
//!
//! This crate provides synchronous, undoable file operations (copy, move,
//! delete, rename, create directory). Every completed action yields a
//! [`FileOperationRecord`] that the [`UndoLog`] can reverse. Deletes are
//! reversible because the original is copied into a per-run backup area
//! before it is removed.

mod copy;
mod create;
mod delete;
mod executor;
mod move_op;
mod naming;
mod operation;
mod rename;
mod report;
mod session;
mod transfer;
mod undo;

pub use copy::{path_size, CopyOptions};
pub use delete::BackupArea;
pub use executor::{execute_undo, OperationExecutor};
pub use naming::{numbered_name, resolve_name};
pub use operation::{FileOperationRecord, TransferIntent};
pub use panehub_core::{ErrorKind, OperationError};
pub use rename::validate_filename;
pub use report::{OperationType, TransferFailure, TransferResult};
pub use session::{ClipboardSelection, Session};
pub use transfer::transfer;
pub use undo::{UndoEntry, UndoLog, DEFAULT_MAX_UNDO};
