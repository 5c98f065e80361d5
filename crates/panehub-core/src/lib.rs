//! Core types shared across panehub.
//!
//! This crate provides the panel identity types, the error taxonomy used by
//! every file operation, and the runtime configuration.

mod config;
mod error;
mod panel;

pub use config::{HubConfig, HubConfigBuilder, HubConfigBuilderError, Viewport};
pub use error::{ErrorKind, OperationError};
pub use panel::{Panel, PanelId, PanelOrder};
