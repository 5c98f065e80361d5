//! Persisted layout files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capacity::{LayoutMode, LineCapacities};
use crate::error::LayoutError;
use crate::split::SplitTree;

/// Everything needed to rebuild an arrangement: mode, capacities, the
/// directory of every panel in order, and the splitter proportions.
///
/// Reading is lenient. Unknown keys are ignored and each known field that is
/// missing or malformed falls back to its default on its own, so one bad
/// field never discards the rest of the file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawSnapshot")]
pub struct LayoutSnapshot {
    pub layout_mode: LayoutMode,
    pub line_capacities: LineCapacities,
    pub panel_paths: Vec<PathBuf>,
    pub splitter_states: Option<SplitTree>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    layout_mode: Value,
    #[serde(default)]
    line_capacities: Value,
    #[serde(default)]
    panel_paths: Value,
    #[serde(default)]
    splitter_states: Value,
}

impl From<RawSnapshot> for LayoutSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        Self {
            layout_mode: parse_mode(&raw.layout_mode),
            line_capacities: parse_capacities(&raw.line_capacities),
            panel_paths: parse_paths(raw.panel_paths),
            splitter_states: parse_splitters(raw.splitter_states),
        }
    }
}

/// Rows only for an absent mode or `ROW_MODE`; any other value means columns.
fn parse_mode(value: &Value) -> LayoutMode {
    match value {
        Value::Null => LayoutMode::default(),
        Value::String(tag) => LayoutMode::from_tag(tag).unwrap_or_else(|| {
            tracing::warn!(tag = %tag, "Unknown layout mode, using columns");
            LayoutMode::Columns
        }),
        other => {
            tracing::warn!(value = %other, "Unknown layout mode, using columns");
            LayoutMode::Columns
        }
    }
}

fn parse_capacities(value: &Value) -> LineCapacities {
    if value.is_null() {
        return LineCapacities::default();
    }
    let values: Option<Vec<i64>> = value
        .as_array()
        .and_then(|items| items.iter().map(Value::as_i64).collect());

    values
        .as_deref()
        .and_then(LineCapacities::strict)
        .unwrap_or_else(|| {
            tracing::warn!(value = %value, "Invalid line capacities, using default");
            LineCapacities::default()
        })
}

fn parse_paths(value: Value) -> Vec<PathBuf> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(path) => Some(PathBuf::from(path)),
                other => {
                    tracing::warn!(value = %other, "Skipping malformed panel path");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(value = %other, "Malformed panel paths, opening no panels");
            Vec::new()
        }
    }
}

fn parse_splitters(value: Value) -> Option<SplitTree> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(tree) => Some(tree),
        Err(e) => {
            tracing::warn!("Ignoring malformed splitter states: {}", e);
            None
        }
    }
}

impl LayoutSnapshot {
    /// Encode as pretty-printed JSON.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    /// Decode from JSON. Only input that is not a JSON object is an error.
    pub fn from_json_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Read a layout file.
    pub fn read(path: &Path) -> Result<Self, LayoutError> {
        let bytes = fs::read(path).map_err(|e| LayoutError::io(path, e))?;
        Self::from_json_bytes(&bytes).map_err(|e| LayoutError::malformed(path, e))
    }

    /// Write a layout file, creating its parent directory if needed.
    pub fn write(&self, path: &Path) -> Result<(), LayoutError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LayoutError::io(parent, e))?;
        }
        let bytes = self
            .to_json_bytes()
            .map_err(|e| LayoutError::malformed(path, e))?;
        fs::write(path, bytes).map_err(|e| LayoutError::io(path, e))
    }
}
