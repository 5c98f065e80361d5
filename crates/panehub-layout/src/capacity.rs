//! Line capacities and the arrangement mode.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::split::Orientation;

/// Capacity used when no valid capacities are available.
pub const DEFAULT_CAPACITY: u32 = 3;

/// How many panels each line holds.
///
/// Line `i` holds `values[i]` panels; past the end of the list the last value
/// repeats. The list is never empty and never contains zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineCapacities(Vec<u32>);

impl LineCapacities {
    /// Build capacities from arbitrary integers, coercing values below 1 to 1.
    ///
    /// An empty input gives the default capacities.
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        let values: Vec<u32> = values
            .into_iter()
            .map(|v| v.clamp(1, i64::from(u32::MAX)) as u32)
            .collect();
        if values.is_empty() {
            Self::default()
        } else {
            Self(values)
        }
    }

    /// Accept `values` only if it is non-empty and every value is positive.
    pub fn strict(values: &[i64]) -> Option<Self> {
        if values.is_empty() || values.iter().any(|&v| v <= 0 || v > i64::from(u32::MAX)) {
            return None;
        }
        Some(Self(values.iter().map(|&v| v as u32).collect()))
    }

    /// Parse comma-separated user input such as `"3, 2"`.
    ///
    /// Entries that are not positive integers are dropped. If nothing valid
    /// remains, the default capacities are returned.
    pub fn parse(text: &str) -> Self {
        let values: Vec<u32> = text
            .split(',')
            .map(str::trim)
            .filter_map(|part| part.parse::<u32>().ok())
            .filter(|&v| v > 0)
            .collect();

        if values.is_empty() {
            tracing::warn!(input = text, "No valid capacities, using default");
            Self::default()
        } else {
            Self(values)
        }
    }

    /// Number of panels line `line` can hold.
    pub fn capacity_for(&self, line: usize) -> usize {
        let value = self
            .0
            .get(line)
            .or_else(|| self.0.last())
            .copied()
            .unwrap_or(DEFAULT_CAPACITY);
        value.max(1) as usize
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl Default for LineCapacities {
    fn default() -> Self {
        Self(vec![DEFAULT_CAPACITY])
    }
}

impl fmt::Display for LineCapacities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(","))
    }
}

/// How lines are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Lines are rows stacked top to bottom.
    #[default]
    #[serde(rename = "ROW_MODE")]
    Rows,
    /// Lines are columns placed left to right.
    #[serde(rename = "COL_MODE")]
    Columns,
}

impl LayoutMode {
    /// The other mode.
    pub fn toggle(self) -> Self {
        match self {
            Self::Rows => Self::Columns,
            Self::Columns => Self::Rows,
        }
    }

    /// Tag used in layout files.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Rows => "ROW_MODE",
            Self::Columns => "COL_MODE",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ROW_MODE" => Some(Self::Rows),
            "COL_MODE" => Some(Self::Columns),
            _ => None,
        }
    }

    /// Orientation of the splitter holding the lines.
    pub fn outer_orientation(self) -> Orientation {
        match self {
            Self::Rows => Orientation::Vertical,
            Self::Columns => Orientation::Horizontal,
        }
    }

    /// Orientation of the splitter inside each line.
    pub fn line_orientation(self) -> Orientation {
        self.outer_orientation().cross()
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => write!(f, "rows"),
            Self::Columns => write!(f, "columns"),
        }
    }
}
