//! Panel identity and ordering.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Unique identifier for a panel within one arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PanelId(pub u64);

impl PanelId {
    /// Create a new PanelId from a u64.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One browser view: an identity plus the directory it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub id: PanelId,
    pub path: PathBuf,
}

impl Panel {
    pub fn new(id: PanelId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    /// The panel's current directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The logical order of all open panels.
///
/// Layout code partitions this order but never reorders it.
#[derive(Debug, Clone, Default)]
pub struct PanelOrder {
    panels: Vec<Panel>,
    next_id: u64,
}

impl PanelOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a panel showing `path` and return its id.
    pub fn push(&mut self, path: impl Into<PathBuf>) -> PanelId {
        let id = PanelId::new(self.next_id);
        self.next_id += 1;
        self.panels.push(Panel::new(id, path));
        id
    }

    /// Remove a panel by id, returning it if it was present.
    pub fn remove(&mut self, id: PanelId) -> Option<Panel> {
        let index = self.panels.iter().position(|p| p.id == id)?;
        Some(self.panels.remove(index))
    }

    /// Remove every panel. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.panels.clear();
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Point a panel at a new directory.
    pub fn set_path(&mut self, id: PanelId, path: impl Into<PathBuf>) -> bool {
        match self.panels.iter_mut().find(|p| p.id == id) {
            Some(panel) => {
                panel.path = path.into();
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[Panel] {
        &self.panels
    }

    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Current directory of every panel, in order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.panels.iter().map(|p| p.path.clone()).collect()
    }
}
