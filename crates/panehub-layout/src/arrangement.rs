//! Panel arrangement: panel order, grid, and splitter proportions.

use std::path::PathBuf;

use panehub_core::{HubConfig, Panel, PanelId, PanelOrder, Viewport};

use crate::capacity::{LayoutMode, LineCapacities};
use crate::grid::build_grid;
use crate::snapshot::LayoutSnapshot;
use crate::split::{Orientation, SplitChild, SplitNode, SplitTree};

/// Step of a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebuildPhase {
    #[default]
    Idle,
    /// Reading the proportions of the splitters about to be replaced.
    CaptureOldState,
    /// Dropping the old splitters.
    ClearUi,
    /// Partitioning the panel order and mounting new splitters.
    BuildGrid,
    /// Restoring proportions, or distributing space equally.
    ApplyNewState,
}

/// The open panels and how they are arranged.
///
/// Every structural change (adding or removing a panel, new capacities, a
/// mode toggle, loading a snapshot) rebuilds the splitters. Proportions of
/// the old splitters carry over by position where they still fit.
#[derive(Debug)]
pub struct Arrangement {
    order: PanelOrder,
    mode: LayoutMode,
    capacities: LineCapacities,
    viewport: Viewport,
    root: Option<SplitNode>,
    pending: Option<SplitTree>,
    phase: RebuildPhase,
}

impl Arrangement {
    /// Create an empty arrangement.
    pub fn new(config: &HubConfig) -> Self {
        Self {
            order: PanelOrder::new(),
            mode: LayoutMode::default(),
            capacities: LineCapacities::new(config.default_capacities.iter().map(|&c| i64::from(c))),
            viewport: config.viewport,
            root: None,
            pending: None,
            phase: RebuildPhase::Idle,
        }
    }

    pub fn order(&self) -> &PanelOrder {
        &self.order
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn capacities(&self) -> &LineCapacities {
        &self.capacities
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The mounted outer splitter, if any panel is open.
    pub fn root(&self) -> Option<&SplitNode> {
        self.root.as_ref()
    }

    pub fn phase(&self) -> RebuildPhase {
        self.phase
    }

    /// Open a new panel at the end of the order.
    pub fn add_panel(&mut self, path: impl Into<PathBuf>) -> PanelId {
        let id = self.order.push(path);
        self.rebuild();
        id
    }

    /// Close a panel. Returns `None` if no panel has that id.
    pub fn remove_panel(&mut self, id: PanelId) -> Option<Panel> {
        let panel = self.order.remove(id)?;
        self.rebuild();
        Some(panel)
    }

    /// Point a panel at another directory. The layout is unaffected.
    pub fn navigate(&mut self, id: PanelId, path: impl Into<PathBuf>) -> bool {
        self.order.set_path(id, path)
    }

    pub fn set_capacities(&mut self, capacities: LineCapacities) {
        self.capacities = capacities;
        self.rebuild();
    }

    /// Switch between rows and columns and return the new mode.
    pub fn toggle_mode(&mut self) -> LayoutMode {
        self.mode = self.mode.toggle();
        self.rebuild();
        self.mode
    }

    /// Resize the arrangement area. Current sizes carry over.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.rebuild();
    }

    /// Set the sizes of the splitter at `path` (child indices from the
    /// outer splitter). Returns false if there is no such splitter or the
    /// size count does not match.
    pub fn set_sizes(&mut self, path: &[usize], sizes: Vec<u32>) -> bool {
        self.root
            .as_mut()
            .and_then(|root| root.node_at_mut(path))
            .is_some_and(|node| node.set_sizes(sizes))
    }

    /// Replace everything with the contents of `snapshot`.
    ///
    /// The snapshot's proportions take precedence over the current ones.
    pub fn load_snapshot(&mut self, snapshot: LayoutSnapshot) {
        tracing::debug!(
            panels = snapshot.panel_paths.len(),
            mode = %snapshot.layout_mode,
            capacities = %snapshot.line_capacities,
            "Loading layout snapshot"
        );
        self.pending = snapshot.splitter_states;
        self.order.clear();
        for path in snapshot.panel_paths {
            self.order.push(path);
        }
        self.mode = snapshot.layout_mode;
        self.capacities = snapshot.line_capacities;
        self.rebuild();
    }

    /// Describe the current arrangement for persistence.
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            layout_mode: self.mode,
            line_capacities: self.capacities.clone(),
            panel_paths: self.order.paths(),
            splitter_states: self.root.as_ref().map(SplitNode::capture),
        }
    }

    /// Current partition of the panels into lines.
    pub fn grid(&self) -> Vec<Vec<Panel>> {
        build_grid(self.order.as_slice(), &self.capacities)
    }

    fn enter(&mut self, phase: RebuildPhase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "Rebuild phase");
        self.phase = phase;
    }

    fn rebuild(&mut self) {
        self.enter(RebuildPhase::CaptureOldState);
        if self.pending.is_none() {
            self.pending = self.root.as_ref().map(SplitNode::capture);
        }

        self.enter(RebuildPhase::ClearUi);
        self.root = None;

        self.enter(RebuildPhase::BuildGrid);
        if self.order.is_empty() {
            // Nothing to mount, so there is nothing to apply the proportions to
            self.pending = None;
            self.enter(RebuildPhase::Idle);
            return;
        }
        let mut root = self.mount();

        self.enter(RebuildPhase::ApplyNewState);
        root.distribute_equally();
        if let Some(saved) = self.pending.take() {
            root.restore(&saved);
        }
        self.root = Some(root);

        self.enter(RebuildPhase::Idle);
        tracing::debug!(
            panels = self.order.len(),
            mode = %self.mode,
            capacities = %self.capacities,
            "Rebuilt arrangement"
        );
    }

    fn mount(&self) -> SplitNode {
        let outer = self.mode.outer_orientation();
        let inner = self.mode.line_orientation();

        let lines = build_grid(self.order.as_slice(), &self.capacities)
            .into_iter()
            .filter(|line| !line.is_empty())
            .map(|line| {
                SplitChild::Split(SplitNode::new(
                    inner,
                    extent_along(self.viewport, inner),
                    line.iter().map(|panel| SplitChild::Panel(panel.id)).collect(),
                ))
            })
            .collect();

        SplitNode::new(outer, extent_along(self.viewport, outer), lines)
    }
}

fn extent_along(viewport: Viewport, orientation: Orientation) -> u32 {
    match orientation {
        Orientation::Horizontal => viewport.width,
        Orientation::Vertical => viewport.height,
    }
}
