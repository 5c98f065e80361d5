//! Nested splitters and their captured proportions.

use panehub_core::PanelId;
use serde::{Deserialize, Serialize};

/// Extents at or below this are too small to distribute.
const MIN_DISTRIBUTE_EXTENT: u32 = 10;

/// Direction in which a splitter places its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Children side by side; the extent is a width.
    Horizontal,
    /// Children stacked; the extent is a height.
    Vertical,
}

impl Orientation {
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Captured sizes of a splitter and of its nested splitters.
///
/// Encoded as the pair `[sizes, children]`, where a `null` child is a leaf
/// panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SplitTreeRepr", into = "SplitTreeRepr")]
pub struct SplitTree {
    pub sizes: Vec<i64>,
    pub children: Vec<Option<SplitTree>>,
}

#[derive(Serialize, Deserialize)]
struct SplitTreeRepr(Vec<i64>, Vec<Option<SplitTree>>);

impl From<SplitTreeRepr> for SplitTree {
    fn from(SplitTreeRepr(sizes, children): SplitTreeRepr) -> Self {
        Self { sizes, children }
    }
}

impl From<SplitTree> for SplitTreeRepr {
    fn from(tree: SplitTree) -> Self {
        Self(tree.sizes, tree.children)
    }
}

/// One slot of a splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitChild {
    Panel(PanelId),
    Split(SplitNode),
}

/// A mounted splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitNode {
    pub orientation: Orientation,
    /// Length available along `orientation`.
    pub extent: u32,
    /// Current size of each child, in the same order as `children`.
    ///
    /// Restored sizes need not add up to `extent`; a renderer scales them
    /// proportionally, the same way a splitter widget treats them.
    pub sizes: Vec<u32>,
    pub children: Vec<SplitChild>,
}

impl SplitNode {
    /// Create a splitter whose children all start at size zero.
    pub fn new(orientation: Orientation, extent: u32, children: Vec<SplitChild>) -> Self {
        Self {
            orientation,
            extent,
            sizes: vec![0; children.len()],
            children,
        }
    }

    /// Record the current sizes of this splitter and every nested one.
    pub fn capture(&self) -> SplitTree {
        SplitTree {
            sizes: self.sizes.iter().map(|&s| i64::from(s)).collect(),
            children: self
                .children
                .iter()
                .map(|child| match child {
                    SplitChild::Panel(_) => None,
                    SplitChild::Split(node) => Some(node.capture()),
                })
                .collect(),
        }
    }

    /// Apply captured sizes, matching children by position.
    ///
    /// Sizes are only applied when they sum to a positive value without
    /// overflowing. Children beyond what both sides have are left as they are.
    pub fn restore(&mut self, tree: &SplitTree) {
        let total = tree.sizes.iter().try_fold(0i64, |acc, &s| acc.checked_add(s));
        match total {
            Some(total) if total > 0 => {
                for (size, &saved) in self.sizes.iter_mut().zip(&tree.sizes) {
                    *size = saved.clamp(0, i64::from(u32::MAX)) as u32;
                }
            }
            _ => tracing::debug!(?total, "Ignoring unusable splitter sizes"),
        }

        for (child, saved) in self.children.iter_mut().zip(&tree.children) {
            if let (SplitChild::Split(node), Some(saved)) = (child, saved) {
                node.restore(saved);
            }
        }
    }

    /// Give every child an equal share of the extent, recursively.
    ///
    /// The remainder goes one unit each to the first children, so the sizes
    /// always add up to the extent.
    pub fn distribute_equally(&mut self) {
        let count = self.children.len();
        if count == 0 {
            return;
        }

        if self.extent > MIN_DISTRIBUTE_EXTENT {
            let count = count as u32;
            let base = self.extent / count;
            let remainder = (self.extent % count) as usize;
            self.sizes = (0..self.children.len())
                .map(|i| base + u32::from(i < remainder))
                .collect();
        }

        for child in &mut self.children {
            if let SplitChild::Split(node) = child {
                node.distribute_equally();
            }
        }
    }

    /// Overwrite this splitter's sizes, as a user dragging a divider would.
    ///
    /// Returns false if the number of sizes does not match the children.
    pub fn set_sizes(&mut self, sizes: Vec<u32>) -> bool {
        if sizes.len() != self.children.len() {
            return false;
        }
        self.sizes = sizes;
        true
    }

    /// The splitter reached by following child indices from this one.
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut SplitNode> {
        match path.split_first() {
            None => Some(self),
            Some((&index, rest)) => match self.children.get_mut(index)? {
                SplitChild::Split(node) => node.node_at_mut(rest),
                SplitChild::Panel(_) => None,
            },
        }
    }

    /// Every panel under this splitter, depth first.
    pub fn panel_ids(&self) -> Vec<PanelId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<PanelId>) {
        for child in &self.children {
            match child {
                SplitChild::Panel(id) => ids.push(*id),
                SplitChild::Split(node) => node.collect_ids(ids),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(ids: &[u64], extent: u32) -> SplitChild {
        SplitChild::Split(SplitNode::new(
            Orientation::Horizontal,
            extent,
            ids.iter().map(|&id| SplitChild::Panel(PanelId::new(id))).collect(),
        ))
    }

    fn rows(lines: Vec<SplitChild>) -> SplitNode {
        SplitNode::new(Orientation::Vertical, 600, lines)
    }

    #[test]
    fn test_distribute_remainder_goes_first() {
        let mut node = SplitNode::new(
            Orientation::Horizontal,
            100,
            (0..3).map(|i| SplitChild::Panel(PanelId::new(i))).collect(),
        );
        node.distribute_equally();
        assert_eq!(node.sizes, vec![34, 33, 33]);
        assert_eq!(node.sizes.iter().sum::<u32>(), 100);
    }

    #[test]
    fn test_distribute_recurses_into_lines() {
        let mut root = rows(vec![line(&[0, 1], 901), line(&[2], 901)]);
        root.distribute_equally();

        assert_eq!(root.sizes, vec![300, 300]);
        let SplitChild::Split(first) = &root.children[0] else {
            panic!("expected a line splitter");
        };
        assert_eq!(first.sizes, vec![451, 450]);
    }

    #[test]
    fn test_distribute_skips_tiny_extent() {
        let mut node = SplitNode::new(
            Orientation::Vertical,
            10,
            vec![line(&[0, 1], 200), line(&[2], 200)],
        );
        node.distribute_equally();

        assert_eq!(node.sizes, vec![0, 0]);
        let SplitChild::Split(first) = &node.children[0] else {
            panic!("expected a line splitter");
        };
        assert_eq!(first.sizes, vec![100, 100]);
    }

    #[test]
    fn test_capture_marks_panels_as_null() {
        let mut root = rows(vec![line(&[0, 1], 400)]);
        root.distribute_equally();

        let tree = root.capture();
        assert_eq!(tree.sizes, vec![600]);
        assert_eq!(tree.children.len(), 1);
        let inner = tree.children[0].as_ref().unwrap();
        assert_eq!(inner.sizes, vec![200, 200]);
        assert_eq!(inner.children, vec![None, None]);

        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(json, "[[600],[[[200,200],[null,null]]]]");
    }

    #[test]
    fn test_restore_ignores_zero_sum() {
        let mut node = SplitNode::new(Orientation::Horizontal, 300, vec![line(&[0], 100)]);
        node.sizes = vec![300];

        node.restore(&SplitTree {
            sizes: vec![0],
            children: vec![None],
        });
        assert_eq!(node.sizes, vec![300]);
    }

    #[test]
    fn test_restore_ignores_overflowing_sizes() {
        let mut node = SplitNode::new(
            Orientation::Horizontal,
            300,
            (0..2).map(|i| SplitChild::Panel(PanelId::new(i))).collect(),
        );
        node.distribute_equally();

        node.restore(&SplitTree {
            sizes: vec![i64::MAX, i64::MAX],
            children: vec![None, None],
        });
        assert_eq!(node.sizes, vec![150, 150]);

        node.restore(&SplitTree {
            sizes: vec![i64::MIN, -1],
            children: vec![None, None],
        });
        assert_eq!(node.sizes, vec![150, 150]);
    }

    #[test]
    fn test_restore_clamps_negative_sizes() {
        let mut node = SplitNode::new(
            Orientation::Horizontal,
            300,
            (0..2).map(|i| SplitChild::Panel(PanelId::new(i))).collect(),
        );
        node.restore(&SplitTree {
            sizes: vec![-5, 200],
            children: vec![None, None],
        });
        assert_eq!(node.sizes, vec![0, 200]);
    }

    #[test]
    fn test_node_at_mut_follows_path() {
        let mut root = rows(vec![line(&[0], 100), line(&[1, 2], 100)]);

        assert!(root.node_at_mut(&[1]).unwrap().set_sizes(vec![30, 70]));
        assert!(!root.node_at_mut(&[1]).unwrap().set_sizes(vec![100]));
        assert!(root.node_at_mut(&[1, 0]).is_none());
        assert!(root.node_at_mut(&[5]).is_none());
        assert_eq!(root.capture().children[1].as_ref().unwrap().sizes, vec![30, 70]);
    }

    #[test]
    fn test_panel_ids_in_order() {
        let root = rows(vec![line(&[0, 1], 100), line(&[2], 100)]);
        assert_eq!(
            root.panel_ids(),
            vec![PanelId::new(0), PanelId::new(1), PanelId::new(2)]
        );
    }
}
