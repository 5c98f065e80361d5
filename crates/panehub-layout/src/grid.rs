//! Partition of the panel order into lines.

use crate::capacity::LineCapacities;

/// Split `order` into consecutive lines sized by `capacities`.
///
/// The order is never changed, only cut. An empty order gives one empty line
/// so callers always have something to mount.
pub fn build_grid<T: Clone>(order: &[T], capacities: &LineCapacities) -> Vec<Vec<T>> {
    if order.is_empty() {
        return vec![Vec::new()];
    }

    let mut lines = Vec::new();
    let mut rest = order;
    while !rest.is_empty() {
        let take = capacities.capacity_for(lines.len()).min(rest.len());
        let (line, tail) = rest.split_at(take);
        lines.push(line.to_vec());
        rest = tail;
    }
    lines
}
