//! Coordinate assignment: turns rank and order into node boxes.

use log::debug;

use permgraph_core::geometry::{Bounds, Point, Size};

use super::order::{Adjacency, Ordering};

/// Number of straightening sweeps after packing.
const STRAIGHTEN_SWEEPS: usize = 8;

/// Spacing between nodes.
#[derive(Debug, Clone, Copy)]
pub(super) struct Spacing {
    pub(super) rank_separation: f32,
    pub(super) node_separation: f32,
}

/// Places every real node and returns its box, by canonical node index.
///
/// Rows are `tallest node + rank separation` apart and each node is centered
/// vertically in its row. Inside a row, nodes are packed left to right and
/// then nudged toward the mean x of their neighbours in the adjacent rows
/// without ever closing the gap to a same-row neighbour below
/// `node_separation`. Virtual nodes have no size but keep their slot, so
/// split links pass between real nodes. The drawing is shifted so its
/// leftmost real edge is at x = 0.
pub(super) fn assign_coordinates(
    sizes: &[Size],
    ordering: &Ordering,
    adjacency: &Adjacency,
    spacing: Spacing,
) -> Vec<Bounds> {
    let real = adjacency.real_count();
    let mut all_sizes = sizes.to_vec();
    all_sizes.resize(adjacency.node_count(), Size::default());
    let sizes = all_sizes.as_slice();

    let layers = ordering.layers();
    let mut xs = pack(sizes, layers, spacing.node_separation);

    for sweep in 0..STRAIGHTEN_SWEEPS {
        let downward = sweep % 2 == 0;
        let ranks: Vec<usize> = if downward {
            (1..layers.len()).collect()
        } else {
            (0..layers.len().saturating_sub(1)).rev().collect()
        };
        for rank in ranks {
            let layer = &layers[rank];
            let neighbours = |node: usize| {
                if downward {
                    adjacency.upper(node)
                } else {
                    adjacency.lower(node)
                }
            };
            for idx in (0..layer.len()).chain((0..layer.len()).rev()) {
                straighten(&mut xs, sizes, layer, idx, neighbours(layer[idx]), spacing);
            }
        }
    }

    let min_left = layers
        .iter()
        .flatten()
        .filter(|&&node| node < real)
        .map(|&node| xs[node] - sizes[node].width() / 2.0)
        .fold(f32::INFINITY, f32::min);
    let shift = if min_left.is_finite() { min_left } else { 0.0 };

    let row_height = sizes
        .iter()
        .map(|size| size.height())
        .fold(0.0, f32::max);
    let pitch = row_height + spacing.rank_separation;

    let mut bounds = vec![Bounds::default(); real];
    for (rank, layer) in layers.iter().enumerate() {
        let y = rank as f32 * pitch + row_height / 2.0;
        for &node in layer.iter().filter(|&&node| node < real) {
            let center = Point::new(xs[node] - shift, y);
            bounds[node] = Bounds::new_from_center(center, sizes[node]);
        }
    }

    debug!(
        rows = layers.len(),
        row_pitch = pitch,
        straighten_sweeps = STRAIGHTEN_SWEEPS;
        "Coordinates assigned"
    );
    bounds
}

/// Packs every rank left to right. Returns center x by canonical node index.
fn pack(sizes: &[Size], layers: &[Vec<usize>], node_separation: f32) -> Vec<f32> {
    let mut xs = vec![0.0; sizes.len()];
    for layer in layers {
        let mut previous: Option<usize> = None;
        for &node in layer {
            xs[node] = match previous {
                Some(prev) => xs[prev] + min_gap(sizes, prev, node, node_separation),
                None => sizes[node].width() / 2.0,
            };
            previous = Some(node);
        }
    }
    xs
}

/// Moves `layer[idx]` toward the mean x of `neighbours`, clamped so both
/// same-rank neighbours keep their minimum distance.
fn straighten(
    xs: &mut [f32],
    sizes: &[Size],
    layer: &[usize],
    idx: usize,
    neighbours: &[usize],
    spacing: Spacing,
) {
    if neighbours.is_empty() {
        return;
    }
    let node = layer[idx];
    let target = neighbours.iter().map(|&n| xs[n]).sum::<f32>() / neighbours.len() as f32;

    let lo = match idx.checked_sub(1).map(|left| layer[left]) {
        Some(left) => xs[left] + min_gap(sizes, left, node, spacing.node_separation),
        None => f32::NEG_INFINITY,
    };
    let hi = match layer.get(idx + 1) {
        Some(&right) => xs[right] - min_gap(sizes, node, right, spacing.node_separation),
        None => f32::INFINITY,
    };
    if lo > hi {
        return;
    }

    xs[node] = target.max(lo).min(hi);
}

/// Minimum center distance between `left` and `right` when they share a rank.
fn min_gap(sizes: &[Size], left: usize, right: usize, node_separation: f32) -> f32 {
    sizes[left].width() / 2.0 + node_separation + sizes[right].width() / 2.0
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use permgraph_core::record::{EdgeRecord, NodeRecord};

    use super::*;
    use crate::{
        layout::{order::order, rank::assign_ranks},
        structure::Graph,
    };

    const SPACING: Spacing = Spacing {
        rank_separation: 150.0,
        node_separation: 100.0,
    };

    fn place(nodes: Vec<NodeRecord>, edges: &[(&str, &str)]) -> Vec<Bounds> {
        let graph = Graph::build(
            nodes,
            edges.iter().map(|(s, t)| EdgeRecord::new(*s, *t)),
        )
        .unwrap();
        let sizes: Vec<Size> = graph
            .nodes()
            .map(|node| node.size(Size::new(200.0, 60.0)))
            .collect();
        let adjacency = Adjacency::new(&assign_ranks(&graph));
        let ordering = order(&adjacency, 24);
        assign_coordinates(&sizes, &ordering, &adjacency, SPACING)
    }

    fn plain(ids: &[&str]) -> Vec<NodeRecord> {
        ids.iter().map(|id| NodeRecord::new(*id)).collect()
    }

    #[test]
    fn test_single_node_sits_at_origin() {
        let bounds = place(plain(&["solo"]), &[]);

        assert_approx_eq!(f32, bounds[0].min_x(), 0.0);
        assert_approx_eq!(f32, bounds[0].min_y(), 0.0);
        assert_approx_eq!(f32, bounds[0].width(), 200.0);
        assert_approx_eq!(f32, bounds[0].height(), 60.0);
    }

    #[test]
    fn test_row_is_packed_with_separation() {
        let bounds = place(plain(&["a", "b", "c"]), &[]);

        assert_approx_eq!(f32, bounds[0].min_x(), 0.0);
        assert_approx_eq!(f32, bounds[1].min_x(), 300.0);
        assert_approx_eq!(f32, bounds[2].min_x(), 600.0);
        for b in &bounds {
            assert_approx_eq!(f32, b.min_y(), 0.0);
        }
    }

    #[test]
    fn test_ranks_are_evenly_spaced_rows() {
        let bounds = place(plain(&["a", "b", "c"]), &[("a", "b"), ("b", "c")]);

        assert_approx_eq!(f32, bounds[0].min_y(), 0.0);
        assert_approx_eq!(f32, bounds[1].min_y(), 210.0);
        assert_approx_eq!(f32, bounds[2].min_y(), 420.0);
    }

    #[test]
    fn test_child_is_centered_under_parents() {
        let bounds = place(plain(&["a", "b", "c"]), &[("a", "c"), ("b", "c")]);

        assert_approx_eq!(f32, bounds[0].min_x(), 0.0);
        assert_approx_eq!(f32, bounds[1].min_x(), 300.0);
        assert_approx_eq!(f32, bounds[2].center().x(), 250.0);
    }

    #[test]
    fn test_single_child_is_aligned_with_parent() {
        let bounds = place(
            plain(&["a", "b", "c", "d"]),
            &[("a", "c"), ("b", "d")],
        );

        assert_approx_eq!(f32, bounds[2].center().x(), bounds[0].center().x());
        assert_approx_eq!(f32, bounds[3].center().x(), bounds[1].center().x());
    }

    #[test]
    fn test_mixed_sizes_keep_separation_and_center_in_row() {
        let nodes = vec![
            NodeRecord::new("a"),
            NodeRecord::new("b").with_size(Size::new(400.0, 100.0)),
            NodeRecord::new("c").with_size(Size::new(50.0, 20.0)),
        ];
        let bounds = place(nodes, &[]);

        assert_approx_eq!(f32, bounds[1].min_x() - bounds[0].max_x(), 100.0);
        assert_approx_eq!(f32, bounds[2].min_x() - bounds[1].max_x(), 100.0);
        assert_approx_eq!(f32, bounds[1].min_y(), 0.0);
        assert_approx_eq!(f32, bounds[0].min_y(), 20.0);
        assert_approx_eq!(f32, bounds[2].center().y(), 50.0);
    }

    #[test]
    fn test_long_link_keeps_a_slot_between_real_nodes() {
        let bounds = place(
            plain(&["a", "b", "c", "d"]),
            &[("a", "b"), ("b", "c"), ("a", "c"), ("d", "c")],
        );

        assert_approx_eq!(f32, bounds[2].min_y(), 420.0);
        assert_eq!(bounds.len(), 4);
        for b in &bounds {
            assert!(b.min_x() >= 0.0);
        }
    }

    #[test]
    fn test_empty_input() {
        let bounds = place(Vec::new(), &[]);
        assert!(bounds.is_empty());
    }
}
