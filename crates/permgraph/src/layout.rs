//! Hierarchical layout of a [`Graph`].
//!
//! [`layout`] runs the three stages in order: rank assignment, crossing
//! minimisation and coordinate assignment. It is a pure function of the graph
//! and the configuration. Layouts of structurally identical graphs are
//! identical, whatever order the records arrived in.

mod order;
mod position;
mod rank;

use log::{debug, info};
use serde::Serialize;

use permgraph_core::{
    category::Category,
    geometry::{Bounds, Point, Size},
    record::{EdgeRecord, NodeRecord},
};

use crate::{
    config::LayoutConfig,
    error::LayoutError,
    structure::{Edge, Graph},
};

use order::Adjacency;
use position::Spacing;

/// A node with its rank, its order inside the rank and its box.
///
/// `x` and `y` are the top-left corner of the box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    category: Category,
    rank: usize,
    order: usize,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl PositionedNode {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Layer index, 0 at the top.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Left-to-right index inside the rank, starting at 0.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(Point::new(self.x, self.y), Size::new(self.width, self.height))
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

/// The result of laying out a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    nodes: Vec<PositionedNode>,
    edges: Vec<Edge>,
    back_edges: Vec<usize>,
    crossings: usize,
    width: f32,
    height: f32,
}

impl Layout {
    /// Positioned nodes, sorted by id.
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    /// Looks up a positioned node by id.
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes
            .binary_search_by(|node| node.id.as_str().cmp(id))
            .ok()
            .map(|idx| &self.nodes[idx])
    }

    /// The graph's edges, unchanged and in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Indices into [`Layout::edges`] of the edges reversed to break cycles.
    pub fn back_edges(&self) -> &[usize] {
        &self.back_edges
    }

    /// Returns true if the edge at `idx` was reversed for ranking.
    pub fn is_back_edge(&self, idx: usize) -> bool {
        self.back_edges.binary_search(&idx).is_ok()
    }

    /// Edge crossings between adjacent ranks in the chosen order. An edge
    /// spanning several ranks counts once per rank gap it passes.
    pub fn crossings(&self) -> usize {
        self.crossings
    }

    /// Number of ranks.
    pub fn rank_count(&self) -> usize {
        self.nodes.iter().map(|node| node.rank + 1).max().unwrap_or(0)
    }

    /// Width of the drawing. The drawing starts at x = 0.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height of the drawing. The drawing starts at y = 0.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lays out `graph`.
///
/// # Errors
///
/// Returns [`LayoutError::DegenerateConfiguration`] if `config` holds a
/// non-positive or non-finite separation or default size. Nothing is laid
/// out in that case.
///
/// # Examples
///
/// ```
/// use permgraph::{Graph, config::LayoutConfig, layout};
/// use permgraph_core::record::{EdgeRecord, NodeRecord};
///
/// let graph = Graph::build(
///     vec![NodeRecord::new("admin"), NodeRecord::new("users:write")],
///     vec![EdgeRecord::new("admin", "users:write")],
/// )
/// .unwrap();
/// let layout = layout(&graph, &LayoutConfig::default()).unwrap();
///
/// assert_eq!(layout.node("admin").unwrap().rank(), 0);
/// assert_eq!(layout.node("users:write").unwrap().rank(), 1);
/// ```
pub fn layout(graph: &Graph, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    config.validate()?;
    info!(nodes = graph.nodes_count(), edges = graph.edges_count(); "Laying out graph");

    let default_size = config.default_node_size();
    let sizes: Vec<Size> = graph.nodes().map(|node| node.size(default_size)).collect();

    let ranking = rank::assign_ranks(graph);
    let adjacency = Adjacency::new(&ranking);
    let ordering = order::order(&adjacency, config.max_ordering_passes());
    let boxes = position::assign_coordinates(
        &sizes,
        &ordering,
        &adjacency,
        Spacing {
            rank_separation: config.rank_separation(),
            node_separation: config.node_separation(),
        },
    );
    let positions = ordering.positions();

    let nodes: Vec<PositionedNode> = graph
        .nodes()
        .enumerate()
        .map(|(idx, node)| PositionedNode {
            id: node.id().to_string(),
            label: node.label().map(str::to_string),
            category: node.category(),
            rank: ranking.ranks()[idx],
            order: positions[idx],
            x: boxes[idx].min_x(),
            y: boxes[idx].min_y(),
            width: sizes[idx].width(),
            height: sizes[idx].height(),
        })
        .collect();

    let extent = boxes
        .iter()
        .copied()
        .reduce(|a, b| a.merge(&b))
        .unwrap_or_default();

    let layout = Layout {
        nodes,
        edges: graph.edges().to_vec(),
        back_edges: ranking.back_edges(),
        crossings: ordering.crossings(),
        width: extent.max_x(),
        height: extent.max_y(),
    };
    debug!(
        ranks = layout.rank_count(),
        crossings = layout.crossings,
        width = layout.width,
        height = layout.height;
        "Layout finished"
    );
    Ok(layout)
}

/// Builds a [`Graph`] from raw records and lays it out.
///
/// # Errors
///
/// Any error of [`Graph::build`] or [`layout`].
pub fn layout_records(
    nodes: impl IntoIterator<Item = NodeRecord>,
    edges: impl IntoIterator<Item = EdgeRecord>,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    config.validate()?;
    let graph = Graph::build(nodes, edges)?;
    layout(&graph, config)
}


#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    /// Minimum center distance slack for float rounding.
    const EPSILON: f32 = 1e-2;

    // ===================
    // Strategies
    // ===================

    /// Node records with unique ids `n0..nK`, some with explicit sizes.
    fn nodes_strategy() -> impl Strategy<Value = Vec<NodeRecord>> {
        prop::collection::vec(prop::option::of((20.0f32..300.0, 10.0f32..120.0)), 0..12).prop_map(
            |sizes| {
                sizes
                    .into_iter()
                    .enumerate()
                    .map(|(idx, size)| {
                        let record = NodeRecord::new(format!("n{idx}"));
                        match size {
                            Some((w, h)) => record.with_size(Size::new(w, h)),
                            None => record,
                        }
                    })
                    .collect()
            },
        )
    }

    /// A node set plus edges between its ids; self-loops and parallel edges included.
    fn graph_strategy() -> impl Strategy<Value = (Vec<NodeRecord>, Vec<EdgeRecord>)> {
        nodes_strategy().prop_flat_map(|nodes| {
            let count = nodes.len();
            let edges = if count == 0 {
                Just(Vec::new()).boxed()
            } else {
                prop::collection::vec((0..count, 0..count, 0u32..3), 0..24)
                    .prop_map(|pairs| {
                        pairs
                            .into_iter()
                            .map(|(s, t, w)| {
                                EdgeRecord::new(format!("n{s}"), format!("n{t}")).with_weight(w)
                            })
                            .collect::<Vec<_>>()
                    })
                    .boxed()
            };
            (Just(nodes), edges)
        })
    }

    /// A graph together with shuffled copies of its records.
    fn shuffled_graph_strategy() -> impl Strategy<
        Value = (
            (Vec<NodeRecord>, Vec<EdgeRecord>),
            (Vec<NodeRecord>, Vec<EdgeRecord>),
        ),
    > {
        graph_strategy().prop_flat_map(|(nodes, edges)| {
            let shuffled = (
                Just(nodes.clone()).prop_shuffle(),
                Just(edges.clone()).prop_shuffle(),
            );
            (Just((nodes, edges)), shuffled)
        })
    }

    fn run(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Layout {
        layout_records(nodes, edges, &LayoutConfig::default()).expect("generated graphs are valid")
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every edge that was not reversed points to a strictly higher rank.
    fn check_rank_monotonicity(layout: &Layout) -> Result<(), TestCaseError> {
        for (idx, edge) in layout.edges().iter().enumerate() {
            if edge.is_self_loop() || layout.is_back_edge(idx) {
                continue;
            }
            let source = layout.node(edge.source()).unwrap().rank();
            let target = layout.node(edge.target()).unwrap().rank();
            prop_assert!(target > source, "edge {} has ranks {source} -> {target}", edge.key());
        }
        for &idx in layout.back_edges() {
            let edge = &layout.edges()[idx];
            let source = layout.node(edge.source()).unwrap().rank();
            let target = layout.node(edge.target()).unwrap().rank();
            prop_assert!(source > target, "back edge {} is not reversed", edge.key());
        }
        Ok(())
    }

    /// The ranks in use are exactly `0..rank_count`.
    fn check_rank_contiguity(layout: &Layout) -> Result<(), TestCaseError> {
        let used: BTreeSet<usize> = layout.nodes().iter().map(PositionedNode::rank).collect();
        let expected: BTreeSet<usize> = (0..layout.rank_count()).collect();
        prop_assert_eq!(used, expected);
        Ok(())
    }

    /// The order values of every rank are `0..len`.
    fn check_order_is_permutation(layout: &Layout) -> Result<(), TestCaseError> {
        for rank in 0..layout.rank_count() {
            let mut orders: Vec<usize> = layout
                .nodes()
                .iter()
                .filter(|node| node.rank() == rank)
                .map(PositionedNode::order)
                .collect();
            orders.sort_unstable();
            let expected: Vec<usize> = (0..orders.len()).collect();
            prop_assert_eq!(orders, expected);
        }
        Ok(())
    }

    /// Nodes sharing a rank keep at least the configured distance.
    fn check_separation(layout: &Layout, node_separation: f32) -> Result<(), TestCaseError> {
        for a in layout.nodes() {
            for b in layout.nodes() {
                if a.rank() != b.rank() || a.order() >= b.order() {
                    continue;
                }
                let distance = (b.center().x() - a.center().x()).abs();
                let required = a.width() / 2.0 + b.width() / 2.0 + node_separation;
                prop_assert!(
                    distance >= required - EPSILON,
                    "{} and {} are {distance} apart, need {required}",
                    a.id(),
                    b.id()
                );
            }
        }
        Ok(())
    }

    /// The drawing starts at the origin and contains every node.
    fn check_extent(layout: &Layout) -> Result<(), TestCaseError> {
        if layout.is_empty() {
            return Ok(());
        }
        let min_x = layout.nodes().iter().map(|n| n.x()).fold(f32::INFINITY, f32::min);
        let min_y = layout.nodes().iter().map(|n| n.y()).fold(f32::INFINITY, f32::min);
        prop_assert!(min_x.abs() < EPSILON);
        prop_assert!(min_y >= -EPSILON);
        for node in layout.nodes() {
            let bounds = node.bounds();
            prop_assert!(bounds.max_x() <= layout.width() + EPSILON);
            prop_assert!(bounds.max_y() <= layout.height() + EPSILON);
        }
        Ok(())
    }

    /// Shuffling the input records changes nothing but the edge list order.
    fn check_input_order_independence(original: &Layout, shuffled: &Layout) -> Result<(), TestCaseError> {
        prop_assert_eq!(original.nodes(), shuffled.nodes());
        prop_assert_eq!(original.crossings(), shuffled.crossings());
        prop_assert_eq!(original.width().to_bits(), shuffled.width().to_bits());
        prop_assert_eq!(original.height().to_bits(), shuffled.height().to_bits());

        let reversed = |layout: &Layout| {
            let mut edges: Vec<Edge> = layout
                .back_edges()
                .iter()
                .map(|&idx| layout.edges()[idx].clone())
                .collect();
            edges.sort_by(|a, b| {
                (a.source(), a.target(), a.label(), a.weight())
                    .cmp(&(b.source(), b.target(), b.label(), b.weight()))
            });
            edges
        };
        prop_assert_eq!(reversed(original), reversed(shuffled));
        Ok(())
    }

    proptest! {
        #[test]
        fn rank_monotonicity((nodes, edges) in graph_strategy()) {
            check_rank_monotonicity(&run(nodes, edges))?;
        }

        #[test]
        fn rank_contiguity((nodes, edges) in graph_strategy()) {
            check_rank_contiguity(&run(nodes, edges))?;
        }

        #[test]
        fn order_is_permutation((nodes, edges) in graph_strategy()) {
            check_order_is_permutation(&run(nodes, edges))?;
        }

        #[test]
        fn same_rank_separation((nodes, edges) in graph_strategy()) {
            check_separation(&run(nodes, edges), LayoutConfig::default().node_separation())?;
        }

        #[test]
        fn extent_contains_nodes((nodes, edges) in graph_strategy()) {
            check_extent(&run(nodes, edges))?;
        }

        #[test]
        fn input_order_independence(
            ((nodes, edges), (shuffled_nodes, shuffled_edges)) in shuffled_graph_strategy()
        ) {
            let original = run(nodes, edges);
            let shuffled = run(shuffled_nodes, shuffled_edges);
            check_input_order_independence(&original, &shuffled)?;
        }
    }
}
