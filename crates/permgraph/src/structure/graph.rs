//! Validated graph storage with forward and reverse adjacency.
//!
//! # Architecture
//!
//! The module provides:
//! - [`Node`]: a validated node (id, label, category, optional explicit size)
//! - [`Edge`]: a directed edge exactly as the caller supplied it
//! - [`Graph`]: node storage keyed by id plus incoming/outgoing edge lists
//!
//! # Canonical form
//!
//! Nodes are stored sorted by id, and every adjacency list is sorted by the
//! opposite endpoint, then label, then weight. Every traversal in the layout
//! pipeline walks these lists, so the layout depends only on the node and
//! edge sets, not on the order the records arrived in.
//!
//! The edge list itself keeps input order so it can be handed back unchanged.

use std::cmp::Ordering;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use permgraph_core::{
    category::Category,
    geometry::Size,
    record::{EdgeRecord, NodeRecord},
};

use crate::error::LayoutError;

/// Dense index of a node in canonical (id-sorted) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeIndex(usize);

impl NodeIndex {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Index of an edge in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EdgeIndex(usize);

impl EdgeIndex {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A validated graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    label: Option<String>,
    category: Category,
    width: Option<f32>,
    height: Option<f32>,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the node size, filling missing dimensions from `default`.
    pub fn size(&self, default: Size) -> Size {
        Size::new(
            self.width.unwrap_or(default.width()),
            self.height.unwrap_or(default.height()),
        )
    }

    fn from_record(record: NodeRecord) -> Result<Self, LayoutError> {
        for (dimension, value) in [("width", record.width), ("height", record.height)] {
            match value {
                Some(value) if !(value.is_finite() && value > 0.0) => {
                    return Err(LayoutError::DegenerateConfiguration {
                        option: format!("{dimension} of node `{}`", record.id),
                        value,
                    });
                }
                _ => {}
            }
        }

        Ok(Self {
            id: record.id,
            label: record.label,
            category: record.category,
            width: record.width,
            height: record.height,
        })
    }
}

/// A directed edge between two nodes, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    source: String,
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    weight: u32,
}

impl Edge {
    /// Creates an edge with weight 1 and no label.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
            weight: 1,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Returns true if the edge starts and ends at the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Returns the `"{source}-{target}"` identifier renderers key edges by.
    ///
    /// Parallel edges share a key.
    pub fn key(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }
}

impl From<EdgeRecord> for Edge {
    fn from(record: EdgeRecord) -> Self {
        Self {
            source: record.source,
            target: record.target,
            label: record.label,
            weight: record.weight.unwrap_or(1),
        }
    }
}

/// A validated directed graph.
///
/// Self-loops and parallel edges are allowed. Duplicate node ids and edges to
/// unknown nodes are rejected by [`Graph::build`].
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    endpoints: Vec<(NodeIndex, NodeIndex)>,
    incoming: Vec<Vec<EdgeIndex>>,
    outgoing: Vec<Vec<EdgeIndex>>,
}

impl Graph {
    /// Builds a graph from raw node and edge records.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::DuplicateNode`] if two records share an id.
    /// - [`LayoutError::DanglingEdge`] if an edge names an id with no node.
    /// - [`LayoutError::DegenerateConfiguration`] if a node carries a
    ///   non-positive or non-finite explicit size.
    ///
    /// # Examples
    ///
    /// ```
    /// use permgraph::Graph;
    /// use permgraph_core::record::{EdgeRecord, NodeRecord};
    ///
    /// let graph = Graph::build(
    ///     vec![NodeRecord::new("editor"), NodeRecord::new("doc:edit")],
    ///     vec![EdgeRecord::new("editor", "doc:edit")],
    /// )
    /// .expect("valid graph");
    ///
    /// assert_eq!(graph.nodes_count(), 2);
    /// assert_eq!(graph.roots().next().map(|n| n.id()), Some("editor"));
    /// ```
    pub fn build(
        nodes: impl IntoIterator<Item = NodeRecord>,
        edges: impl IntoIterator<Item = EdgeRecord>,
    ) -> Result<Self, LayoutError> {
        let mut node_map = IndexMap::new();
        for record in nodes {
            if node_map.contains_key(&record.id) {
                return Err(LayoutError::DuplicateNode { id: record.id });
            }
            let node = Node::from_record(record)?;
            node_map.insert(node.id.clone(), node);
        }
        node_map.sort_unstable_keys();

        let edges: Vec<Edge> = edges.into_iter().map(Edge::from).collect();
        let mut endpoints = Vec::with_capacity(edges.len());
        for edge in &edges {
            let lookup = |id: &str| {
                node_map
                    .get_index_of(id)
                    .map(NodeIndex)
                    .ok_or_else(|| LayoutError::DanglingEdge {
                        from: edge.source.clone(),
                        to: edge.target.clone(),
                        missing: id.to_string(),
                    })
            };
            endpoints.push((lookup(&edge.source)?, lookup(&edge.target)?));
        }

        let mut incoming = vec![Vec::new(); node_map.len()];
        let mut outgoing = vec![Vec::new(); node_map.len()];
        for (idx, &(source, target)) in endpoints.iter().enumerate() {
            outgoing[source.0].push(EdgeIndex(idx));
            incoming[target.0].push(EdgeIndex(idx));
        }

        for list in &mut outgoing {
            list.sort_by(|&a, &b| {
                adjacency_order(&edges, a, b, endpoints[a.0].1, endpoints[b.0].1)
            });
        }
        for list in &mut incoming {
            list.sort_by(|&a, &b| {
                adjacency_order(&edges, a, b, endpoints[a.0].0, endpoints[b.0].0)
            });
        }

        debug!(nodes = node_map.len(), edges = edges.len(); "Graph built");

        Ok(Self {
            nodes: node_map,
            edges,
            endpoints,
            incoming,
            outgoing,
        })
    }

    /// Returns the node with the given id, if it exists.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Checks if a node with the given id exists in the graph.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns an iterator over all nodes, sorted by id.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns the total number of nodes in the graph.
    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns all edges in the order they were supplied.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the total number of edges in the graph.
    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the graph has neither nodes nor edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Returns an iterator over root nodes (nodes with no incoming edges).
    ///
    /// A node whose only incoming edge is a self-loop is not a root.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .values()
            .zip(&self.incoming)
            .filter_map(|(node, incoming)| incoming.is_empty().then_some(node))
    }

    /// Returns an iterator over the targets of edges leaving `source_id`.
    ///
    /// Parallel edges yield their target once per edge. Unknown ids yield nothing.
    pub fn outgoing_nodes(&self, source_id: &str) -> impl Iterator<Item = &Node> {
        self.nodes
            .get_index_of(source_id)
            .into_iter()
            .flat_map(|idx| &self.outgoing[idx])
            .map(|edge| self.node_at(self.endpoints[edge.0].1))
    }

    /// Returns an iterator over the sources of edges entering `target_id`.
    pub fn incoming_nodes(&self, target_id: &str) -> impl Iterator<Item = &Node> {
        self.nodes
            .get_index_of(target_id)
            .into_iter()
            .flat_map(|idx| &self.incoming[idx])
            .map(|edge| self.node_at(self.endpoints[edge.0].0))
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.0]
    }

    pub(crate) fn edge_at(&self, idx: EdgeIndex) -> &Edge {
        &self.edges[idx.0]
    }

    /// Returns `(source, target)` of an edge.
    pub(crate) fn endpoints(&self, idx: EdgeIndex) -> (NodeIndex, NodeIndex) {
        self.endpoints[idx.0]
    }

    /// Returns the canonical-order outgoing edges of a node.
    pub(crate) fn outgoing(&self, idx: NodeIndex) -> &[EdgeIndex] {
        &self.outgoing[idx.0]
    }

    /// Returns an iterator over node indices in canonical order.
    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    /// Returns every edge index, ordered by source, then by the outgoing list order.
    pub(crate) fn canonical_edges(&self) -> impl Iterator<Item = EdgeIndex> {
        self.outgoing.iter().flatten().copied()
    }

    #[cfg(test)]
    pub(crate) fn incoming(&self, idx: NodeIndex) -> &[EdgeIndex] {
        &self.incoming[idx.0]
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

/// Orders two edges of the same adjacency list by opposite endpoint, label and weight.
///
/// Input position only separates edges that are otherwise identical, and such
/// edges are interchangeable for layout purposes.
fn adjacency_order(
    edges: &[Edge],
    a: EdgeIndex,
    b: EdgeIndex,
    opposite_a: NodeIndex,
    opposite_b: NodeIndex,
) -> Ordering {
    let (ea, eb) = (&edges[a.0], &edges[b.0]);
    opposite_a
        .cmp(&opposite_b)
        .then_with(|| ea.label.cmp(&eb.label))
        .then_with(|| ea.weight.cmp(&eb.weight))
        .then_with(|| a.cmp(&b))
}
