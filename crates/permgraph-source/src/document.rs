//! The graph document delivered by a data source.

use serde::Deserialize;

use permgraph_core::record::{EdgeRecord, NodeRecord};

/// A whole graph payload: `{"nodes": [...], "edges": [...]}`.
///
/// Either list may be omitted and then reads as empty. Keys other than
/// `nodes` and `edges` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    nodes: Vec<NodeRecord>,

    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Splits the document into its node and edge records.
    pub fn into_parts(self) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
        (self.nodes, self.edges)
    }
}
