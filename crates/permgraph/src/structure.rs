//! Graph model consumed by the layout pipeline.
//!
//! [`Graph`] is built once per layout call from raw records, validated on the
//! way in, and never mutated afterwards.

mod graph;

pub use graph::{Edge, Graph, Node};

pub(crate) use graph::NodeIndex;
