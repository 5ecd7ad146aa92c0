//! Permgraph - deterministic hierarchical layout for permission graphs.
//!
//! A permission graph links roles, resources and permissions with directed
//! edges. This crate builds a validated [`Graph`] from raw records, lays it
//! out in ranks with few edge crossings, and exports the positioned result
//! for a renderer.
//!
//! [`layout`] is the engine itself: a pure function from a graph and a
//! [`config::LayoutConfig`] to a [`Layout`]. [`LayoutBuilder`] wraps the whole
//! pipeline from JSON text to JSON output.

pub mod config;
pub mod export;

mod error;
mod layout;
mod structure;

pub use permgraph_core::{category, color, geometry, record};

pub use error::{LayoutError, PermgraphError};
pub use layout::{Layout, PositionedNode, layout, layout_records};
pub use structure::{Edge, Graph, Node};

use log::{debug, info, trace};

use config::AppConfig;
use export::{Exporter, json::JsonBuilder};

/// Builder for parsing, laying out and exporting permission graphs.
///
/// # Examples
///
/// ```
/// use permgraph::{LayoutBuilder, config::AppConfig};
///
/// let source = r#"{
///     "nodes": [
///         {"id": "admin", "type": "role"},
///         {"id": "reports", "type": "resource"}
///     ],
///     "edges": [{"source": "admin", "target": "reports"}]
/// }"#;
///
/// let builder = LayoutBuilder::new(AppConfig::default());
/// let graph = builder.parse(source).expect("Failed to parse");
/// let layout = builder.layout(&graph).expect("Failed to lay out");
/// let json = builder.render_json(&layout, false).expect("Failed to export");
///
/// assert!(json.contains("\"color\""));
/// ```
#[derive(Default)]
pub struct LayoutBuilder {
    config: AppConfig,
}

impl LayoutBuilder {
    /// Create a new layout builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder runs with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON graph document and build the [`Graph`].
    ///
    /// # Errors
    ///
    /// Returns [`PermgraphError::Source`] for malformed JSON or records, and
    /// [`PermgraphError::Layout`] for duplicate ids or dangling edges.
    pub fn parse(&self, source: &str) -> Result<Graph, PermgraphError> {
        info!("Parsing graph document");

        let document = permgraph_source::parse(source)
            .map_err(|err| PermgraphError::new_source_error(err, source))?;
        let (nodes, edges) = document.into_parts();
        debug!(nodes = nodes.len(), edges = edges.len(); "Graph document parsed");

        let graph = Graph::build(nodes, edges)?;
        trace!(graph:?; "Built graph");

        Ok(graph)
    }

    /// Lay out `graph` with this builder's layout configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PermgraphError::Layout`] if the configuration is degenerate.
    pub fn layout(&self, graph: &Graph) -> Result<Layout, PermgraphError> {
        let layout = layout::layout(graph, self.config.layout())?;
        info!(
            nodes = layout.nodes().len(),
            ranks = layout.rank_count(),
            crossings = layout.crossings();
            "Layout calculated"
        );
        Ok(layout)
    }

    /// Export `layout` as a JSON string, with category colors from this
    /// builder's style configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PermgraphError::Export`] if a style color is invalid or the
    /// layout cannot be encoded.
    pub fn render_json(&self, layout: &Layout, pretty: bool) -> Result<String, PermgraphError> {
        let mut exporter = JsonBuilder::new(Vec::new())
            .with_style(self.config.style())
            .with_pretty(pretty)
            .build()?;
        exporter.export_layout(layout)?;

        let json = String::from_utf8(exporter.into_inner())
            .map_err(|err| export::Error::Render(err.to_string()))?;
        info!(bytes = json.len(); "JSON rendered successfully");
        Ok(json)
    }
}
