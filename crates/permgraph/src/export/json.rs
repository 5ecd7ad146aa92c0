//! JSON export.
//!
//! The document mirrors [`Layout`], with two additions for renderers: every
//! node carries the CSS color of its category, and every edge carries its
//! `"{source}-{target}"` id and whether it was reversed to break a cycle.

use std::io::Write;

use log::{debug, info};
use serde::Serialize;

use permgraph_core::{category::Category, color::Color};

use super::{Error, Exporter};
use crate::{
    config::StyleConfig,
    layout::{Layout, PositionedNode},
    structure::Edge,
};

/// Category color lookup, resolved once from a [`StyleConfig`].
#[derive(Debug, Clone)]
struct Palette {
    colors: [Color; Category::ALL.len()],
}

impl Palette {
    fn from_style(style: &StyleConfig) -> Result<Self, Error> {
        let mut colors = [Color::default(); Category::ALL.len()];
        for category in Category::ALL {
            colors[category.index()] = style.color_for(category).map_err(Error::Render)?;
        }
        Ok(Self { colors })
    }

    fn color(&self, category: Category) -> Color {
        self.colors[category.index()]
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Document<'a> {
    nodes: Vec<RenderedNode<'a>>,
    edges: Vec<RenderedEdge<'a>>,
    crossings: usize,
    width: f32,
    height: f32,
}

#[derive(Serialize)]
struct RenderedNode<'a> {
    #[serde(flatten)]
    node: &'a PositionedNode,
    color: Color,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderedEdge<'a> {
    id: String,
    #[serde(flatten)]
    edge: &'a Edge,
    back_edge: bool,
}

/// Builder for [`JsonExporter`].
///
/// # Examples
///
/// ```
/// use permgraph::{config::StyleConfig, export::json::JsonBuilder};
///
/// let exporter = JsonBuilder::new(Vec::new())
///     .with_style(&StyleConfig::default())
///     .with_pretty(true)
///     .build()
///     .unwrap();
/// ```
pub struct JsonBuilder<'a, W: Write> {
    writer: W,
    style: Option<&'a StyleConfig>,
    pretty: bool,
}

impl<'a, W: Write> JsonBuilder<'a, W> {
    /// Creates a builder that will write to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            style: None,
            pretty: false,
        }
    }

    /// Sets the style whose category colors are written out.
    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// Indents the output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Resolves the palette and creates the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a configured color cannot be parsed.
    pub fn build(self) -> Result<JsonExporter<W>, Error> {
        let palette = match self.style {
            Some(style) => Palette::from_style(style)?,
            None => Palette::from_style(&StyleConfig::default())?,
        };
        Ok(JsonExporter {
            writer: self.writer,
            palette,
            pretty: self.pretty,
        })
    }
}

/// Writes layouts as JSON documents.
pub struct JsonExporter<W: Write> {
    writer: W,
    palette: Palette,
    pretty: bool,
}

impl<W: Write> JsonExporter<W> {
    /// Consumes the exporter and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn document<'a>(&self, layout: &'a Layout) -> Document<'a> {
        Document {
            nodes: layout
                .nodes()
                .iter()
                .map(|node| RenderedNode {
                    node,
                    color: self.palette.color(node.category()),
                })
                .collect(),
            edges: layout
                .edges()
                .iter()
                .enumerate()
                .map(|(idx, edge)| RenderedEdge {
                    id: edge.key(),
                    edge,
                    back_edge: layout.is_back_edge(idx),
                })
                .collect(),
            crossings: layout.crossings(),
            width: layout.width(),
            height: layout.height(),
        }
    }
}

impl<W: Write> Exporter for JsonExporter<W> {
    fn export_layout(&mut self, layout: &Layout) -> Result<(), Error> {
        info!(nodes = layout.nodes().len(), edges = layout.edges().len(); "Exporting layout as JSON");

        let document = self.document(layout);
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &document)?;
        } else {
            serde_json::to_writer(&mut self.writer, &document)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        debug!(pretty = self.pretty; "JSON written");
        Ok(())
    }
}
