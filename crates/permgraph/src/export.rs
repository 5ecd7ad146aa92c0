//! Export of finished layouts for the rendering side.
//!
//! A [`Layout`] holds geometry only. Exporters add what a renderer needs on
//! top of it, such as the color of every node, and write the result out.
//!
//! # Available Backends
//!
//! - [`json`] - JSON output via [`json::JsonBuilder`] and [`json::JsonExporter`]

/// JSON export backend.
pub mod json;

use std::io;

use thiserror::Error;

use crate::layout::Layout;

/// Abstraction for layout export backends.
pub trait Exporter {
    /// Writes `layout` in the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the layout cannot be encoded, or
    /// [`Error::Io`] if writing the output fails.
    fn export_layout(&mut self, layout: &Layout) -> Result<(), Error>;
}

/// Errors that can occur while exporting a layout.
#[derive(Debug, Error)]
pub enum Error {
    /// The exporter could not be set up, e.g. a style color does not parse.
    #[error("Render error: {0}")]
    Render(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
