//! Error types for permgraph operations.
//!
//! [`LayoutError`] covers the contract violations the layout engine rejects.
//! [`PermgraphError`] wraps everything that can go wrong between reading a
//! document and writing a finished layout.

use std::io;

use thiserror::Error;

use permgraph_source::error::SourceError;

use crate::export;

/// A contract violation detected while building a graph or starting a layout.
///
/// All variants are fatal to the call. No partial layout is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Two input nodes share an id.
    #[error("duplicate node id `{id}`")]
    DuplicateNode { id: String },

    /// An edge names a node id that is not in the node set.
    #[error("edge `{from}` -> `{to}` references unknown node `{missing}`")]
    DanglingEdge {
        from: String,
        to: String,
        missing: String,
    },

    /// A separation or size value is not a positive finite number.
    #[error("degenerate configuration: `{option}` must be positive and finite, got {value}")]
    DegenerateConfiguration { option: String, value: f32 },
}

/// The main error type for permgraph operations.
///
/// # Diagnostic Variants
///
/// The `Source` variant keeps the document text next to the diagnostics so
/// callers can point at the offending location.
#[derive(Debug, Error)]
pub enum PermgraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Source { err: SourceError, src: String },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),
}

impl PermgraphError {
    /// Create a new `Source` error with the associated document text.
    pub fn new_source_error(err: SourceError, src: impl Into<String>) -> Self {
        Self::Source {
            err,
            src: src.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_messages() {
        let duplicate = LayoutError::DuplicateNode { id: "admin".into() };
        assert_eq!(duplicate.to_string(), "duplicate node id `admin`");

        let dangling = LayoutError::DanglingEdge {
            from: "admin".into(),
            to: "X".into(),
            missing: "X".into(),
        };
        assert_eq!(
            dangling.to_string(),
            "edge `admin` -> `X` references unknown node `X`"
        );

        let degenerate = LayoutError::DegenerateConfiguration {
            option: "node_separation".into(),
            value: 0.0,
        };
        assert!(degenerate.to_string().contains("node_separation"));
    }

    #[test]
    fn test_layout_error_converts() {
        let err: PermgraphError = LayoutError::DuplicateNode { id: "a".into() }.into();
        assert_eq!(err.to_string(), "Layout error: duplicate node id `a`");
    }
}
