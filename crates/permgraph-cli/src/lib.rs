//! CLI logic for the permgraph layout tool.
//!
//! Reads a JSON graph document, lays it out and writes the positioned result
//! as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use permgraph::{LayoutBuilder, PermgraphError};

/// What one run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub nodes: usize,
    pub ranks: usize,
    pub crossings: usize,
    pub back_edges: usize,
}

/// Run the permgraph CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `PermgraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed graph documents
/// - Layout errors
/// - Export errors
pub fn run(args: &Args) -> Result<Summary, PermgraphError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing graph"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = LayoutBuilder::new(app_config);
    let graph = builder.parse(&source)?;
    let layout = builder.layout(&graph)?;
    let json = builder.render_json(&layout, args.pretty)?;

    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(Summary {
        nodes: layout.nodes().len(),
        ranks: layout.rank_count(),
        crossings: layout.crossings(),
        back_edges: layout.back_edges().len(),
    })
}
