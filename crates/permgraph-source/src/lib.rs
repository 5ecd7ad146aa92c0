//! Reader for permission graph documents.
//!
//! A data source delivers a graph as JSON: a list of node records and a list
//! of edge records. [`parse`] reads such a document and rejects malformed
//! records before any layout work starts, reporting every problem it finds as
//! a [`Diagnostic`](error::Diagnostic).
//!
//! # Example
//!
//! ```
//! let source = r#"{
//!     "nodes": [
//!         {"id": "admin", "label": "Admin", "type": "role"},
//!         {"id": "doc", "label": "Document", "type": "resource"}
//!     ],
//!     "edges": [{"source": "admin", "target": "doc", "label": "manages"}]
//! }"#;
//!
//! let document = permgraph_source::parse(source).expect("valid document");
//! assert_eq!(document.nodes().len(), 2);
//! assert_eq!(document.edges().len(), 1);
//! ```

pub mod error;

mod document;
mod span;

pub use document::GraphDocument;
pub use span::Span;

use log::{debug, trace};
use serde::Deserialize;
use serde_json::{error::Category as JsonCategory, value::RawValue};

use error::{Diagnostic, ErrorCode, SourceError};

/// Parses a JSON graph document and checks every record for well-formedness.
///
/// This only checks records in isolation. Cross-record rules (unique ids,
/// edges naming known nodes) are enforced when the graph is built.
///
/// # Errors
///
/// Returns a [`SourceError`] carrying one diagnostic for invalid JSON or an
/// unexpected document structure, or one diagnostic per malformed record.
pub fn parse(source: &str) -> Result<GraphDocument, SourceError> {
    let document: GraphDocument =
        serde_json::from_str(source).map_err(|err| json_diagnostic(source, &err))?;

    trace!(document:?; "Decoded graph document");

    let diagnostics = validate_records(source, &document);
    if !diagnostics.is_empty() {
        debug!(errors = diagnostics.len(); "Rejected malformed records");
        return Err(SourceError::new(diagnostics));
    }

    debug!(
        nodes = document.nodes().len(),
        edges = document.edges().len();
        "Graph document parsed"
    );
    Ok(document)
}

fn json_diagnostic(source: &str, err: &serde_json::Error) -> Diagnostic {
    let code = match err.classify() {
        JsonCategory::Data => ErrorCode::E101,
        JsonCategory::Syntax | JsonCategory::Eof | JsonCategory::Io => ErrorCode::E100,
    };
    let span = Span::at_line_column(source, err.line(), err.column());
    let diag = Diagnostic::new(code, err.to_string()).with_label(span, code.description());

    match code {
        ErrorCode::E101 => diag.with_help(
            "nodes need a string `id`; edges need string `source` and `target` fields",
        ),
        _ => diag,
    }
}

/// The raw text of every node and edge element, borrowed from the source.
#[derive(Deserialize)]
struct RawRecords<'a> {
    #[serde(borrow, default)]
    nodes: Vec<&'a RawValue>,

    #[serde(borrow, default)]
    edges: Vec<&'a RawValue>,
}

#[derive(Debug, Clone, Copy)]
enum Element {
    Node(usize),
    Edge(usize),
}

fn validate_records(source: &str, document: &GraphDocument) -> Vec<Diagnostic> {
    let mut problems = Vec::new();

    for (idx, node) in document.nodes().iter().enumerate() {
        if node.id.trim().is_empty() {
            problems.push((
                Element::Node(idx),
                Diagnostic::new(ErrorCode::E200, format!("node #{idx} has an empty id"))
                    .with_help("every node needs a unique, non-empty id"),
            ));
        }
    }

    for (idx, edge) in document.edges().iter().enumerate() {
        for (end, value) in [("source", &edge.source), ("target", &edge.target)] {
            if value.trim().is_empty() {
                problems.push((
                    Element::Edge(idx),
                    Diagnostic::new(ErrorCode::E201, format!("edge #{idx} has an empty {end}"))
                        .with_help("edge endpoints must name node ids"),
                ));
            }
        }
    }

    if problems.is_empty() {
        return Vec::new();
    }

    // Diagnostics stay unlocated if the raw pass fails.
    let raw: Option<RawRecords> = serde_json::from_str(source).ok();
    problems
        .into_iter()
        .map(|(element, diag)| {
            let span = raw.as_ref().and_then(|raw| {
                let text = match element {
                    Element::Node(idx) => raw.nodes.get(idx),
                    Element::Edge(idx) => raw.edges.get(idx),
                }?;
                span_within(source, text.get())
            });
            match span {
                Some(span) => {
                    let label = diag.code().description();
                    diag.with_label(span, label)
                }
                None => diag,
            }
        })
        .collect()
}

/// Span of `part`, which must be a slice of `source`.
fn span_within(source: &str, part: &str) -> Option<Span> {
    let start = (part.as_ptr() as usize).checked_sub(source.as_ptr() as usize)?;
    let end = start + part.len();
    (end <= source.len()).then(|| Span::new(start..end))
}

#[cfg(test)]
mod tests {
    use permgraph_core::category::Category;

    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let document = parse(r#"{"nodes": [{"id": "a"}], "edges": []}"#).unwrap();
        assert_eq!(document.nodes().len(), 1);
        assert_eq!(document.nodes()[0].category, Category::Other);
        assert!(document.edges().is_empty());
    }

    #[test]
    fn test_parse_empty_object() {
        let document = parse("{}").unwrap();
        assert_eq!(document, GraphDocument::default());
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let document = parse(
            r#"{"nodes": [{"id": "a", "color": "red"}], "edges": [], "generatedAt": "now"}"#,
        )
        .unwrap();
        assert_eq!(document.nodes()[0].id, "a");
    }

    #[test]
    fn test_syntax_error_has_span() {
        let source = "{\"nodes\": [\n  {\"id\": \"a\"},,\n]}";
        let err = parse(source).unwrap_err();

        assert_eq!(err.diagnostics().len(), 1);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), ErrorCode::E100);
        let span = diag.span().expect("syntax errors carry a span");
        assert!(span.end() <= source.len());
        assert_eq!(span.len(), 1);
    }

    #[test]
    fn test_missing_id_is_data_error() {
        let err = parse(r#"{"nodes": [{"label": "no id"}]}"#).unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), ErrorCode::E101);
        assert!(diag.message().contains("id"));
        assert!(diag.help().is_some());
    }

    #[test]
    fn test_empty_ids_are_collected() {
        let source = r#"{
            "nodes": [{"id": ""}, {"id": "ok"}, {"id": "  "}],
            "edges": [{"source": "ok", "target": ""}]
        }"#;
        let err = parse(source).unwrap_err();
        let codes: Vec<ErrorCode> = err.diagnostics().iter().map(|d| d.code()).collect();

        assert_eq!(codes, vec![ErrorCode::E200, ErrorCode::E200, ErrorCode::E201]);
        assert_eq!(err.diagnostics()[0].message(), "node #0 has an empty id");
        assert_eq!(err.diagnostics()[1].message(), "node #2 has an empty id");
        assert_eq!(err.diagnostics()[2].message(), "edge #0 has an empty target");
    }

    #[test]
    fn test_record_diagnostics_point_at_the_record() {
        let source = r#"{"nodes": [{"id": "ok"}, {"id": ""}], "edges": [{"source": "", "target": "ok"}]}"#;
        let err = parse(source).unwrap_err();
        let located: Vec<&str> = err
            .diagnostics()
            .iter()
            .map(|d| {
                let span = d.span().expect("record diagnostics carry a span");
                &source[span.start()..span.end()]
            })
            .collect();

        assert_eq!(located, vec![r#"{"id": ""}"#, r#"{"source": "", "target": "ok"}"#]);
        assert_eq!(err.diagnostics()[0].label(), Some("node record without id"));
    }

    #[test]
    fn test_dangling_edges_are_not_rejected_here() {
        let document = parse(r#"{"nodes": [], "edges": [{"source": "a", "target": "b"}]}"#);
        assert!(document.is_ok());
    }
}
