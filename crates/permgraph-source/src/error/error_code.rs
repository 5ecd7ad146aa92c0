//! Stable error codes for document diagnostics.

use std::fmt;

/// Error codes reported by the document reader.
///
/// - `E1xx`: the document is not valid JSON or does not have the expected shape
/// - `E2xx`: a record is well-typed but malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Invalid JSON syntax.
    E100,
    /// JSON is valid but a value has the wrong type or a required field is missing.
    E101,
    /// A node record has an empty id.
    E200,
    /// An edge record has an empty source or target.
    E201,
}

impl ErrorCode {
    /// Short human-readable description of this error code.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E100 => "invalid JSON syntax",
            ErrorCode::E101 => "unexpected document structure",
            ErrorCode::E200 => "node record without id",
            ErrorCode::E201 => "edge record without endpoint",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
