//! The diagnostic type for reporting problems in a graph document.

use std::fmt;

use crate::{error::ErrorCode, span::Span};

/// A single problem found in a graph document.
///
/// # Example
///
/// ```text
/// error[E100]: expected `,` or `]` at line 3 column 5
///   |
/// 3 |     oops
///   |     ^ here
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    code: ErrorCode,
    message: String,
    span: Option<Span>,
    label: Option<String>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the given code and message.
    ///
    /// # Example
    ///
    /// ```
    /// # use permgraph_source::{Span, error::{Diagnostic, ErrorCode}};
    /// let diag = Diagnostic::new(ErrorCode::E200, "node #3 has an empty id")
    ///     .with_help("every node needs a unique, non-empty id");
    /// assert_eq!(diag.to_string(), "error[E200]: node #3 has an empty id");
    /// ```
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span: None,
            label: None,
            help: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source location, if known.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Get the text attached to the source location, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Attach a labelled source location.
    pub fn with_label(mut self, span: Span, label: impl Into<String>) -> Self {
        self.span = Some(span);
        self.label = Some(label.into());
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(ErrorCode::E101, "missing field `nodes`");

        assert_eq!(diag.code(), ErrorCode::E101);
        assert_eq!(diag.message(), "missing field `nodes`");
        assert!(diag.span().is_none());
        assert!(diag.label().is_none());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::new(ErrorCode::E100, "trailing comma")
            .with_label(Span::new(10..11), "here")
            .with_help("remove the comma");

        assert_eq!(diag.span(), Some(Span::new(10..11)));
        assert_eq!(diag.label(), Some("here"));
        assert_eq!(diag.help(), Some("remove the comma"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(ErrorCode::E201, "edge #0 has an empty target");
        assert_eq!(diag.to_string(), "error[E201]: edge #0 has an empty target");
    }
}
