//! Byte ranges into a source document.

use std::ops::Range;

/// A half-open byte range `start..end` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span from a byte range.
    ///
    /// # Examples
    ///
    /// ```
    /// # use permgraph_source::Span;
    /// let span = Span::new(4..9);
    /// assert_eq!(span.start(), 4);
    /// assert_eq!(span.len(), 5);
    /// ```
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Returns the span covering the character at 1-based `line` and `column`.
    ///
    /// Positions past the end of `source` are clamped to its last byte.
    pub fn at_line_column(source: &str, line: usize, column: usize) -> Self {
        let line_start: usize = source
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        let offset = (line_start + column.saturating_sub(1)).min(source.len().saturating_sub(1));
        let end = (offset + 1).min(source.len());
        Self::new(offset..end)
    }

    pub fn start(self) -> usize {
        self.start
    }

    pub fn end(self) -> usize {
        self.end
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_new_orders_bounds() {
        let span = Span::new(10..4);
        assert_eq!(span.start(), 10);
        assert!(span.is_empty());
    }

    #[test]
    fn test_at_line_column_first_line() {
        let span = Span::at_line_column("{\"nodes\": x}", 1, 11);
        assert_eq!(span, Span::new(10..11));
    }

    #[test]
    fn test_at_line_column_later_line() {
        let source = "{\n  \"nodes\": [\n    oops\n  ]\n}";
        let span = Span::at_line_column(source, 3, 5);
        assert_eq!(&source[span.start()..span.end()], "o");
    }

    #[test]
    fn test_at_line_column_clamps() {
        let span = Span::at_line_column("{}", 9, 40);
        assert_eq!(span, Span::new(1..2));

        let empty = Span::at_line_column("", 1, 1);
        assert!(empty.is_empty());
    }
}
