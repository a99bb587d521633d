use serde::Serialize;

/// Byte range into SPL query text. Start is inclusive, end is exclusive.
///
/// Offsets are bytes into the original UTF-8 query string. Token and
/// stage spans always fall on character boundaries because the lexer
/// only splits at ASCII structural characters. Line numbers are not
/// tracked here; the risky-command detector derives them from offsets
/// when it builds a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a span from byte offsets.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "inverted span {start}..{end}");
        Self { start, end }
    }

    /// A zero-length span at the given offset, for positions with no
    /// text of their own, like the command slot of an implicit leading
    /// search stage.
    pub fn point(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span covers no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The smallest span covering this span and another. Stage spans
    /// are built by covering a stage's first and last token.
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Whether this span fully contains another span.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Slice the covered text out of the query string.
    ///
    /// # Panics
    ///
    /// Panics if the span is out of bounds or not on UTF-8 boundaries.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.start as usize..self.end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_emptiness() {
        assert_eq!(Span::new(13, 18).len(), 5);
        assert!(!Span::new(13, 18).is_empty());
        assert!(Span::point(13).is_empty());
        assert_eq!(Span::point(13), Span::new(13, 13));
    }

    #[test]
    fn cover_spans_a_whole_stage() {
        // "iplocation" and "clientip" tokens of the same stage.
        let command = Span::new(13, 23);
        let argument = Span::new(24, 32);
        assert_eq!(command.cover(argument), Span::new(13, 32));
        // Covering is symmetric.
        assert_eq!(argument.cover(command), Span::new(13, 32));
    }

    #[test]
    fn containment() {
        let stage = Span::new(13, 32);
        assert!(stage.contains(Span::new(24, 32)));
        assert!(stage.contains(stage));
        assert!(!Span::new(24, 32).contains(stage));
    }

    #[test]
    fn text_slices_the_query() {
        let src = "index=main | stats count by host";
        assert_eq!(Span::new(13, 18).text(src), "stats");
        assert_eq!(Span::point(13).text(src), "");
    }
}
