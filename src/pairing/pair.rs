//! The matched-pair data structure produced by the finder.

use serde::Serialize;
use std::ops::Range;

/// One matched delimiter pair.
///
/// `start` and `end` are the byte spans of the opening and closing delimiter
/// text inside the scanned string. `children` holds the pairs nested directly
/// inside this one, ordered by position; deeper nesting is reached through
/// the children's own children.
///
/// Invariant: `start.start < start.end <= end.start < end.end`, and every
/// child's combined span lies strictly between `start` and `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pair {
    /// Span of the opening delimiter text.
    pub start: Range<usize>,
    /// Span of the closing delimiter text.
    pub end: Range<usize>,
    /// Pairs nested directly inside this one, in position order.
    pub children: Vec<Pair>,
}

impl Pair {
    pub(crate) fn new(start: Range<usize>, end: Range<usize>) -> Self {
        Self {
            start,
            end,
            children: Vec::new(),
        }
    }

    /// The combined span from the first byte of the opening delimiter to the
    /// last byte of the closing delimiter.
    pub fn outer_span(&self) -> Range<usize> {
        self.start.start..self.end.end
    }

    /// The span between the delimiters, excluding the delimiter text itself.
    pub fn inner_span(&self) -> Range<usize> {
        self.start.end..self.end.start
    }

    /// Whether `span` falls entirely within this pair's combined span.
    pub fn contains(&self, span: &Range<usize>) -> bool {
        self.start.start <= span.start && span.end <= self.end.end
    }

    /// Slice of `source` covered by the combined span, delimiters included.
    pub fn outer_text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.outer_span()]
    }

    /// Slice of `source` between the delimiters.
    pub fn inner_text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.inner_span()]
    }
}
