//! Escape-aware candidate scanning shared by the pair finder and the
//! argument splitter.
//!
//! Delimiter patterns are plain regexes; the backslash-escape rule is applied
//! here as a post-filter instead of being folded into every pattern, since
//! the regex engine offers no look-behind.

use regex::Regex;
use std::ops::Range;

/// Whether the character starting at byte `pos` is escaped, i.e. preceded by
/// an odd-length run of backslashes.
pub(crate) fn is_escaped(text: &str, pos: usize) -> bool {
    let mut backslashes = 0;
    for byte in text[..pos].bytes().rev() {
        if byte == b'\\' {
            backslashes += 1;
        } else {
            break;
        }
    }
    backslashes % 2 == 1
}

/// All non-escaped, non-empty matches of `pattern` in `text`, in position
/// order. Escaped occurrences are skipped without consuming the text they
/// cover, so a later pattern position can still match past them.
pub(crate) fn unescaped_matches(pattern: &Regex, text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut from = 0;
    while from <= text.len() {
        let Some(found) = pattern.find_at(text, from) else {
            break;
        };
        if found.start() == found.end() {
            // Zero-width match: step over one character to guarantee progress.
            match next_boundary(text, found.end()) {
                Some(next) => from = next,
                None => break,
            }
            continue;
        }
        if is_escaped(text, found.start()) {
            match next_boundary(text, found.start()) {
                Some(next) => from = next,
                None => break,
            }
        } else {
            spans.push(found.range());
            from = found.end();
        }
    }
    spans
}

/// The byte offset just past the character starting at `pos`, or `None` at
/// the end of the string.
fn next_boundary(text: &str, pos: usize) -> Option<usize> {
    text[pos..].chars().next().map(|c| pos + c.len_utf8())
}
