//! The pair-finding scan.
//!
//! The scanner walks two position-ordered candidate streams, one of opener
//! matches and one of closer matches, against a stack of pending openers and
//! a stack of completed pairs:
//!
//! 1. Before each closer candidate, every opener candidate that begins no
//!    later than it is pushed onto the pending stack, except candidates that
//!    fall inside an open ignore-internal delimiter (the inside of a quote).
//! 2. The top pending opener is popped and must be closed by the candidate's
//!    pattern. On success the pair is completed, adopting any previously
//!    completed pairs its span contains.
//! 3. If the popped opener's own span contains the closer candidate, the
//!    candidate is really an opener (a quote seen from its front edge): the
//!    opener is pushed back and the candidate is dropped, since the same
//!    occurrence is already pending as a start. Any other mismatch is a
//!    pairing failure.
//!
//! Closer candidates inside an open ignore-internal delimiter are skipped
//! unless they close it, symmetric with step 1.
//!
//! Nesting is handled entirely by the two stacks, so scan depth is constant;
//! only the resulting [`Pair`] tree grows with nesting depth.

use std::fmt;
use std::ops::Range;

use log::{debug, trace};

use super::config::PairConfig;
use super::pair::Pair;
use super::scan::unescaped_matches;

/// Errors raised while balancing delimiters.
#[derive(Debug, Clone)]
pub enum PairingError {
    /// A configured pattern failed to compile.
    InvalidPattern {
        pattern: String,
        error: regex::Error,
    },
    /// A closer appeared with no opener pending.
    UnmatchedCloser {
        pattern: String,
        span: Range<usize>,
    },
    /// The innermost pending opener is not closed by this closer.
    MismatchedPair {
        open_pattern: String,
        open_span: Range<usize>,
        close_pattern: String,
        close_span: Range<usize>,
    },
    /// Openers were still pending when the scan ended.
    UnclosedPairs { open_spans: Vec<Range<usize>> },
}

impl fmt::Display for PairingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingError::InvalidPattern { pattern, error } => {
                write!(f, "invalid delimiter pattern '{}': {}", pattern, error)
            }
            PairingError::UnmatchedCloser { pattern, span } => {
                write!(
                    f,
                    "closer '{}' at {}..{} has no matching opener",
                    pattern, span.start, span.end
                )
            }
            PairingError::MismatchedPair {
                open_pattern,
                open_span,
                close_pattern,
                close_span,
            } => {
                write!(
                    f,
                    "opener '{}' at {}..{} is not closed by '{}' at {}..{}",
                    open_pattern,
                    open_span.start,
                    open_span.end,
                    close_pattern,
                    close_span.start,
                    close_span.end
                )
            }
            PairingError::UnclosedPairs { open_spans } => {
                write!(f, "{} opener(s) left unclosed at", open_spans.len())?;
                for span in open_spans {
                    write!(f, " {}..{}", span.start, span.end)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for PairingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PairingError::InvalidPattern { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// An opener occurrence waiting for its closer.
#[derive(Debug, Clone)]
struct StartCandidate {
    rule: usize,
    span: Range<usize>,
}

/// A closer occurrence, attributed to one distinct closing pattern.
#[derive(Debug)]
struct EndCandidate {
    pattern: usize,
    span: Range<usize>,
}

/// Find every top-level matched pair in `text` using the default delimiter
/// table (quotes, parentheses, brackets, braces).
pub fn find_pairs(text: &str) -> Result<Vec<Pair>, PairingError> {
    find_pairs_with(text, &PairConfig::default())
}

/// Find every top-level matched pair in `text` under `config`.
///
/// With `require_balanced` set (the default) any unbalanced delimiter is an
/// error; a lenient config instead returns the pairs completed before the
/// first failure.
pub fn find_pairs_with(text: &str, config: &PairConfig) -> Result<Vec<Pair>, PairingError> {
    let starts = collect_starts(text, config);
    let (close_sources, ends) = collect_ends(text, config);
    trace!(
        "pair scan over {} bytes: {} start candidates, {} end candidates",
        text.len(),
        starts.len(),
        ends.len()
    );

    let mut pending: Vec<StartCandidate> = Vec::new();
    let mut completed: Vec<Pair> = Vec::new();
    let mut next_start = 0;

    for end in &ends {
        push_pending_through(
            &starts,
            &mut next_start,
            end.span.start,
            &mut pending,
            config,
        );
        let close_src = close_sources[end.pattern];

        // Inside an open quote, only that quote's own closer counts.
        if let Some(top) = pending.last() {
            let top_rule = &config.rules[top.rule];
            if config.ignores_internal(&top_rule.open_src)
                && top.span.end <= end.span.start
                && top_rule.close_src != close_src
            {
                continue;
            }
        }

        let Some(top) = pending.pop() else {
            if config.require_balanced {
                return Err(PairingError::UnmatchedCloser {
                    pattern: close_src.to_string(),
                    span: end.span.clone(),
                });
            }
            return Ok(completed);
        };
        let rule = &config.rules[top.rule];

        if rule.close_src == close_src && top.span.end <= end.span.start {
            let pair = complete_pair(top.span.clone(), end.span.clone(), &mut completed);
            completed.push(pair);
        } else if span_contains(&top.span, &end.span) {
            // The closer candidate sits inside the opener's own text: the
            // occurrence is really an opener (self-delimiting quote) and is
            // already pending, so the candidate is dropped.
            pending.push(top);
        } else {
            if config.require_balanced {
                return Err(PairingError::MismatchedPair {
                    open_pattern: rule.open_src.clone(),
                    open_span: top.span.clone(),
                    close_pattern: close_src.to_string(),
                    close_span: end.span.clone(),
                });
            }
            return Ok(completed);
        }
    }

    // Trailing openers past the last closer still count toward balance.
    push_pending_through(&starts, &mut next_start, usize::MAX, &mut pending, config);

    if !pending.is_empty() {
        if config.require_balanced {
            return Err(PairingError::UnclosedPairs {
                open_spans: pending.iter().map(|s| s.span.clone()).collect(),
            });
        }
        return Ok(completed);
    }

    debug!("pair scan completed with {} top-level pair(s)", completed.len());
    Ok(completed)
}

/// Gather opener candidates for every rule, position-ordered, ties broken by
/// rule order.
fn collect_starts(text: &str, config: &PairConfig) -> Vec<StartCandidate> {
    let mut starts = Vec::new();
    for (rule, record) in config.rules.iter().enumerate() {
        for span in unescaped_matches(&record.open, text) {
            starts.push(StartCandidate { rule, span });
        }
    }
    starts.sort_by(|a, b| (a.span.start, a.rule).cmp(&(b.span.start, b.rule)));
    starts
}

/// Gather closer candidates per distinct closing pattern, position-ordered.
/// Returns the distinct pattern sources alongside so candidates can be
/// attributed back to them.
fn collect_ends<'a>(
    text: &str,
    config: &'a PairConfig,
) -> (Vec<&'a str>, Vec<EndCandidate>) {
    let mut close_sources: Vec<&'a str> = Vec::new();
    let mut close_regexes = Vec::new();
    for rule in &config.rules {
        if !close_sources.iter().any(|src| *src == rule.close_src) {
            close_sources.push(&rule.close_src);
            close_regexes.push(&rule.close);
        }
    }

    let mut ends = Vec::new();
    for (pattern, regex) in close_regexes.iter().enumerate() {
        for span in unescaped_matches(regex, text) {
            ends.push(EndCandidate { pattern, span });
        }
    }
    ends.sort_by(|a, b| (a.span.start, a.pattern).cmp(&(b.span.start, b.pattern)));
    (close_sources, ends)
}

/// Push opener candidates beginning no later than `limit`, skipping any that
/// fall inside an open ignore-internal delimiter.
fn push_pending_through(
    starts: &[StartCandidate],
    next_start: &mut usize,
    limit: usize,
    pending: &mut Vec<StartCandidate>,
    config: &PairConfig,
) {
    while *next_start < starts.len() && starts[*next_start].span.start <= limit {
        let candidate = &starts[*next_start];
        *next_start += 1;

        if let Some(top) = pending.last() {
            let top_rule = &config.rules[top.rule];
            if config.ignores_internal(&top_rule.open_src) && top.span.end <= candidate.span.start
            {
                continue;
            }
        }
        pending.push(candidate.clone());
    }
}

/// Build the completed pair and adopt previously completed pairs that its
/// span contains. Children complete strictly before their parent, so the
/// adoptees are exactly the tail of the completed stack.
fn complete_pair(start: Range<usize>, end: Range<usize>, completed: &mut Vec<Pair>) -> Pair {
    let mut pair = Pair::new(start, end);
    let outer = pair.outer_span();

    let mut adopted = Vec::new();
    while completed
        .last()
        .is_some_and(|child| span_contains(&outer, &child.outer_span()))
    {
        if let Some(child) = completed.pop() {
            adopted.push(child);
        }
    }
    adopted.reverse();
    pair.children = adopted;
    pair
}

fn span_contains(outer: &Range<usize>, inner: &Range<usize>) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}
