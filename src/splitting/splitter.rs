//! Pair-respecting argument splitting.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::pairing::config::{PairConfig, PairRule, DEFAULT_PAIRS};
use crate::pairing::finder::{find_pairs_with, PairingError};
use crate::pairing::scan::unescaped_matches;

static DEFAULT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("default separator pattern is valid"));

static DEFAULT_OUTER_STRIP: Lazy<Vec<PairRule>> = Lazy::new(|| {
    DEFAULT_PAIRS
        .iter()
        .map(|(open, close)| PairRule::new(open, close).expect("default pair patterns are valid"))
        .collect()
});

/// Errors raised while splitting.
#[derive(Debug, Clone)]
pub enum SplitError {
    /// The underlying pair scan failed.
    Pairing(PairingError),
    /// The separator pattern failed to compile.
    InvalidSeparator {
        pattern: String,
        error: regex::Error,
    },
    /// A token opens with a wrapper delimiter whose closer is missing or does
    /// not end exactly at the token boundary.
    DanglingWrapper {
        token: String,
        open_pattern: String,
        close_pattern: String,
    },
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::Pairing(error) => write!(f, "pair scan failed: {}", error),
            SplitError::InvalidSeparator { pattern, error } => {
                write!(f, "invalid separator pattern '{}': {}", pattern, error)
            }
            SplitError::DanglingWrapper {
                token,
                open_pattern,
                close_pattern,
            } => {
                write!(
                    f,
                    "token '{}' opens with '{}' but '{}' does not close it at the token end",
                    token, open_pattern, close_pattern
                )
            }
        }
    }
}

impl std::error::Error for SplitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SplitError::Pairing(error) => Some(error),
            SplitError::InvalidSeparator { error, .. } => Some(error),
            SplitError::DanglingWrapper { .. } => None,
        }
    }
}

impl From<PairingError> for SplitError {
    fn from(error: PairingError) -> Self {
        SplitError::Pairing(error)
    }
}

/// Configuration for [`argument_split_with`].
#[derive(Debug, Clone)]
pub struct SplitConfig {
    separator: Regex,
    pairs: PairConfig,
    outer_strip: Vec<PairRule>,
    drop_empty: bool,
    unescape: Option<char>,
}

impl SplitConfig {
    /// Replace the separator pattern (default: one or more whitespace
    /// characters).
    pub fn with_separator(mut self, pattern: &str) -> Result<Self, SplitError> {
        self.separator = Regex::new(pattern).map_err(|error| SplitError::InvalidSeparator {
            pattern: pattern.to_string(),
            error,
        })?;
        Ok(self)
    }

    /// Replace the pair configuration used to protect spans from splitting.
    pub fn with_pairs(mut self, pairs: PairConfig) -> Self {
        self.pairs = pairs;
        self
    }

    /// Replace the wrapper table used for outer-pair stripping. An empty
    /// table disables stripping.
    pub fn with_outer_strip(mut self, pairs: &[(&str, &str)]) -> Result<Self, SplitError> {
        self.outer_strip = pairs
            .iter()
            .map(|(open, close)| PairRule::new(open, close))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self)
    }

    /// Whether empty tokens are dropped from the result (default: true).
    pub fn with_drop_empty(mut self, drop_empty: bool) -> Self {
        self.drop_empty = drop_empty;
        self
    }

    /// The escape character removed one level deep from each token, or
    /// `None` to leave tokens as-is (default: backslash).
    pub fn with_unescape(mut self, unescape: Option<char>) -> Self {
        self.unescape = unescape;
        self
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.clone(),
            pairs: PairConfig::default(),
            outer_strip: DEFAULT_OUTER_STRIP.clone(),
            drop_empty: true,
            unescape: Some('\\'),
        }
    }
}

/// Split `text` on whitespace runs, refusing to split inside matched pairs,
/// then strip one outer wrapper layer and one escape level per token.
pub fn argument_split(text: &str) -> Result<Vec<String>, SplitError> {
    argument_split_with(text, &SplitConfig::default())
}

/// Split `text` under `config`.
///
/// Separator occurrences whose span falls entirely inside a top-level
/// matched pair are not split points; nested pairs are covered transitively
/// because the outer span already protects their interior.
pub fn argument_split_with(text: &str, config: &SplitConfig) -> Result<Vec<String>, SplitError> {
    let pairs = find_pairs_with(text, &config.pairs)?;

    let split_points: Vec<_> = config
        .separator
        .find_iter(text)
        .map(|m| m.range())
        .filter(|span| !pairs.iter().any(|pair| pair.contains(span)))
        .collect();

    let mut raw = Vec::with_capacity(split_points.len() + 1);
    let mut cursor = 0;
    for span in &split_points {
        raw.push(&text[cursor..span.start]);
        cursor = span.end;
    }
    raw.push(&text[cursor..]);

    let mut tokens = Vec::with_capacity(raw.len());
    for piece in raw {
        let stripped = match strip_outer(piece, &config.outer_strip)? {
            Some(inner) => inner,
            None => piece.to_string(),
        };
        let token = match config.unescape {
            Some(escape) => unescape(&stripped, escape),
            None => stripped,
        };
        if config.drop_empty && token.is_empty() {
            continue;
        }
        tokens.push(token);
    }
    Ok(tokens)
}

/// Remove one wrapper layer from `token` if it begins with a configured
/// opening pattern. The first rule whose opener matches at the token start
/// applies; its closing pattern's last occurrence must end exactly at the
/// token end.
fn strip_outer(token: &str, rules: &[PairRule]) -> Result<Option<String>, SplitError> {
    for rule in rules {
        let opens = unescaped_matches(&rule.open, token);
        let Some(first) = opens.first() else {
            continue;
        };
        if first.start != 0 {
            continue;
        }

        let closes: Vec<_> = unescaped_matches(&rule.close, token)
            .into_iter()
            .filter(|span| span.start >= first.end)
            .collect();
        let Some(last) = closes.last() else {
            return Err(SplitError::DanglingWrapper {
                token: token.to_string(),
                open_pattern: rule.open_pattern().to_string(),
                close_pattern: rule.close_pattern().to_string(),
            });
        };
        if last.end != token.len() {
            return Err(SplitError::DanglingWrapper {
                token: token.to_string(),
                open_pattern: rule.open_pattern().to_string(),
                close_pattern: rule.close_pattern().to_string(),
            });
        }
        return Ok(Some(token[first.end..last.start].to_string()));
    }
    Ok(None)
}

/// Remove one level of escaping: every `escape` character is dropped and the
/// character after it kept literally. A trailing escape is kept as-is.
fn unescape(token: &str, escape: char) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == escape {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}
