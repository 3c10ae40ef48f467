//! Delimiter-pair configuration.
//!
//! A [`PairConfig`] is an ordered list of open-pattern/close-pattern records
//! plus the set of openers that suppress internal candidates (quotes, by
//! default). Order matters: when two patterns match at the same position the
//! earlier rule wins, mirroring the first-match-wins lookup the defaults were
//! designed around.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::finder::PairingError;

/// Default delimiter table: double quote, single quote, parentheses,
/// square brackets, braces. Patterns are regex sources.
pub const DEFAULT_PAIRS: &[(&str, &str)] = &[
    ("\"", "\""),
    ("'", "'"),
    (r"\(", r"\)"),
    (r"\[", r"\]"),
    (r"\{", r"\}"),
];

/// Openers that hide internal pair candidates while open.
pub const DEFAULT_IGNORE_INTERNAL: &[&str] = &["\"", "'"];

static DEFAULT_CONFIG: Lazy<PairConfig> = Lazy::new(|| {
    PairConfig::new(DEFAULT_PAIRS)
        .expect("default pair patterns are valid")
        .with_ignore_internal(DEFAULT_IGNORE_INTERNAL.iter().map(|p| p.to_string()))
});

/// One opener/closer record. Patterns keep their source text so end matches
/// can be attributed back to the closing pattern that produced them.
#[derive(Debug, Clone)]
pub struct PairRule {
    pub(crate) open: Regex,
    pub(crate) close: Regex,
    pub(crate) open_src: String,
    pub(crate) close_src: String,
}

impl PairRule {
    pub fn new(open: &str, close: &str) -> Result<Self, PairingError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|error| PairingError::InvalidPattern {
                pattern: pattern.to_string(),
                error,
            })
        };
        Ok(Self {
            open: compile(open)?,
            close: compile(close)?,
            open_src: open.to_string(),
            close_src: close.to_string(),
        })
    }

    /// The opening pattern source.
    pub fn open_pattern(&self) -> &str {
        &self.open_src
    }

    /// The closing pattern source.
    pub fn close_pattern(&self) -> &str {
        &self.close_src
    }

    /// Whether the rule opens and closes with the same pattern (quotes).
    pub fn self_delimiting(&self) -> bool {
        self.open_src == self.close_src
    }
}

/// Configuration for a pair-finding scan.
#[derive(Debug, Clone)]
pub struct PairConfig {
    pub(crate) rules: Vec<PairRule>,
    pub(crate) ignore_internal: HashSet<String>,
    pub(crate) require_balanced: bool,
}

impl PairConfig {
    /// Build a configuration from ordered `(open, close)` regex sources.
    /// No openers are marked ignore-internal; see
    /// [`with_ignore_internal`](Self::with_ignore_internal).
    pub fn new(pairs: &[(&str, &str)]) -> Result<Self, PairingError> {
        let rules = pairs
            .iter()
            .map(|(open, close)| PairRule::new(open, close))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rules,
            ignore_internal: HashSet::new(),
            require_balanced: true,
        })
    }

    /// Mark openers (by opening-pattern source) whose interior hides other
    /// pair candidates while they are open.
    pub fn with_ignore_internal<I>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.ignore_internal = patterns.into_iter().collect();
        self
    }

    /// Return partial results instead of raising on unbalanced input.
    pub fn lenient(mut self) -> Self {
        self.require_balanced = false;
        self
    }

    /// Require fully balanced input (the default).
    pub fn strict(mut self) -> Self {
        self.require_balanced = true;
        self
    }

    /// The configured rules, in priority order.
    pub fn rules(&self) -> &[PairRule] {
        &self.rules
    }

    pub(crate) fn ignores_internal(&self, open_src: &str) -> bool {
        self.ignore_internal.contains(open_src)
    }
}

impl Default for PairConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}
