//! Nested delimiter-pair discovery.
//!
//! [`find_pairs`] scans a string once, left to right, and returns the
//! top-level matched delimiter pairs (quotes, parentheses, brackets, braces
//! by default), each carrying the pairs nested inside it. Backslash-escaped
//! delimiters never participate, and self-delimiting delimiters such as
//! quotes are disambiguated during the scan: an occurrence that cannot close
//! the innermost pending opener is reinterpreted as opening a new pair.
//!
//! This is the leaf dependency of the crate: the argument splitter refuses
//! to split inside spans reported here.

pub mod config;
pub mod finder;
pub mod pair;
pub(crate) mod scan;

pub use config::{PairConfig, PairRule, DEFAULT_IGNORE_INTERNAL, DEFAULT_PAIRS};
pub use finder::{find_pairs, find_pairs_with, PairingError};
pub use pair::Pair;
