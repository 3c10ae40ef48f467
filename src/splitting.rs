//! Argument splitting built on top of the pair finder.
//!
//! [`argument_split`] behaves like a whitespace split, except that separator
//! occurrences inside matched pairs are kept intact, and tokens are cleaned
//! up afterwards: one outer quote/bracket layer stripped, one escape level
//! removed, empty tokens dropped.

pub mod splitter;

pub use splitter::{argument_split, argument_split_with, SplitConfig, SplitError};
