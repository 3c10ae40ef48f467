//! # pairlex
//!
//! Pair-aware lexical utilities: nested delimiter-pair discovery, splitting
//! that refuses to cut inside matched pairs, and a small boolean-expression
//! compiler with an evaluating tree.
//!
//! The three layers, in dependency order:
//!
//! 1. [`pairing`] scans a string once and reports every matched delimiter
//!    pair (quotes, parentheses, brackets, braces by default) with its
//!    nested children, handling escapes and self-delimiting quotes.
//! 2. [`splitting`] splits on a separator pattern while keeping matched
//!    pairs intact, then strips wrappers and escapes from the tokens.
//! 3. [`booleans`] tokenizes and compiles expressions such as
//!    `a !b [c & d]` into a tree evaluated against a set of true names.
//!
//! Everything is a pure function over immutable inputs: no I/O, no shared
//! state, safe to call concurrently. Deeply nested expressions recurse
//! proportionally to their nesting depth when compiled, displayed, or
//! evaluated; the pair scan itself runs on explicit stacks and does not.

pub mod booleans;
pub mod config;
pub mod pairing;
pub mod splitting;

pub use booleans::{
    compile, compile_tokens, compile_with, tokenize, tokenize_with, BinaryOp, CompileError,
    CompilerConfig, Expression, TokenizerConfig,
};
pub use config::{ConfigError, FileConfig};
pub use pairing::{find_pairs, find_pairs_with, Pair, PairConfig, PairingError};
pub use splitting::{argument_split, argument_split_with, SplitConfig, SplitError};
