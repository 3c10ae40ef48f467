//! Recursive-descent compilation of token streams into [`Expression`] trees.
//!
//! Precedence, highest to lowest: negation, implicit adjacency, explicit
//! binary operators (left to right). The whole expression is parsed as if
//! wrapped in one synthetic top-level group so the three levels below stay
//! uniform. The grammar is fully predictive on the next token's kind, so no
//! backtracking is needed.

use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::expression::Expression;
use super::tokenizer::{tokenize_with, TokenKind, TokenizerConfig};

static DEFAULT_TRUE_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| vec![Regex::new("(?i)true").expect("default constant pattern is valid")]);

static DEFAULT_FALSE_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| vec![Regex::new("(?i)false").expect("default constant pattern is valid")]);

/// The binary combinator inserted between adjacent terms with no explicit
/// operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
}

impl BinaryOp {
    fn combine(self, left: Expression, right: Expression) -> Expression {
        match self {
            BinaryOp::And => Expression::and(vec![left, right]),
            BinaryOp::Or => Expression::or(vec![left, right]),
        }
    }
}

/// Errors raised while compiling an expression.
#[derive(Debug, Clone)]
pub enum CompileError {
    /// The tokenizer configuration has no grouping pairs; the compiler needs
    /// at least one to delimit its synthetic top-level scope.
    NoGroupPairs,
    /// An operand was expected but an operator, closer, or the end of the
    /// token stream was found. `position` is the token index.
    MissingOperand {
        found: Option<String>,
        position: usize,
    },
    /// Two terms are adjacent but implicit combination is disabled.
    MissingOperator { token: String, position: usize },
    /// The token stream ended before the group opened at `opened_at` found
    /// its closer.
    UnterminatedGroup { expected: char, opened_at: usize },
    /// A group closer appeared with no group open.
    UnmatchedGroupClose { token: String, position: usize },
    /// A constant-name pattern failed to compile.
    InvalidPattern {
        pattern: String,
        error: regex::Error,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::NoGroupPairs => {
                write!(f, "no grouping pairs configured")
            }
            CompileError::MissingOperand { found, position } => match found {
                Some(token) => write!(
                    f,
                    "expected an operand at token {} but found '{}'",
                    position, token
                ),
                None => write!(f, "expected an operand at token {} but the input ended", position),
            },
            CompileError::MissingOperator { token, position } => {
                write!(
                    f,
                    "term '{}' at token {} needs an explicit operator before it",
                    token, position
                )
            }
            CompileError::UnterminatedGroup { expected, opened_at } => {
                write!(
                    f,
                    "group opened at token {} is never closed by '{}'",
                    opened_at, expected
                )
            }
            CompileError::UnmatchedGroupClose { token, position } => {
                write!(f, "'{}' at token {} closes nothing", token, position)
            }
            CompileError::InvalidPattern { pattern, error } => {
                write!(f, "invalid constant pattern '{}': {}", pattern, error)
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::InvalidPattern { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Configuration for [`compile_with`].
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    tokenizer: TokenizerConfig,
    true_patterns: Vec<Regex>,
    false_patterns: Vec<Regex>,
    implicit: Option<BinaryOp>,
}

impl CompilerConfig {
    /// Replace the tokenizer configuration.
    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Replace the implicit binary operator inserted between adjacent terms
    /// (default: or). `None` requires an explicit operator between every
    /// pair of terms.
    pub fn with_implicit(mut self, implicit: Option<BinaryOp>) -> Self {
        self.implicit = implicit;
        self
    }

    /// Replace the ordered patterns recognized as the true constant
    /// (default: case-insensitive `true`). Patterns must match the whole
    /// token.
    pub fn with_true_names(mut self, patterns: &[&str]) -> Result<Self, CompileError> {
        self.true_patterns = compile_patterns(patterns)?;
        Ok(self)
    }

    /// Replace the ordered patterns recognized as the false constant
    /// (default: case-insensitive `false`).
    pub fn with_false_names(mut self, patterns: &[&str]) -> Result<Self, CompileError> {
        self.false_patterns = compile_patterns(patterns)?;
        Ok(self)
    }

    /// The tokenizer configuration in use.
    pub fn tokenizer(&self) -> &TokenizerConfig {
        &self.tokenizer
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            true_patterns: DEFAULT_TRUE_PATTERNS.clone(),
            false_patterns: DEFAULT_FALSE_PATTERNS.clone(),
            implicit: Some(BinaryOp::Or),
        }
    }
}

fn compile_patterns(patterns: &[&str]) -> Result<Vec<Regex>, CompileError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|error| CompileError::InvalidPattern {
                pattern: pattern.to_string(),
                error,
            })
        })
        .collect()
}

/// Whether any pattern matches the whole token.
fn full_match(patterns: &[Regex], token: &str) -> bool {
    patterns.iter().any(|pattern| {
        pattern
            .find(token)
            .is_some_and(|m| m.start() == 0 && m.end() == token.len())
    })
}

/// Compile `expression` with the default configuration.
pub fn compile(expression: &str) -> Result<Expression, CompileError> {
    compile_with(expression, &CompilerConfig::default())
}

/// Tokenize and compile `expression` under `config`.
pub fn compile_with(expression: &str, config: &CompilerConfig) -> Result<Expression, CompileError> {
    let tokens = tokenize_with(expression, &config.tokenizer);
    compile_tokens(&tokens, config)
}

/// Compile an already-tokenized expression under `config`.
pub fn compile_tokens(tokens: &[String], config: &CompilerConfig) -> Result<Expression, CompileError> {
    if config.tokenizer.group_pairs().is_empty() {
        return Err(CompileError::NoGroupPairs);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        config,
    };
    let expression = parser.parse_group(None, 0)?;
    debug!("compiled {} token(s) into {}", tokens.len(), expression);
    Ok(expression)
}

/// Cursor over the token stream, threaded through the three mutually
/// recursive levels of the grammar.
struct Parser<'a> {
    tokens: &'a [String],
    pos: usize,
    config: &'a CompilerConfig,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    /// `group ::= implicit_term ( (or_char | and_char) implicit_term )* group_end`
    ///
    /// `close` is the closer ending this scope, or `None` for the synthetic
    /// top-level scope ended by the end of the stream. Explicit operators
    /// combine left to right in one precedence tier, normalizing at every
    /// step.
    fn parse_group(
        &mut self,
        close: Option<char>,
        opened_at: usize,
    ) -> Result<Expression, CompileError> {
        let mut acc = self.parse_implicit()?;
        loop {
            let Some(token) = self.peek() else {
                return match close {
                    None => Ok(acc),
                    Some(expected) => Err(CompileError::UnterminatedGroup { expected, opened_at }),
                };
            };
            match self.config.tokenizer.token_kind(token) {
                TokenKind::GroupClose(c) if close == Some(c) => {
                    self.pos += 1;
                    return Ok(acc);
                }
                TokenKind::GroupClose(_) => {
                    return Err(CompileError::UnmatchedGroupClose {
                        token: token.to_string(),
                        position: self.pos,
                    });
                }
                TokenKind::And => {
                    self.pos += 1;
                    let rhs = self.parse_implicit()?;
                    acc = BinaryOp::And.combine(acc, rhs);
                }
                TokenKind::Or => {
                    self.pos += 1;
                    let rhs = self.parse_implicit()?;
                    acc = BinaryOp::Or.combine(acc, rhs);
                }
                // Reachable only with implicit combination disabled:
                // parse_implicit stops after a single term.
                TokenKind::Atom | TokenKind::GroupOpen(_) | TokenKind::Not => {
                    return Err(CompileError::MissingOperator {
                        token: token.to_string(),
                        position: self.pos,
                    });
                }
            }
        }
    }

    /// `implicit_term ::= unary+`, combined with the configured implicit
    /// operator. With implicit combination disabled this is exactly one
    /// unary.
    fn parse_implicit(&mut self) -> Result<Expression, CompileError> {
        let first = self.parse_unary()?;
        let Some(op) = self.config.implicit else {
            return Ok(first);
        };
        let mut acc = first;
        while let Some(token) = self.peek() {
            match self.config.tokenizer.token_kind(token) {
                TokenKind::Atom | TokenKind::GroupOpen(_) | TokenKind::Not => {
                    let next = self.parse_unary()?;
                    acc = op.combine(acc, next);
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    /// `unary ::= not_char unary | group_open group group_close | atom`
    fn parse_unary(&mut self) -> Result<Expression, CompileError> {
        let Some(token) = self.peek() else {
            return Err(CompileError::MissingOperand {
                found: None,
                position: self.pos,
            });
        };
        match self.config.tokenizer.token_kind(token) {
            TokenKind::Not => {
                self.pos += 1;
                Ok(Expression::Not(Box::new(self.parse_unary()?)))
            }
            TokenKind::GroupOpen(close) => {
                let opened_at = self.pos;
                self.pos += 1;
                self.parse_group(Some(close), opened_at)
            }
            TokenKind::GroupClose(_) | TokenKind::And | TokenKind::Or => {
                Err(CompileError::MissingOperand {
                    found: Some(token.to_string()),
                    position: self.pos,
                })
            }
            TokenKind::Atom => {
                self.pos += 1;
                Ok(self.atom(token))
            }
        }
    }

    /// Resolve an identifier token: quoted tokens become variables named by
    /// their literal content, unquoted tokens are checked against the true
    /// then false constant patterns before falling back to a variable.
    fn atom(&self, token: &str) -> Expression {
        if let Some(name) = self.config.tokenizer.strip_quotes(token) {
            return Expression::Variable(name);
        }
        if full_match(&self.config.true_patterns, token) {
            return Expression::Constant(true);
        }
        if full_match(&self.config.false_patterns, token) {
            return Expression::Constant(false);
        }
        Expression::Variable(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expression {
        Expression::Variable(name.to_string())
    }

    #[test]
    fn explicit_chain_flattens() {
        assert_eq!(
            compile("a & b & c").unwrap(),
            Expression::And(vec![var("a"), var("b"), var("c")])
        );
    }

    #[test]
    fn grouped_single_variable_collapses() {
        assert_eq!(compile("[a]").unwrap(), var("a"));
        assert_eq!(compile("[[a]]").unwrap(), var("a"));
        assert_eq!(compile("(a)").unwrap(), var("a"));
    }

    #[test]
    fn implicit_or_binds_tighter_than_explicit_and() {
        assert_eq!(
            compile("a b c&d e").unwrap(),
            Expression::And(vec![
                Expression::Or(vec![var("a"), var("b"), var("c")]),
                Expression::Or(vec![var("d"), var("e")]),
            ])
        );
    }

    #[test]
    fn negation_binds_tightest() {
        assert_eq!(
            compile("a !b [!c&d] e").unwrap(),
            Expression::Or(vec![
                var("a"),
                Expression::Not(Box::new(var("b"))),
                Expression::And(vec![Expression::Not(Box::new(var("c"))), var("d")]),
                var("e"),
            ])
        );
    }

    #[test]
    fn double_negation_nests() {
        assert_eq!(
            compile("!!a").unwrap(),
            Expression::Not(Box::new(Expression::Not(Box::new(var("a")))))
        );
    }

    #[test]
    fn mixed_explicit_operators_associate_left() {
        assert_eq!(
            compile("a | b & c").unwrap(),
            Expression::And(vec![Expression::Or(vec![var("a"), var("b")]), var("c")])
        );
    }

    #[test]
    fn constants_are_recognized_case_insensitively() {
        assert_eq!(compile("true").unwrap(), Expression::Constant(true));
        assert_eq!(compile("TRUE").unwrap(), Expression::Constant(true));
        assert_eq!(compile("False").unwrap(), Expression::Constant(false));
    }

    #[test]
    fn quoted_atoms_are_always_variables() {
        assert_eq!(compile("'true'").unwrap(), var("true"));
        assert_eq!(compile("'a&b'").unwrap(), var("a&b"));
        assert_eq!(compile("'a b' c").unwrap(), Expression::Or(vec![var("a b"), var("c")]));
    }

    #[test]
    fn implicit_operator_is_configurable() {
        let config = CompilerConfig::default().with_implicit(Some(BinaryOp::And));
        assert_eq!(
            compile_with("a b", &config).unwrap(),
            Expression::And(vec![var("a"), var("b")])
        );
    }

    #[test]
    fn disabled_implicit_requires_explicit_operators() {
        let config = CompilerConfig::default().with_implicit(None);
        assert_eq!(
            compile_with("a & b", &config).unwrap(),
            Expression::And(vec![var("a"), var("b")])
        );
        let err = compile_with("a b", &config).unwrap_err();
        assert!(matches!(err, CompileError::MissingOperator { .. }));
    }

    #[test]
    fn custom_constant_patterns() {
        let config = CompilerConfig::default()
            .with_true_names(&["(?i)yes", "on"])
            .unwrap()
            .with_false_names(&["(?i)no", "off"])
            .unwrap();
        assert_eq!(compile_with("YES", &config).unwrap(), Expression::Constant(true));
        assert_eq!(compile_with("off", &config).unwrap(), Expression::Constant(false));
        // Patterns must cover the whole token.
        assert_eq!(compile_with("onward", &config).unwrap(), var("onward"));
        // The old defaults no longer apply.
        assert_eq!(compile_with("true", &config).unwrap(), var("true"));
    }

    #[test]
    fn operator_without_left_operand_is_an_error() {
        let err = compile("& a").unwrap_err();
        assert!(matches!(
            err,
            CompileError::MissingOperand {
                found: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn trailing_operator_is_an_error() {
        let err = compile("a &").unwrap_err();
        assert!(matches!(err, CompileError::MissingOperand { found: None, .. }));
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = compile("").unwrap_err();
        assert!(matches!(err, CompileError::MissingOperand { found: None, .. }));
    }

    #[test]
    fn unterminated_group_is_an_error() {
        let err = compile("[a b").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnterminatedGroup { expected: ']', .. }
        ));
    }

    #[test]
    fn stray_group_close_is_an_error() {
        let err = compile("a ]").unwrap_err();
        assert!(matches!(err, CompileError::UnmatchedGroupClose { .. }));

        let err = compile("(a]").unwrap_err();
        assert!(matches!(err, CompileError::UnmatchedGroupClose { .. }));
    }

    #[test]
    fn empty_group_is_an_error() {
        let err = compile("[]").unwrap_err();
        assert!(matches!(
            err,
            CompileError::MissingOperand {
                found: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn missing_group_pairs_is_an_error() {
        let config = CompilerConfig::default()
            .with_tokenizer(TokenizerConfig::default().with_group_pairs(vec![]));
        let err = compile_with("a", &config).unwrap_err();
        assert!(matches!(err, CompileError::NoGroupPairs));
    }

    #[test]
    fn pre_tokenized_input_compiles() {
        let tokens: Vec<String> = ["a", "&", "b"].iter().map(|t| t.to_string()).collect();
        assert_eq!(
            compile_tokens(&tokens, &CompilerConfig::default()).unwrap(),
            Expression::And(vec![var("a"), var("b")])
        );
    }
}
