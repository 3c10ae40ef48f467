//! File-based configuration presets.
//!
//! The library's configuration surfaces (delimiter tables, separator
//! pattern, operator characters, constant names) can be described in a YAML
//! document and turned into the corresponding config values. The CLI loads
//! these with `--config`; library callers can use [`FileConfig::parse`]
//! directly. Fields left out of the document keep their built-in defaults.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::booleans::{BinaryOp, CompileError, CompilerConfig, TokenizerConfig};
use crate::pairing::{PairConfig, PairingError};
use crate::splitting::{SplitConfig, SplitError};

/// A delimiter pair given as regex sources.
#[derive(Debug, Clone, Deserialize)]
pub struct PairSpec {
    pub open: String,
    pub close: String,
}

/// A delimiter pair given as single characters (grouping and quoting in the
/// expression tokenizer).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CharPairSpec {
    pub open: char,
    pub close: char,
}

/// Errors raised while loading or applying a configuration document.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
    Yaml(serde_yaml::Error),
    Pairing(PairingError),
    Split(SplitError),
    Compile(CompileError),
    /// `implicit` must be `or`, `and`, or `none`.
    InvalidImplicit(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, error } => {
                write!(f, "cannot read config '{}': {}", path.display(), error)
            }
            ConfigError::Yaml(error) => write!(f, "malformed config: {}", error),
            ConfigError::Pairing(error) => write!(f, "config rejected: {}", error),
            ConfigError::Split(error) => write!(f, "config rejected: {}", error),
            ConfigError::Compile(error) => write!(f, "config rejected: {}", error),
            ConfigError::InvalidImplicit(value) => {
                write!(f, "implicit must be 'or', 'and', or 'none', not '{}'", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { error, .. } => Some(error),
            ConfigError::Yaml(error) => Some(error),
            ConfigError::Pairing(error) => Some(error),
            ConfigError::Split(error) => Some(error),
            ConfigError::Compile(error) => Some(error),
            ConfigError::InvalidImplicit(_) => None,
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(error: serde_yaml::Error) -> Self {
        ConfigError::Yaml(error)
    }
}

impl From<PairingError> for ConfigError {
    fn from(error: PairingError) -> Self {
        ConfigError::Pairing(error)
    }
}

impl From<SplitError> for ConfigError {
    fn from(error: SplitError) -> Self {
        ConfigError::Split(error)
    }
}

impl From<CompileError> for ConfigError {
    fn from(error: CompileError) -> Self {
        ConfigError::Compile(error)
    }
}

/// A configuration document. Every field is optional; absent fields keep
/// the library defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Delimiter pairs for the pair finder, in priority order.
    pub pairs: Option<Vec<PairSpec>>,
    /// Opening patterns whose interior hides other candidates.
    pub ignore_internal: Option<Vec<String>>,
    /// Whether unbalanced input is an error.
    pub require_balanced: Option<bool>,
    /// Separator pattern for the argument splitter.
    pub separator: Option<String>,
    /// Whether empty tokens are dropped.
    pub drop_empty: Option<bool>,
    /// Wrapper table for outer-pair stripping; an empty list disables it.
    pub outer_strip: Option<Vec<PairSpec>>,
    /// Grouping pairs for the expression tokenizer.
    pub group_pairs: Option<Vec<CharPairSpec>>,
    /// Negation characters.
    pub not_chars: Option<Vec<char>>,
    /// Conjunction characters.
    pub and_chars: Option<Vec<char>>,
    /// Disjunction characters.
    pub or_chars: Option<Vec<char>>,
    /// Quote pairs for literal tokens.
    pub quote_pairs: Option<Vec<CharPairSpec>>,
    /// Patterns recognized as the true constant.
    pub true_names: Option<Vec<String>>,
    /// Patterns recognized as the false constant.
    pub false_names: Option<Vec<String>>,
    /// Implicit binary operator: `or`, `and`, or `none`.
    pub implicit: Option<String>,
}

impl FileConfig {
    /// Read and parse a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::parse(&text)
    }

    /// Parse a YAML configuration document.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// The pair-finder configuration described by this document.
    ///
    /// A custom `pairs` table starts with no ignore-internal openers;
    /// list them explicitly in `ignore_internal`.
    pub fn pair_config(&self) -> Result<PairConfig, ConfigError> {
        let mut config = match &self.pairs {
            None => PairConfig::default(),
            Some(specs) => {
                let pairs: Vec<(&str, &str)> = specs
                    .iter()
                    .map(|spec| (spec.open.as_str(), spec.close.as_str()))
                    .collect();
                PairConfig::new(&pairs)?
            }
        };
        if let Some(ignore) = &self.ignore_internal {
            config = config.with_ignore_internal(ignore.iter().cloned());
        }
        if let Some(strict) = self.require_balanced {
            config = if strict {
                config.strict()
            } else {
                config.lenient()
            };
        }
        Ok(config)
    }

    /// The splitter configuration described by this document.
    pub fn split_config(&self) -> Result<SplitConfig, ConfigError> {
        let mut config = SplitConfig::default().with_pairs(self.pair_config()?);
        if let Some(separator) = &self.separator {
            config = config.with_separator(separator)?;
        }
        if let Some(drop_empty) = self.drop_empty {
            config = config.with_drop_empty(drop_empty);
        }
        if let Some(strip) = &self.outer_strip {
            let pairs: Vec<(&str, &str)> = strip
                .iter()
                .map(|spec| (spec.open.as_str(), spec.close.as_str()))
                .collect();
            config = config.with_outer_strip(&pairs)?;
        }
        Ok(config)
    }

    /// The expression-tokenizer configuration described by this document.
    pub fn tokenizer_config(&self) -> TokenizerConfig {
        let mut config = TokenizerConfig::default();
        if let Some(groups) = &self.group_pairs {
            config = config.with_group_pairs(groups.iter().map(|p| (p.open, p.close)).collect());
        }
        if let Some(chars) = &self.not_chars {
            config = config.with_not_chars(chars.iter().copied());
        }
        if let Some(chars) = &self.and_chars {
            config = config.with_and_chars(chars.iter().copied());
        }
        if let Some(chars) = &self.or_chars {
            config = config.with_or_chars(chars.iter().copied());
        }
        if let Some(quotes) = &self.quote_pairs {
            config = config.with_quote_pairs(quotes.iter().map(|p| (p.open, p.close)).collect());
        }
        config
    }

    /// The compiler configuration described by this document.
    pub fn compiler_config(&self) -> Result<CompilerConfig, ConfigError> {
        let mut config = CompilerConfig::default().with_tokenizer(self.tokenizer_config());
        if let Some(names) = &self.true_names {
            let patterns: Vec<&str> = names.iter().map(String::as_str).collect();
            config = config.with_true_names(&patterns)?;
        }
        if let Some(names) = &self.false_names {
            let patterns: Vec<&str> = names.iter().map(String::as_str).collect();
            config = config.with_false_names(&patterns)?;
        }
        if let Some(implicit) = &self.implicit {
            let op = match implicit.as_str() {
                "or" => Some(BinaryOp::Or),
                "and" => Some(BinaryOp::And),
                "none" => None,
                other => return Err(ConfigError::InvalidImplicit(other.to_string())),
            };
            config = config.with_implicit(op);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booleans::compile_with;
    use crate::booleans::Expression;
    use crate::splitting::argument_split_with;

    #[test]
    fn empty_document_keeps_defaults() {
        let config = FileConfig::parse("{}").unwrap();
        let split = config.split_config().unwrap();
        assert_eq!(
            argument_split_with("a \"b c\"", &split).unwrap(),
            vec!["a", "b c"]
        );
    }

    #[test]
    fn custom_separator_and_operators() {
        let doc = r#"
separator: ","
and_chars: ["+"]
implicit: "and"
"#;
        let config = FileConfig::parse(doc).unwrap();

        let split = config.split_config().unwrap();
        assert_eq!(
            argument_split_with("a,b c", &split).unwrap(),
            vec!["a", "b c"]
        );

        let compiler = config.compiler_config().unwrap();
        assert_eq!(
            compile_with("x y", &compiler).unwrap(),
            Expression::And(vec![
                Expression::Variable("x".into()),
                Expression::Variable("y".into()),
            ])
        );
    }

    #[test]
    fn custom_constant_names() {
        let doc = r#"
true_names: ["(?i)yes"]
false_names: ["(?i)no"]
"#;
        let compiler = FileConfig::parse(doc).unwrap().compiler_config().unwrap();
        assert_eq!(
            compile_with("Yes", &compiler).unwrap(),
            Expression::Constant(true)
        );
        assert_eq!(
            compile_with("true", &compiler).unwrap(),
            Expression::Variable("true".into())
        );
    }

    #[test]
    fn invalid_implicit_is_rejected()  {
        let config = FileConfig::parse("implicit: \"xor\"").unwrap();
        assert!(matches!(
            config.compiler_config(),
            Err(ConfigError::InvalidImplicit(_))
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            FileConfig::parse("separators: [\",\"]"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
