//! The compiled boolean expression tree.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A compiled boolean expression over named flags.
///
/// `And` and `Or` hold two or more children; the normalizing constructors
/// [`Expression::and`] and [`Expression::or`] collapse a single child to the
/// child itself and splice same-variant children into the parent, so a
/// well-formed tree never nests `And` directly in `And` or `Or` in `Or`.
///
/// Equality is structural and positional: two `And` nodes are equal only if
/// their children match pairwise in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expression {
    /// True iff the name is in the evaluated set.
    Variable(String),
    /// True or false regardless of input.
    Constant(bool),
    /// True iff the child is false.
    Not(Box<Expression>),
    /// True iff every child is true. Holds at least two children.
    And(Vec<Expression>),
    /// True iff any child is true. Holds at least two children.
    Or(Vec<Expression>),
}

impl Expression {
    /// Evaluate against the set of names considered true.
    ///
    /// Pure and total: recursion is bounded by the tree depth fixed at
    /// compile time.
    pub fn matches(&self, true_names: &HashSet<String>) -> bool {
        match self {
            Expression::Variable(name) => true_names.contains(name),
            Expression::Constant(value) => *value,
            Expression::Not(child) => !child.matches(true_names),
            Expression::And(children) => children.iter().all(|c| c.matches(true_names)),
            Expression::Or(children) => children.iter().any(|c| c.matches(true_names)),
        }
    }

    /// Normalizing conjunction: `And` children are spliced in, a single
    /// child is returned directly. An empty list yields the conjunction
    /// identity, `Constant(true)`.
    pub fn and(children: Vec<Expression>) -> Expression {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Expression::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Expression::Constant(true),
            1 => flat.remove(0),
            _ => Expression::And(flat),
        }
    }

    /// Normalizing disjunction: `Or` children are spliced in, a single child
    /// is returned directly. An empty list yields the disjunction identity,
    /// `Constant(false)`.
    pub fn or(children: Vec<Expression>) -> Expression {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Expression::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Expression::Constant(false),
            1 => flat.remove(0),
            _ => Expression::Or(flat),
        }
    }
}

impl fmt::Display for Expression {
    /// Canonical parenthesized rendering with `!`, `&`, `|`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Constant(true) => write!(f, "true"),
            Expression::Constant(false) => write!(f, "false"),
            Expression::Not(child) => match child.as_ref() {
                Expression::Variable(_) | Expression::Constant(_) => write!(f, "!{}", child),
                composite => write!(f, "!({})", Unparenthesized(composite)),
            },
            Expression::And(children) => write_joined(f, children, " & "),
            Expression::Or(children) => write_joined(f, children, " | "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Expression], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

/// Renders a composite without its own outer parentheses, for `!(...)`.
struct Unparenthesized<'a>(&'a Expression);

impl fmt::Display for Unparenthesized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expression::And(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
            Expression::Or(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
            other => write!(f, "{}", other),
        }
    }
}
