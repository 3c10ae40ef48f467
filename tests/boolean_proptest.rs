//! Property-based tests for the boolean expression tree and compiler.
//!
//! Trees are generated structurally through the normalizing constructors,
//! rendered through `Display`, and fed back through `compile` to check that
//! evaluation, normalization, and the canonical rendering agree.

use std::collections::HashSet;

use pairlex::{compile, Expression};
use proptest::prelude::*;

const UNIVERSE: &[&str] = &["alpha", "beta", "gamma", "delta", "omega"];

fn variable_strategy() -> impl Strategy<Value = Expression> {
    (0..UNIVERSE.len()).prop_map(|i| Expression::Variable(UNIVERSE[i].to_string()))
}

fn expression_strategy() -> impl Strategy<Value = Expression> {
    let leaf = prop_oneof![
        4 => variable_strategy(),
        1 => any::<bool>().prop_map(Expression::Constant),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| Expression::Not(Box::new(e))),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Expression::and),
            prop::collection::vec(inner, 2..4).prop_map(Expression::or),
        ]
    })
}

fn true_set_strategy() -> impl Strategy<Value = HashSet<String>> {
    proptest::sample::subsequence(UNIVERSE.to_vec(), 0..=UNIVERSE.len())
        .prop_map(|subset| subset.into_iter().map(|s| s.to_string()).collect())
}

/// Straight-line reimplementation of the evaluation semantics.
fn reference_eval(expr: &Expression, true_names: &HashSet<String>) -> bool {
    match expr {
        Expression::Variable(name) => true_names.contains(name),
        Expression::Constant(value) => *value,
        Expression::Not(child) => !reference_eval(child, true_names),
        Expression::And(children) => children.iter().all(|c| reference_eval(c, true_names)),
        Expression::Or(children) => children.iter().any(|c| reference_eval(c, true_names)),
    }
}

/// A well-formed compiled tree: n-ary nodes hold at least two children and
/// never a child of their own variant.
fn assert_normalized(expr: &Expression) {
    match expr {
        Expression::Variable(_) | Expression::Constant(_) => {}
        Expression::Not(child) => assert_normalized(child),
        Expression::And(children) => {
            assert!(children.len() >= 2, "And with {} child(ren)", children.len());
            for child in children {
                assert!(
                    !matches!(child, Expression::And(_)),
                    "And nested directly in And"
                );
                assert_normalized(child);
            }
        }
        Expression::Or(children) => {
            assert!(children.len() >= 2, "Or with {} child(ren)", children.len());
            for child in children {
                assert!(
                    !matches!(child, Expression::Or(_)),
                    "Or nested directly in Or"
                );
                assert_normalized(child);
            }
        }
    }
}

proptest! {
    #[test]
    fn negation_inverts_matching(
        expr in expression_strategy(),
        true_names in true_set_strategy(),
    ) {
        let negated = Expression::Not(Box::new(expr.clone()));
        prop_assert_eq!(negated.matches(&true_names), !expr.matches(&true_names));
    }

    #[test]
    fn conjunction_matches_all_children(
        children in prop::collection::vec(expression_strategy(), 2..5),
        true_names in true_set_strategy(),
    ) {
        let all = children.iter().all(|c| c.matches(&true_names));
        let any = children.iter().any(|c| c.matches(&true_names));
        prop_assert_eq!(Expression::And(children.clone()).matches(&true_names), all);
        prop_assert_eq!(Expression::Or(children).matches(&true_names), any);
    }

    #[test]
    fn matching_agrees_with_reference_semantics(
        expr in expression_strategy(),
        true_names in true_set_strategy(),
    ) {
        prop_assert_eq!(expr.matches(&true_names), reference_eval(&expr, &true_names));
    }

    #[test]
    fn canonical_rendering_compiles_back_to_the_same_tree(expr in expression_strategy()) {
        let rendered = expr.to_string();
        let reparsed = compile(&rendered)
            .unwrap_or_else(|e| panic!("'{rendered}' failed to compile: {e}"));
        prop_assert_eq!(reparsed, expr);
    }

    #[test]
    fn compiled_trees_are_normalized(expr in expression_strategy()) {
        let reparsed = compile(&expr.to_string()).unwrap();
        assert_normalized(&reparsed);
    }

    #[test]
    fn constructors_normalize_arbitrary_nesting(
        children in prop::collection::vec(expression_strategy(), 0..5),
    ) {
        // Whatever goes in, the constructors keep the invariant one level
        // deep, and therefore everywhere when built bottom-up.
        assert_normalized(&Expression::and(children.clone()));
        assert_normalized(&Expression::or(children));
    }
}
