//! Integration tests for pair-aware argument splitting.

use pairlex::{argument_split, argument_split_with, PairConfig, PairingError, SplitConfig, SplitError};
use rstest::rstest;

#[rstest]
#[case("a b c", vec!["a", "b", "c"])]
#[case(r#"a b "c d" e"#, vec!["a", "b", "c d", "e"])]
#[case("f [x y] g", vec!["f", "x y", "g"])]
#[case("{k v} tail", vec!["k v", "tail"])]
#[case(r#"nested "a (b c) d" end"#, vec!["nested", "a (b c) d", "end"])]
#[case("  padded  ", vec!["padded"])]
#[case("", Vec::<&str>::new())]
#[case("'single quoted' rest", vec!["single quoted", "rest"])]
fn default_splitting(#[case] input: &str, #[case] expected: Vec<&str>) {
    assert_eq!(argument_split(input).unwrap(), expected);
}

#[test]
fn nested_pairs_are_protected_by_the_outer_span() {
    // Only the outermost pair is consulted; its span already covers the
    // nested brackets.
    assert_eq!(
        argument_split("run (outer [inner gap] end) done").unwrap(),
        vec!["run", "outer [inner gap] end", "done"]
    );
}

#[test]
fn comma_separator_respects_pairs() {
    let config = SplitConfig::default().with_separator(",").unwrap();
    assert_eq!(
        argument_split_with(r#"a,"b,c",d"#, &config).unwrap(),
        vec!["a", "b,c", "d"]
    );
}

#[test]
fn escaped_separator_characters_stay_in_tokens() {
    // The backslash escapes the quote, not the separator; the quote then
    // never opens a pair.
    assert_eq!(
        argument_split(r#"one a\"b two"#).unwrap(),
        vec!["one", "a\"b", "two"]
    );
}

#[test]
fn lenient_pairing_allows_unbalanced_input() {
    // The dangling opener produces no pair, so the text splits normally.
    // Stripping is disabled: the `(b` token opens a wrapper it never closes,
    // which the stripper would reject.
    let config = SplitConfig::default()
        .with_pairs(PairConfig::default().lenient())
        .with_outer_strip(&[])
        .unwrap();
    assert_eq!(
        argument_split_with("a (b c", &config).unwrap(),
        vec!["a", "(b", "c"]
    );
}

#[test]
fn strict_pairing_rejects_unbalanced_input() {
    let err = argument_split("a (b c").unwrap_err();
    assert!(matches!(
        err,
        SplitError::Pairing(PairingError::UnclosedPairs { .. })
    ));
}

#[test]
fn wrapper_stripping_is_one_layer_deep() {
    assert_eq!(argument_split(r#"("x y")"#).unwrap(), vec![r#""x y""#]);
}

#[test]
fn wrapper_closer_must_end_the_token() {
    let err = argument_split("[a]b").unwrap_err();
    assert!(matches!(err, SplitError::DanglingWrapper { .. }));
}

#[test]
fn custom_pair_table() {
    let pairs = PairConfig::new(&[("<", ">")]).unwrap();
    let config = SplitConfig::default()
        .with_pairs(pairs)
        .with_outer_strip(&[("<", ">")])
        .unwrap();
    assert_eq!(
        argument_split_with("a <b c> d", &config).unwrap(),
        vec!["a", "b c", "d"]
    );
}
