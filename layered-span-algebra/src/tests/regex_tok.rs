use layered_spans::SpanArray;

use super::support::tokenize;
use crate::{extract_regex_tok, AlgebraError, FullMatch, FullMatchRegex, RegexTokOptions};

#[test]
fn single_token_windows() {
    let tokens = tokenize("Pay $500 within 30 days or 45 days.");
    let numbers = FullMatchRegex::new(r"\d+").unwrap();

    let matches = extract_regex_tok(&tokens, &numbers, &RegexTokOptions::default()).unwrap();
    insta::assert_snapshot!(matches.to_string(), @r###"
    match
    0: [5, 8): '500'
    1: [16, 18): '30'
    2: [27, 29): '45'
    "###);
}

#[test]
fn multi_token_windows_are_grouped_by_length() {
    let tokens = tokenize("within 30 days or 45 days");
    let duration = FullMatchRegex::new(r"\d+ days|\d+").unwrap();

    let matches = extract_regex_tok(
        &tokens,
        &duration,
        &RegexTokOptions::default().with_len(1, 3).with_output_col_name("duration"),
    )
    .unwrap();
    insta::assert_snapshot!(matches.to_string(), @r###"
    duration
    0: [7, 9): '30'
    1: [18, 20): '45'
    2: [7, 14): '30 days'
    3: [18, 25): '45 days'
    "###);
}

#[test]
fn the_whole_window_must_match() {
    let tokens = tokenize("abc abcd");
    let pattern = FullMatchRegex::new("abc").unwrap();
    assert!(pattern.full_match("abc"));
    assert!(!pattern.full_match("abcd"));
    assert!(!pattern.full_match("xabc"));
    assert_eq!(pattern.as_str(), "abc");

    let alternation = FullMatchRegex::new("a|abcd").unwrap();
    assert!(alternation.full_match("abcd"));

    let matches = extract_regex_tok(&tokens, &pattern, &RegexTokOptions::default()).unwrap();
    assert_eq!(matches.spans().as_tuples(), vec![(0, 3)]);
}

#[test]
fn closures_are_predicates() {
    let tokens = tokenize("Alpha beta Gamma");
    let capitalized = |text: &str| text.chars().next().map_or(false, char::is_uppercase);

    let matches = extract_regex_tok(&tokens, &capitalized, &RegexTokOptions::default()).unwrap();
    assert_eq!(
        matches.spans().covered_text(),
        vec![Some("Alpha"), Some("Gamma")]
    );
}

#[test]
fn windows_longer_than_the_text_are_skipped() {
    let tokens = tokenize("one two");
    let any = |_: &str| true;
    let matches = extract_regex_tok(&tokens, &any, &RegexTokOptions::default().with_len(2, 5)).unwrap();
    assert_eq!(matches.spans().covered_text(), vec![Some("one two")]);
}

#[test]
fn invalid_arguments() {
    let tokens = tokenize("one two");
    let any = |_: &str| true;
    let err = extract_regex_tok(&tokens, &any, &RegexTokOptions::default().with_len(3, 2)).unwrap_err();
    assert!(matches!(err, AlgebraError::InvalidArgument(_)));

    assert!(matches!(FullMatchRegex::new("(unclosed"), Err(AlgebraError::Regex(_))));
}
