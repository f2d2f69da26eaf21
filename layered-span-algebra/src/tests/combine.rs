use layered_spans::{
    AnySpan, CharSpanArray, Interval, SpanArray, SpanColumn, SpanDtype, SpanError, TokenSpan,
};

use super::support::{token_spans, tokenize};
use crate::{combine_agg, combine_char_spans, combine_spans, AlgebraError};

#[test]
fn pairwise_covers_both_spans() {
    let tokens = tokenize("one two three four five six seven eight");
    let a = token_spans(&tokens, &[(0, 2), (3, 4)]);
    let b = token_spans(&tokens, &[(5, 7), (3, 4)]);

    let combined = combine_spans(&a, &b).unwrap();
    assert_eq!(combined.begin_tokens(), &[0, 3]);
    assert_eq!(combined.end_tokens(), &[7, 4]);
    insta::assert_snapshot!(combined.display().to_string(), @r###"
    one two three four five six seven eight
    ╰───────────────────────────────╯ [A] [0, 7)
                  ╰──╯ [B] [3, 4)
    "###);
}

#[test]
fn aggregate_covers_the_column() {
    let tokens = tokenize("one two three four five six seven eight");
    let spans = token_spans(&tokens, &[(5, 7), (0, 2)]);

    let combined = combine_agg(&SpanColumn::from(spans)).unwrap();
    let combined = combined.as_token().unwrap();
    assert_eq!((combined.begin_token(), combined.end_token()), (0, 7));
    assert_eq!(combined.covered_text(), Some("one two three four five six seven"));

    let chars = CharSpanArray::new("one two three", vec![8, 0], vec![13, 3]).unwrap();
    let combined = combine_agg(&SpanColumn::from(chars)).unwrap();
    assert_eq!(combined.dtype(), SpanDtype::Char);
    assert_eq!((combined.begin(), combined.end()), (0, 13));
}

#[test]
fn aggregate_from_scalar_spans() {
    let tokens = tokenize("a b c");
    let column = SpanColumn::from_spans(vec![
        AnySpan::from(TokenSpan::new(tokens.clone(), 1, 2).unwrap()),
        AnySpan::from(TokenSpan::new(tokens, 2, 3).unwrap()),
    ])
    .unwrap();
    assert_eq!(combine_agg(&column).unwrap().covered_text(), Some("b c"));
}

#[test]
fn char_spans_combine_pairwise() {
    let a = CharSpanArray::new("0123456789", vec![0], vec![2]).unwrap();
    let b = CharSpanArray::new("0123456789", vec![5], vec![7]).unwrap();
    let combined = combine_char_spans(&a, &b).unwrap();
    assert_eq!(combined.as_tuples(), vec![(0, 7)]);

    let other = CharSpanArray::new("abcdefghij", vec![5], vec![7]).unwrap();
    assert!(matches!(
        combine_char_spans(&a, &other),
        Err(AlgebraError::Span(SpanError::TargetTextMismatch))
    ));
}

#[test]
fn nulls_give_null_rows() {
    let tokens = tokenize("a b c");
    let mut a = token_spans(&tokens, &[(0, 1), (0, 1)]);
    a.set_item(0, None).unwrap();
    let b = token_spans(&tokens, &[(2, 3), (2, 3)]);

    let combined = combine_spans(&a, &b).unwrap();
    assert_eq!(combined.is_null_mask(), vec![true, false]);
    assert_eq!(combined.covered_text(), vec![None, Some("a b c")]);
}

#[test]
fn preconditions_are_checked() {
    let tokens = tokenize("a b c");
    let early = token_spans(&tokens, &[(0, 1)]);
    let late = token_spans(&tokens, &[(2, 3)]);
    assert!(matches!(
        combine_spans(&late, &early),
        Err(AlgebraError::SpanOrder { index: 0 })
    ));

    let two = token_spans(&tokens, &[(0, 1), (1, 2)]);
    assert!(matches!(
        combine_spans(&two, &late),
        Err(AlgebraError::Span(SpanError::OperandLengthMismatch { left: 2, right: 1 }))
    ));

    let elsewhere = token_spans(&tokenize("x y z"), &[(2, 3)]);
    assert!(matches!(
        combine_spans(&early, &elsewhere),
        Err(AlgebraError::Span(SpanError::TokenTableMismatch))
    ));
}
