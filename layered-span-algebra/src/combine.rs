//! Combining spans into the smallest span that covers them.

use layered_spans::{
    AnySpan, CharSpanArray, SpanArray, SpanColumn, SpanError, TokenSpan, TokenSpanArray, NULL_OFFSET,
};

use crate::{AlgebraError, AlgebraResult};

/// For each row, the span from the begin of `a` to the end of `b`.
///
/// Both columns must have the same length and share a token table, and each
/// non-null `a` must start and end no later than its `b`. A null on either
/// side gives a null row.
///
/// ```
/// use layered_spans::{CharSpanArray, SpanArray, TokenSpanArray};
/// use layered_span_algebra::combine_spans;
/// use std::sync::Arc;
///
/// let tokens = Arc::new(CharSpanArray::new("a b c d", vec![0, 2, 4, 6], vec![1, 3, 5, 7]).unwrap());
/// let a = TokenSpanArray::new(tokens.clone(), vec![0], vec![1]).unwrap();
/// let b = TokenSpanArray::new(tokens, vec![2], vec![4]).unwrap();
/// assert_eq!(combine_spans(&a, &b).unwrap().covered_text(), vec![Some("a b c d")]);
/// ```
pub fn combine_spans(a: &TokenSpanArray, b: &TokenSpanArray) -> AlgebraResult<TokenSpanArray> {
    check_lengths(a.len(), b.len())?;
    if !a.shares_tokens_with(b) {
        return Err(SpanError::TokenTableMismatch.into());
    }
    tracing::debug!(rows = a.len(), "combine_spans");
    let (begins, ends) = combine_offsets(
        (a.begin_tokens(), a.end_tokens(), &a.is_null_mask()),
        (b.begin_tokens(), b.end_tokens(), &b.is_null_mask()),
    )?;
    Ok(TokenSpanArray::new(a.tokens().clone(), begins, ends)?)
}

/// For each row, the span from the begin of `a` to the end of `b`, over
/// character offsets. Same rules as [`combine_spans`], with a shared target
/// text in place of a shared token table.
pub fn combine_char_spans(a: &CharSpanArray, b: &CharSpanArray) -> AlgebraResult<CharSpanArray> {
    check_lengths(a.len(), b.len())?;
    if a.target_text() != b.target_text() {
        return Err(SpanError::TargetTextMismatch.into());
    }
    tracing::debug!(rows = a.len(), "combine_char_spans");
    let (begins, ends) = combine_offsets(
        (a.begins(), a.ends(), &a.is_null_mask()),
        (b.begins(), b.ends(), &b.is_null_mask()),
    )?;
    Ok(CharSpanArray::new(a.target_text().clone(), begins, ends)?)
}

/// The smallest span covering every span in `column`, of the column's kind.
pub fn combine_agg(column: &SpanColumn) -> AlgebraResult<AnySpan> {
    tracing::debug!(rows = column.len(), dtype = %column.dtype(), "combine_agg");
    Ok(column.combine()?)
}

/// [`combine_agg`] over token spans collected from elsewhere.
pub fn combine_token_spans(spans: &[TokenSpan]) -> AlgebraResult<TokenSpan> {
    Ok(TokenSpanArray::from_spans(spans)?.combine()?)
}

fn check_lengths(left: usize, right: usize) -> AlgebraResult<()> {
    if left != right {
        return Err(SpanError::OperandLengthMismatch { left, right }.into());
    }
    Ok(())
}

type Offsets<'a> = (&'a [i64], &'a [i64], &'a [bool]);

fn combine_offsets(a: Offsets<'_>, b: Offsets<'_>) -> AlgebraResult<(Vec<i64>, Vec<i64>)> {
    let (a_begins, a_ends, a_nulls) = a;
    let (b_begins, b_ends, b_nulls) = b;
    let mut begins = Vec::with_capacity(a_begins.len());
    let mut ends = Vec::with_capacity(a_begins.len());
    for index in 0..a_begins.len() {
        if a_nulls[index] || b_nulls[index] {
            begins.push(NULL_OFFSET);
            ends.push(NULL_OFFSET);
            continue;
        }
        if a_begins[index] > b_begins[index] || a_ends[index] > b_ends[index] {
            return Err(AlgebraError::SpanOrder { index });
        }
        begins.push(a_begins[index]);
        ends.push(b_ends[index]);
    }
    Ok((begins, ends))
}
