//! Columnar span storage.
//!
//! [`CharSpanArray`] and [`TokenSpanArray`] keep many spans over one shared
//! target text as parallel offset columns. Both implement [`SpanArray`], the
//! column-level counterpart of [`Interval`]: element-wise overlap,
//! containment and ordering masks are computed over character offsets,
//! whichever kind of column supplies them.

mod cache;
mod char_span_array;
mod display;
mod token_span_array;

pub use cache::ArrayId;
pub use char_span_array::CharSpanArray;
pub use display::SpanArrayDisplay;
pub use token_span_array::TokenSpanArray;

pub(crate) use cache::ArrayState;

use std::ops::Range;
use std::sync::Arc;

use crate::span::{same_token_table, NULL_OFFSET};
use crate::{CharSpan, Interval, SpanDtype, SpanError, SpanResult, TargetText, TokenSpan};

/// Element-wise relational operators.
///
/// `Lt`/`Gt` follow the span ordering (`a < b` iff `a.end <= b.begin`).
/// `Le`/`Ge` have no agreed meaning for spans and are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// Column reductions, named after the arithmetic vocabulary of tabular engines.
///
/// Only `Sum` is meaningful for spans, and it means "combine": the smallest
/// span covering every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Min,
    Max,
    Mean,
}

/// Right-hand operand of an element-wise comparison.
#[derive(Clone, Copy)]
pub enum Comparand<'a> {
    /// Broadcast a single span against every element.
    Span(&'a dyn Interval),
    /// Compare against the element at the same index.
    Array(&'a dyn SpanArray),
}

impl<'a> Comparand<'a> {
    fn target_text(&self) -> &TargetText {
        match self {
            Comparand::Span(span) => span.target_text(),
            Comparand::Array(array) => array.target_text(),
        }
    }

    fn token_table(&self) -> Option<&Arc<CharSpanArray>> {
        match self {
            Comparand::Span(span) => span.token_table(),
            Comparand::Array(array) => array.token_table(),
        }
    }

    fn offsets_at(&self, index: usize) -> (i64, i64) {
        match self {
            Comparand::Span(span) => (span.begin(), span.end()),
            Comparand::Array(array) => (array.char_begins()[index], array.char_ends()[index]),
        }
    }

    fn check_len(&self, len: usize) -> SpanResult<()> {
        match self {
            Comparand::Array(array) if array.len() != len => Err(SpanError::OperandLengthMismatch {
                left: len,
                right: array.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl<'a> From<&'a CharSpan> for Comparand<'a> {
    fn from(span: &'a CharSpan) -> Self {
        Comparand::Span(span)
    }
}

impl<'a> From<&'a TokenSpan> for Comparand<'a> {
    fn from(span: &'a TokenSpan) -> Self {
        Comparand::Span(span)
    }
}

impl<'a> From<&'a CharSpanArray> for Comparand<'a> {
    fn from(array: &'a CharSpanArray) -> Self {
        Comparand::Array(array)
    }
}

impl<'a> From<&'a TokenSpanArray> for Comparand<'a> {
    fn from(array: &'a TokenSpanArray) -> Self {
        Comparand::Array(array)
    }
}

/// Capabilities shared by every column of spans.
pub trait SpanArray {
    fn dtype(&self) -> SpanDtype;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn target_text(&self) -> &TargetText;

    /// Character begin offsets, one per element (null sentinel for null spans).
    fn char_begins(&self) -> &[i64];

    /// Character end offsets, one per element (null sentinel for null spans).
    fn char_ends(&self) -> &[i64];

    /// Monotonically increasing counter, bumped by every in-place mutation.
    fn version(&self) -> u64;

    /// The token table behind a token column; `None` for character columns.
    fn token_table(&self) -> Option<&Arc<CharSpanArray>> {
        None
    }

    /// Lowercased covered text per element, memoized until the next mutation.
    fn normalized_covered_text(&self) -> &[Option<String>];

    /// Label of element `index` in rendered output.
    fn offsets_label(&self, index: usize) -> String {
        format!("[{}, {})", self.char_begins()[index], self.char_ends()[index])
    }

    fn is_null_mask(&self) -> Vec<bool> {
        self.char_begins().iter().map(|&begin| begin == NULL_OFFSET).collect()
    }

    fn has_nulls(&self) -> bool {
        self.char_begins().iter().any(|&begin| begin == NULL_OFFSET)
    }

    fn covered_text(&self) -> Vec<Option<&str>> {
        let text = self.target_text();
        self.char_begins()
            .iter()
            .zip(self.char_ends())
            .map(|(&begin, &end)| {
                if begin == NULL_OFFSET {
                    None
                } else {
                    Some(text.slice(begin as usize, end as usize))
                }
            })
            .collect()
    }

    /// `(begin, end)` character offset pairs.
    fn as_tuples(&self) -> Vec<(i64, i64)> {
        self.char_begins()
            .iter()
            .copied()
            .zip(self.char_ends().iter().copied())
            .collect()
    }

    /// Element-wise [`Interval::overlaps`].
    fn overlaps(&self, other: Comparand<'_>) -> SpanResult<Vec<bool>> {
        elementwise(self, other, |(b, e), (ob, oe)| {
            (b == ob && e == oe) || !(ob >= e || oe <= b)
        })
    }

    /// Element-wise [`Interval::contains`].
    fn contains(&self, other: Comparand<'_>) -> SpanResult<Vec<bool>> {
        elementwise(self, other, |(b, e), (ob, oe)| ob >= b && oe <= e)
    }

    /// Element-wise relational comparison. Null elements compare false
    /// (true for `Ne`).
    ///
    /// `Eq` compares character offsets, and additionally requires equal
    /// token tables when both sides are token spans, matching `TokenSpan`
    /// equality. Operands over another text or token table are unequal
    /// everywhere.
    fn compare(&self, op: CompareOp, other: Comparand<'_>) -> SpanResult<Vec<bool>> {
        match op {
            CompareOp::Eq | CompareOp::Ne => {
                other.check_len(self.len())?;
                let negate = op == CompareOp::Ne;
                let same_tables = match (self.token_table(), other.token_table()) {
                    (Some(mine), Some(theirs)) => same_token_table(mine, theirs),
                    _ => true,
                };
                if self.target_text() != other.target_text() || !same_tables {
                    return Ok(vec![negate; self.len()]);
                }
                let begins = self.char_begins();
                let ends = self.char_ends();
                Ok((0..self.len())
                    .map(|i| {
                        let (ob, oe) = other.offsets_at(i);
                        let equal = begins[i] != NULL_OFFSET && begins[i] == ob && ends[i] == oe;
                        equal != negate
                    })
                    .collect())
            }
            CompareOp::Lt => elementwise(self, other, |(_, e), (ob, _)| e <= ob),
            CompareOp::Gt => elementwise(self, other, |(b, _), (_, oe)| oe <= b),
            CompareOp::Le | CompareOp::Ge => Err(SpanError::Unsupported(format!(
                "{:?} comparison is not defined for spans",
                op
            ))),
        }
    }
}

/// Apply `predicate` to each `(self, other)` offset pair, after checking that
/// both operands share a target text and, for arrays, a length. Pairs
/// involving a null span are false.
fn elementwise<A: SpanArray + ?Sized>(
    array: &A,
    other: Comparand<'_>,
    predicate: impl Fn((i64, i64), (i64, i64)) -> bool,
) -> SpanResult<Vec<bool>> {
    other.check_len(array.len())?;
    if array.target_text() != other.target_text() {
        return Err(SpanError::TargetTextMismatch);
    }
    let begins = array.char_begins();
    let ends = array.char_ends();
    Ok((0..array.len())
        .map(|i| {
            let theirs = other.offsets_at(i);
            if begins[i] == NULL_OFFSET || theirs.0 == NULL_OFFSET {
                false
            } else {
                predicate((begins[i], ends[i]), theirs)
            }
        })
        .collect())
}

/// Gather `(begin, end)` pairs by position.
///
/// Without `allow_fill`, negative indices count back from the end. With it,
/// `-1` produces `fill` and any other negative index is an error.
pub(crate) fn take_offsets(
    begins: &[i64],
    ends: &[i64],
    indices: &[i64],
    allow_fill: bool,
    fill: (i64, i64),
) -> SpanResult<(Vec<i64>, Vec<i64>)> {
    let len = begins.len();
    let mut taken_begins = Vec::with_capacity(indices.len());
    let mut taken_ends = Vec::with_capacity(indices.len());
    for &index in indices {
        let position = if allow_fill {
            match index {
                -1 => {
                    taken_begins.push(fill.0);
                    taken_ends.push(fill.1);
                    continue;
                }
                i if i < -1 => return Err(SpanError::InvalidTakeIndex { index }),
                i => i,
            }
        } else if index < 0 {
            index + len as i64
        } else {
            index
        };
        if position < 0 || position as u64 >= len as u64 {
            return Err(SpanError::IndexOutOfBounds { index, len });
        }
        taken_begins.push(begins[position as usize]);
        taken_ends.push(ends[position as usize]);
    }
    Ok((taken_begins, taken_ends))
}

pub(crate) fn check_range(range: &Range<usize>, len: usize) -> SpanResult<()> {
    if range.start > range.end {
        return Err(SpanError::IndexOutOfBounds {
            index: range.start as i64,
            len,
        });
    }
    if range.end > len {
        return Err(SpanError::IndexOutOfBounds {
            index: range.end as i64,
            len,
        });
    }
    Ok(())
}

pub(crate) fn check_mask(mask: &[bool], len: usize) -> SpanResult<()> {
    if mask.len() != len {
        return Err(SpanError::OperandLengthMismatch {
            left: len,
            right: mask.len(),
        });
    }
    Ok(())
}

/// Keep the entries of `values` where `mask` is set.
pub(crate) fn apply_mask(values: &[i64], mask: &[bool]) -> Vec<i64> {
    values
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(&value, _)| value)
        .collect()
}

/// Minimum begin and maximum end over every element.
pub(crate) fn covering_offsets(begins: &[i64], ends: &[i64]) -> SpanResult<(i64, i64)> {
    if let Some(index) = begins.iter().position(|&begin| begin == NULL_OFFSET) {
        return Err(SpanError::NullInReduction { index });
    }
    match (begins.iter().min(), ends.iter().max()) {
        (Some(&begin), Some(&end)) => Ok((begin, end)),
        _ => Err(SpanError::EmptyInput(
            "cannot combine an empty column of spans".to_string(),
        )),
    }
}

pub(crate) fn check_reduction(op: Reduction, dtype: SpanDtype) -> SpanResult<()> {
    match op {
        Reduction::Sum => Ok(()),
        other => Err(SpanError::Unsupported(format!(
            "'{:?}' aggregation not supported on a column of {}",
            other,
            dtype.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_without_fill_wraps_negative_indices() {
        let (b, e) = take_offsets(&[0, 2, 4], &[1, 3, 5], &[2, -1, 0], false, (-1, -1)).unwrap();
        assert_eq!(b, vec![4, 4, 0]);
        assert_eq!(e, vec![5, 5, 1]);
        assert!(take_offsets(&[0], &[1], &[-2], false, (-1, -1)).is_err());
        assert!(take_offsets(&[0], &[1], &[1], false, (-1, -1)).is_err());
    }

    #[test]
    fn take_with_fill_marks_missing() {
        let (b, e) = take_offsets(&[0, 2], &[1, 3], &[1, -1], true, (-1, -1)).unwrap();
        assert_eq!(b, vec![2, -1]);
        assert_eq!(e, vec![3, -1]);
        assert_eq!(
            take_offsets(&[0, 2], &[1, 3], &[-2], true, (-1, -1)),
            Err(SpanError::InvalidTakeIndex { index: -2 })
        );
    }

    #[test]
    fn covering_offsets_rejects_nulls_and_empty() {
        assert_eq!(covering_offsets(&[3, 0], &[4, 2]), Ok((0, 4)));
        assert_eq!(
            covering_offsets(&[3, -1], &[4, -1]),
            Err(SpanError::NullInReduction { index: 1 })
        );
        assert!(matches!(covering_offsets(&[], &[]), Err(SpanError::EmptyInput(_))));
    }
}
