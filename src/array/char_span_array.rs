use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use super::{
    apply_mask, check_mask, check_range, check_reduction, covering_offsets, take_offsets, ArrayId,
    ArrayState, Reduction, SpanArray, SpanArrayDisplay,
};
use crate::span::{validate_offsets, NULL_OFFSET};
use crate::{CharSpan, Interval, SpanDtype, SpanError, SpanResult, TargetText};

/// A column of character spans over a single target text.
///
/// Spans are stored as two parallel offset columns. Every in-place mutation
/// goes through [`set_item`](Self::set_item), which bumps the version and
/// drops every cached result derived from the old contents.
pub struct CharSpanArray {
    text: TargetText,
    begins: Vec<i64>,
    ends: Vec<i64>,
    state: ArrayState,
}

impl CharSpanArray {
    /// Build a column from begin (inclusive) and end (exclusive) character
    /// offsets. Every pair must be the null pair or lie within `text`.
    pub fn new(text: impl Into<TargetText>, begins: Vec<i64>, ends: Vec<i64>) -> SpanResult<Self> {
        let text = text.into();
        if begins.len() != ends.len() {
            return Err(SpanError::LengthMismatch {
                begins: begins.len(),
                ends: ends.len(),
            });
        }
        let limit = text.char_len();
        for (&begin, &end) in begins.iter().zip(&ends) {
            validate_offsets(begin, end, limit)?;
        }
        Ok(Self::from_validated(text, begins, ends))
    }

    /// An empty column over `text`.
    pub fn empty(text: impl Into<TargetText>) -> Self {
        Self::from_validated(text.into(), Vec::new(), Vec::new())
    }

    /// Build a column from scalar spans, which must all share one target text.
    pub fn from_spans(spans: &[CharSpan]) -> SpanResult<Self> {
        let first = spans.first().ok_or_else(|| {
            SpanError::EmptyInput("cannot infer the target text of an empty sequence of spans".to_string())
        })?;
        let text = first.target_text().clone();
        let mut begins = Vec::with_capacity(spans.len());
        let mut ends = Vec::with_capacity(spans.len());
        for span in spans {
            if *span.target_text() != text {
                return Err(SpanError::TargetTextMismatch);
            }
            begins.push(span.begin());
            ends.push(span.end());
        }
        Ok(Self::from_validated(text, begins, ends))
    }

    pub(crate) fn from_validated(text: TargetText, begins: Vec<i64>, ends: Vec<i64>) -> Self {
        Self {
            text,
            begins,
            ends,
            state: ArrayState::new(),
        }
    }

    pub fn id(&self) -> ArrayId {
        self.state.id
    }

    pub fn begins(&self) -> &[i64] {
        &self.begins
    }

    pub fn ends(&self) -> &[i64] {
        &self.ends
    }

    /// Position of the first null row, memoized until the next mutation.
    pub fn first_null_row(&self) -> Option<usize> {
        *self
            .state
            .first_null
            .get_or_init(|| self.begins.iter().position(|&begin| begin == NULL_OFFSET))
    }

    /// The span at `index`, which is the null span for a null row.
    pub fn get(&self, index: usize) -> Option<CharSpan> {
        let begin = *self.begins.get(index)?;
        Some(CharSpan::from_parts(self.text.clone(), begin, self.ends[index]))
    }

    pub fn iter(&self) -> impl Iterator<Item = CharSpan> + '_ {
        (0..self.begins.len()).filter_map(move |i| self.get(i))
    }

    /// Rows `range` as a new column.
    pub fn slice(&self, range: Range<usize>) -> SpanResult<Self> {
        check_range(&range, self.len())?;
        Ok(Self::from_validated(
            self.text.clone(),
            self.begins[range.clone()].to_vec(),
            self.ends[range].to_vec(),
        ))
    }

    /// Rows where `mask` is set, as a new column.
    pub fn filter(&self, mask: &[bool]) -> SpanResult<Self> {
        check_mask(mask, self.len())?;
        Ok(Self::from_validated(
            self.text.clone(),
            apply_mask(&self.begins, mask),
            apply_mask(&self.ends, mask),
        ))
    }

    /// Overwrite a single row. `None` stores the null span.
    pub fn set_item(&mut self, index: usize, value: Option<&CharSpan>) -> SpanResult<()> {
        if index >= self.len() {
            return Err(SpanError::IndexOutOfBounds {
                index: index as i64,
                len: self.len(),
            });
        }
        let (begin, end) = match value {
            None => (NULL_OFFSET, NULL_OFFSET),
            Some(span) if *span.target_text() != self.text => {
                return Err(SpanError::TargetTextMismatch)
            }
            Some(span) => (span.begin(), span.end()),
        };
        self.begins[index] = begin;
        self.ends[index] = end;
        self.increment_version();
        Ok(())
    }

    /// Setting several rows at once is not supported; assign rows one at a
    /// time with [`set_item`](Self::set_item).
    pub fn set_items(&mut self, indices: &[usize], _value: Option<&CharSpan>) -> SpanResult<()> {
        Err(SpanError::Unsupported(format!(
            "setting {} rows at once is not implemented",
            indices.len()
        )))
    }

    /// Deep copy with its own identity and version numbering.
    pub fn copy(&self) -> Self {
        Self::from_validated(self.text.clone(), self.begins.clone(), self.ends.clone())
    }

    /// Gather rows by position.
    ///
    /// With `allow_fill`, an index of `-1` yields `fill_value` (the null span
    /// when `None`). Without it, negative indices count from the end.
    pub fn take(&self, indices: &[i64], allow_fill: bool, fill_value: Option<&CharSpan>) -> SpanResult<Self> {
        let fill = match fill_value {
            Some(span) if allow_fill => {
                if *span.target_text() != self.text {
                    return Err(SpanError::TargetTextMismatch);
                }
                span.offsets()
            }
            _ => (NULL_OFFSET, NULL_OFFSET),
        };
        let (begins, ends) = take_offsets(&self.begins, &self.ends, indices, allow_fill, fill)?;
        Ok(Self::from_validated(self.text.clone(), begins, ends))
    }

    /// Concatenate columns over one target text.
    pub fn concatenate(arrays: &[&CharSpanArray]) -> SpanResult<Self> {
        let first = arrays
            .first()
            .ok_or_else(|| SpanError::EmptyInput("nothing to concatenate".to_string()))?;
        if arrays.iter().any(|array| array.text != first.text) {
            return Err(SpanError::TargetTextMismatch);
        }
        let total = arrays.iter().map(|array| array.len()).sum();
        let mut begins = Vec::with_capacity(total);
        let mut ends = Vec::with_capacity(total);
        for array in arrays {
            begins.extend_from_slice(&array.begins);
            ends.extend_from_slice(&array.ends);
        }
        Ok(Self::from_validated(first.text.clone(), begins, ends))
    }

    /// True if both columns have the same target text contents and the same
    /// spans in the same order.
    ///
    /// Once proven, equality with `other` is remembered until either column
    /// changes, making repeated checks against an unchanged column O(1).
    pub fn equals(&self, other: &CharSpanArray) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.state.equivalent.equals_with(other.id(), other.version(), || {
            self.text == other.text && self.begins == other.begins && self.ends == other.ends
        })
    }

    /// Hash of the target text and offsets, memoized until the next mutation.
    pub fn content_hash(&self) -> u64 {
        *self.state.hash.get_or_init(|| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.text.hash(&mut hasher);
            self.begins.hash(&mut hasher);
            self.ends.hash(&mut hasher);
            hasher.finish()
        })
    }

    /// Mark the contents as changed and invalidate every cached result.
    pub fn increment_version(&mut self) {
        self.state.increment_version();
    }

    /// The smallest span covering every element.
    pub fn combine(&self) -> SpanResult<CharSpan> {
        let (begin, end) = covering_offsets(&self.begins, &self.ends)?;
        Ok(CharSpan::from_parts(self.text.clone(), begin, end))
    }

    /// Column reduction; `Sum` combines, everything else is unsupported.
    pub fn reduce(&self, op: Reduction) -> SpanResult<CharSpan> {
        check_reduction(op, self.dtype())?;
        self.combine()
    }

    pub fn display(&self) -> SpanArrayDisplay<'_> {
        SpanArrayDisplay::new(self)
    }
}

impl SpanArray for CharSpanArray {
    fn dtype(&self) -> SpanDtype {
        SpanDtype::Char
    }

    fn len(&self) -> usize {
        self.begins.len()
    }

    fn target_text(&self) -> &TargetText {
        &self.text
    }

    fn char_begins(&self) -> &[i64] {
        &self.begins
    }

    fn char_ends(&self) -> &[i64] {
        &self.ends
    }

    fn version(&self) -> u64 {
        self.state.version
    }

    fn normalized_covered_text(&self) -> &[Option<String>] {
        self.state.normalized.get_or_init(|| {
            self.covered_text()
                .into_iter()
                .map(|covered| covered.map(str::to_lowercase))
                .collect()
        })
    }
}

impl Clone for CharSpanArray {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl PartialEq for CharSpanArray {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for CharSpanArray {}

impl Hash for CharSpanArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.content_hash());
    }
}

impl fmt::Debug for CharSpanArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharSpanArray")
            .field("len", &self.len())
            .field("version", &self.state.version)
            .field("spans", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompareOp, Comparand};

    const TEXT: &str = "This is a test.";

    fn sample() -> CharSpanArray {
        CharSpanArray::new(TEXT, vec![0, 5, 8, 10, 14], vec![4, 7, 9, 14, 15]).unwrap()
    }

    #[test]
    fn construction_validates_offsets() {
        assert_eq!(
            CharSpanArray::new(TEXT, vec![0, 1], vec![1]).unwrap_err(),
            SpanError::LengthMismatch { begins: 2, ends: 1 }
        );
        assert!(matches!(
            CharSpanArray::new(TEXT, vec![0], vec![16]),
            Err(SpanError::InvalidOffsets { .. })
        ));
        assert!(CharSpanArray::new(TEXT, vec![-2], vec![3]).is_err());
        assert!(CharSpanArray::new(TEXT, vec![-1], vec![-1]).is_ok());
    }

    #[test]
    fn indexing_and_covered_text() {
        let array = sample();
        assert_eq!(array.len(), 5);
        assert_eq!(array.dtype(), SpanDtype::Char);
        assert_eq!(array.get(3).unwrap().covered_text(), Some("test"));
        assert!(array.get(5).is_none());
        assert_eq!(
            array.covered_text(),
            vec![Some("This"), Some("is"), Some("a"), Some("test"), Some(".")]
        );
        assert_eq!(array.as_tuples()[1], (5, 7));
    }

    #[test]
    fn nulls_propagate() {
        let mut array = sample();
        array.set_item(2, None).unwrap();
        assert_eq!(array.is_null_mask(), vec![false, false, true, false, false]);
        assert!(array.has_nulls());
        assert!(array.get(2).unwrap().is_null());
        assert_eq!(array.covered_text()[2], None);
        assert_eq!(array.normalized_covered_text()[2], None);

        let taken = array.take(&[2, 0], false, None).unwrap();
        assert_eq!(taken.is_null_mask(), vec![true, false]);
    }

    #[test]
    fn slice_and_concatenate_round_trip() {
        let array = sample();
        for k in 0..=array.len() {
            let head = array.slice(0..k).unwrap();
            let tail = array.slice(k..array.len()).unwrap();
            let joined = CharSpanArray::concatenate(&[&head, &tail]).unwrap();
            assert!(joined.equals(&array), "split at {}", k);
        }
        assert!(array.slice(2..9).is_err());
    }

    #[test]
    fn concatenate_rejects_different_texts() {
        let a = CharSpanArray::new("abc", vec![0], vec![1]).unwrap();
        let b = CharSpanArray::new("xyz", vec![0], vec![1]).unwrap();
        assert_eq!(
            CharSpanArray::concatenate(&[&a, &b]).unwrap_err(),
            SpanError::TargetTextMismatch
        );
        assert!(matches!(
            CharSpanArray::concatenate(&[]),
            Err(SpanError::EmptyInput(_))
        ));
    }

    #[test]
    fn filter_by_mask() {
        let array = sample();
        let filtered = array.filter(&[true, false, false, true, false]).unwrap();
        assert_eq!(filtered.covered_text(), vec![Some("This"), Some("test")]);
        assert!(array.filter(&[true]).is_err());
    }

    #[test]
    fn take_with_fill() {
        let array = sample();
        let fill = CharSpan::new(TEXT, 0, 7).unwrap();

        let taken = array.take(&[1, -1, 3], true, None).unwrap();
        assert_eq!(taken.is_null_mask(), vec![false, true, false]);

        let taken = array.take(&[-1, 4], true, Some(&fill)).unwrap();
        assert_eq!(taken.get(0).unwrap(), fill);

        let foreign = CharSpan::new("This is another text", 0, 4).unwrap();
        assert_eq!(
            array.take(&[-1], true, Some(&foreign)).unwrap_err(),
            SpanError::TargetTextMismatch
        );
        assert!(array.take(&[-3], true, None).is_err());
        assert!(array.take(&[7], false, None).is_err());
    }

    #[test]
    fn set_item_bumps_version_and_validates() {
        let mut array = sample();
        assert_eq!(array.version(), 0);
        let span = CharSpan::new(TEXT, 0, 7).unwrap();
        array.set_item(0, Some(&span)).unwrap();
        assert_eq!(array.version(), 1);
        assert_eq!(array.get(0).unwrap(), span);

        assert!(array.set_item(9, None).is_err());
        let foreign = CharSpan::new("other", 0, 1).unwrap();
        assert_eq!(
            array.set_item(0, Some(&foreign)).unwrap_err(),
            SpanError::TargetTextMismatch
        );
        assert!(matches!(
            array.set_items(&[0, 1], None),
            Err(SpanError::Unsupported(_))
        ));
        assert_eq!(array.version(), 1);
    }

    #[test]
    fn equality_cache_is_invalidated_by_mutation() {
        let mut a = sample();
        let mut b = a.copy();
        assert_ne!(a.id(), b.id());
        assert!(a.equals(&b));
        // Served from the cache
        assert!(a.equals(&b));

        // Mutating the other side makes the cached entry stale
        b.set_item(0, None).unwrap();
        assert!(!a.equals(&b));

        // Mutating this side clears its own cache
        let c = a.copy();
        assert!(a.equals(&c));
        a.set_item(1, None).unwrap();
        assert!(!a.equals(&c));
        assert_eq!(a.state.equivalent.len(), 0);
    }

    #[test]
    fn equality_is_by_text_contents() {
        let a = CharSpanArray::new("same text", vec![0], vec![4]).unwrap();
        let b = CharSpanArray::new(String::from("same text"), vec![0], vec![4]).unwrap();
        let c = CharSpanArray::new("same text", vec![5], vec![9]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn hash_is_recomputed_after_mutation() {
        let mut array = sample();
        let before = array.content_hash();
        array.set_item(0, None).unwrap();
        assert_ne!(array.content_hash(), before);
    }

    #[test]
    fn normalized_text_is_lowercase_and_refreshed() {
        let mut array = sample();
        assert_eq!(array.normalized_covered_text()[0].as_deref(), Some("this"));
        let span = CharSpan::new(TEXT, 0, 7).unwrap();
        array.set_item(0, Some(&span)).unwrap();
        assert_eq!(array.normalized_covered_text()[0].as_deref(), Some("this is"));
    }

    #[test]
    fn elementwise_comparisons() {
        let array = sample();
        let test = CharSpan::new(TEXT, 10, 14).unwrap();

        assert_eq!(
            array.compare(CompareOp::Lt, Comparand::from(&test)).unwrap(),
            vec![true, true, true, false, false]
        );
        assert_eq!(
            array.compare(CompareOp::Gt, Comparand::from(&test)).unwrap(),
            vec![false, false, false, false, true]
        );
        assert_eq!(
            array.compare(CompareOp::Eq, Comparand::from(&test)).unwrap(),
            vec![false, false, false, true, false]
        );
        assert_eq!(
            array.compare(CompareOp::Ne, Comparand::from(&test)).unwrap(),
            vec![true, true, true, false, true]
        );
        assert!(matches!(
            array.compare(CompareOp::Le, Comparand::from(&test)),
            Err(SpanError::Unsupported(_))
        ));

        let shifted = array.take(&[1, 2, 3, 4, 0], false, None).unwrap();
        assert_eq!(
            array.compare(CompareOp::Lt, Comparand::from(&shifted)).unwrap(),
            vec![true, true, true, true, false]
        );

        let short = array.slice(0..2).unwrap();
        assert!(matches!(
            array.compare(CompareOp::Lt, Comparand::from(&short)),
            Err(SpanError::OperandLengthMismatch { .. })
        ));

        let foreign = CharSpan::new("another string", 0, 3).unwrap();
        assert_eq!(
            array.compare(CompareOp::Lt, Comparand::from(&foreign)).unwrap_err(),
            SpanError::TargetTextMismatch
        );
        assert_eq!(
            array.compare(CompareOp::Eq, Comparand::from(&foreign)).unwrap(),
            vec![false; 5]
        );
    }

    #[test]
    fn overlap_and_containment_masks() {
        let array = sample();
        let this_is = CharSpan::new(TEXT, 0, 7).unwrap();
        assert_eq!(
            array.overlaps(Comparand::from(&this_is)).unwrap(),
            vec![true, true, false, false, false]
        );
        assert_eq!(
            array.contains(Comparand::from(&this_is)).unwrap(),
            vec![false, false, false, false, false]
        );
        let is = CharSpan::new(TEXT, 5, 7).unwrap();
        assert_eq!(
            array.contains(Comparand::from(&is)).unwrap(),
            vec![false, true, false, false, false]
        );
    }

    #[test]
    fn sum_means_combine() {
        let array = CharSpanArray::new(TEXT, vec![5, 0], vec![7, 2]).unwrap();
        let combined = array.reduce(Reduction::Sum).unwrap();
        assert_eq!(combined.offsets(), (0, 7));
        assert!(matches!(
            array.reduce(Reduction::Mean),
            Err(SpanError::Unsupported(_))
        ));

        let mut with_null = array.copy();
        with_null.set_item(1, None).unwrap();
        assert_eq!(
            with_null.combine().unwrap_err(),
            SpanError::NullInReduction { index: 1 }
        );
        assert!(CharSpanArray::empty(TEXT).combine().is_err());
    }

    #[test]
    fn from_spans_requires_one_text() {
        let array = sample();
        let spans: Vec<CharSpan> = array.iter().collect();
        assert!(CharSpanArray::from_spans(&spans).unwrap().equals(&array));

        let mut mixed = spans.clone();
        mixed.push(CharSpan::new("another", 0, 1).unwrap());
        assert_eq!(
            CharSpanArray::from_spans(&mixed).unwrap_err(),
            SpanError::TargetTextMismatch
        );
        assert!(CharSpanArray::from_spans(&[]).is_err());
    }

    #[test]
    fn first_null_row_follows_mutation() {
        let mut array = CharSpanArray::new("a b", vec![0, 2], vec![1, 3]).unwrap();
        assert_eq!(array.first_null_row(), None);
        array.set_item(1, None).unwrap();
        assert_eq!(array.first_null_row(), Some(1));
    }
}
