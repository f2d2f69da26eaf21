use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::{
    apply_mask, check_mask, check_range, check_reduction, covering_offsets, take_offsets, ArrayId,
    ArrayState, CharSpanArray, Reduction, SpanArray, SpanArrayDisplay,
};
use crate::span::{check_token_table, same_token_table, token_char_offsets, validate_offsets, NULL_OFFSET};
use crate::{SpanDtype, SpanError, SpanResult, TargetText, TokenSpan};

/// A column of token spans over a single token table.
///
/// The token table is a [`CharSpanArray`] giving the character offsets of each
/// token; this column stores begin (inclusive) and end (exclusive) token
/// indices into it. Character offsets are translated in one batch on first
/// use and cached until the next mutation.
pub struct TokenSpanArray {
    tokens: Arc<CharSpanArray>,
    begin_tokens: Vec<i64>,
    end_tokens: Vec<i64>,
    char_offsets: OnceCell<(Vec<i64>, Vec<i64>)>,
    state: ArrayState,
}

impl TokenSpanArray {
    /// Build a column from token index columns. Every pair must be the null
    /// pair or lie within the token table, and the table must have no null
    /// rows.
    pub fn new(tokens: Arc<CharSpanArray>, begin_tokens: Vec<i64>, end_tokens: Vec<i64>) -> SpanResult<Self> {
        if begin_tokens.len() != end_tokens.len() {
            return Err(SpanError::LengthMismatch {
                begins: begin_tokens.len(),
                ends: end_tokens.len(),
            });
        }
        check_token_table(&tokens)?;
        let limit = tokens.len();
        for (&begin, &end) in begin_tokens.iter().zip(&end_tokens) {
            validate_offsets(begin, end, limit)?;
        }
        Ok(Self::from_validated(tokens, begin_tokens, end_tokens))
    }

    /// An empty column over `tokens`.
    pub fn empty(tokens: Arc<CharSpanArray>) -> Self {
        Self::from_validated(tokens, Vec::new(), Vec::new())
    }

    /// Build a column from scalar token spans, which must share one token table.
    pub fn from_spans(spans: &[TokenSpan]) -> SpanResult<Self> {
        let first = spans.first().ok_or_else(|| {
            SpanError::EmptyInput("cannot infer the token table of an empty sequence of spans".to_string())
        })?;
        let tokens = first.tokens().clone();
        check_token_table(&tokens)?;
        let mut begin_tokens = Vec::with_capacity(spans.len());
        let mut end_tokens = Vec::with_capacity(spans.len());
        for span in spans {
            if !same_token_table(span.tokens(), &tokens) {
                return Err(SpanError::TokenTableMismatch);
            }
            begin_tokens.push(span.begin_token());
            end_tokens.push(span.end_token());
        }
        Ok(Self::from_validated(tokens, begin_tokens, end_tokens))
    }

    pub(crate) fn from_validated(tokens: Arc<CharSpanArray>, begin_tokens: Vec<i64>, end_tokens: Vec<i64>) -> Self {
        Self {
            tokens,
            begin_tokens,
            end_tokens,
            char_offsets: OnceCell::new(),
            state: ArrayState::new(),
        }
    }

    pub fn id(&self) -> ArrayId {
        self.state.id
    }

    /// The token table this column indexes into.
    pub fn tokens(&self) -> &Arc<CharSpanArray> {
        &self.tokens
    }

    pub fn begin_tokens(&self) -> &[i64] {
        &self.begin_tokens
    }

    pub fn end_tokens(&self) -> &[i64] {
        &self.end_tokens
    }

    fn translated(&self) -> &(Vec<i64>, Vec<i64>) {
        self.char_offsets.get_or_init(|| {
            self.begin_tokens
                .iter()
                .zip(&self.end_tokens)
                .map(|(&begin, &end)| token_char_offsets(&self.tokens, begin, end))
                .unzip()
        })
    }

    /// The same spans expressed in characters, over the token table's text.
    pub fn to_char_spans(&self) -> CharSpanArray {
        let (begins, ends) = self.translated();
        CharSpanArray::from_validated(self.target_text().clone(), begins.clone(), ends.clone())
    }

    /// The span at `index`, which is the null span for a null row.
    pub fn get(&self, index: usize) -> Option<TokenSpan> {
        let begin = *self.begin_tokens.get(index)?;
        Some(TokenSpan::from_parts(self.tokens.clone(), begin, self.end_tokens[index]))
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenSpan> + '_ {
        (0..self.begin_tokens.len()).filter_map(move |i| self.get(i))
    }

    pub fn slice(&self, range: Range<usize>) -> SpanResult<Self> {
        check_range(&range, self.len())?;
        Ok(Self::from_validated(
            self.tokens.clone(),
            self.begin_tokens[range.clone()].to_vec(),
            self.end_tokens[range].to_vec(),
        ))
    }

    pub fn filter(&self, mask: &[bool]) -> SpanResult<Self> {
        check_mask(mask, self.len())?;
        Ok(Self::from_validated(
            self.tokens.clone(),
            apply_mask(&self.begin_tokens, mask),
            apply_mask(&self.end_tokens, mask),
        ))
    }

    /// Overwrite a single row. `None` stores the null span.
    pub fn set_item(&mut self, index: usize, value: Option<&TokenSpan>) -> SpanResult<()> {
        if index >= self.len() {
            return Err(SpanError::IndexOutOfBounds {
                index: index as i64,
                len: self.len(),
            });
        }
        let (begin, end) = match value {
            None => (NULL_OFFSET, NULL_OFFSET),
            Some(span) if !same_token_table(span.tokens(), &self.tokens) => {
                return Err(SpanError::TokenTableMismatch)
            }
            Some(span) => (span.begin_token(), span.end_token()),
        };
        self.begin_tokens[index] = begin;
        self.end_tokens[index] = end;
        self.increment_version();
        Ok(())
    }

    /// Setting several rows at once is not supported; assign rows one at a
    /// time with [`set_item`](Self::set_item).
    pub fn set_items(&mut self, indices: &[usize], _value: Option<&TokenSpan>) -> SpanResult<()> {
        Err(SpanError::Unsupported(format!(
            "setting {} rows at once is not implemented",
            indices.len()
        )))
    }

    /// Deep copy of the token indices with its own identity and version
    /// numbering. The token table itself stays shared.
    pub fn copy(&self) -> Self {
        Self::from_validated(
            self.tokens.clone(),
            self.begin_tokens.clone(),
            self.end_tokens.clone(),
        )
    }

    /// Gather rows by position; see [`CharSpanArray::take`].
    pub fn take(&self, indices: &[i64], allow_fill: bool, fill_value: Option<&TokenSpan>) -> SpanResult<Self> {
        let fill = match fill_value {
            Some(span) if allow_fill => {
                if !same_token_table(span.tokens(), &self.tokens) {
                    return Err(SpanError::TokenTableMismatch);
                }
                (span.begin_token(), span.end_token())
            }
            _ => (NULL_OFFSET, NULL_OFFSET),
        };
        let (begins, ends) = take_offsets(&self.begin_tokens, &self.end_tokens, indices, allow_fill, fill)?;
        Ok(Self::from_validated(self.tokens.clone(), begins, ends))
    }

    /// Concatenate columns over one token table.
    pub fn concatenate(arrays: &[&TokenSpanArray]) -> SpanResult<Self> {
        let first = arrays
            .first()
            .ok_or_else(|| SpanError::EmptyInput("nothing to concatenate".to_string()))?;
        if arrays
            .iter()
            .any(|array| !same_token_table(&array.tokens, &first.tokens))
        {
            return Err(SpanError::TokenTableMismatch);
        }
        let total = arrays.iter().map(|array| array.len()).sum();
        let mut begins = Vec::with_capacity(total);
        let mut ends = Vec::with_capacity(total);
        for array in arrays {
            begins.extend_from_slice(&array.begin_tokens);
            ends.extend_from_slice(&array.end_tokens);
        }
        Ok(Self::from_validated(first.tokens.clone(), begins, ends))
    }

    /// True if both columns have equal token tables and the same token spans
    /// in the same order. Cached like [`CharSpanArray::equals`].
    pub fn equals(&self, other: &TokenSpanArray) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.state.equivalent.equals_with(other.id(), other.version(), || {
            self.begin_tokens == other.begin_tokens
                && self.end_tokens == other.end_tokens
                && same_token_table(&self.tokens, &other.tokens)
        })
    }

    /// True if `other` indexes into a token table equal to this column's.
    pub fn shares_tokens_with(&self, other: &TokenSpanArray) -> bool {
        same_token_table(&self.tokens, &other.tokens)
    }

    pub fn content_hash(&self) -> u64 {
        *self.state.hash.get_or_init(|| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.tokens.content_hash().hash(&mut hasher);
            self.begin_tokens.hash(&mut hasher);
            self.end_tokens.hash(&mut hasher);
            hasher.finish()
        })
    }

    /// Mark the contents as changed and invalidate every cached result,
    /// including the character offset translation.
    pub fn increment_version(&mut self) {
        self.char_offsets = OnceCell::new();
        self.state.increment_version();
    }

    /// The smallest token span covering every element.
    pub fn combine(&self) -> SpanResult<TokenSpan> {
        let (begin, end) = covering_offsets(&self.begin_tokens, &self.end_tokens)?;
        Ok(TokenSpan::from_parts(self.tokens.clone(), begin, end))
    }

    /// Column reduction; `Sum` combines, everything else is unsupported.
    pub fn reduce(&self, op: Reduction) -> SpanResult<TokenSpan> {
        check_reduction(op, self.dtype())?;
        self.combine()
    }

    pub fn display(&self) -> SpanArrayDisplay<'_> {
        SpanArrayDisplay::new(self)
    }
}

impl SpanArray for TokenSpanArray {
    fn dtype(&self) -> SpanDtype {
        SpanDtype::Token
    }

    fn len(&self) -> usize {
        self.begin_tokens.len()
    }

    fn target_text(&self) -> &TargetText {
        self.tokens.target_text()
    }

    fn char_begins(&self) -> &[i64] {
        &self.translated().0
    }

    fn char_ends(&self) -> &[i64] {
        &self.translated().1
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

    fn token_table(&self) -> Option<&Arc<CharSpanArray>> {
        Some(&self.tokens)
    }

    fn offsets_label(&self, index: usize) -> String {
        format!("[{}, {})", self.begin_tokens[index], self.end_tokens[index])
    }

    fn is_null_mask(&self) -> Vec<bool> {
        self.begin_tokens.iter().map(|&begin| begin == NULL_OFFSET).collect()
    }
}

impl Clone for TokenSpanArray {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl PartialEq for TokenSpanArray {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for TokenSpanArray {}

impl Hash for TokenSpanArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.content_hash());
    }
}

impl fmt::Debug for TokenSpanArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSpanArray")
            .field("len", &self.len())
            .field("num_tokens", &self.tokens.len())
            .field("version", &self.state.version)
            .field("spans", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
