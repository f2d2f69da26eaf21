use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{shorten, validate_offsets, CharSpan, Interval, NULL_OFFSET};
use crate::{CharSpanArray, SpanArray, SpanError, SpanResult, TargetText};

/// A span over a range of tokens; one row of a [`TokenSpanArray`](crate::TokenSpanArray).
///
/// `begin_token` is inclusive and `end_token` exclusive. Character offsets are
/// looked up in the token table once, at construction.
#[derive(Clone)]
pub struct TokenSpan {
    tokens: Arc<CharSpanArray>,
    begin_token: i64,
    end_token: i64,
    begin: i64,
    end: i64,
}

impl TokenSpan {
    /// Fails if the offsets fall outside the token table or the table has a
    /// null row.
    pub fn new(tokens: Arc<CharSpanArray>, begin_token: i64, end_token: i64) -> SpanResult<Self> {
        check_token_table(&tokens)?;
        validate_offsets(begin_token, end_token, tokens.len())?;
        Ok(Self::from_parts(tokens, begin_token, end_token))
    }

    /// The null span over `tokens`.
    pub fn null(tokens: Arc<CharSpanArray>) -> Self {
        Self {
            tokens,
            begin_token: NULL_OFFSET,
            end_token: NULL_OFFSET,
            begin: NULL_OFFSET,
            end: NULL_OFFSET,
        }
    }

    pub(crate) fn from_parts(tokens: Arc<CharSpanArray>, begin_token: i64, end_token: i64) -> Self {
        let (begin, end) = token_char_offsets(&tokens, begin_token, end_token);
        Self {
            tokens,
            begin_token,
            end_token,
            begin,
            end,
        }
    }

    /// The token table this span indexes into.
    pub fn tokens(&self) -> &Arc<CharSpanArray> {
        &self.tokens
    }

    pub fn begin_token(&self) -> i64 {
        self.begin_token
    }

    pub fn end_token(&self) -> i64 {
        self.end_token
    }

    /// Number of tokens covered; zero for the null span.
    pub fn num_tokens(&self) -> usize {
        if self.is_null() {
            0
        } else {
            (self.end_token - self.begin_token) as usize
        }
    }

    /// The same interval expressed in characters.
    pub fn as_char_span(&self) -> CharSpan {
        CharSpan::from_parts(self.tokens.target_text().clone(), self.begin, self.end)
    }
}

impl Interval for TokenSpan {
    fn begin(&self) -> i64 {
        self.begin
    }

    fn end(&self) -> i64 {
        self.end
    }

    fn target_text(&self) -> &TargetText {
        self.tokens.target_text()
    }

    fn token_table(&self) -> Option<&Arc<CharSpanArray>> {
        Some(&self.tokens)
    }

    fn is_null(&self) -> bool {
        self.begin_token == NULL_OFFSET
    }
}

impl PartialEq for TokenSpan {
    fn eq(&self, other: &Self) -> bool {
        self.begin_token == other.begin_token
            && self.end_token == other.end_token
            && same_token_table(&self.tokens, &other.tokens)
    }
}

impl Eq for TokenSpan {}

impl Hash for TokenSpan {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tokens.target_text().hash(state);
        self.begin_token.hash(state);
        self.end_token.hash(state);
    }
}

impl fmt::Display for TokenSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.covered_text() {
            Some(covered) => write!(
                f,
                "[{}, {}): '{}'",
                self.begin,
                self.end,
                shorten(covered, 80)
            ),
            None => f.write_str("NA"),
        }
    }
}

impl fmt::Debug for TokenSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tokens [{}, {}) ", self.begin_token, self.end_token)?;
        fmt::Display::fmt(self, f)
    }
}

/// Two token tables are the same when they are the same allocation or
/// structurally equal.
pub(crate) fn same_token_table(a: &Arc<CharSpanArray>, b: &Arc<CharSpanArray>) -> bool {
    Arc::ptr_eq(a, b) || a.equals(b)
}

/// Token spans translate through every row of their table, so a table with a
/// null row cannot carry them.
pub(crate) fn check_token_table(tokens: &CharSpanArray) -> SpanResult<()> {
    match tokens.first_null_row() {
        Some(index) => Err(SpanError::NullTokenRow { index }),
        None => Ok(()),
    }
}

/// Character offsets of the token range `[begin_token, end_token)`.
///
/// A zero-length range at token `k` sits at the begin of token `k`, or at the
/// end of the last token when `k` is one past the end.
pub(crate) fn token_char_offsets(tokens: &CharSpanArray, begin_token: i64, end_token: i64) -> (i64, i64) {
    if begin_token == NULL_OFFSET {
        return (NULL_OFFSET, NULL_OFFSET);
    }
    let begins = tokens.begins();
    let ends = tokens.ends();
    let num_tokens = begins.len();
    if begin_token == end_token {
        let offset = if (begin_token as usize) < num_tokens {
            begins[begin_token as usize]
        } else if num_tokens > 0 {
            ends[num_tokens - 1]
        } else {
            0
        };
        (offset, offset)
    } else {
        (begins[begin_token as usize], ends[end_token as usize - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "new york city hall"
    fn tokens() -> Arc<CharSpanArray> {
        Arc::new(
            CharSpanArray::new("new york city hall", vec![0, 4, 9, 14], vec![3, 8, 13, 18]).unwrap(),
        )
    }

    #[test]
    fn char_offsets_follow_token_table() {
        let span = TokenSpan::new(tokens(), 1, 3).unwrap();
        assert_eq!(span.begin(), 4);
        assert_eq!(span.end(), 13);
        assert_eq!(span.covered_text(), Some("york city"));
        assert_eq!(span.num_tokens(), 2);
        assert_eq!(span.to_string(), "[4, 13): 'york city'");
        assert_eq!(format!("{:?}", span), "tokens [1, 3) [4, 13): 'york city'");
    }

    #[test]
    fn zero_length_token_spans() {
        let at_start = TokenSpan::new(tokens(), 2, 2).unwrap();
        assert_eq!((at_start.begin(), at_start.end()), (9, 9));
        assert_eq!(at_start.covered_text(), Some(""));

        let at_end = TokenSpan::new(tokens(), 4, 4).unwrap();
        assert_eq!((at_end.begin(), at_end.end()), (18, 18));
    }

    #[test]
    fn construction_validates_token_indices() {
        assert!(matches!(
            TokenSpan::new(tokens(), 3, 5),
            Err(SpanError::InvalidOffsets { .. })
        ));
        assert!(TokenSpan::new(tokens(), 2, 1).is_err());
        assert!(TokenSpan::new(tokens(), -1, 2).is_err());
        assert!(TokenSpan::new(tokens(), -1, -1).unwrap().is_null());
    }

    #[test]
    fn behaves_like_char_span() {
        let toks = tokens();
        let new_york = TokenSpan::new(toks.clone(), 0, 2).unwrap();
        let city = TokenSpan::new(toks.clone(), 2, 3).unwrap();
        let york_city = TokenSpan::new(toks.clone(), 1, 3).unwrap();

        assert!(new_york.precedes(&city).unwrap());
        assert!(city.follows(&new_york).unwrap());
        assert!(new_york.overlaps(&york_city));
        assert!(york_city.contains(&city));

        // Comparable against plain character spans too
        let york_chars = CharSpan::new(toks.target_text().clone(), 4, 8).unwrap();
        assert!(new_york.contains(&york_chars));
        assert_eq!(new_york.as_char_span(), CharSpan::new(toks.target_text().clone(), 0, 8).unwrap());
    }

    #[test]
    fn equality_compares_token_tables() {
        let a = TokenSpan::new(tokens(), 0, 2).unwrap();
        // Separate but structurally equal token table
        let b = TokenSpan::new(tokens(), 0, 2).unwrap();
        assert_eq!(a, b);

        let other_table = Arc::new(
            CharSpanArray::new("new york city hall", vec![0, 4], vec![3, 8]).unwrap(),
        );
        let c = TokenSpan::new(other_table, 0, 2).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn token_tables_with_null_rows_are_rejected() {
        let mut table = CharSpanArray::new("new york", vec![0, 4], vec![3, 8]).unwrap();
        table.set_item(0, None).unwrap();
        let table = Arc::new(table);

        assert_eq!(
            TokenSpan::new(table.clone(), 1, 2).unwrap_err(),
            SpanError::NullTokenRow { index: 0 }
        );
        let null = TokenSpan::null(table);
        assert!(null.is_null());
        assert_eq!(null.covered_text(), None);
    }
}
