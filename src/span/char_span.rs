use std::fmt;
use std::hash::{Hash, Hasher};

use super::{shorten, validate_offsets, Interval, NULL_OFFSET};
use crate::{SpanResult, TargetText};

/// A single span with character offsets; one row of a [`CharSpanArray`](crate::CharSpanArray).
///
/// The null span (both offsets at the private null sentinel) stands for
/// "no span" and carries the target text of the column it came from.
#[derive(Clone)]
pub struct CharSpan {
    text: TargetText,
    begin: i64,
    end: i64,
}

impl CharSpan {
    /// Create a span over `text`.
    ///
    /// `begin` is inclusive and `end` exclusive, both in characters.
    pub fn new(text: impl Into<TargetText>, begin: i64, end: i64) -> SpanResult<Self> {
        let text = text.into();
        validate_offsets(begin, end, text.char_len())?;
        Ok(Self { text, begin, end })
    }

    /// The null span over `text`.
    pub fn null(text: impl Into<TargetText>) -> Self {
        Self {
            text: text.into(),
            begin: NULL_OFFSET,
            end: NULL_OFFSET,
        }
    }

    /// Offsets already known to be valid for `text`.
    pub(crate) fn from_parts(text: TargetText, begin: i64, end: i64) -> Self {
        Self { text, begin, end }
    }

    /// Offsets as a pair.
    pub fn offsets(&self) -> (i64, i64) {
        (self.begin, self.end)
    }
}

impl Interval for CharSpan {
    fn begin(&self) -> i64 {
        self.begin
    }

    fn end(&self) -> i64 {
        self.end
    }

    fn target_text(&self) -> &TargetText {
        &self.text
    }
}

impl PartialEq for CharSpan {
    fn eq(&self, other: &Self) -> bool {
        self.begin == other.begin && self.end == other.end && self.text == other.text
    }
}

impl Eq for CharSpan {}

impl Hash for CharSpan {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.begin.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Display for CharSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.covered_text() {
            Some(covered) => write!(f, "[{}, {}): '{}'", self.begin, self.end, shorten(covered, 80)),
            None => f.write_str("NA"),
        }
    }
}

impl fmt::Debug for CharSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
