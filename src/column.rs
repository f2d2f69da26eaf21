//! Tagged unions over the two span kinds.
//!
//! Code that accepts "a column of spans, whichever kind" takes a
//! [`SpanColumn`]; the kind is fixed when the value is built, so an input of
//! the wrong shape is rejected at construction rather than discovered later.

use std::fmt;
use std::sync::Arc;

use crate::{
    CharSpan, CharSpanArray, Interval, SpanArray, SpanDtype, SpanError, SpanResult, TargetText,
    TokenSpan, TokenSpanArray,
};

/// One span of either kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnySpan {
    Char(CharSpan),
    Token(TokenSpan),
}

impl AnySpan {
    pub fn dtype(&self) -> SpanDtype {
        match self {
            AnySpan::Char(_) => SpanDtype::Char,
            AnySpan::Token(_) => SpanDtype::Token,
        }
    }

    pub fn as_char(&self) -> Option<&CharSpan> {
        match self {
            AnySpan::Char(span) => Some(span),
            AnySpan::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&TokenSpan> {
        match self {
            AnySpan::Token(span) => Some(span),
            AnySpan::Char(_) => None,
        }
    }
}

impl Interval for AnySpan {
    fn begin(&self) -> i64 {
        match self {
            AnySpan::Char(span) => span.begin(),
            AnySpan::Token(span) => span.begin(),
        }
    }

    fn end(&self) -> i64 {
        match self {
            AnySpan::Char(span) => span.end(),
            AnySpan::Token(span) => span.end(),
        }
    }

    fn target_text(&self) -> &TargetText {
        match self {
            AnySpan::Char(span) => span.target_text(),
            AnySpan::Token(span) => span.target_text(),
        }
    }

    fn token_table(&self) -> Option<&Arc<CharSpanArray>> {
        match self {
            AnySpan::Char(_) => None,
            AnySpan::Token(span) => span.token_table(),
        }
    }

    fn is_null(&self) -> bool {
        match self {
            AnySpan::Char(span) => span.is_null(),
            AnySpan::Token(span) => span.is_null(),
        }
    }
}

impl From<CharSpan> for AnySpan {
    fn from(span: CharSpan) -> Self {
        AnySpan::Char(span)
    }
}

impl From<TokenSpan> for AnySpan {
    fn from(span: TokenSpan) -> Self {
        AnySpan::Token(span)
    }
}

impl fmt::Display for AnySpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnySpan::Char(span) => fmt::Display::fmt(span, f),
            AnySpan::Token(span) => fmt::Display::fmt(span, f),
        }
    }
}

/// A column of spans of a single kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanColumn {
    Char(CharSpanArray),
    Token(TokenSpanArray),
}

impl SpanColumn {
    /// Collect scalar spans into a column. All spans must be of one kind and
    /// share one target text (or token table).
    pub fn from_spans(spans: Vec<AnySpan>) -> SpanResult<Self> {
        let dtype = spans
            .first()
            .map(AnySpan::dtype)
            .ok_or_else(|| SpanError::EmptyInput("cannot build a column from no spans".to_string()))?;
        match dtype {
            SpanDtype::Char => {
                let spans = spans
                    .into_iter()
                    .map(|span| match span {
                        AnySpan::Char(span) => Ok(span),
                        AnySpan::Token(_) => Err(mixed_kinds()),
                    })
                    .collect::<SpanResult<Vec<_>>>()?;
                Ok(SpanColumn::Char(CharSpanArray::from_spans(&spans)?))
            }
            SpanDtype::Token => {
                let spans = spans
                    .into_iter()
                    .map(|span| match span {
                        AnySpan::Token(span) => Ok(span),
                        AnySpan::Char(_) => Err(mixed_kinds()),
                    })
                    .collect::<SpanResult<Vec<_>>>()?;
                Ok(SpanColumn::Token(TokenSpanArray::from_spans(&spans)?))
            }
        }
    }

    pub fn dtype(&self) -> SpanDtype {
        match self {
            SpanColumn::Char(_) => SpanDtype::Char,
            SpanColumn::Token(_) => SpanDtype::Token,
        }
    }

    /// The column behind its shared capability set.
    pub fn as_array(&self) -> &dyn SpanArray {
        match self {
            SpanColumn::Char(array) => array,
            SpanColumn::Token(array) => array,
        }
    }

    pub fn len(&self) -> usize {
        self.as_array().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<AnySpan> {
        match self {
            SpanColumn::Char(array) => array.get(index).map(AnySpan::Char),
            SpanColumn::Token(array) => array.get(index).map(AnySpan::Token),
        }
    }

    /// The smallest span covering every element, of the column's own kind.
    pub fn combine(&self) -> SpanResult<AnySpan> {
        match self {
            SpanColumn::Char(array) => array.combine().map(AnySpan::Char),
            SpanColumn::Token(array) => array.combine().map(AnySpan::Token),
        }
    }
}

fn mixed_kinds() -> SpanError {
    SpanError::Unsupported("a column cannot mix character spans and token spans".to_string())
}

impl From<CharSpanArray> for SpanColumn {
    fn from(array: CharSpanArray) -> Self {
        SpanColumn::Char(array)
    }
}

impl From<TokenSpanArray> for SpanColumn {
    fn from(array: TokenSpanArray) -> Self {
        SpanColumn::Token(array)
    }
}
