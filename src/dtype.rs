//! Type descriptors for span columns.
//!
//! A [`SpanDtype`] identifies which kind of span a column holds to code that
//! only sees columns through [`SpanArray`](crate::SpanArray) or
//! [`SpanColumn`](crate::SpanColumn), and resolves the registered type names.

use std::fmt;
use std::str::FromStr;

use crate::{SpanError, SpanResult};

/// The kind of span stored in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanDtype {
    /// Column of [`CharSpan`](crate::CharSpan), stored as a [`CharSpanArray`](crate::CharSpanArray).
    Char,
    /// Column of [`TokenSpan`](crate::TokenSpan), stored as a [`TokenSpanArray`](crate::TokenSpanArray).
    Token,
}

impl SpanDtype {
    /// Registered name of the column type.
    pub fn name(&self) -> &'static str {
        match self {
            SpanDtype::Char => "CharSpanType",
            SpanDtype::Token => "TokenSpanType",
        }
    }

    /// Name of the scalar type a single row of the column holds.
    pub fn scalar_name(&self) -> &'static str {
        match self {
            SpanDtype::Char => "CharSpan",
            SpanDtype::Token => "TokenSpan",
        }
    }

    /// Name of the column type that stores this dtype.
    pub fn array_name(&self) -> &'static str {
        match self {
            SpanDtype::Char => "CharSpanArray",
            SpanDtype::Token => "TokenSpanArray",
        }
    }
}

impl FromStr for SpanDtype {
    type Err = SpanError;

    fn from_str(name: &str) -> SpanResult<Self> {
        match name {
            "CharSpanType" => Ok(SpanDtype::Char),
            "TokenSpanType" => Ok(SpanDtype::Token),
            other => Err(SpanError::UnknownDtype(other.to_string())),
        }
    }
}

impl fmt::Display for SpanDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
