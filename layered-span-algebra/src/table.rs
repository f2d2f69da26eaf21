//! Result tables produced by the matching and join operations.

use std::fmt;

use layered_spans::{SpanArray, TokenSpan, TokenSpanArray};

/// One named column of token spans, one row per match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTable {
    name: String,
    spans: TokenSpanArray,
}

impl MatchTable {
    pub fn new(name: impl Into<String>, spans: TokenSpanArray) -> Self {
        MatchTable {
            name: name.into(),
            spans,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spans(&self) -> &TokenSpanArray {
        &self.spans
    }

    pub fn into_spans(self) -> TokenSpanArray {
        self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The span column if `name` matches this table's column.
    pub fn column(&self, name: &str) -> Option<&TokenSpanArray> {
        (name == self.name).then_some(&self.spans)
    }
}

impl fmt::Display for MatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (index, span) in self.spans.iter().enumerate() {
            write!(f, "\n{}: {}", index, span)?;
        }
        Ok(())
    }
}

/// Two named columns of token spans, one row per matched pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTable {
    first_name: String,
    second_name: String,
    first: TokenSpanArray,
    second: TokenSpanArray,
}

impl JoinTable {
    /// Both columns must have the same length.
    pub(crate) fn new(
        first_name: impl Into<String>,
        second_name: impl Into<String>,
        first: TokenSpanArray,
        second: TokenSpanArray,
    ) -> Self {
        debug_assert_eq!(first.len(), second.len());
        JoinTable {
            first_name: first_name.into(),
            second_name: second_name.into(),
            first,
            second,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn second_name(&self) -> &str {
        &self.second_name
    }

    pub fn first(&self) -> &TokenSpanArray {
        &self.first
    }

    pub fn second(&self) -> &TokenSpanArray {
        &self.second
    }

    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a column by name; the first column wins if both share a name.
    pub fn column(&self, name: &str) -> Option<&TokenSpanArray> {
        if name == self.first_name {
            Some(&self.first)
        } else if name == self.second_name {
            Some(&self.second)
        } else {
            None
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = (TokenSpan, TokenSpan)> + '_ {
        self.first.iter().zip(self.second.iter())
    }
}

impl fmt::Display for JoinTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.first_name, self.second_name)?;
        for (index, (first, second)) in self.pairs().enumerate() {
            write!(f, "\n{}: {} | {}", index, first, second)?;
        }
        Ok(())
    }
}
