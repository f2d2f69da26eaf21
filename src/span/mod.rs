//! Span value types.
//!
//! A span is a half-open interval `[begin, end)` over a shared [`TargetText`].
//! [`CharSpan`] addresses characters directly; [`TokenSpan`] addresses a range
//! of tokens and derives its character offsets from a token table. Both expose
//! the same [`Interval`] capability set, so ordering, overlap and containment
//! behave identically at the character level.

mod char_span;
mod token_span;

pub use char_span::CharSpan;
pub use token_span::TokenSpan;

pub(crate) use token_span::{check_token_table, same_token_table, token_char_offsets};

use std::sync::Arc;

use crate::{CharSpanArray, SpanError, SpanResult, TargetText};

/// Begin/end value that marks "not a span", the way NaN marks "not a number".
pub const NULL_OFFSET: i64 = -1;

/// Capabilities shared by every span over a target text.
///
/// Ordering is a strict partial order: `a` precedes `b` iff `a.end <= b.begin`.
/// Overlapping spans neither precede nor follow one another, so callers must
/// not assume trichotomy.
pub trait Interval {
    /// Character offset of the first covered character, or the null sentinel.
    fn begin(&self) -> i64;

    /// Character offset one past the last covered character, or the null sentinel.
    fn end(&self) -> i64;

    fn target_text(&self) -> &TargetText;

    /// The token table behind a token span; `None` for character spans.
    fn token_table(&self) -> Option<&Arc<CharSpanArray>> {
        None
    }

    fn is_null(&self) -> bool {
        self.begin() == NULL_OFFSET
    }

    /// The substring of the target text this span covers. `None` for the null span.
    fn covered_text(&self) -> Option<&str> {
        if self.is_null() {
            None
        } else {
            Some(self.target_text().slice(self.begin() as usize, self.end() as usize))
        }
    }

    /// True if both spans cover the same offsets (including coincident
    /// zero-length spans) or the intervals properly intersect.
    fn overlaps(&self, other: &dyn Interval) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        if self.begin() == other.begin() && self.end() == other.end() {
            return true;
        }
        !(other.begin() >= self.end() || other.end() <= self.begin())
    }

    /// True if `other` lies entirely within this span.
    fn contains(&self, other: &dyn Interval) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        other.begin() >= self.begin() && other.end() <= self.end()
    }

    /// `self < other`: this span ends at or before `other` begins.
    fn precedes(&self, other: &dyn Interval) -> SpanResult<bool> {
        if self.target_text() != other.target_text() {
            return Err(SpanError::TargetTextMismatch);
        }
        if self.is_null() || other.is_null() {
            return Ok(false);
        }
        Ok(self.end() <= other.begin())
    }

    /// `self > other`: `other` ends at or before this span begins.
    fn follows(&self, other: &dyn Interval) -> SpanResult<bool> {
        if self.target_text() != other.target_text() {
            return Err(SpanError::TargetTextMismatch);
        }
        if self.is_null() || other.is_null() {
            return Ok(false);
        }
        Ok(other.end() <= self.begin())
    }

    /// `self <= other`: precedes `other` or covers the same offsets.
    fn precedes_or_eq(&self, other: &dyn Interval) -> SpanResult<bool> {
        Ok(self.precedes(other)? || same_offsets(self.begin(), self.end(), other))
    }

    /// `self >= other`: follows `other` or covers the same offsets.
    fn follows_or_eq(&self, other: &dyn Interval) -> SpanResult<bool> {
        Ok(self.follows(other)? || same_offsets(self.begin(), self.end(), other))
    }

    /// Show the span in the context of its target text:
    /// `<text before>[<covered text>]<text after>`, with `...` wherever the
    /// window stops short of the text boundary.
    fn context(&self, num_chars: usize) -> String {
        if self.is_null() {
            return "NA".to_string();
        }
        let text = self.target_text();
        let begin = self.begin() as usize;
        let end = self.end() as usize;

        let before_begin = begin.saturating_sub(num_chars);
        let after_end = end.saturating_add(num_chars).min(text.char_len());

        let mut rendered = String::new();
        if begin > num_chars {
            rendered.push_str("...");
        }
        rendered.push_str(text.slice(before_begin, begin));
        rendered.push('[');
        rendered.push_str(text.slice(begin, end));
        rendered.push(']');
        rendered.push_str(text.slice(end, after_end));
        if end.saturating_add(num_chars) < text.char_len() {
            rendered.push_str("...");
        }
        rendered
    }
}

fn same_offsets(begin: i64, end: i64, other: &dyn Interval) -> bool {
    begin != NULL_OFFSET && !other.is_null() && begin == other.begin() && end == other.end()
}

/// Reject offsets that describe neither the null span nor a valid interval
/// inside `[0, limit]`.
pub(crate) fn validate_offsets(begin: i64, end: i64, limit: usize) -> SpanResult<()> {
    let invalid = |message: String| SpanError::InvalidOffsets {
        begin,
        end,
        message,
    };
    if begin == NULL_OFFSET {
        if end != NULL_OFFSET {
            return Err(invalid(format!(
                "null begin offset {} must be paired with a null end offset",
                NULL_OFFSET
            )));
        }
        return Ok(());
    }
    if begin < 0 {
        return Err(invalid("begin must be >= 0".to_string()));
    }
    if end < 0 {
        return Err(invalid("end must be >= 0".to_string()));
    }
    if end < begin {
        return Err(invalid("end must not precede begin".to_string()));
    }
    if end as u64 > limit as u64 {
        return Err(invalid(format!("end exceeds target length {}", limit)));
    }
    Ok(())
}

const SHORTEN_PLACEHOLDER: &str = " [...]";

/// Collapse whitespace and truncate on a word boundary to at most `width`
/// characters, marking the cut with ` [...]`.
pub(crate) fn shorten(text: &str, width: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(SHORTEN_PLACEHOLDER.chars().count());
    let mut shortened = String::new();
    for word in words {
        let extra = if shortened.is_empty() { 0 } else { 1 };
        if shortened.chars().count() + extra + word.chars().count() > budget {
            break;
        }
        if extra == 1 {
            shortened.push(' ');
        }
        shortened.push_str(word);
    }
    if shortened.is_empty() {
        SHORTEN_PLACEHOLDER.trim_start().to_string()
    } else {
        shortened.push_str(SHORTEN_PLACEHOLDER);
        shortened
    }
}
