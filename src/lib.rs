#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Columnar span storage for layered-nlp.
//!
//! Spans are half-open intervals over a shared body of text, addressed either
//! by character offsets or by ranges of tokens.
//!
//! ## Core Types
//!
//! - [`TargetText`] - Shared document text, offsets counted in characters
//! - [`CharSpan`] / [`TokenSpan`] - Immutable span values implementing [`Interval`]
//! - [`CharSpanArray`] / [`TokenSpanArray`] - Columns of spans implementing [`SpanArray`]
//! - [`SpanDtype`] - Identifies the kind of span a column holds
//! - [`SpanColumn`] / [`AnySpan`] - Either kind, decided at construction
//!
//! ## Example
//!
//! ```
//! use layered_spans::{CharSpanArray, Interval, SpanArray, TokenSpanArray};
//! use std::sync::Arc;
//!
//! let tokens = Arc::new(
//!     CharSpanArray::new("new york city", vec![0, 4, 9], vec![3, 8, 13]).unwrap(),
//! );
//! let spans = TokenSpanArray::new(tokens, vec![0, 2], vec![2, 3]).unwrap();
//! assert_eq!(spans.covered_text(), vec![Some("new york"), Some("city")]);
//!
//! let combined = spans.combine().unwrap();
//! assert_eq!(combined.covered_text(), Some("new york city"));
//! ```
//!
//! ## Mutation and caching
//!
//! Columns are mutated in place only through `set_item`, which bumps the
//! column's version and clears every cache derived from its contents. Columns
//! take no locks for mutation; share them across threads only for reading.

mod array;
mod column;
mod dtype;
mod errors;
mod span;
mod target_text;

pub use array::{
    ArrayId, CharSpanArray, CompareOp, Comparand, Reduction, SpanArray, SpanArrayDisplay,
    TokenSpanArray,
};
pub use column::{AnySpan, SpanColumn};
pub use dtype::SpanDtype;
pub use errors::{SpanError, SpanResult};
pub use span::{CharSpan, Interval, TokenSpan, NULL_OFFSET};
pub use target_text::TargetText;
