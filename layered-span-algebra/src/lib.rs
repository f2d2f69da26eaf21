#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Interval algebra over span columns for layered-nlp.
//!
//! Every operation reads its inputs and returns freshly allocated columns, so
//! operations may run concurrently over columns nobody is mutating.
//!
//! ## Matching
//!
//! - [`extract_dict`] - Token runs that equal a [`Dictionary`] entry
//! - [`extract_regex_tok`] - Token windows whose text fully matches a [`FullMatch`] predicate
//!
//! ## Joining and combining
//!
//! - [`adjacent_join`] - Pairs of spans a bounded number of tokens apart
//! - [`combine_spans`] / [`combine_char_spans`] - Row-wise covering spans
//! - [`combine_agg`] - One covering span for a whole column
//!
//! ## Token features
//!
//! - [`lemmatize`] - Space-joined lemmas for each span, from [`TokenFeatures`]
//!
//! ## Example
//!
//! ```
//! use layered_span_algebra::{adjacent_join, extract_dict, Dictionary, DictOptions, JoinOptions};
//! use layered_spans::{CharSpanArray, SpanArray};
//! use std::sync::Arc;
//!
//! let tokens = Arc::new(
//!     CharSpanArray::new("Mr. Smith of New York", vec![0, 4, 10, 13, 17], vec![3, 9, 12, 16, 21]).unwrap(),
//! );
//! let people = extract_dict(&tokens, &Dictionary::from_phrases(["Smith"]).unwrap(), &DictOptions::default()).unwrap();
//! let places = extract_dict(&tokens, &Dictionary::from_phrases(["new york"]).unwrap(), &DictOptions::default()).unwrap();
//!
//! let pairs = adjacent_join(people.spans(), places.spans(), &JoinOptions::default().with_gap(1, 1)).unwrap();
//! assert_eq!(pairs.first().covered_text(), vec![Some("Smith")]);
//! assert_eq!(pairs.second().covered_text(), vec![Some("New York")]);
//! ```

mod adjacent;
mod combine;
mod config;
mod dictionary;
mod errors;
mod lemmatize;
mod regex_tok;
mod table;

pub use adjacent::adjacent_join;
pub use combine::{combine_agg, combine_char_spans, combine_spans, combine_token_spans};
pub use config::{DictOptions, JoinOptions, LemmaOptions, RegexTokOptions};
pub use dictionary::{extract_dict, Dictionary};
pub use errors::{AlgebraError, AlgebraResult};
pub use lemmatize::{lemmatize, TokenFeatures};
pub use regex_tok::{extract_regex_tok, FullMatch, FullMatchRegex};
pub use table::{JoinTable, MatchTable};
