//! Options for the interval-algebra operations.
//!
//! Every option struct has a `Default` matching the usual call, can be
//! adjusted with `with_*` builders, and can be read from RON:
//!
//! ```
//! use layered_span_algebra::JoinOptions;
//!
//! let options = JoinOptions::from_ron("(first_name: \"person\", max_gap: 2)").unwrap();
//! assert_eq!(options.first_name, "person");
//! assert_eq!(options.second_name, "second");
//! assert_eq!((options.min_gap, options.max_gap), (0, 2));
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{AlgebraError, AlgebraResult};

fn from_ron<T: DeserializeOwned>(text: &str) -> AlgebraResult<T> {
    ron::from_str(text).map_err(|e| AlgebraError::Config {
        message: e.to_string(),
    })
}

/// Options for [`extract_dict`](crate::extract_dict).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictOptions {
    /// Name of the match column in the returned table.
    pub output_col_name: String,
}

impl Default for DictOptions {
    fn default() -> Self {
        Self {
            output_col_name: "match".to_string(),
        }
    }
}

impl DictOptions {
    pub fn from_ron(text: &str) -> AlgebraResult<Self> {
        from_ron(text)
    }

    pub fn with_output_col_name(mut self, name: impl Into<String>) -> Self {
        self.output_col_name = name.into();
        self
    }
}

/// Options for [`extract_regex_tok`](crate::extract_regex_tok).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegexTokOptions {
    /// Minimum match length in tokens, inclusive.
    pub min_len: usize,
    /// Maximum match length in tokens, inclusive.
    pub max_len: usize,
    /// Name of the match column in the returned table.
    pub output_col_name: String,
}

impl Default for RegexTokOptions {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: 1,
            output_col_name: "match".to_string(),
        }
    }
}

impl RegexTokOptions {
    pub fn from_ron(text: &str) -> AlgebraResult<Self> {
        from_ron(text)
    }

    pub fn with_len(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len;
        self
    }

    pub fn with_output_col_name(mut self, name: impl Into<String>) -> Self {
        self.output_col_name = name.into();
        self
    }
}

/// Options for [`adjacent_join`](crate::adjacent_join).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinOptions {
    /// Column name for spans from the first input.
    pub first_name: String,
    /// Column name for spans from the second input.
    pub second_name: String,
    /// Minimum number of tokens between a pair, inclusive.
    pub min_gap: i64,
    /// Maximum number of tokens between a pair, inclusive.
    pub max_gap: i64,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            first_name: "first".to_string(),
            second_name: "second".to_string(),
            min_gap: 0,
            max_gap: 0,
        }
    }
}

impl JoinOptions {
    pub fn from_ron(text: &str) -> AlgebraResult<Self> {
        from_ron(text)
    }

    pub fn with_gap(mut self, min_gap: i64, max_gap: i64) -> Self {
        self.min_gap = min_gap;
        self.max_gap = max_gap;
        self
    }

    pub fn with_names(mut self, first_name: impl Into<String>, second_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.second_name = second_name.into();
        self
    }
}

/// Options for [`lemmatize`](crate::lemmatize).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LemmaOptions {
    /// Token feature column holding one lemma per token.
    pub lemma_col_name: String,
}

impl Default for LemmaOptions {
    fn default() -> Self {
        Self {
            lemma_col_name: "lemma".to_string(),
        }
    }
}

impl LemmaOptions {
    pub fn from_ron(text: &str) -> AlgebraResult<Self> {
        from_ron(text)
    }

    pub fn with_lemma_col_name(mut self, name: impl Into<String>) -> Self {
        self.lemma_col_name = name.into();
        self
    }
}
