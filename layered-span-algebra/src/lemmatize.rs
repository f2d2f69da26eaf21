//! Per-token features and span lemmatization.

use std::collections::BTreeMap;

use layered_spans::{SpanArray, TokenSpanArray};

use crate::{AlgebraError, AlgebraResult, LemmaOptions};

/// Named string columns indexed by token position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFeatures {
    len: usize,
    columns: BTreeMap<String, Vec<String>>,
}

impl TokenFeatures {
    /// An empty feature table for `len` tokens.
    pub fn new(len: usize) -> Self {
        TokenFeatures {
            len,
            columns: BTreeMap::new(),
        }
    }

    /// Takes self
    pub fn with_column<S: Into<String>>(mut self, name: impl Into<String>, values: Vec<S>) -> AlgebraResult<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Add or replace a column, which must have one value per token.
    pub fn insert_column<S: Into<String>>(&mut self, name: impl Into<String>, values: Vec<S>) -> AlgebraResult<()> {
        let name = name.into();
        if values.len() != self.len {
            return Err(AlgebraError::FeatureLength {
                name,
                expected: self.len,
                actual: values.len(),
            });
        }
        self.columns
            .insert(name, values.into_iter().map(Into::into).collect());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// Join the lemmas of the tokens each span covers with single spaces.
///
/// Spans covering no tokens give an empty string; null spans give `None`.
/// `features` must describe the token table `spans` is defined over.
pub fn lemmatize(
    spans: &TokenSpanArray,
    features: &TokenFeatures,
    options: &LemmaOptions,
) -> AlgebraResult<Vec<Option<String>>> {
    let lemmas = features
        .column(&options.lemma_col_name)
        .ok_or_else(|| AlgebraError::MissingFeature(options.lemma_col_name.clone()))?;
    let num_tokens = spans.tokens().len();
    if lemmas.len() != num_tokens {
        return Err(AlgebraError::FeatureLength {
            name: options.lemma_col_name.clone(),
            expected: num_tokens,
            actual: lemmas.len(),
        });
    }
    tracing::debug!(spans = spans.len(), "lemmatize");

    let nulls = spans.is_null_mask();
    Ok(spans
        .begin_tokens()
        .iter()
        .zip(spans.end_tokens())
        .zip(nulls)
        .map(|((&begin, &end), null)| {
            (!null).then(|| lemmas[begin as usize..end as usize].join(" "))
        })
        .collect())
}
