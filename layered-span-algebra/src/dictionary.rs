//! Dictionary matching over token columns.
//!
//! A [`Dictionary`] holds entries of normalized (lowercased) token strings.
//! [`extract_dict`] finds every run of tokens whose normalized text equals an
//! entry, for every entry length from one token up to the longest entry.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use layered_spans::{CharSpanArray, SpanArray, TokenSpanArray};
use unicode_segmentation::UnicodeSegmentation;

use crate::{AlgebraError, AlgebraResult, DictOptions, MatchTable};

/// Entries of normalized token strings, viewed as a positional table with
/// columns `token_0 .. token_{k-1}` where `k` is the longest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    rows: Vec<Vec<String>>,
}

impl Dictionary {
    /// Entries given as already-normalized tokens. Empty entries are rejected.
    pub fn from_rows<I, R, S>(rows: I) -> AlgebraResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect::<Vec<String>>())
            .collect::<Vec<_>>();
        if let Some(row) = rows.iter().position(Vec::is_empty) {
            return Err(AlgebraError::EmptyEntry { row });
        }
        Ok(Dictionary { rows })
    }

    /// Entries given as phrases, split on word boundaries and lowercased.
    /// Punctuation is kept as its own token; whitespace is dropped.
    pub fn from_phrases<I, S>(phrases: I) -> AlgebraResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_rows(phrases.into_iter().map(|phrase| tokenize_phrase(phrase.as_ref())))
    }

    /// One phrase per line; blank lines and lines starting with `#` are skipped.
    pub fn load(path: impl AsRef<Path>) -> AlgebraResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AlgebraError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let dictionary = Self::from_phrases(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )?;
        tracing::debug!(path = %path.display(), entries = dictionary.len(), "loaded dictionary");
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn entry(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Number of tokens in the longest entry.
    pub fn max_len(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The `token_k` column, `None` where an entry is shorter than `k + 1`.
    pub fn column(&self, k: usize) -> Vec<Option<&str>> {
        self.rows
            .iter()
            .map(|row| row.get(k).map(String::as_str))
            .collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        (0..self.max_len()).map(|k| format!("token_{}", k)).collect()
    }
}

fn tokenize_phrase(phrase: &str) -> Vec<String> {
    phrase
        .split_word_bounds()
        .filter(|word| !word.trim().is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Find every run of tokens matching a dictionary entry.
///
/// Matches are grouped by length (shortest first), then ordered by entry and
/// position. Entries matching the same start token at different lengths each
/// produce a match; nothing is deduplicated. A token table with a null row is
/// rejected.
pub fn extract_dict(
    tokens: &Arc<CharSpanArray>,
    dictionary: &Dictionary,
    options: &DictOptions,
) -> AlgebraResult<MatchTable> {
    tracing::debug!(
        tokens = tokens.len(),
        entries = dictionary.len(),
        "extract_dict"
    );
    let normalized = tokens.normalized_covered_text();

    // Token positions keyed by normalized text.
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    for (token, text) in normalized.iter().enumerate() {
        if let Some(text) = text {
            positions.entry(text.as_str()).or_default().push(token);
        }
    }

    // (entry row, first token) for every match of the entry's first token.
    let mut partial: Vec<(usize, usize)> = Vec::new();
    for (row, entry) in dictionary.rows.iter().enumerate() {
        if let Some(found) = positions.get(entry[0].as_str()) {
            partial.extend(found.iter().map(|&begin| (row, begin)));
        }
    }

    let mut begins = Vec::new();
    let mut ends = Vec::new();
    let mut match_len = 1;
    while !partial.is_empty() {
        let mut extended = Vec::with_capacity(partial.len());
        for (row, begin) in partial {
            let entry = &dictionary.rows[row];
            if entry.len() == match_len {
                begins.push(begin as i64);
                ends.push((begin + match_len) as i64);
                continue;
            }
            let next = normalized.get(begin + match_len).and_then(Option::as_deref);
            if next == Some(entry[match_len].as_str()) {
                extended.push((row, begin));
            }
        }
        tracing::trace!(match_len, remaining = extended.len(), "extended partial matches");
        partial = extended;
        match_len += 1;
    }

    let spans = TokenSpanArray::new(Arc::clone(tokens), begins, ends)?;
    tracing::debug!(matches = spans.len(), "extract_dict done");
    Ok(MatchTable::new(options.output_col_name.clone(), spans))
}
