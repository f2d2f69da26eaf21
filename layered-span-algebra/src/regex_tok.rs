//! Matching a regular expression against windows of consecutive tokens.

use std::sync::Arc;

use layered_spans::{CharSpanArray, SpanArray, TokenSpanArray};
use regex::Regex;

use crate::{AlgebraError, AlgebraResult, MatchTable, RegexTokOptions};

/// A predicate that decides whether a whole string matches.
pub trait FullMatch {
    fn full_match(&self, text: &str) -> bool;
}

/// A regular expression that must match the entire input.
#[derive(Debug, Clone)]
pub struct FullMatchRegex {
    pattern: String,
    regex: Regex,
}

impl FullMatchRegex {
    pub fn new(pattern: &str) -> AlgebraResult<Self> {
        let regex = Regex::new(&format!(r"\A(?:{})\z", pattern))?;
        Ok(FullMatchRegex {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as given, without anchors.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl FullMatch for FullMatchRegex {
    fn full_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl<F> FullMatch for F
where
    F: Fn(&str) -> bool,
{
    fn full_match(&self, text: &str) -> bool {
        self(text)
    }
}

/// Find every window of `min_len..=max_len` consecutive tokens whose covered
/// text fully matches `regex`.
///
/// Every window is tested, so keep the length range small. Results are
/// grouped by window length, then ordered by first token; overlapping
/// windows are all kept.
pub fn extract_regex_tok(
    tokens: &Arc<CharSpanArray>,
    regex: &dyn FullMatch,
    options: &RegexTokOptions,
) -> AlgebraResult<MatchTable> {
    if options.min_len > options.max_len {
        return Err(AlgebraError::InvalidArgument(format!(
            "min_len ({}) is greater than max_len ({})",
            options.min_len, options.max_len
        )));
    }
    tracing::debug!(
        tokens = tokens.len(),
        min_len = options.min_len,
        max_len = options.max_len,
        "extract_regex_tok"
    );

    let num_tokens = tokens.len();
    let mut begins = Vec::new();
    let mut ends = Vec::new();
    for window_len in options.min_len..=options.max_len.min(num_tokens) {
        let window_begins: Vec<i64> = (0..=num_tokens - window_len).map(|b| b as i64).collect();
        let window_ends: Vec<i64> = window_begins.iter().map(|b| b + window_len as i64).collect();
        let windows = TokenSpanArray::new(Arc::clone(tokens), window_begins, window_ends)?;
        let before = begins.len();
        for (index, text) in windows.covered_text().into_iter().enumerate() {
            if text.map_or(false, |text| regex.full_match(text)) {
                begins.push(windows.begin_tokens()[index]);
                ends.push(windows.end_tokens()[index]);
            }
        }
        tracing::trace!(window_len, matches = begins.len() - before, "tested windows");
    }

    let spans = TokenSpanArray::new(Arc::clone(tokens), begins, ends)?;
    tracing::debug!(matches = spans.len(), "extract_regex_tok done");
    Ok(MatchTable::new(options.output_col_name.clone(), spans))
}
