use std::sync::Arc;

use layered_spans::{CharSpanArray, TokenSpanArray};
use unicode_segmentation::UnicodeSegmentation;

/// Token table over `text`: word-boundary segments, whitespace dropped,
/// offsets in characters.
pub(crate) fn tokenize(text: &str) -> Arc<CharSpanArray> {
    let mut begins = Vec::new();
    let mut ends = Vec::new();
    for (byte, word) in text.split_word_bound_indices() {
        if word.trim().is_empty() {
            continue;
        }
        let begin = text[..byte].chars().count() as i64;
        begins.push(begin);
        ends.push(begin + word.chars().count() as i64);
    }
    Arc::new(CharSpanArray::new(text, begins, ends).unwrap())
}

pub(crate) fn token_spans(tokens: &Arc<CharSpanArray>, spans: &[(i64, i64)]) -> TokenSpanArray {
    let (begins, ends) = spans.iter().copied().unzip();
    TokenSpanArray::new(tokens.clone(), begins, ends).unwrap()
}
