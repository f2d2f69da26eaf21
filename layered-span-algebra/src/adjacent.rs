//! Pairing spans that sit a bounded number of tokens apart.

use std::collections::HashMap;

use layered_spans::{SpanArray, SpanError, TokenSpanArray};

use crate::{AlgebraResult, JoinOptions, JoinTable};

/// Return every pair `(f, s)` with `f` from `first` and `s` from `second`
/// where the number of tokens between the end of `f` and the begin of `s`
/// lies in `min_gap..=max_gap`.
///
/// Rows follow the order of `first`; for one `f`, matches are ordered by gap
/// and then by position in `second`. Null spans never pair. An empty gap range
/// (`min_gap > max_gap`) yields an empty table.
pub fn adjacent_join(
    first: &TokenSpanArray,
    second: &TokenSpanArray,
    options: &JoinOptions,
) -> AlgebraResult<JoinTable> {
    if !first.shares_tokens_with(second) {
        return Err(SpanError::TokenTableMismatch.into());
    }
    tracing::debug!(
        first = first.len(),
        second = second.len(),
        min_gap = options.min_gap,
        max_gap = options.max_gap,
        "adjacent_join"
    );

    // Rows of `second`, replicated once per gap and keyed by the end token a
    // span of `first` must have to sit exactly that gap before them.
    let second_nulls = second.is_null_mask();
    let mut by_required_end: HashMap<i64, Vec<i64>> = HashMap::new();
    for gap in options.min_gap..=options.max_gap {
        for (row, &begin_token) in second.begin_tokens().iter().enumerate() {
            if !second_nulls[row] {
                by_required_end
                    .entry(begin_token - gap)
                    .or_default()
                    .push(row as i64);
            }
        }
    }

    let first_nulls = first.is_null_mask();
    let mut first_rows = Vec::new();
    let mut second_rows = Vec::new();
    for (row, end_token) in first.end_tokens().iter().enumerate() {
        if first_nulls[row] {
            continue;
        }
        if let Some(matches) = by_required_end.get(end_token) {
            for &other in matches {
                first_rows.push(row as i64);
                second_rows.push(other);
            }
        }
    }

    let table = JoinTable::new(
        options.first_name.clone(),
        options.second_name.clone(),
        first.take(&first_rows, false, None)?,
        second.take(&second_rows, false, None)?,
    );
    tracing::debug!(pairs = table.len(), "adjacent_join done");
    Ok(table)
}
