use std::fmt::{self, Write};

use unicode_width::UnicodeWidthChar;

use super::SpanArray;
use crate::span::NULL_OFFSET;

/// Convert a zero-based index to a base-26 label: A, B, ..., Z, AA, AB, ..., AZ, BA, ...
/// Similar to Excel column naming.
fn index_to_base26_label(mut n: usize) -> String {
    let mut result = String::new();
    loop {
        let remainder = n % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Plain-text rendering of a span column under its target text.
///
/// ```text
/// new york city
/// ╰──────╯ [A] [0, 8)
///     ╰───────╯ [B] [4, 13)
/// ```
///
/// Each row gets a letter label; offsets (character offsets for character
/// columns, token indices for token columns) follow unless disabled.
pub struct SpanArrayDisplay<'a> {
    array: &'a dyn SpanArray,
    show_offsets: bool,
}

impl<'a> SpanArrayDisplay<'a> {
    pub fn new(array: &'a dyn SpanArray) -> Self {
        SpanArrayDisplay {
            array,
            show_offsets: true,
        }
    }

    /// Takes self
    pub fn show_offsets(mut self, show_offsets: bool) -> Self {
        self.show_offsets = show_offsets;
        self
    }
}

impl<'a> fmt::Display for SpanArrayDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display column at which each character offset starts, one extra
        // entry for the end of the text.
        let mut char_idx_to_display_col = Vec::with_capacity(self.array.target_text().char_len() + 1);
        let mut opening_line = String::new();
        let mut col = 0;
        for c in self.array.target_text().as_str().chars() {
            char_idx_to_display_col.push(col);
            let c = if c.is_control() { ' ' } else { c };
            opening_line.push(c);
            col += UnicodeWidthChar::width(c).unwrap_or(0);
        }
        char_idx_to_display_col.push(col);

        f.write_str(&opening_line)?;

        let begins = self.array.char_begins();
        let ends = self.array.char_ends();
        for index in 0..self.array.len() {
            f.write_char('\n')?;

            if begins[index] == NULL_OFFSET {
                f.write_str("NA")?;
            } else {
                let start_col = char_idx_to_display_col[begins[index] as usize];
                let end_col = char_idx_to_display_col[ends[index] as usize];
                for _ in 0..start_col {
                    f.write_char(' ')?;
                }

                f.write_char('╰')?;
                for _ in (start_col + 1)..end_col.saturating_sub(1) {
                    f.write_char('─')?;
                }
                if end_col.saturating_sub(start_col) > 1 {
                    f.write_char('╯')?;
                }
            }

            write!(f, " [{}]", index_to_base26_label(index))?;
            if self.show_offsets && begins[index] != NULL_OFFSET {
                write!(f, " {}", self.array.offsets_label(index))?;
            }
        }

        Ok(())
    }
}
