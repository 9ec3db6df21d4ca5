//! Inner-word text object.
//!
//! The inner word is the maximal run of same-class characters containing the
//! cursor, classified strictly as word versus non-word. The resulting range
//! depends only on the class of the character under the cursor, not on where
//! inside the run the cursor sits.

use core_text::{PromptBuffer, scalar};

/// Inclusive `[start_col, end_col]` of the inner word at the cursor, on the
/// cursor row. `None` on an empty line.
pub fn inner_word(buf: &PromptBuffer) -> Option<(usize, usize)> {
    let line = buf.line(buf.cursor_row);
    let len = scalar::cp_len(line);
    if len == 0 {
        return None;
    }
    let col = buf.cursor_col.min(len - 1);
    let class = scalar::is_word_char_strict(scalar::cp_at(line, col)?);
    let mut start = col;
    while start > 0 {
        match scalar::cp_at(line, start - 1) {
            Some(c) if scalar::is_word_char_strict(c) == class => start -= 1,
            _ => break,
        }
    }
    let mut end = col;
    while end + 1 < len {
        match scalar::cp_at(line, end + 1) {
            Some(c) if scalar::is_word_char_strict(c) == class => end += 1,
            _ => break,
        }
    }
    Some((start, end))
}
