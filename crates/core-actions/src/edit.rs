//! Text mutation: operators over motion spans, linewise operators, inner-word
//! and selection operators, single-position edits, and paste.
//!
//! Every mutation pushes an undo snapshot before touching text, and only when
//! text will actually change. Deletes and changes write the removed text into
//! the clipboard register; linewise payloads carry a trailing `\n` so paste
//! can tell placement apart. Change operators additionally report
//! `enters_insert`; the mode transition itself belongs to the controller.

use crate::motion::{Span, span_for_motion};
use crate::{DispatchResult, EditKind, MotionKind, OperatorKind, text_object};
use core_text::{Mode, PromptBuffer, scalar};
use tracing::debug;

fn clamp_normal_col(buf: &mut PromptBuffer) {
    let max = buf.normal_max_col(buf.cursor_row);
    if buf.cursor_col > max {
        buf.cursor_col = max;
    }
}

/// Operator + motion composite (`dw`, `ce`, `y$`, `df)`, Ctrl+W, Ctrl+U...).
pub fn apply_operator(
    buf: &mut PromptBuffer,
    op: OperatorKind,
    motion: &MotionKind,
    count: u32,
) -> DispatchResult {
    let Some(span) = span_for_motion(buf, motion, count) else {
        return DispatchResult::clean();
    };
    if span.is_empty() {
        return DispatchResult::clean();
    }
    apply_over_span(buf, op, span, false)
}

fn apply_over_span(
    buf: &mut PromptBuffer,
    op: OperatorKind,
    span: Span,
    linewise_register: bool,
) -> DispatchResult {
    let Span {
        start_row,
        start_col,
        end_row,
        end_col,
    } = span;
    match op {
        OperatorKind::Yank => {
            let mut text = buf.slice_range(start_row, start_col, end_row, end_col);
            if linewise_register {
                text.push('\n');
            }
            buf.set_clipboard(text);
            let moved = (buf.cursor_row, buf.cursor_col) != (start_row, start_col);
            buf.cursor_row = start_row;
            buf.cursor_col = start_col;
            buf.preferred_col = None;
            clamp_normal_col(buf);
            if moved {
                DispatchResult::moved()
            } else {
                DispatchResult::clean()
            }
        }
        OperatorKind::Delete | OperatorKind::Change => {
            buf.push_undo();
            let mut removed = buf.replace_range(start_row, start_col, end_row, end_col, "");
            debug!(
                target: "actions.edit",
                op = ?op,
                removed_len = removed.len(),
                "operator_span_applied"
            );
            if linewise_register {
                removed.push('\n');
            }
            buf.set_clipboard(removed);
            if matches!(op, OperatorKind::Change) {
                DispatchResult::mutation_into_insert()
            } else {
                clamp_normal_col(buf);
                DispatchResult::mutation()
            }
        }
    }
}

/// Doubled operator: `dd`, `cc`, `yy` over `count` whole lines.
pub fn linewise_operator(buf: &mut PromptBuffer, op: OperatorKind, count: u32) -> DispatchResult {
    let n = count.max(1) as usize;
    let row = buf.cursor_row;
    let end_row = (row + n - 1).min(buf.line_count() - 1);
    match op {
        OperatorKind::Yank => {
            let mut text = String::new();
            for r in row..=end_row {
                text.push_str(buf.line(r));
                text.push('\n');
            }
            buf.set_clipboard(text);
            DispatchResult::clean()
        }
        OperatorKind::Delete => {
            buf.push_undo();
            let removed = buf.remove_lines(row, end_row - row + 1);
            buf.set_clipboard(removed);
            DispatchResult::mutation()
        }
        OperatorKind::Change => {
            buf.push_undo();
            let end_len = buf.line_cp_len(end_row);
            let mut removed = buf.replace_range(row, 0, end_row, end_len, "");
            removed.push('\n');
            buf.set_clipboard(removed);
            DispatchResult::mutation_into_insert()
        }
    }
}

/// `diw` / `ciw` / `yiw` over the inner-word object at the cursor.
pub fn inner_word_operator(buf: &mut PromptBuffer, op: OperatorKind) -> DispatchResult {
    let Some((start, end)) = text_object::inner_word(buf) else {
        return DispatchResult::clean();
    };
    let row = buf.cursor_row;
    let span = Span {
        start_row: row,
        start_col: start,
        end_row: row,
        end_col: end + 1,
    };
    apply_over_span(buf, op, span, false)
}

/// Visual-mode operator over `[anchor, cursor]`, inclusive of both endpoints.
/// Returns the buffer to Normal mode and clears the anchor; a change operator
/// still reports `enters_insert` for the controller to act on.
pub fn selection_operator(buf: &mut PromptBuffer, op: OperatorKind) -> DispatchResult {
    let Some((start, end)) = buf.ordered_selection() else {
        return DispatchResult::clean();
    };
    let linewise = matches!(buf.mode, Mode::VisualLine);
    buf.selection_anchor = None;
    buf.mode = Mode::Normal;
    let result = if linewise {
        let count = (end.0 - start.0 + 1) as u32;
        buf.cursor_row = start.0;
        buf.cursor_col = 0;
        linewise_operator(buf, op, count)
    } else {
        let span = Span {
            start_row: start.0,
            start_col: start.1,
            end_row: end.0,
            // Inclusive selection: the reducer widens the end column by one.
            end_col: end.1 + 1,
        };
        apply_over_span(buf, op, span, false)
    };
    // Leaving Visual always warrants a repaint, even for a no-op operator.
    DispatchResult {
        dirty: true,
        ..result
    }
}

/// Single-position edits.
pub fn apply_edit(buf: &mut PromptBuffer, kind: EditKind, count: u32) -> DispatchResult {
    let n = count.max(1) as usize;
    let row = buf.cursor_row;
    let col = buf.cursor_col;
    let len = buf.line_cp_len(row);
    match kind {
        EditKind::DeleteChar => {
            if col >= len {
                return DispatchResult::clean();
            }
            let end = (col + n).min(len);
            buf.push_undo();
            let removed = buf.replace_range(row, col, row, end, "");
            buf.set_clipboard(removed);
            clamp_normal_col(buf);
            DispatchResult::mutation()
        }
        EditKind::DeleteCharBefore => {
            if col == 0 {
                return DispatchResult::clean();
            }
            let start = col.saturating_sub(n);
            buf.push_undo();
            let removed = buf.replace_range(row, start, row, col, "");
            buf.set_clipboard(removed);
            DispatchResult::mutation()
        }
        EditKind::ToggleCase => {
            if col >= len {
                return DispatchResult::clean();
            }
            let end = (col + n).min(len);
            let original = scalar::cp_slice(buf.line(row), col, end);
            let toggled: String = original
                .chars()
                .flat_map(|c| {
                    if c.is_lowercase() {
                        c.to_uppercase().collect::<Vec<_>>()
                    } else if c.is_uppercase() {
                        c.to_lowercase().collect::<Vec<_>>()
                    } else {
                        vec![c]
                    }
                })
                .collect();
            let processed = end - col;
            let changed = toggled != original;
            if changed {
                buf.push_undo();
                buf.replace_range(row, col, row, end, &toggled);
            }
            // The cursor advances past the processed run either way.
            buf.cursor_row = row;
            buf.cursor_col = (col + processed).min(buf.normal_max_col(row));
            buf.preferred_col = None;
            if changed {
                DispatchResult::mutation()
            } else {
                DispatchResult::moved()
            }
        }
        EditKind::ReplaceChar(c) => {
            if col >= len {
                return DispatchResult::clean();
            }
            if scalar::cp_at(buf.line(row), col) == Some(c) {
                return DispatchResult::clean();
            }
            buf.push_undo();
            buf.replace_range(row, col, row, col + 1, &c.to_string());
            buf.cursor_col = col;
            DispatchResult::mutation()
        }
        EditKind::OpenLineBelow => {
            buf.push_undo();
            let end = buf.line_cp_len(row);
            buf.replace_range(row, end, row, end, "\n");
            DispatchResult::mutation_into_insert()
        }
        EditKind::OpenLineAbove => {
            buf.push_undo();
            buf.replace_range(row, 0, row, 0, "\n");
            // Cursor stays on the original row index: the freshly empty line.
            buf.cursor_row = row;
            buf.cursor_col = 0;
            DispatchResult::mutation_into_insert()
        }
        EditKind::PasteAfter => paste(buf, false),
        EditKind::PasteBefore => paste(buf, true),
    }
}

fn paste(buf: &mut PromptBuffer, before: bool) -> DispatchResult {
    if buf.clipboard().is_empty() {
        return DispatchResult::clean();
    }
    let row = buf.cursor_row;
    let col = buf.cursor_col;
    if buf.clipboard_is_linewise() {
        let lines: Vec<String> = buf
            .clipboard()
            .strip_suffix('\n')
            .unwrap_or(buf.clipboard())
            .split('\n')
            .map(String::from)
            .collect();
        buf.push_undo();
        let at = if before { row } else { row + 1 };
        buf.insert_lines(at, lines);
        DispatchResult::mutation()
    } else {
        let len = buf.line_cp_len(row);
        let at = if before || len == 0 {
            col.min(len)
        } else {
            (col + 1).min(len)
        };
        buf.push_undo();
        let text = buf.clipboard().to_string();
        buf.replace_range(row, at, row, at, &text);
        // Rest on the last pasted code point.
        buf.cursor_col = buf.cursor_col.saturating_sub(1);
        DispatchResult::mutation()
    }
}
