//! Prompt buffer state: line-structured text, code-point cursor, selection
//! anchor, unnamed clipboard register, stored search, and the undo engine.
//!
//! The buffer is the single logical value every editing verb reduces over.
//! All mutation funnels through `replace_range`, which keeps the non-empty
//! invariant (a cleared buffer is `[""]`, never `[]`), places the cursor at
//! the end of the inserted text, and resets the sticky column. Snapshots for
//! undo are pushed by callers before mutation, never by motions.

pub mod scalar;
pub mod undo;

use tracing::trace;
use undo::UndoEngine;
pub use undo::UNDO_HISTORY_MAX;

/// Current editing mode. Stored with the buffer so the
/// `selection_anchor ⇔ Visual` invariant has a single owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual,
    VisualLine,
    Command,
}

/// Scan or search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Most recent search, replayed by `n`/`N`. `N` flips the stored direction;
/// the flip is intentional (the behavior this replaces always searched
/// backward regardless of how the query was entered).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastSearch {
    pub query: String,
    pub direction: Direction,
}

/// The prompt's text state.
#[derive(Debug)]
pub struct PromptBuffer {
    lines: Vec<String>,
    pub cursor_row: usize,
    /// Cursor column in code points; may equal the line length in Insert mode.
    pub cursor_col: usize,
    /// Sticky column for vertical motion. Cleared by any horizontal motion or
    /// text mutation.
    pub preferred_col: Option<usize>,
    /// Present iff `mode` is Visual or VisualLine. Inclusive endpoint.
    pub selection_anchor: Option<(usize, usize)>,
    clipboard: String,
    pub last_search: Option<LastSearch>,
    pub mode: Mode,
    undo: UndoEngine,
}

impl Default for PromptBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            preferred_col: None,
            selection_anchor: None,
            clipboard: String::new(),
            last_search: None,
            mode: Mode::Insert,
            undo: UndoEngine::new(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buf = Self::new();
        buf.set_text(text);
        buf
    }

    // ---------------------------------------------------------------- reads

    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map_or("", String::as_str)
    }

    pub fn line_cp_len(&self, row: usize) -> usize {
        scalar::cp_len(self.line(row))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Largest column the Normal-mode cursor may rest on for `row`.
    pub fn normal_max_col(&self, row: usize) -> usize {
        self.line_cp_len(row).saturating_sub(1)
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// A register ending in `\n` pastes linewise.
    pub fn clipboard_is_linewise(&self) -> bool {
        self.clipboard.ends_with('\n')
    }

    pub fn set_clipboard(&mut self, text: impl Into<String>) {
        self.clipboard = text.into();
    }

    /// Selection endpoints ordered (start <= end), both inclusive positions.
    pub fn ordered_selection(&self) -> Option<((usize, usize), (usize, usize))> {
        let anchor = self.selection_anchor?;
        let cursor = (self.cursor_row, self.cursor_col);
        if anchor <= cursor {
            Some((anchor, cursor))
        } else {
            Some((cursor, anchor))
        }
    }

    // -------------------------------------------------------------- writes

    /// Replace all content, cursor at end. Used by history install and the
    /// external-editor round trip.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(String::from).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor_row = self.lines.len() - 1;
        self.cursor_col = self.line_cp_len(self.cursor_row);
        self.preferred_col = None;
        self.selection_anchor = None;
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.preferred_col = None;
        self.selection_anchor = None;
    }

    /// The splice workhorse. Removes the code-point range
    /// `(start_row, start_col) .. (end_row, end_col)` (half-open, may span
    /// lines), inserts `text` (may contain `\n`), places the cursor at the end
    /// of the inserted text, and returns the removed text. Out-of-range
    /// positions clamp; an inverted range is reordered.
    pub fn replace_range(
        &mut self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
        text: &str,
    ) -> String {
        let last = self.lines.len() - 1;
        let (mut sr, mut sc) = (start_row.min(last), start_col);
        let (mut er, mut ec) = (end_row.min(last), end_col);
        if (sr, sc) > (er, ec) {
            std::mem::swap(&mut sr, &mut er);
            std::mem::swap(&mut sc, &mut ec);
        }
        sc = sc.min(self.line_cp_len(sr));
        ec = ec.min(self.line_cp_len(er));

        let removed = if sr == er {
            scalar::cp_slice(&self.lines[sr], sc, ec)
        } else {
            let mut out = scalar::cp_slice(&self.lines[sr], sc, self.line_cp_len(sr));
            for row in (sr + 1)..er {
                out.push('\n');
                out.push_str(&self.lines[row]);
            }
            out.push('\n');
            out.push_str(&scalar::cp_slice(&self.lines[er], 0, ec));
            out
        };

        let prefix = scalar::cp_slice(&self.lines[sr], 0, sc);
        let suffix = scalar::cp_slice(&self.lines[er], ec, self.line_cp_len(er));
        let merged = format!("{prefix}{text}{suffix}");
        let replacement: Vec<String> = merged.split('\n').map(String::from).collect();

        let inserted_newlines = text.matches('\n').count();
        let end_cursor_row = sr + inserted_newlines;
        let end_cursor_col = if inserted_newlines == 0 {
            sc + scalar::cp_len(text)
        } else {
            scalar::cp_len(text.rsplit('\n').next().unwrap_or(""))
        };

        self.lines.splice(sr..=er, replacement);
        debug_assert!(!self.lines.is_empty());
        self.cursor_row = end_cursor_row.min(self.lines.len() - 1);
        self.cursor_col = end_cursor_col.min(self.line_cp_len(self.cursor_row));
        self.preferred_col = None;
        trace!(
            target: "state.buffer",
            rows = self.lines.len(),
            removed_len = removed.len(),
            inserted_len = text.len(),
            "replace_range"
        );
        removed
    }

    /// Non-mutating extraction of the same range `replace_range` would remove.
    pub fn slice_range(
        &self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> String {
        let last = self.lines.len() - 1;
        let (mut sr, mut sc) = (start_row.min(last), start_col);
        let (mut er, mut ec) = (end_row.min(last), end_col);
        if (sr, sc) > (er, ec) {
            std::mem::swap(&mut sr, &mut er);
            std::mem::swap(&mut sc, &mut ec);
        }
        sc = sc.min(self.line_cp_len(sr));
        ec = ec.min(self.line_cp_len(er));
        if sr == er {
            scalar::cp_slice(&self.lines[sr], sc, ec)
        } else {
            let mut out = scalar::cp_slice(&self.lines[sr], sc, self.line_cp_len(sr));
            for row in (sr + 1)..er {
                out.push('\n');
                out.push_str(&self.lines[row]);
            }
            out.push('\n');
            out.push_str(&scalar::cp_slice(&self.lines[er], 0, ec));
            out
        }
    }

    /// Remove whole lines `[start_row, start_row + n)`, restoring the
    /// non-empty invariant. Returns the removed lines joined with trailing
    /// `\n` (linewise register form). Cursor lands at column 0 of the row
    /// that replaces the removed block.
    pub fn remove_lines(&mut self, start_row: usize, n: usize) -> String {
        let last = self.lines.len() - 1;
        let sr = start_row.min(last);
        let end = (sr + n.max(1)).min(self.lines.len());
        let mut removed = String::new();
        for row in sr..end {
            removed.push_str(&self.lines[row]);
            removed.push('\n');
        }
        self.lines.drain(sr..end);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor_row = sr.min(self.lines.len() - 1);
        self.cursor_col = 0;
        self.preferred_col = None;
        removed
    }

    /// Insert whole lines at `row` (shifting existing rows down). Cursor lands
    /// at column 0 of the first inserted line.
    pub fn insert_lines(&mut self, row: usize, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        let at = row.min(self.lines.len());
        for (i, l) in lines.into_iter().enumerate() {
            self.lines.insert(at + i, l);
        }
        self.cursor_row = at;
        self.cursor_col = 0;
        self.preferred_col = None;
    }

    // ---------------------------------------------- insert-mode primitives
    // These are the pass-through text-entry path: no undo snapshots. Vim
    // mutation verbs snapshot before the edit; plain typing rides on the
    // snapshot the verb that entered Insert mode already took.

    pub fn insert_at_cursor(&mut self, text: &str) {
        let (r, c) = (self.cursor_row, self.cursor_col);
        self.replace_range(r, c, r, c, text);
    }

    /// Backspace. Joins with the previous line at column 0.
    pub fn delete_char_before_cursor(&mut self) {
        if self.cursor_col > 0 {
            let (r, c) = (self.cursor_row, self.cursor_col);
            self.replace_range(r, c - 1, r, c, "");
        } else if self.cursor_row > 0 {
            let prev = self.cursor_row - 1;
            let prev_len = self.line_cp_len(prev);
            self.replace_range(prev, prev_len, self.cursor_row, 0, "");
        }
    }

    /// Insert-mode left: column may reach 0 then wraps to previous line end.
    pub fn move_left_insert(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.line_cp_len(self.cursor_row);
        }
        self.preferred_col = None;
    }

    /// Insert-mode right: column may reach the line length.
    pub fn move_right_insert(&mut self) {
        if self.cursor_col < self.line_cp_len(self.cursor_row) {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
        self.preferred_col = None;
    }

    // ------------------------------------------------------------ undo

    /// Capture the pre-image. Called by every mutation verb before it edits;
    /// pure motions never call this.
    pub fn push_undo(&mut self) {
        self.undo
            .push(&self.lines, self.cursor_row, self.cursor_col);
    }

    /// Pop the latest snapshot and install it wholesale.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(snap) => {
                self.lines = snap.lines;
                self.cursor_row = snap.cursor_row.min(self.lines.len() - 1);
                self.cursor_col = snap.cursor_col.min(self.line_cp_len(self.cursor_row));
                self.preferred_col = None;
                true
            }
            None => false,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_holds_single_empty_line() {
        let buf = PromptBuffer::new();
        assert_eq!(buf.lines(), &[String::new()]);
        assert_eq!((buf.cursor_row, buf.cursor_col), (0, 0));
        assert!(buf.is_empty());
    }

    #[test]
    fn replace_range_single_line_insert() {
        let mut buf = PromptBuffer::from_text("abc");
        let removed = buf.replace_range(0, 1, 0, 1, "XY");
        assert_eq!(removed, "");
        assert_eq!(buf.text(), "aXYbc");
        assert_eq!((buf.cursor_row, buf.cursor_col), (0, 3));
    }

    #[test]
    fn replace_range_single_line_delete() {
        let mut buf = PromptBuffer::from_text("alpha beta");
        let removed = buf.replace_range(0, 0, 0, 6, "");
        assert_eq!(removed, "alpha ");
        assert_eq!(buf.text(), "beta");
        assert_eq!((buf.cursor_row, buf.cursor_col), (0, 0));
    }

    #[test]
    fn replace_range_across_lines() {
        let mut buf = PromptBuffer::from_text("one\ntwo\nthree");
        let removed = buf.replace_range(0, 2, 2, 3, "-");
        assert_eq!(removed, "e\ntwo\nthr");
        assert_eq!(buf.text(), "on-ee");
        assert_eq!((buf.cursor_row, buf.cursor_col), (0, 3));
    }

    #[test]
    fn replace_range_with_multiline_insert() {
        let mut buf = PromptBuffer::from_text("ab");
        buf.replace_range(0, 1, 0, 1, "x\ny");
        assert_eq!(buf.text(), "ax\nyb");
        assert_eq!((buf.cursor_row, buf.cursor_col), (1, 1));
    }

    #[test]
    fn replace_range_inverted_endpoints_reorder() {
        let mut buf = PromptBuffer::from_text("hello");
        let removed = buf.replace_range(0, 4, 0, 1, "");
        assert_eq!(removed, "ell");
        assert_eq!(buf.text(), "ho");
    }

    #[test]
    fn replace_range_clamps_out_of_range() {
        let mut buf = PromptBuffer::from_text("hi");
        let removed = buf.replace_range(5, 9, 7, 42, "!");
        assert_eq!(removed, "");
        assert_eq!(buf.text(), "hi!");
    }

    #[test]
    fn replace_range_multibyte_positions() {
        let mut buf = PromptBuffer::from_text("日本語です");
        let removed = buf.replace_range(0, 1, 0, 3, "");
        assert_eq!(removed, "本語");
        assert_eq!(buf.text(), "日です");
        assert_eq!(buf.cursor_col, 1);
    }

    #[test]
    fn replace_range_clears_preferred_col() {
        let mut buf = PromptBuffer::from_text("abc\ndef");
        buf.preferred_col = Some(2);
        buf.replace_range(0, 0, 0, 1, "");
        assert_eq!(buf.preferred_col, None);
    }

    #[test]
    fn remove_all_lines_restores_invariant() {
        let mut buf = PromptBuffer::from_text("a\nb");
        let removed = buf.remove_lines(0, 2);
        assert_eq!(removed, "a\nb\n");
        assert_eq!(buf.lines(), &[String::new()]);
        assert_eq!((buf.cursor_row, buf.cursor_col), (0, 0));
    }

    #[test]
    fn remove_lines_clamps_count() {
        let mut buf = PromptBuffer::from_text("a\nb\nc");
        buf.remove_lines(1, 99);
        assert_eq!(buf.text(), "a");
    }

    #[test]
    fn insert_lines_places_cursor_on_first() {
        let mut buf = PromptBuffer::from_text("a\nb");
        buf.insert_lines(1, vec!["x".into(), "y".into()]);
        assert_eq!(buf.text(), "a\nx\ny\nb");
        assert_eq!((buf.cursor_row, buf.cursor_col), (1, 0));
    }

    #[test]
    fn backspace_joins_lines() {
        let mut buf = PromptBuffer::from_text("ab\ncd");
        buf.cursor_row = 1;
        buf.cursor_col = 0;
        buf.delete_char_before_cursor();
        assert_eq!(buf.text(), "abcd");
        assert_eq!((buf.cursor_row, buf.cursor_col), (0, 2));
    }

    #[test]
    fn undo_restores_text_and_cursor() {
        let mut buf = PromptBuffer::from_text("hello world");
        buf.cursor_col = 6;
        buf.push_undo();
        buf.replace_range(0, 6, 0, 11, "there");
        assert_eq!(buf.text(), "hello there");
        assert!(buf.undo());
        assert_eq!(buf.text(), "hello world");
        assert_eq!((buf.cursor_row, buf.cursor_col), (0, 6));
        assert!(!buf.undo());
    }

    #[test]
    fn set_text_resets_selection_and_sticky() {
        let mut buf = PromptBuffer::from_text("abc");
        buf.selection_anchor = Some((0, 0));
        buf.preferred_col = Some(9);
        buf.set_text("xyz\nq");
        assert_eq!(buf.selection_anchor, None);
        assert_eq!(buf.preferred_col, None);
        assert_eq!((buf.cursor_row, buf.cursor_col), (1, 1));
    }

    #[test]
    fn linewise_clipboard_detection() {
        let mut buf = PromptBuffer::new();
        buf.set_clipboard("foo\n");
        assert!(buf.clipboard_is_linewise());
        buf.set_clipboard("foo");
        assert!(!buf.clipboard_is_linewise());
    }
}
