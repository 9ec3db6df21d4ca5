//! Cursor motion semantics and operator span resolution.
//!
//! Motions operate on a scratch `Cursor` against a read-only buffer, so the
//! same code paths serve both direct movement and operator span resolution
//! (`span_for_motion` simulates the motion without committing it). Word
//! boundaries follow the strict two-class model: word characters (letters,
//! digits, underscore) versus everything else, whitespace included.

use crate::MotionKind;
use core_text::{Direction, PromptBuffer, scalar};

/// Scratch cursor used for simulation and committed by `apply`.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
    pub preferred: Option<usize>,
}

impl Cursor {
    fn of(buf: &PromptBuffer) -> Self {
        Self {
            row: buf.cursor_row,
            col: buf.cursor_col,
            preferred: buf.preferred_col,
        }
    }

    fn store(self, buf: &mut PromptBuffer) {
        buf.cursor_row = self.row;
        buf.cursor_col = self.col;
        buf.preferred_col = self.preferred;
    }
}

/// Apply a motion to the buffer cursor. Returns true when the cursor (or the
/// sticky column) changed. Text and clipboard are never touched.
pub fn apply(buf: &mut PromptBuffer, motion: &MotionKind, count: u32) -> bool {
    let mut cur = Cursor::of(buf);
    let changed = run(buf, &mut cur, motion, count);
    cur.store(buf);
    changed
}

fn run(buf: &PromptBuffer, cur: &mut Cursor, motion: &MotionKind, count: u32) -> bool {
    let before = (cur.row, cur.col);
    let n = count.max(1) as usize;
    match motion {
        MotionKind::Left => {
            for _ in 0..n {
                if !left_once(buf, cur) {
                    break;
                }
            }
            cur.preferred = None;
        }
        MotionKind::Right => {
            for _ in 0..n {
                if !right_once(buf, cur) {
                    break;
                }
            }
            cur.preferred = None;
        }
        MotionKind::Up => return vertical(buf, cur, -(n as isize)),
        MotionKind::Down => return vertical(buf, cur, n as isize),
        MotionKind::WordForward => {
            for _ in 0..n {
                word_forward_once(buf, cur);
            }
            cur.preferred = None;
        }
        MotionKind::WordBackward => {
            for _ in 0..n {
                word_backward_once(buf, cur);
            }
            cur.preferred = None;
        }
        MotionKind::WordEnd => {
            for _ in 0..n {
                word_end_once(buf, cur);
            }
            cur.preferred = None;
        }
        MotionKind::LineStart => {
            cur.col = 0;
            cur.preferred = None;
        }
        MotionKind::LineEnd => {
            cur.col = buf.normal_max_col(cur.row);
            cur.preferred = None;
        }
        MotionKind::FirstNonBlank => {
            cur.col = first_non_blank(buf, cur.row);
            cur.preferred = None;
        }
        MotionKind::FirstLine => {
            cur.row = 0;
            cur.col = cur.col.min(buf.normal_max_col(0));
            cur.preferred = None;
        }
        MotionKind::LastLine => {
            cur.row = buf.line_count() - 1;
            cur.col = cur.col.min(buf.normal_max_col(cur.row));
            cur.preferred = None;
        }
        MotionKind::ToLine => {
            let target = (count.max(1) as usize - 1).min(buf.line_count() - 1);
            cur.row = target;
            cur.col = cur.col.min(buf.normal_max_col(target));
            cur.preferred = None;
        }
        MotionKind::MatchingPair => {
            if !matching_pair(buf, cur) {
                return false;
            }
            cur.preferred = None;
        }
        MotionKind::FindChar {
            target,
            direction,
            inclusive,
        } => {
            // Success (target located) counts even when the cursor lands where
            // it already was, so `;` replay state can be recorded upstream.
            let found = find_char(buf, cur, *target, *direction, *inclusive, n);
            cur.preferred = None;
            return found;
        }
    }
    (cur.row, cur.col) != before
}

fn left_once(buf: &PromptBuffer, cur: &mut Cursor) -> bool {
    if cur.col > 0 {
        cur.col -= 1;
        true
    } else if cur.row > 0 {
        cur.row -= 1;
        cur.col = buf.normal_max_col(cur.row);
        true
    } else {
        false
    }
}

fn right_once(buf: &PromptBuffer, cur: &mut Cursor) -> bool {
    let len = buf.line_cp_len(cur.row);
    // At (or past) the last resting column, step to the next line.
    if len == 0 || cur.col + 1 >= len {
        if cur.row + 1 < buf.line_count() {
            cur.row += 1;
            cur.col = 0;
            return true;
        }
        return false;
    }
    let line = buf.line(cur.row);
    let mut col = scalar::next_non_combining(line, cur.col + 1);
    if col >= len {
        // Only combining marks remain on this line; wrap if possible.
        if cur.row + 1 < buf.line_count() {
            cur.row += 1;
            cur.col = 0;
            return true;
        }
        col = len - 1;
    }
    let moved = col != cur.col;
    cur.col = col;
    moved
}

fn vertical(buf: &PromptBuffer, cur: &mut Cursor, delta: isize) -> bool {
    let before = (cur.row, cur.col, cur.preferred);
    let last = buf.line_count() - 1;
    let target = cur.row.saturating_add_signed(delta).min(last);
    let goal = cur.preferred.unwrap_or(cur.col);
    if cur.preferred.is_none() {
        cur.preferred = Some(cur.col);
    }
    cur.row = target;
    cur.col = goal.min(buf.normal_max_col(target));
    (cur.row, cur.col, cur.preferred) != before
}

// ------------------------------------------------------------------ words

fn char_at(buf: &PromptBuffer, row: usize, col: usize) -> Option<char> {
    scalar::cp_at(buf.line(row), col)
}

fn is_word_at(buf: &PromptBuffer, row: usize, col: usize) -> bool {
    char_at(buf, row, col).is_some_and(scalar::is_word_char_strict)
}

/// Next position holding a code point, crossing line boundaries and skipping
/// empty lines. `None` at buffer end.
fn next_char_pos(buf: &PromptBuffer, row: usize, col: usize) -> Option<(usize, usize)> {
    let mut row = row;
    let mut col = col + 1;
    loop {
        if col < buf.line_cp_len(row) {
            return Some((row, col));
        }
        if row + 1 >= buf.line_count() {
            return None;
        }
        row += 1;
        col = 0;
        if buf.line_cp_len(row) > 0 {
            return Some((row, col));
        }
    }
}

/// Previous position holding a code point. `None` at buffer start.
fn prev_char_pos(buf: &PromptBuffer, row: usize, col: usize) -> Option<(usize, usize)> {
    let mut row = row;
    let mut col = col;
    loop {
        if col > 0 {
            return Some((row, col - 1));
        }
        if row == 0 {
            return None;
        }
        row -= 1;
        col = buf.line_cp_len(row);
        if col > 0 {
            return Some((row, col - 1));
        }
    }
}

fn clamp_to_buffer_end(buf: &PromptBuffer, cur: &mut Cursor) {
    cur.row = buf.line_count() - 1;
    cur.col = buf.normal_max_col(cur.row);
}

fn word_forward_once(buf: &PromptBuffer, cur: &mut Cursor) {
    let mut pos = (cur.row, cur.col);
    // Skip the rest of the current word run, if the cursor sits on one.
    if is_word_at(buf, pos.0, pos.1) {
        loop {
            match next_char_pos(buf, pos.0, pos.1) {
                Some(p) => {
                    pos = p;
                    if !is_word_at(buf, p.0, p.1) {
                        break;
                    }
                }
                None => {
                    clamp_to_buffer_end(buf, cur);
                    return;
                }
            }
        }
    }
    // Skip non-word characters to the next word start.
    while !is_word_at(buf, pos.0, pos.1) {
        match next_char_pos(buf, pos.0, pos.1) {
            Some(p) => pos = p,
            None => {
                clamp_to_buffer_end(buf, cur);
                return;
            }
        }
    }
    cur.row = pos.0;
    cur.col = pos.1;
}

fn word_backward_once(buf: &PromptBuffer, cur: &mut Cursor) {
    let Some(mut pos) = prev_char_pos(buf, cur.row, cur.col) else {
        return;
    };
    // Skip non-word characters backwards.
    while !is_word_at(buf, pos.0, pos.1) {
        match prev_char_pos(buf, pos.0, pos.1) {
            Some(p) => pos = p,
            None => {
                cur.row = 0;
                cur.col = 0;
                return;
            }
        }
    }
    // Walk to the start of the word run.
    while let Some(p) = prev_char_pos(buf, pos.0, pos.1) {
        if !is_word_at(buf, p.0, p.1) {
            break;
        }
        pos = p;
    }
    cur.row = pos.0;
    cur.col = pos.1;
}

fn word_end_once(buf: &PromptBuffer, cur: &mut Cursor) {
    let Some(mut pos) = next_char_pos(buf, cur.row, cur.col) else {
        return;
    };
    // Skip non-word characters forward.
    while !is_word_at(buf, pos.0, pos.1) {
        match next_char_pos(buf, pos.0, pos.1) {
            Some(p) => pos = p,
            None => return,
        }
    }
    // Walk to the end of the word run.
    while let Some(p) = next_char_pos(buf, pos.0, pos.1) {
        if !is_word_at(buf, p.0, p.1) {
            break;
        }
        pos = p;
    }
    cur.row = pos.0;
    cur.col = pos.1;
}

fn first_non_blank(buf: &PromptBuffer, row: usize) -> usize {
    let line = buf.line(row);
    for (idx, c) in line.chars().enumerate() {
        if !c.is_whitespace() {
            return idx;
        }
    }
    0
}

// --------------------------------------------------------------- brackets

const BRACKETS: [(char, char); 4] = [('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

fn bracket_pair(c: char) -> Option<(char, char, bool)> {
    for (open, close) in BRACKETS {
        if c == open {
            return Some((open, close, true));
        }
        if c == close {
            return Some((open, close, false));
        }
    }
    None
}

/// `%`: scan the current line rightwards from the cursor for a bracket, then
/// depth-scan the buffer for its partner. No match leaves the cursor alone.
fn matching_pair(buf: &PromptBuffer, cur: &mut Cursor) -> bool {
    let line = buf.line(cur.row);
    let len = scalar::cp_len(line);
    let mut scan = None;
    for col in cur.col..len {
        if let Some(c) = scalar::cp_at(line, col)
            && let Some(pair) = bracket_pair(c)
        {
            scan = Some((col, pair));
            break;
        }
    }
    let Some((start_col, (open, close, forward))) = scan else {
        return false;
    };
    let mut depth = 0i32;
    let mut pos = (cur.row, start_col);
    loop {
        if let Some(c) = char_at(buf, pos.0, pos.1) {
            if c == open {
                depth += if forward { 1 } else { -1 };
            } else if c == close {
                depth += if forward { -1 } else { 1 };
            }
            if depth == 0 {
                cur.row = pos.0;
                cur.col = pos.1;
                return true;
            }
        }
        let next = if forward {
            next_char_pos(buf, pos.0, pos.1)
        } else {
            prev_char_pos(buf, pos.0, pos.1)
        };
        match next {
            Some(p) => pos = p,
            None => return false,
        }
    }
}

// ------------------------------------------------------------------- find

/// `f`/`F`/`t`/`T`: locate the nth occurrence of `target` on the current
/// line. Exclusive finds stop one column short of the target in the scan
/// direction. Returns whether the target was located.
fn find_char(
    buf: &PromptBuffer,
    cur: &mut Cursor,
    target: char,
    direction: Direction,
    inclusive: bool,
    n: usize,
) -> bool {
    let line = buf.line(cur.row);
    let len = scalar::cp_len(line);
    let mut remaining = n;
    match direction {
        Direction::Forward => {
            for col in (cur.col + 1)..len {
                if scalar::cp_at(line, col) == Some(target) {
                    remaining -= 1;
                    if remaining == 0 {
                        cur.col = if inclusive { col } else { col - 1 };
                        return true;
                    }
                }
            }
            false
        }
        Direction::Backward => {
            for col in (0..cur.col).rev() {
                if scalar::cp_at(line, col) == Some(target) {
                    remaining -= 1;
                    if remaining == 0 {
                        cur.col = if inclusive { col } else { col + 1 };
                        return true;
                    }
                }
            }
            false
        }
    }
}

// ------------------------------------------------------- operator spans

/// Half-open code-point span `(start_row, start_col) .. (end_row, end_col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Span {
    fn ordered(a: (usize, usize), b: (usize, usize)) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Self {
            start_row: start.0,
            start_col: start.1,
            end_row: end.0,
            end_col: end.1,
        }
    }

    pub fn is_empty(&self) -> bool {
        (self.start_row, self.start_col) == (self.end_row, self.end_col)
    }
}

/// Simulate a motion and report where it would land, without committing.
fn target_of(buf: &PromptBuffer, motion: &MotionKind, count: u32) -> Option<(usize, usize)> {
    let mut cur = Cursor::of(buf);
    if run(buf, &mut cur, motion, count) {
        Some((cur.row, cur.col))
    } else {
        None
    }
}

/// The region an operator consumes for `motion`. `None` means the operator
/// cannot compose with this motion (or the motion found nothing) and the
/// operation is a silent no-op.
pub fn span_for_motion(buf: &PromptBuffer, motion: &MotionKind, count: u32) -> Option<Span> {
    let origin = (buf.cursor_row, buf.cursor_col);
    let row = buf.cursor_row;
    let col = buf.cursor_col;
    match motion {
        // Word-wise deletion consumes through the end of the word run, so
        // `dw`/`cw` on "alpha beta" removes "alpha" and leaves the separator.
        MotionKind::WordForward | MotionKind::WordEnd => {
            let (er, ec) = target_of(buf, &MotionKind::WordEnd, count)?;
            Some(Span::ordered(origin, (er, ec + 1)))
        }
        MotionKind::WordBackward => {
            let target = target_of(buf, motion, count)?;
            Some(Span::ordered(target, origin))
        }
        MotionKind::Left => {
            let target = target_of(buf, motion, count)?;
            Some(Span::ordered(target, origin))
        }
        MotionKind::Right => {
            let len = buf.line_cp_len(row);
            let end = (col + count.max(1) as usize).min(len);
            Some(Span::ordered(origin, (row, end)))
        }
        MotionKind::Up | MotionKind::Down => {
            let target = target_of(buf, motion, count)?;
            Some(Span::ordered(origin, target))
        }
        MotionKind::LineStart => Some(Span::ordered((row, 0), origin)),
        MotionKind::LineEnd => Some(Span::ordered(origin, (row, buf.line_cp_len(row)))),
        MotionKind::FirstNonBlank => {
            Some(Span::ordered((row, first_non_blank(buf, row)), origin))
        }
        MotionKind::FindChar { direction, .. } => {
            let (tr, tc) = target_of(buf, motion, count)?;
            match direction {
                // Forward finds include the landing column.
                Direction::Forward => Some(Span::ordered(origin, (tr, tc + 1))),
                // Backward finds exclude the cursor column.
                Direction::Backward => Some(Span::ordered((tr, tc), origin)),
            }
        }
        MotionKind::FirstLine
        | MotionKind::LastLine
        | MotionKind::ToLine
        | MotionKind::MatchingPair => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Mode;

    fn buf(text: &str) -> PromptBuffer {
        let mut b = PromptBuffer::from_text(text);
        b.mode = Mode::Normal;
        b.cursor_row = 0;
        b.cursor_col = 0;
        b
    }

    fn mv(b: &mut PromptBuffer, motion: MotionKind, count: u32) -> bool {
        apply(b, &motion, count)
    }

    #[test]
    fn left_wraps_to_previous_line_end() {
        let mut b = buf("abc\nxy");
        b.cursor_row = 1;
        assert!(mv(&mut b, MotionKind::Left, 1));
        assert_eq!((b.cursor_row, b.cursor_col), (0, 2));
    }

    #[test]
    fn right_stops_before_line_end_then_wraps() {
        let mut b = buf("ab\ncd");
        assert!(mv(&mut b, MotionKind::Right, 1));
        assert_eq!((b.cursor_row, b.cursor_col), (0, 1));
        assert!(mv(&mut b, MotionKind::Right, 1));
        assert_eq!((b.cursor_row, b.cursor_col), (1, 0));
    }

    #[test]
    fn right_skips_combining_marks() {
        // a, e + combining acute, b
        let mut b = buf("ae\u{0301}b");
        assert!(mv(&mut b, MotionKind::Right, 1));
        assert_eq!(b.cursor_col, 1, "lands on base character");
        assert!(mv(&mut b, MotionKind::Right, 1));
        assert_eq!(b.cursor_col, 3, "combining mark skipped");
    }

    #[test]
    fn vertical_preserves_preferred_col() {
        let mut b = buf("longest line\nab\nanother long line");
        b.cursor_col = 8;
        assert!(mv(&mut b, MotionKind::Down, 1));
        assert_eq!((b.cursor_row, b.cursor_col), (1, 1));
        assert_eq!(b.preferred_col, Some(8));
        assert!(mv(&mut b, MotionKind::Down, 1));
        assert_eq!((b.cursor_row, b.cursor_col), (2, 8));
        assert!(mv(&mut b, MotionKind::Up, 2));
        assert_eq!((b.cursor_row, b.cursor_col), (0, 8));
    }

    #[test]
    fn horizontal_motion_resets_preferred_col() {
        let mut b = buf("abc\ndef");
        b.cursor_col = 2;
        mv(&mut b, MotionKind::Down, 1);
        assert!(b.preferred_col.is_some());
        mv(&mut b, MotionKind::Left, 1);
        assert_eq!(b.preferred_col, None);
    }

    #[test]
    fn word_forward_with_count() {
        let mut b = buf("alpha beta gamma delta");
        assert!(mv(&mut b, MotionKind::WordForward, 3));
        assert_eq!(b.cursor_col, 17, "lands at start of delta");
    }

    #[test]
    fn word_forward_crosses_lines() {
        let mut b = buf("one\n  two");
        b.cursor_col = 1;
        mv(&mut b, MotionKind::WordForward, 1);
        assert_eq!((b.cursor_row, b.cursor_col), (1, 2));
    }

    #[test]
    fn word_forward_clamps_at_buffer_end() {
        let mut b = buf("one two");
        mv(&mut b, MotionKind::WordForward, 9);
        assert_eq!((b.cursor_row, b.cursor_col), (0, 6));
    }

    #[test]
    fn word_backward_lands_on_word_start() {
        let mut b = buf("alpha beta");
        b.cursor_col = 8;
        mv(&mut b, MotionKind::WordBackward, 1);
        assert_eq!(b.cursor_col, 6);
        mv(&mut b, MotionKind::WordBackward, 1);
        assert_eq!(b.cursor_col, 0);
    }

    #[test]
    fn word_end_lands_on_last_char() {
        let mut b = buf("alpha beta");
        mv(&mut b, MotionKind::WordEnd, 1);
        assert_eq!(b.cursor_col, 4);
        mv(&mut b, MotionKind::WordEnd, 1);
        assert_eq!(b.cursor_col, 9);
    }

    #[test]
    fn line_motions() {
        let mut b = buf("  hello");
        b.cursor_col = 4;
        mv(&mut b, MotionKind::LineStart, 1);
        assert_eq!(b.cursor_col, 0);
        mv(&mut b, MotionKind::LineEnd, 1);
        assert_eq!(b.cursor_col, 6);
        mv(&mut b, MotionKind::FirstNonBlank, 1);
        assert_eq!(b.cursor_col, 2);
    }

    #[test]
    fn to_line_is_one_based_and_clamped() {
        let mut b = buf("a\nb\nc");
        mv(&mut b, MotionKind::ToLine, 2);
        assert_eq!(b.cursor_row, 1);
        mv(&mut b, MotionKind::ToLine, 99);
        assert_eq!(b.cursor_row, 2);
        mv(&mut b, MotionKind::FirstLine, 1);
        assert_eq!(b.cursor_row, 0);
        mv(&mut b, MotionKind::LastLine, 1);
        assert_eq!(b.cursor_row, 2);
    }

    #[test]
    fn matching_pair_forward_and_back() {
        let mut b = buf("fn call(a, (b))");
        assert!(mv(&mut b, MotionKind::MatchingPair, 1));
        assert_eq!(b.cursor_col, 14, "scans to first bracket, jumps to partner");
        assert!(mv(&mut b, MotionKind::MatchingPair, 1));
        assert_eq!(b.cursor_col, 7);
    }

    #[test]
    fn matching_pair_across_lines() {
        let mut b = buf("{\n  body\n}");
        assert!(mv(&mut b, MotionKind::MatchingPair, 1));
        assert_eq!((b.cursor_row, b.cursor_col), (2, 0));
    }

    #[test]
    fn matching_pair_without_bracket_is_noop() {
        let mut b = buf("plain text");
        assert!(!mv(&mut b, MotionKind::MatchingPair, 1));
        assert_eq!((b.cursor_row, b.cursor_col), (0, 0));
    }

    #[test]
    fn find_char_inclusive_and_exclusive() {
        let mut b = buf("abcabc");
        assert!(mv(
            &mut b,
            MotionKind::FindChar {
                target: 'c',
                direction: Direction::Forward,
                inclusive: true
            },
            1
        ));
        assert_eq!(b.cursor_col, 2);
        b.cursor_col = 0;
        assert!(mv(
            &mut b,
            MotionKind::FindChar {
                target: 'c',
                direction: Direction::Forward,
                inclusive: false
            },
            2
        ));
        assert_eq!(b.cursor_col, 4, "2tc stops before the second c");
    }

    #[test]
    fn find_char_backward() {
        let mut b = buf("abcabc");
        b.cursor_col = 5;
        assert!(mv(
            &mut b,
            MotionKind::FindChar {
                target: 'a',
                direction: Direction::Backward,
                inclusive: true
            },
            1
        ));
        assert_eq!(b.cursor_col, 3);
        assert!(mv(
            &mut b,
            MotionKind::FindChar {
                target: 'a',
                direction: Direction::Backward,
                inclusive: false
            },
            1
        ));
        assert_eq!(b.cursor_col, 1, "Ta stops one past the target");
    }

    #[test]
    fn find_char_missing_is_noop() {
        let mut b = buf("hello");
        assert!(!mv(
            &mut b,
            MotionKind::FindChar {
                target: 'z',
                direction: Direction::Forward,
                inclusive: true
            },
            1
        ));
        assert_eq!(b.cursor_col, 0);
    }

    #[test]
    fn span_word_forward_covers_current_word_only() {
        let b = buf("alpha beta");
        let span = span_for_motion(&b, &MotionKind::WordForward, 1).unwrap();
        assert_eq!(
            span,
            Span {
                start_row: 0,
                start_col: 0,
                end_row: 0,
                end_col: 5
            }
        );
    }

    #[test]
    fn span_line_end_includes_last_char() {
        let mut b = buf("hello");
        b.cursor_col = 2;
        let span = span_for_motion(&b, &MotionKind::LineEnd, 1).unwrap();
        assert_eq!((span.start_col, span.end_col), (2, 5));
    }

    #[test]
    fn span_find_forward_inclusive_of_target() {
        let b = buf("say (hi)");
        let span = span_for_motion(
            &b,
            &MotionKind::FindChar {
                target: '(',
                direction: Direction::Forward,
                inclusive: true,
            },
            1,
        )
        .unwrap();
        assert_eq!((span.start_col, span.end_col), (0, 5));
    }

    #[test]
    fn span_unsupported_motion_is_none() {
        let b = buf("a\nb");
        assert!(span_for_motion(&b, &MotionKind::LastLine, 1).is_none());
    }
}
