//! Substring search with wrap-around.
//!
//! A search starts beside the cursor, walks line by line in the requested
//! direction, and wraps past the buffer edge back to the cursor position. The
//! query and its direction are stored for `n`/`N`; `N` flips the stored
//! direction transiently rather than mutating it, so alternating `n`/`N`
//! oscillates as expected.

use crate::DispatchResult;
use core_text::{Direction, LastSearch, PromptBuffer, scalar};
use tracing::debug;

/// `/query` or `?query`. Stores the query, then jumps to the nearest match.
pub fn search(buf: &mut PromptBuffer, query: &str, direction: Direction) -> DispatchResult {
    if query.is_empty() {
        return DispatchResult::clean();
    }
    buf.last_search = Some(LastSearch {
        query: query.to_string(),
        direction,
    });
    jump(buf, query, direction)
}

/// `n` (same direction) or `N` (reversed). No stored query means no-op.
pub fn search_next(buf: &mut PromptBuffer, reversed: bool) -> DispatchResult {
    let Some(last) = buf.last_search.clone() else {
        return DispatchResult::clean();
    };
    let direction = if reversed {
        last.direction.reversed()
    } else {
        last.direction
    };
    jump(buf, &last.query, direction)
}

fn jump(buf: &mut PromptBuffer, query: &str, direction: Direction) -> DispatchResult {
    match find_from(buf, query, direction, buf.cursor_row, buf.cursor_col) {
        Some((row, col)) => {
            debug!(target: "actions.search", row, col, "search_hit");
            buf.cursor_row = row;
            buf.cursor_col = col;
            buf.preferred_col = None;
            DispatchResult::moved()
        }
        None => {
            debug!(target: "actions.search", query, "search_miss");
            DispatchResult::clean()
        }
    }
}

/// First occurrence column at or after `from_cp`, in code points.
fn find_in_line(line: &str, query: &str, from_cp: usize) -> Option<usize> {
    let from_b = scalar::byte_of_cp(line, from_cp);
    line[from_b..]
        .find(query)
        .map(|b| scalar::cp_len(&line[..from_b + b]))
}

/// Last occurrence column strictly before `before_cp`, in code points.
fn rfind_in_line(line: &str, query: &str, before_cp: usize) -> Option<usize> {
    let mut best = None;
    for (b, _) in line.match_indices(query) {
        let cp = scalar::cp_len(&line[..b]);
        if cp < before_cp {
            best = Some(cp);
        } else {
            break;
        }
    }
    best
}

fn find_from(
    buf: &PromptBuffer,
    query: &str,
    direction: Direction,
    row: usize,
    col: usize,
) -> Option<(usize, usize)> {
    let rows = buf.line_count();
    match direction {
        Direction::Forward => {
            // Rest of the cursor line, following lines, wrap, then the cursor
            // line up to (and including) the cursor column.
            if let Some(c) = find_in_line(buf.line(row), query, col + 1) {
                return Some((row, c));
            }
            for r in (row + 1)..rows {
                if let Some(c) = find_in_line(buf.line(r), query, 0) {
                    return Some((r, c));
                }
            }
            for r in 0..row {
                if let Some(c) = find_in_line(buf.line(r), query, 0) {
                    return Some((r, c));
                }
            }
            find_in_line(buf.line(row), query, 0).filter(|c| *c <= col).map(|c| (row, c))
        }
        Direction::Backward => {
            if let Some(c) = rfind_in_line(buf.line(row), query, col) {
                return Some((row, c));
            }
            for r in (0..row).rev() {
                let line = buf.line(r);
                if let Some(c) = rfind_in_line(line, query, scalar::cp_len(line) + 1) {
                    return Some((r, c));
                }
            }
            for r in ((row + 1)..rows).rev() {
                let line = buf.line(r);
                if let Some(c) = rfind_in_line(line, query, scalar::cp_len(line) + 1) {
                    return Some((r, c));
                }
            }
            let line = buf.line(row);
            find_in_line(line, query, col)
                .map(|c| (row, c))
        }
    }
}
