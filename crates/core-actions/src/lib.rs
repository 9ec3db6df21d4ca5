//! Action vocabulary and the reducer applying actions to a `PromptBuffer`.
//!
//! The reducer is total: every `(state, action)` pair produces a state and a
//! `DispatchResult`; adverse conditions (out-of-range motion, no-op mutation,
//! empty search) come back as unchanged state, never as errors. Mode
//! transitions triggered by change operators are reported through
//! `enters_insert` and performed by the controller, keeping this layer free of
//! key-handling concerns.
//!
//! Decomposition mirrors the concern split used throughout the workspace:
//! * `motion`      - cursor movement + operator span resolution
//! * `edit`        - text mutation (operators, character edits, paste)
//! * `search`      - substring search with wrap-around and `n`/`N` replay
//! * `text_object` - inner-word range used by `diw`/`ciw`/`yiw`

use core_text::{Direction, PromptBuffer};
use tracing::debug;

pub mod edit;
pub mod motion;
pub mod search;
pub mod text_object;

/// Pending verb applied over a motion or object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Delete,
    Change,
    Yank,
}

/// Cursor motions. Counts are supplied by the enclosing `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    WordForward,
    WordBackward,
    WordEnd,
    LineStart,
    LineEnd,
    FirstNonBlank,
    FirstLine,
    LastLine,
    /// 1-based target line carried in the action count, clamped.
    ToLine,
    MatchingPair,
    FindChar {
        target: char,
        direction: Direction,
        inclusive: bool,
    },
}

/// Single-position text edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    DeleteChar,
    DeleteCharBefore,
    ToggleCase,
    ReplaceChar(char),
    OpenLineBelow,
    OpenLineAbove,
    PasteAfter,
    PasteBefore,
}

/// Everything the controller can ask the reducer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion {
        motion: MotionKind,
        count: u32,
    },
    /// Operator over the span a motion would traverse (`dw`, `c$`, `df)`...).
    ApplyOperator {
        op: OperatorKind,
        motion: MotionKind,
        count: u32,
    },
    /// Doubled operator acting on whole lines (`dd`, `cc`, `yy`).
    LinewiseOperator {
        op: OperatorKind,
        count: u32,
    },
    /// Operator over the inner-word object (`diw`, `ciw`, `yiw`).
    InnerWordOperator {
        op: OperatorKind,
    },
    /// Operator over the active visual selection (`d`/`c`/`y`/`x` in Visual).
    SelectionOperator {
        op: OperatorKind,
    },
    Edit {
        kind: EditKind,
        count: u32,
    },
    Search {
        query: String,
        direction: Direction,
    },
    SearchNext {
        reversed: bool,
    },
    Undo {
        count: u32,
    },
    /// Leaving Insert mode steps the cursor left one code point.
    EscapeInsert,
}

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// State changed; a render is warranted.
    pub dirty: bool,
    /// Text changed. Gates `last_command` recording upstream.
    pub mutated: bool,
    /// A change operator finished; the controller should enter Insert mode.
    pub enters_insert: bool,
}

impl DispatchResult {
    pub fn clean() -> Self {
        Self {
            dirty: false,
            mutated: false,
            enters_insert: false,
        }
    }
    pub fn moved() -> Self {
        Self {
            dirty: true,
            mutated: false,
            enters_insert: false,
        }
    }
    pub fn mutation() -> Self {
        Self {
            dirty: true,
            mutated: true,
            enters_insert: false,
        }
    }
    pub fn mutation_into_insert() -> Self {
        Self {
            dirty: true,
            mutated: true,
            enters_insert: true,
        }
    }
}

/// Apply an action to the buffer. Never fails; a no-op returns
/// `DispatchResult::clean()`.
pub fn dispatch(action: &Action, buf: &mut PromptBuffer) -> DispatchResult {
    debug!(target: "actions.dispatch", action = ?action, "dispatch");
    match action {
        Action::Motion { motion, count } => {
            if motion::apply(buf, motion, *count) {
                DispatchResult::moved()
            } else {
                DispatchResult::clean()
            }
        }
        Action::ApplyOperator { op, motion, count } => {
            edit::apply_operator(buf, *op, motion, *count)
        }
        Action::LinewiseOperator { op, count } => edit::linewise_operator(buf, *op, *count),
        Action::InnerWordOperator { op } => edit::inner_word_operator(buf, *op),
        Action::SelectionOperator { op } => edit::selection_operator(buf, *op),
        Action::Edit { kind, count } => edit::apply_edit(buf, *kind, *count),
        Action::Search { query, direction } => search::search(buf, query, *direction),
        Action::SearchNext { reversed } => search::search_next(buf, *reversed),
        Action::Undo { count } => {
            let mut any = false;
            for _ in 0..(*count).max(1) {
                if !buf.undo() {
                    break;
                }
                any = true;
            }
            if any {
                DispatchResult::moved()
            } else {
                DispatchResult::clean()
            }
        }
        Action::EscapeInsert => {
            let before = buf.cursor_col;
            let max = buf.normal_max_col(buf.cursor_row);
            buf.cursor_col = buf.cursor_col.saturating_sub(1).min(max);
            buf.preferred_col = None;
            if buf.cursor_col != before {
                DispatchResult::moved()
            } else {
                DispatchResult::clean()
            }
        }
    }
}
