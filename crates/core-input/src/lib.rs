//! Modal input controller: stateful key-to-action translation.
//!
//! `VimController::handle_key` turns a stream of key events into reducer
//! actions, reporting per key whether the event was consumed. Pending state
//! (count, operator, inner-object, replace, find, chord) lives in orthogonal
//! fields rather than a mode explosion; every escape and every mode
//! transition resets the whole set atomically.
//!
//! Collaborators arrive as a `Capabilities` bundle of small trait objects:
//! settings are re-read on every dispatch (no caching), the external editor
//! launch is fire-and-forget, and observers fire only after a state
//! transition has committed. The controller never feeds synthetic keys back
//! into itself from an observer.

use core_actions::{Action, DispatchResult, EditKind, MotionKind, OperatorKind, dispatch};
use core_config::VimModeStyle;
use core_events::{KeyCode, KeyEvent};
use core_text::{Direction, Mode, PromptBuffer};
use tracing::debug;

mod command_line;
pub mod key_token;

pub use command_line::{CommandLineState, CommandParser, ParsedCommand};

// ------------------------------------------------------------------- ports

/// Live settings query. Implementations must reflect the current value on
/// every call; the controller deliberately never caches.
pub trait SettingsSource {
    fn vim_mode_style(&self) -> VimModeStyle;
    fn command_mode_disabled(&self) -> bool;
}

/// Static settings, for tests and hosts without a config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSettings {
    pub style: VimModeStyle,
    pub disable_command_mode: bool,
}

impl SettingsSource for StaticSettings {
    fn vim_mode_style(&self) -> VimModeStyle {
        self.style
    }
    fn command_mode_disabled(&self) -> bool {
        self.disable_command_mode
    }
}

/// One-shot external editor launch (Ctrl+X Ctrl+E). Fire-and-forget: the
/// controller does not await the result, and launch failures are the
/// implementation's problem to log and swallow.
pub trait EditorLauncher {
    fn open_in_external_editor(&self);
}

/// Receives the trimmed-nonempty buffer text on Enter in Insert mode.
pub trait SubmitHandler {
    fn submit(&mut self, text: &str);
}

/// Rendering/test observers. Callbacks fire after the transition commits and
/// must not re-enter the controller.
pub trait ControllerObserver {
    fn on_mode_change(&self, _mode: Mode) {}
    fn on_command_buffer_change(&self, _text: &str) {}
    fn on_ex_command(&self, _command: &ParsedCommand) {}
}

/// Collaborator bundle handed to the controller at construction.
pub struct Capabilities {
    pub settings: Box<dyn SettingsSource>,
    pub launcher: Option<Box<dyn EditorLauncher>>,
    pub submit: Option<Box<dyn SubmitHandler>>,
    pub observers: Vec<Box<dyn ControllerObserver>>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            settings: Box::new(StaticSettings::default()),
            launcher: None,
            submit: None,
            observers: Vec::new(),
        }
    }
}

// ------------------------------------------------------------------- state

/// Operator awaiting a motion or text object. `G` is the `g` motion prefix;
/// it wraps whatever operator was armed before the prefix so `dgg`-style
/// composites survive until the prefix resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOperator {
    G(Option<OperatorKind>),
    Delete,
    Change,
    Yank,
}

impl PendingOperator {
    fn as_op(self) -> Option<OperatorKind> {
        match self {
            PendingOperator::G(_) => None,
            PendingOperator::Delete => Some(OperatorKind::Delete),
            PendingOperator::Change => Some(OperatorKind::Change),
            PendingOperator::Yank => Some(OperatorKind::Yank),
        }
    }
}

/// Multi-key modifier sequence in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingChord {
    CtrlX,
}

/// `f`/`F`/`t`/`T` armed, awaiting the target character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindPending {
    pub direction: Direction,
    pub inclusive: bool,
}

/// Completed find, replayed by `;` and `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindSpec {
    pub target: char,
    pub direction: Direction,
    pub inclusive: bool,
}

const COUNT_MAX: u32 = 999_999;

pub struct VimController {
    enabled: bool,
    count: u32,
    pending_operator: Option<PendingOperator>,
    pending_chord: Option<PendingChord>,
    pending_replace: bool,
    pending_inner: bool,
    pending_find: Option<FindPending>,
    last_find: Option<FindSpec>,
    last_command: Option<Action>,
    command_line: CommandLineState,
    caps: Capabilities,
}

impl VimController {
    pub fn new(caps: Capabilities) -> Self {
        Self {
            enabled: true,
            count: 0,
            pending_operator: None,
            pending_chord: None,
            pending_replace: false,
            pending_inner: false,
            pending_find: None,
            last_find: None,
            last_command: None,
            command_line: CommandLineState::default(),
            caps,
        }
    }

    // ----------------------------------------------------------- observers

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    pub fn count(&self) -> u32 {
        self.count
    }
    pub fn pending_operator(&self) -> Option<PendingOperator> {
        self.pending_operator
    }
    pub fn command_buffer(&self) -> &str {
        self.command_line.buffer()
    }
    pub fn last_find(&self) -> Option<FindSpec> {
        self.last_find
    }
    pub fn last_command(&self) -> Option<&Action> {
        self.last_command.as_ref()
    }

    // ------------------------------------------------------------ internal

    fn take_count(&mut self) -> u32 {
        let n = if self.count == 0 { 1 } else { self.count };
        self.count = 0;
        n
    }

    /// Count for a command that does not compose with operators. Recognised
    /// commands end with the count and pending operator cleared.
    fn take_count_finishing(&mut self) -> u32 {
        self.pending_operator = None;
        self.pending_inner = false;
        self.take_count()
    }

    fn clear_pending(&mut self) {
        self.count = 0;
        self.pending_operator = None;
        self.pending_chord = None;
        self.pending_replace = false;
        self.pending_inner = false;
        self.pending_find = None;
    }

    /// Dispatch, then perform the Insert transition a change operator asked
    /// for and record the repeatable command.
    fn exec(&mut self, buf: &mut PromptBuffer, action: Action, record: bool) -> DispatchResult {
        let res = dispatch(&action, buf);
        if res.enters_insert {
            buf.mode = Mode::Insert;
        }
        if record && res.mutated {
            self.last_command = Some(action);
        }
        res
    }

    /// A motion key, composed with the pending operator when one is armed.
    fn motion_or_operator(&mut self, buf: &mut PromptBuffer, motion: MotionKind) -> bool {
        let count = self.take_count();
        self.pending_inner = false;
        match self.pending_operator.take().and_then(PendingOperator::as_op) {
            Some(op) => {
                self.exec(buf, Action::ApplyOperator { op, motion, count }, true);
            }
            None => {
                self.exec(buf, Action::Motion { motion, count }, false);
            }
        }
        true
    }

    // ------------------------------------------------------------- entry

    /// Process one key. Returns whether the modal layer consumed it; an
    /// unconsumed key belongs to the enclosing prompt (history navigation,
    /// completion, shell trigger, clipboard-image paste...).
    pub fn handle_key(&mut self, buf: &mut PromptBuffer, key: &KeyEvent) -> bool {
        if !self.enabled {
            return false;
        }
        // A character event without its printable sequence cannot be routed;
        // log once at debug and let the host have it.
        if matches!(key.code, KeyCode::Char(_)) && key.sequence.is_empty() && !key.paste {
            debug!(target: "input.vim", "malformed_key_event_passed_through");
            return false;
        }

        let mode_before = buf.mode;
        let cmd_before = self.command_line.is_active();
        let cmd_text_before = self.command_line.buffer().to_string();

        let handled = self.handle_key_inner(buf, key);

        // Invariant: the anchor exists only in Visual modes.
        if !matches!(buf.mode, Mode::Visual | Mode::VisualLine) && buf.selection_anchor.is_some() {
            buf.selection_anchor = None;
        }
        if buf.mode != mode_before {
            // Mode transitions reset the pending set atomically.
            self.clear_pending();
            for obs in &self.caps.observers {
                obs.on_mode_change(buf.mode);
            }
        }
        if self.command_line.is_active() != cmd_before
            || self.command_line.buffer() != cmd_text_before
        {
            for obs in &self.caps.observers {
                obs.on_command_buffer_change(self.command_line.buffer());
            }
        }
        handled
    }

    fn handle_key_inner(&mut self, buf: &mut PromptBuffer, key: &KeyEvent) -> bool {
        // Short-circuit prefixes, checked before any mode branch.
        if self.pending_replace {
            self.pending_replace = false;
            self.count = 0;
            if key.code != KeyCode::Esc
                && let Some(c) = key_char(key)
            {
                self.exec(
                    buf,
                    Action::Edit {
                        kind: EditKind::ReplaceChar(c),
                        count: 1,
                    },
                    true,
                );
            }
            return true;
        }
        if let Some(fp) = self.pending_find.take() {
            if key.code != KeyCode::Esc
                && let Some(c) = key_char(key)
            {
                let count = self.take_count();
                let motion = MotionKind::FindChar {
                    target: c,
                    direction: fp.direction,
                    inclusive: fp.inclusive,
                };
                let res = match self.pending_operator.take().and_then(PendingOperator::as_op) {
                    Some(op) => self.exec(buf, Action::ApplyOperator { op, motion, count }, true),
                    None => self.exec(buf, Action::Motion { motion, count }, false),
                };
                if res.dirty {
                    self.last_find = Some(FindSpec {
                        target: c,
                        direction: fp.direction,
                        inclusive: fp.inclusive,
                    });
                }
            } else {
                self.count = 0;
                self.pending_operator = None;
            }
            return true;
        }
        if let Some(PendingChord::CtrlX) = self.pending_chord {
            self.pending_chord = None;
            if key.is_ctrl('e') {
                if let Some(launcher) = &self.caps.launcher {
                    launcher.open_in_external_editor();
                }
            }
            // Anything else after Ctrl+X is swallowed, not passed through.
            return true;
        }
        if key.is_ctrl('x') {
            self.pending_chord = Some(PendingChord::CtrlX);
            return true;
        }

        match buf.mode {
            Mode::Insert => self.handle_insert(buf, key),
            Mode::Command => self.handle_command(buf, key),
            Mode::Normal | Mode::Visual | Mode::VisualLine => self.handle_normal(buf, key),
        }
    }

    // ------------------------------------------------------------- insert

    fn handle_insert(&mut self, buf: &mut PromptBuffer, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.clear_pending();
                buf.mode = Mode::Normal;
                self.exec(buf, Action::EscapeInsert, false);
                true
            }
            KeyCode::Enter if key.is_plain() && !key.paste => {
                let text = buf.text();
                if self.caps.submit.is_some() && !text.trim().is_empty() {
                    if let Some(submit) = self.caps.submit.as_mut() {
                        submit.submit(&text);
                    }
                    buf.clear();
                    true
                } else {
                    // Reserved for the enclosing prompt.
                    false
                }
            }
            // Reserved for completion, history, and clipboard collaborators.
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => false,
            KeyCode::Left => {
                buf.move_left_insert();
                true
            }
            KeyCode::Right => {
                buf.move_right_insert();
                true
            }
            KeyCode::Backspace => {
                buf.delete_char_before_cursor();
                true
            }
            _ => {
                if key.is_ctrl('w') {
                    self.exec(
                        buf,
                        Action::ApplyOperator {
                            op: OperatorKind::Delete,
                            motion: MotionKind::WordBackward,
                            count: 1,
                        },
                        false,
                    );
                    true
                } else if key.is_ctrl('u') {
                    self.exec(
                        buf,
                        Action::ApplyOperator {
                            op: OperatorKind::Delete,
                            motion: MotionKind::LineStart,
                            count: 1,
                        },
                        false,
                    );
                    true
                } else if key.is_ctrl('r') || key.is_ctrl('v') {
                    false
                } else if key.paste {
                    buf.insert_at_cursor(&key.sequence);
                    true
                } else if key.insertable && !key.has_chord_mods() {
                    if key.sequence == "!" && buf.is_empty() {
                        // Leading '!' on an empty buffer triggers shell mode
                        // upstream.
                        return false;
                    }
                    buf.insert_at_cursor(&key.sequence);
                    true
                } else {
                    false
                }
            }
        }
    }

    // ------------------------------------------------------------ command

    fn handle_command(&mut self, buf: &mut PromptBuffer, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.command_line.clear();
                buf.mode = Mode::Normal;
                true
            }
            KeyCode::Backspace => {
                if !self.command_line.backspace() {
                    buf.mode = Mode::Normal;
                }
                true
            }
            KeyCode::Enter => {
                let raw = self.command_line.take();
                buf.mode = Mode::Normal;
                match raw.chars().next() {
                    Some(':') => {
                        let parsed = CommandParser::parse(&raw);
                        debug!(target: "input.vim", command = ?parsed, "ex_command");
                        for obs in &self.caps.observers {
                            obs.on_ex_command(&parsed);
                        }
                    }
                    Some('/') => {
                        self.exec(
                            buf,
                            Action::Search {
                                query: raw[1..].to_string(),
                                direction: Direction::Forward,
                            },
                            false,
                        );
                    }
                    Some('?') => {
                        self.exec(
                            buf,
                            Action::Search {
                                query: raw[1..].to_string(),
                                direction: Direction::Backward,
                            },
                            false,
                        );
                    }
                    _ => {}
                }
                true
            }
            _ => {
                if key.paste || (key.insertable && !key.has_chord_mods()) {
                    self.command_line.push_str(&key.sequence);
                }
                true
            }
        }
    }

    // ------------------------------------------------------------- normal

    fn handle_normal(&mut self, buf: &mut PromptBuffer, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.clear_pending();
                if matches!(buf.mode, Mode::Visual | Mode::VisualLine) {
                    buf.selection_anchor = None;
                    buf.mode = Mode::Normal;
                }
                true
            }
            KeyCode::Left => self.motion_or_operator(buf, MotionKind::Left),
            KeyCode::Right => self.motion_or_operator(buf, MotionKind::Right),
            KeyCode::Up => self.motion_or_operator(buf, MotionKind::Up),
            KeyCode::Down => self.motion_or_operator(buf, MotionKind::Down),
            KeyCode::Char(_) => {
                if key.paste {
                    // Bracketed paste is not a Normal-mode concern.
                    return false;
                }
                if key.has_chord_mods() {
                    self.clear_pending();
                    return true;
                }
                match key_char(key) {
                    Some(c) => self.handle_normal_char(buf, c),
                    None => {
                        self.clear_pending();
                        true
                    }
                }
            }
            // Unknown named keys are consumed, clearing pending state.
            _ => {
                self.clear_pending();
                true
            }
        }
    }

    fn handle_normal_char(&mut self, buf: &mut PromptBuffer, c: char) -> bool {
        let style = self.caps.settings.vim_mode_style();
        let command_mode_disabled = self.caps.settings.command_mode_disabled();
        let visual = matches!(buf.mode, Mode::Visual | Mode::VisualLine);
        let plain_normal = buf.mode == Mode::Normal && self.pending_operator.is_none();

        // Count accumulation: 1-9 always, 0 only once a count exists.
        if c.is_ascii_digit() && (c != '0' || self.count > 0) {
            let digit = (c as u8 - b'0') as u32;
            self.count = self
                .count
                .saturating_mul(10)
                .saturating_add(digit)
                .min(COUNT_MAX);
            return true;
        }

        // `g` prefix resolution. An outer operator carried through the
        // prefix composes the same way any other motion key would; the line
        // jumps have no operator span, so the composite is a true no-op.
        if let Some(PendingOperator::G(outer)) = self.pending_operator {
            self.pending_operator = None;
            if c == 'g' {
                let raw = self.count;
                self.count = 0;
                let (motion, count) = if raw > 0 {
                    (MotionKind::ToLine, raw)
                } else {
                    (MotionKind::FirstLine, 1)
                };
                match outer {
                    Some(op) => {
                        self.exec(buf, Action::ApplyOperator { op, motion, count }, true);
                    }
                    None => {
                        self.exec(buf, Action::Motion { motion, count }, false);
                    }
                }
            } else {
                self.count = 0;
            }
            return true;
        }

        // Inner-object completion (`diw`, `ciw`, `yiw`).
        if self.pending_inner {
            self.pending_inner = false;
            let op = self.pending_operator.take().and_then(PendingOperator::as_op);
            self.count = 0;
            if c == 'w'
                && let Some(op) = op
            {
                self.exec(buf, Action::InnerWordOperator { op }, true);
            }
            return true;
        }

        match c {
            '0' => self.motion_or_operator(buf, MotionKind::LineStart),
            'h' => self.motion_or_operator(buf, MotionKind::Left),
            'l' => self.motion_or_operator(buf, MotionKind::Right),
            'j' | 'k' => {
                if style == VimModeStyle::BashVim && plain_normal {
                    // The enclosing history navigator wins.
                    return false;
                }
                let motion = if c == 'j' {
                    MotionKind::Down
                } else {
                    MotionKind::Up
                };
                self.motion_or_operator(buf, motion)
            }
            'w' => self.motion_or_operator(buf, MotionKind::WordForward),
            'b' => self.motion_or_operator(buf, MotionKind::WordBackward),
            'e' => self.motion_or_operator(buf, MotionKind::WordEnd),
            '$' => self.motion_or_operator(buf, MotionKind::LineEnd),
            '^' => self.motion_or_operator(buf, MotionKind::FirstNonBlank),
            '%' => self.motion_or_operator(buf, MotionKind::MatchingPair),
            'G' => {
                if style == VimModeStyle::BashVim && plain_normal {
                    return false;
                }
                let motion = if self.count > 0 {
                    MotionKind::ToLine
                } else {
                    MotionKind::LastLine
                };
                self.motion_or_operator(buf, motion)
            }
            'g' => {
                let outer = self.pending_operator.take().and_then(PendingOperator::as_op);
                self.pending_operator = Some(PendingOperator::G(outer));
                true
            }
            'd' | 'c' | 'y' => self.handle_operator_key(buf, c, visual),
            'i' => {
                if self
                    .pending_operator
                    .map(|p| p.as_op().is_some())
                    .unwrap_or(false)
                {
                    self.pending_inner = true;
                } else {
                    self.clear_pending();
                    buf.mode = Mode::Insert;
                }
                true
            }
            'a' => {
                self.clear_pending();
                let len = buf.line_cp_len(buf.cursor_row);
                buf.cursor_col = (buf.cursor_col + 1).min(len);
                buf.mode = Mode::Insert;
                true
            }
            'A' => {
                self.clear_pending();
                buf.cursor_col = buf.line_cp_len(buf.cursor_row);
                buf.mode = Mode::Insert;
                true
            }
            'I' => {
                self.clear_pending();
                self.exec(
                    buf,
                    Action::Motion {
                        motion: MotionKind::FirstNonBlank,
                        count: 1,
                    },
                    false,
                );
                buf.mode = Mode::Insert;
                true
            }
            'o' => {
                let count = self.take_count_finishing();
                self.exec(
                    buf,
                    Action::Edit {
                        kind: EditKind::OpenLineBelow,
                        count,
                    },
                    true,
                );
                true
            }
            'O' => {
                let count = self.take_count_finishing();
                self.exec(
                    buf,
                    Action::Edit {
                        kind: EditKind::OpenLineAbove,
                        count,
                    },
                    true,
                );
                true
            }
            'v' => {
                self.clear_pending();
                if buf.mode == Mode::Visual {
                    buf.selection_anchor = None;
                    buf.mode = Mode::Normal;
                } else {
                    if buf.selection_anchor.is_none() {
                        buf.selection_anchor = Some((buf.cursor_row, buf.cursor_col));
                    }
                    buf.mode = Mode::Visual;
                }
                true
            }
            'V' => {
                self.clear_pending();
                if buf.mode == Mode::VisualLine {
                    buf.selection_anchor = None;
                    buf.mode = Mode::Normal;
                } else {
                    if buf.selection_anchor.is_none() {
                        buf.selection_anchor = Some((buf.cursor_row, buf.cursor_col));
                    }
                    buf.mode = Mode::VisualLine;
                }
                true
            }
            'x' => {
                if visual {
                    self.count = 0;
                    self.pending_operator = None;
                    self.exec(
                        buf,
                        Action::SelectionOperator {
                            op: OperatorKind::Delete,
                        },
                        false,
                    );
                } else {
                    let count = self.take_count_finishing();
                    self.exec(
                        buf,
                        Action::Edit {
                            kind: EditKind::DeleteChar,
                            count,
                        },
                        true,
                    );
                }
                true
            }
            'X' => {
                let count = self.take_count_finishing();
                self.exec(
                    buf,
                    Action::Edit {
                        kind: EditKind::DeleteCharBefore,
                        count,
                    },
                    true,
                );
                true
            }
            '~' => {
                let count = self.take_count_finishing();
                self.exec(
                    buf,
                    Action::Edit {
                        kind: EditKind::ToggleCase,
                        count,
                    },
                    true,
                );
                true
            }
            'r' => {
                self.pending_operator = None;
                self.pending_inner = false;
                self.pending_replace = true;
                true
            }
            'D' => {
                self.count = 0;
                self.pending_operator = None;
                self.exec(
                    buf,
                    Action::ApplyOperator {
                        op: OperatorKind::Delete,
                        motion: MotionKind::LineEnd,
                        count: 1,
                    },
                    true,
                );
                true
            }
            'C' => {
                self.count = 0;
                self.pending_operator = None;
                self.exec(
                    buf,
                    Action::ApplyOperator {
                        op: OperatorKind::Change,
                        motion: MotionKind::LineEnd,
                        count: 1,
                    },
                    true,
                );
                true
            }
            'u' => {
                let count = self.take_count_finishing();
                self.exec(buf, Action::Undo { count }, false);
                true
            }
            'p' => {
                let count = self.take_count_finishing();
                self.exec(
                    buf,
                    Action::Edit {
                        kind: EditKind::PasteAfter,
                        count,
                    },
                    true,
                );
                true
            }
            'P' => {
                let count = self.take_count_finishing();
                self.exec(
                    buf,
                    Action::Edit {
                        kind: EditKind::PasteBefore,
                        count,
                    },
                    true,
                );
                true
            }
            'n' | 'N' => {
                self.count = 0;
                self.pending_operator = None;
                self.exec(
                    buf,
                    Action::SearchNext {
                        reversed: c == 'N',
                    },
                    false,
                );
                true
            }
            'f' | 'F' | 't' | 'T' => {
                self.pending_find = Some(FindPending {
                    direction: if c == 'f' || c == 't' {
                        Direction::Forward
                    } else {
                        Direction::Backward
                    },
                    inclusive: c == 'f' || c == 'F',
                });
                true
            }
            ';' | ',' => {
                match self.last_find {
                    Some(spec) => {
                        let direction = if c == ',' {
                            spec.direction.reversed()
                        } else {
                            spec.direction
                        };
                        self.motion_or_operator(
                            buf,
                            MotionKind::FindChar {
                                target: spec.target,
                                direction,
                                inclusive: spec.inclusive,
                            },
                        );
                    }
                    None => {
                        self.count = 0;
                    }
                }
                true
            }
            '.' => {
                self.count = 0;
                self.pending_operator = None;
                if let Some(last) = self.last_command.clone() {
                    let res = dispatch(&last, buf);
                    if res.enters_insert {
                        buf.mode = Mode::Insert;
                    }
                }
                true
            }
            ':' | '/' | '?' => {
                if style == VimModeStyle::BashVim && (c == '/' || c == '?') {
                    // History search upstream wins in bash-vim style.
                    return false;
                }
                self.clear_pending();
                if command_mode_disabled {
                    buf.mode = Mode::Insert;
                    buf.insert_at_cursor(&c.to_string());
                } else {
                    buf.mode = Mode::Command;
                    self.command_line.begin(c);
                }
                true
            }
            _ => {
                // Unknown Normal-mode keys clear pending state and are
                // consumed, never forwarded.
                self.clear_pending();
                true
            }
        }
    }

    fn handle_operator_key(&mut self, buf: &mut PromptBuffer, c: char, visual: bool) -> bool {
        let op = match c {
            'd' => OperatorKind::Delete,
            'c' => OperatorKind::Change,
            _ => OperatorKind::Yank,
        };
        if visual {
            self.count = 0;
            self.pending_operator = None;
            self.exec(buf, Action::SelectionOperator { op }, false);
            return true;
        }
        let pending = match c {
            'd' => PendingOperator::Delete,
            'c' => PendingOperator::Change,
            _ => PendingOperator::Yank,
        };
        if self.pending_operator == Some(pending) {
            let count = self.take_count();
            self.pending_operator = None;
            self.exec(buf, Action::LinewiseOperator { op, count }, true);
        } else {
            self.pending_operator = Some(pending);
        }
        true
    }
}

fn key_char(key: &KeyEvent) -> Option<char> {
    if key.paste || !key.insertable {
        return None;
    }
    let mut chars = key.sequence.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(c)
}
