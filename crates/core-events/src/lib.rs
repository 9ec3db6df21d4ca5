//! Core event types for the modaline prompt engine.
//!
//! This crate owns the logical key model consumed by the modal controller and
//! the small event vocabulary the binary's loop runs on. Translation from any
//! concrete terminal backend happens elsewhere (`core-input::key_token`);
//! nothing here depends on crossterm so the engine stays testable with
//! hand-built events.

use std::fmt;

pub mod confirm;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// The runtime loop uses a bounded mpsc channel sized by `EVENT_CHANNEL_CAP`.
// A single producer (the blocking input thread) uses `blocking_send`, which
// parks rather than dropping events: keystroke fidelity beats lossy drop
// strategies for an interactive prompt. Additional producers (external-editor
// completion, future timers) share the same channel and the same policy.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Top-level event enum consumed by the runtime loop.
#[derive(Debug, Clone)]
pub enum Event {
    /// A translated key press.
    Input(KeyEvent),
    /// Text produced by an external editor session (Ctrl+X Ctrl+E round trip).
    ExternalEdit(String),
    /// Orderly shutdown request.
    Shutdown,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const META = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

/// Normalized logical key identity. Characters carry their scalar value;
/// everything else the controller cares about is a named variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

/// A single key press as seen by the modal controller.
///
/// `sequence` holds the printable text of the event: the character itself for
/// ordinary typing, the full pasted payload for bracketed paste, and empty for
/// named keys. `insertable` marks events whose sequence may be spliced into
/// the buffer verbatim. Cursor positions downstream are code-point indices,
/// so the sequence is treated as a stream of scalars, never bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub sequence: String,
    pub mods: KeyModifiers,
    pub paste: bool,
    pub insertable: bool,
}

impl KeyEvent {
    /// Plain printable character.
    pub fn ch(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            sequence: c.to_string(),
            mods: KeyModifiers::empty(),
            paste: false,
            insertable: true,
        }
    }

    /// Named (non-printable) key.
    pub fn named(code: KeyCode) -> Self {
        Self {
            code,
            sequence: String::new(),
            mods: KeyModifiers::empty(),
            paste: false,
            insertable: false,
        }
    }

    /// Ctrl chord over a base character (never insertable).
    pub fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            sequence: c.to_string(),
            mods: KeyModifiers::CTRL,
            paste: false,
            insertable: false,
        }
    }

    /// Bracketed-paste payload.
    pub fn pasted(text: impl Into<String>) -> Self {
        let sequence = text.into();
        Self {
            code: KeyCode::Char('\0'),
            sequence,
            mods: KeyModifiers::empty(),
            paste: true,
            insertable: true,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.mods.is_empty()
    }

    /// Ctrl or Meta held. Shift is not a chord: shifted letters arrive as
    /// their uppercase sequence and stay ordinary text.
    pub fn has_chord_mods(&self) -> bool {
        self.mods
            .intersects(KeyModifiers::CTRL | KeyModifiers::META)
    }

    pub fn is_ctrl(&self, c: char) -> bool {
        self.mods.contains(KeyModifiers::CTRL) && matches!(self.code, KeyCode::Char(k) if k == c)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

/// Helper result type shared by event-producing collaborators.
pub type EventResult<T> = anyhow::Result<T>;
