//! Terminal key translation: crossterm events into the engine's key model.
//!
//! Kept at the edge of the crate so everything inward of it stays free of
//! terminal backend types. Returns `None` for key codes the prompt has no use
//! for (function keys, media keys, releases).

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event. `None` for unsupported codes and key releases.
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if matches!(event.kind, CKeyEventKind::Release) {
        return None;
    }
    let mods = map_mods(event.modifiers);
    let key = match event.code {
        CKeyCode::Char(c) => {
            let insertable = !mods.intersects(KeyModifiers::CTRL | KeyModifiers::META);
            KeyEvent {
                code: KeyCode::Char(c),
                sequence: c.to_string(),
                mods,
                paste: false,
                insertable,
            }
        }
        CKeyCode::Enter => named(KeyCode::Enter, mods),
        CKeyCode::Esc => named(KeyCode::Esc, mods),
        CKeyCode::Backspace => named(KeyCode::Backspace, mods),
        CKeyCode::Tab | CKeyCode::BackTab => named(KeyCode::Tab, mods),
        CKeyCode::Up => named(KeyCode::Up, mods),
        CKeyCode::Down => named(KeyCode::Down, mods),
        CKeyCode::Left => named(KeyCode::Left, mods),
        CKeyCode::Right => named(KeyCode::Right, mods),
        _ => return None,
    };
    Some(key)
}

/// Bracketed-paste payload as a single insertable event.
pub fn map_paste(data: &str) -> KeyEvent {
    KeyEvent::pasted(data)
}

fn named(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        sequence: String::new(),
        mods,
        paste: false,
        insertable: false,
    }
}

fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) || mods.contains(CKeyModifiers::META) {
        out |= KeyModifiers::META;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}
