//! Keys the modal layer deliberately leaves to the enclosing prompt, plus the
//! Ctrl+X Ctrl+E chord.

mod common;
use common::*;

use core_events::{KeyCode, KeyEvent};
use core_input::{Capabilities, EditorLauncher, StaticSettings, VimController};
use core_text::{Mode, PromptBuffer};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn insert_mode_reserved_keys_pass_through() {
    let mut h = harness("");
    h.chars("i");
    assert!(!h.key(KeyEvent::named(KeyCode::Tab)));
    assert!(!h.key(KeyEvent::named(KeyCode::Up)));
    assert!(!h.key(KeyEvent::named(KeyCode::Down)));
    assert!(!h.ctrl('r'));
    assert!(!h.ctrl('v'));
}

#[test]
fn leading_bang_on_empty_buffer_passes_through() {
    let mut h = harness("");
    h.chars("i");
    assert!(!h.key(KeyEvent::ch('!')), "shell-mode trigger belongs upstream");
    h.chars("ls");
    assert!(h.key(KeyEvent::ch('!')), "a later ! is ordinary text");
    assert_eq!(h.text(), "ls!");
}

#[test]
fn bash_vim_vertical_motion_passes_through() {
    let mut h = bash_vim("one\ntwo");
    assert!(!h.key(KeyEvent::ch('j')), "history navigator wins in bash-vim");
    assert!(!h.key(KeyEvent::ch('k')));
    assert!(!h.key(KeyEvent::ch('G')));
    assert_eq!(h.cursor(), (0, 0));
}

#[test]
fn bash_vim_still_composes_operators() {
    let mut h = bash_vim("one\ntwo\nthree");
    h.chars("dj");
    // With an armed operator, j is a motion again.
    assert_eq!(h.text(), "two\nthree");
}

#[test]
fn bash_vim_search_keys_pass_through() {
    let mut h = bash_vim("abc");
    assert!(!h.key(KeyEvent::ch('/')));
    assert!(!h.key(KeyEvent::ch('?')));
    assert_eq!(h.mode(), Mode::Normal);
}

#[test]
fn vim_editor_style_keeps_vertical_motion() {
    let mut h = harness("one\ntwo");
    assert!(h.key(KeyEvent::ch('j')));
    assert_eq!(h.cursor(), (1, 0));
}

#[test]
fn paste_event_inserts_in_insert_mode() {
    let mut h = harness("");
    h.chars("i");
    assert!(h.key(KeyEvent::pasted("multi\nline paste")));
    assert_eq!(h.text(), "multi\nline paste");
    assert_eq!(h.cursor(), (1, 10));
}

#[test]
fn paste_event_passes_through_in_normal_mode() {
    let mut h = harness("abc");
    assert!(!h.key(KeyEvent::pasted("ignored")));
    assert_eq!(h.text(), "abc");
}

struct CountingLauncher(Arc<AtomicUsize>);

impl EditorLauncher for CountingLauncher {
    fn open_in_external_editor(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn ctrl_x_ctrl_e_fires_the_launcher() {
    let launches = Arc::new(AtomicUsize::new(0));
    let caps = Capabilities {
        settings: Box::new(StaticSettings::default()),
        launcher: Some(Box::new(CountingLauncher(Arc::clone(&launches)))),
        submit: None,
        observers: Vec::new(),
    };
    let mut controller = VimController::new(caps);
    let mut buf = PromptBuffer::new();

    assert!(controller.handle_key(&mut buf, &KeyEvent::ctrl('x')));
    assert!(controller.handle_key(&mut buf, &KeyEvent::ctrl('e')));
    assert_eq!(launches.load(Ordering::SeqCst), 1);
}

#[test]
fn ctrl_x_followed_by_other_key_is_swallowed() {
    let launches = Arc::new(AtomicUsize::new(0));
    let caps = Capabilities {
        settings: Box::new(StaticSettings::default()),
        launcher: Some(Box::new(CountingLauncher(Arc::clone(&launches)))),
        submit: None,
        observers: Vec::new(),
    };
    let mut controller = VimController::new(caps);
    let mut buf = PromptBuffer::new();

    assert!(controller.handle_key(&mut buf, &KeyEvent::ctrl('x')));
    assert!(
        controller.handle_key(&mut buf, &KeyEvent::ch('q')),
        "the key after Ctrl+X is consumed, not forwarded"
    );
    assert_eq!(launches.load(Ordering::SeqCst), 0);
    assert!(buf.is_empty(), "the swallowed key never reaches the buffer");

    // The chord state cleared: a fresh Ctrl+X Ctrl+E still works.
    assert!(controller.handle_key(&mut buf, &KeyEvent::ctrl('x')));
    assert!(controller.handle_key(&mut buf, &KeyEvent::ctrl('e')));
    assert_eq!(launches.load(Ordering::SeqCst), 1);
}

#[test]
fn enter_without_submit_handler_passes_through() {
    let caps = Capabilities::default();
    let mut controller = VimController::new(caps);
    let mut buf = PromptBuffer::from_text("text");
    buf.mode = Mode::Insert;
    assert!(!controller.handle_key(&mut buf, &KeyEvent::named(KeyCode::Enter)));
    assert_eq!(buf.text(), "text");
}

#[test]
fn malformed_char_event_passes_through() {
    let mut h = harness("abc");
    let broken = KeyEvent {
        code: KeyCode::Char('x'),
        sequence: String::new(),
        mods: core_events::KeyModifiers::empty(),
        paste: false,
        insertable: true,
    };
    assert!(!h.key(broken));
    assert_eq!(h.text(), "abc");
}
