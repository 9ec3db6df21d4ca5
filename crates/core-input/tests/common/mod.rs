//! Shared harness: feed literal key sequences through a controller wired to
//! recording collaborators, then assert on buffer + controller state.
#![allow(dead_code)]

use core_config::VimModeStyle;
use core_events::{KeyCode, KeyEvent};
use core_input::{
    Capabilities, ControllerObserver, ParsedCommand, StaticSettings, SubmitHandler, VimController,
};
use core_text::{Mode, PromptBuffer};
use std::sync::{Arc, Mutex};

pub struct Harness {
    pub controller: VimController,
    pub buf: PromptBuffer,
    pub submitted: Arc<Mutex<Vec<String>>>,
    pub modes_seen: Arc<Mutex<Vec<Mode>>>,
    pub ex_commands: Arc<Mutex<Vec<ParsedCommand>>>,
}

struct Sink(Arc<Mutex<Vec<String>>>);

impl SubmitHandler for Sink {
    fn submit(&mut self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

struct Recorder {
    modes: Arc<Mutex<Vec<Mode>>>,
    commands: Arc<Mutex<Vec<ParsedCommand>>>,
}

impl ControllerObserver for Recorder {
    fn on_mode_change(&self, mode: Mode) {
        self.modes.lock().unwrap().push(mode);
    }
    fn on_ex_command(&self, command: &ParsedCommand) {
        self.commands.lock().unwrap().push(command.clone());
    }
}

/// Fresh Normal-mode harness over `initial` text, cursor at the origin.
pub fn harness(initial: &str) -> Harness {
    harness_with(initial, StaticSettings::default())
}

pub fn bash_vim(initial: &str) -> Harness {
    harness_with(
        initial,
        StaticSettings {
            style: VimModeStyle::BashVim,
            disable_command_mode: false,
        },
    )
}

pub fn harness_with(initial: &str, settings: StaticSettings) -> Harness {
    let submitted = Arc::new(Mutex::new(Vec::new()));
    let modes_seen = Arc::new(Mutex::new(Vec::new()));
    let ex_commands = Arc::new(Mutex::new(Vec::new()));
    let caps = Capabilities {
        settings: Box::new(settings),
        launcher: None,
        submit: Some(Box::new(Sink(Arc::clone(&submitted)))),
        observers: vec![Box::new(Recorder {
            modes: Arc::clone(&modes_seen),
            commands: Arc::clone(&ex_commands),
        })],
    };
    let mut buf = PromptBuffer::from_text(initial);
    buf.mode = Mode::Normal;
    buf.cursor_row = 0;
    buf.cursor_col = 0;
    Harness {
        controller: VimController::new(caps),
        buf,
        submitted,
        modes_seen,
        ex_commands,
    }
}

impl Harness {
    pub fn key(&mut self, key: KeyEvent) -> bool {
        self.controller.handle_key(&mut self.buf, &key)
    }

    /// Feed each character of `seq` as a plain key press.
    pub fn chars(&mut self, seq: &str) {
        for c in seq.chars() {
            self.key(KeyEvent::ch(c));
        }
    }

    pub fn esc(&mut self) -> bool {
        self.key(KeyEvent::named(KeyCode::Esc))
    }

    pub fn enter(&mut self) -> bool {
        self.key(KeyEvent::named(KeyCode::Enter))
    }

    pub fn backspace(&mut self) -> bool {
        self.key(KeyEvent::named(KeyCode::Backspace))
    }

    pub fn ctrl(&mut self, c: char) -> bool {
        self.key(KeyEvent::ctrl(c))
    }

    pub fn text(&self) -> String {
        self.buf.text()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.buf.cursor_row, self.buf.cursor_col)
    }

    pub fn mode(&self) -> Mode {
        self.buf.mode
    }
}
