//! Command-line sub-mode state and ex-command classification.
//!
//! The accumulator retains its leading prefix (`:`, `/`, `?`) while active.
//! Backspace trims one code point and deactivates once only the prefix would
//! remain. Parsing is pure classification; the recognized ex commands are
//! inert placeholders whose behavior belongs to the host.

/// Raw command-line buffer, prefix included.
#[derive(Debug, Default, Clone)]
pub struct CommandLineState {
    buf: String,
}

impl CommandLineState {
    /// True while a command is being entered.
    pub fn is_active(&self) -> bool {
        !self.buf.is_empty()
    }

    pub fn prefix(&self) -> Option<char> {
        self.buf.chars().next()
    }

    pub fn buffer(&self) -> &str {
        &self.buf
    }

    /// Begin a new entry with the given prefix, discarding prior content.
    pub fn begin(&mut self, prefix: char) {
        self.buf.clear();
        self.buf.push(prefix);
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Trim one code point. Returns false when the buffer emptied (the caller
    /// leaves Command mode).
    pub fn backspace(&mut self) -> bool {
        if self.buf.chars().count() > 1 {
            self.buf.pop();
            true
        } else {
            self.buf.clear();
            false
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }
}

/// Classified ex command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Quit,
    Write,
    WriteQuit,
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let s = raw.trim();
        let Some(body) = s.strip_prefix(':') else {
            return ParsedCommand::Unknown(s.to_string());
        };
        match body {
            "q" => ParsedCommand::Quit,
            "w" => ParsedCommand::Write,
            "wq" => ParsedCommand::WriteQuit,
            other => ParsedCommand::Unknown(other.to_string()),
        }
    }
}
