//! History navigation with draft preservation.
//!
//! The navigator walks previously submitted entries without losing the text
//! the user was composing. Entering navigation snapshots the draft exactly
//! once; walking back down past the newest entry restores that snapshot
//! verbatim. Submitting resets navigation entirely.
//!
//! Index convention: `None` means "not navigating"; `Some(0)` is the most
//! recent entry, `Some(len - 1)` the oldest. Messages are stored oldest
//! first, so entry `i` is `messages[len - 1 - i]`.
//!
//! Methods return the text to install in the prompt (`None` for a no-op);
//! the caller owns pushing it into the buffer.

use tracing::debug;

#[derive(Debug, Default)]
pub struct HistoryNavigator {
    index: Option<usize>,
    original_draft: String,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_navigating(&self) -> bool {
        self.index.is_some()
    }

    /// Current index, `-1` when not navigating.
    pub fn index(&self) -> isize {
        self.index.map_or(-1, |i| i as isize)
    }

    /// Step to an older entry. On first use, captures `current_draft`.
    pub fn navigate_up(&mut self, messages: &[String], current_draft: &str) -> Option<String> {
        if messages.is_empty() {
            return None;
        }
        let next = match self.index {
            None => {
                self.original_draft = current_draft.to_string();
                0
            }
            Some(i) => (i + 1).min(messages.len() - 1),
        };
        if self.index == Some(next) {
            return None;
        }
        self.index = Some(next);
        debug!(target: "history.nav", index = next, "navigate_up");
        Some(messages[messages.len() - 1 - next].clone())
    }

    /// Step back toward the draft. Reaching `-1` restores the saved draft.
    pub fn navigate_down(&mut self, messages: &[String]) -> Option<String> {
        let i = self.index?;
        if i == 0 {
            self.index = None;
            debug!(target: "history.nav", "navigate_down_restores_draft");
            return Some(std::mem::take(&mut self.original_draft));
        }
        self.index = Some(i - 1);
        debug!(target: "history.nav", index = i - 1, "navigate_down");
        Some(messages[messages.len() - i].clone())
    }

    /// Jump straight to an index, clamped into `[-1, len - 1]`. Capture the
    /// draft when leaving `-1`; emit it when arriving at `-1`.
    pub fn go_to_index(
        &mut self,
        target: isize,
        messages: &[String],
        current_draft: &str,
    ) -> Option<String> {
        let clamped = target.clamp(-1, messages.len() as isize - 1);
        match (self.index, clamped) {
            (None, -1) => None,
            (Some(_), -1) => {
                self.index = None;
                Some(std::mem::take(&mut self.original_draft))
            }
            (from, to) => {
                let to = to as usize;
                if from.is_none() {
                    self.original_draft = current_draft.to_string();
                }
                if from == Some(to) {
                    return None;
                }
                self.index = Some(to);
                Some(messages[messages.len() - 1 - to].clone())
            }
        }
    }

    /// Trim and reset. Returns the trimmed text to forward to the submit port,
    /// or `None` for blank input (navigation still resets).
    pub fn submit(&mut self, value: &str) -> Option<String> {
        self.index = None;
        self.original_draft.clear();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
