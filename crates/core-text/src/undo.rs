//! Bounded snapshot undo engine.
//!
//! Each entry is a full pre-image of the buffer text plus the cursor, pushed
//! by mutation verbs before they touch the text and never by motions. The
//! stack is capped; overflow discards the oldest entry. Successive identical
//! snapshots are skipped via a content hash so a mutation verb that turns out
//! to be a no-op cannot grow the stack.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use tracing::trace;

/// Maximum number of snapshots retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 100;

/// A full-state snapshot (text + cursor) for undo.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub lines: Vec<String>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    hash: u64,
}

#[derive(Debug, Default)]
pub struct UndoEngine {
    stack: Vec<Snapshot>,
    skipped: u64,
}

impl UndoEngine {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            skipped: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn snapshots_skipped(&self) -> u64 {
        self.skipped
    }

    pub fn push(&mut self, lines: &[String], cursor_row: usize, cursor_col: usize) {
        let hash = lines_hash(lines);
        if let Some(last) = self.stack.last()
            && last.hash == hash
        {
            self.skipped += 1;
            trace!(target: "state.undo", depth = self.stack.len(), hash, "snapshot_dedupe_skip");
            return;
        }
        self.stack.push(Snapshot {
            lines: lines.to_vec(),
            cursor_row,
            cursor_col,
            hash,
        });
        trace!(target: "state.undo", depth = self.stack.len(), hash, "push_snapshot");
        if self.stack.len() > UNDO_HISTORY_MAX {
            let _ = self.stack.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        let snap = self.stack.pop();
        if snap.is_some() {
            trace!(target: "state.undo", depth = self.stack.len(), "undo_pop");
        }
        snap
    }
}

fn lines_hash(lines: &[String]) -> u64 {
    let mut h = DefaultHasher::new();
    for l in lines {
        h.write(l.as_bytes());
        h.write_u8(b'\n');
    }
    h.finish()
}
