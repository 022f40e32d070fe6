// Copyright (C) 2025 Vix contributors. This program is free software: you can
// redistribute it and/or modify it under the terms of the GNU General Public
// License as published by the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Linear undo/redo over whole-buffer snapshots.
//!
//! The history is a vector of `(content, cursor)` checkpoints plus an index
//! into it. Entry zero is the state the session was created with, so undo can
//! always get back to the original text. Checkpointing after an undo discards
//! the redo branch.

use tracing::debug;

/// Snapshots are cheap at the sizes this engine serves (scripts, not books),
/// so a moderate cap is plenty.
const MAX_ENTRIES: usize = 200;

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub content: String,
    pub cursor: usize,
}

#[derive(Debug)]
pub struct History {
    entries: Vec<Snapshot>,
    index: usize,
}

impl History {
    /// Seed with the initial document state.
    pub fn new(content: &str, cursor: usize) -> Self {
        Self {
            entries: vec![Snapshot {
                content: content.to_string(),
                cursor,
            }],
            index: 0,
        }
    }

    /// Record a checkpoint. Truncates any redo branch first; a checkpoint
    /// whose content matches the current entry is dropped (undo steps over
    /// real changes only).
    pub fn checkpoint(&mut self, content: &str, cursor: usize) {
        self.entries.truncate(self.index + 1);
        if self.entries[self.index].content == content {
            return;
        }
        self.entries.push(Snapshot {
            content: content.to_string(),
            cursor,
        });
        self.index += 1;
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
            self.index -= 1;
        }
        debug!(depth = self.index, "history checkpoint");
    }

    /// Step back one checkpoint. `None` at the oldest change.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Step forward one checkpoint. `None` at the newest change.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    /// Checkpoints remaining behind the current position.
    pub fn undo_depth(&self) -> usize {
        self.index
    }

    /// Checkpoints ahead of the current position.
    pub fn redo_depth(&self) -> usize {
        self.entries.len() - 1 - self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut h = History::new("one", 0);
        h.checkpoint("two", 1);
        h.checkpoint("three", 2);

        assert_eq!(h.undo().unwrap().content, "two");
        assert_eq!(h.undo().unwrap().content, "one");
        assert!(h.undo().is_none());
        assert_eq!(h.redo().unwrap().content, "two");
        assert_eq!(h.redo().unwrap().content, "three");
        assert!(h.redo().is_none());
    }

    #[test]
    fn test_checkpoint_truncates_redo_branch() {
        let mut h = History::new("one", 0);
        h.checkpoint("two", 0);
        h.checkpoint("three", 0);
        h.undo();
        h.undo();
        h.checkpoint("fork", 0);
        assert!(h.redo().is_none());
        assert_eq!(h.undo().unwrap().content, "one");
    }

    #[test]
    fn test_noop_checkpoint_is_dropped() {
        let mut h = History::new("same", 0);
        h.checkpoint("same", 3);
        assert_eq!(h.undo_depth(), 0);
        assert!(h.undo().is_none());
    }

    #[test]
    fn test_depths() {
        let mut h = History::new("a", 0);
        h.checkpoint("b", 0);
        h.checkpoint("c", 0);
        assert_eq!(h.undo_depth(), 2);
        assert_eq!(h.redo_depth(), 0);
        h.undo();
        assert_eq!(h.undo_depth(), 1);
        assert_eq!(h.redo_depth(), 1);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut h = History::new("0", 0);
        for i in 1..=MAX_ENTRIES + 10 {
            h.checkpoint(&i.to_string(), 0);
        }
        // still undoable all the way down to the oldest retained entry
        let mut steps = 0;
        while h.undo().is_some() {
            steps += 1;
        }
        assert_eq!(steps, MAX_ENTRIES - 1);
    }
}
