//! Bounded undo/redo history of whole-buffer snapshots.

use std::collections::VecDeque;

use super::buffer::BufferState;

/// Default maximum number of undo entries kept per session.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Buffer state plus the session's dirty flag at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub buffer: BufferState,
    pub dirty: bool,
}

/// Undo and redo stacks.
///
/// The history never touches the buffer itself; callers hand it snapshots and
/// apply whatever it gives back.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state about to be mutated. Clears the redo stack.
    pub fn begin_mutation(&mut self, before: Snapshot) {
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(before);
        self.redo.clear();
        tracing::trace!(
            target: "editor.history",
            undo = self.undo.len(),
            "snapshot recorded"
        );
    }

    /// Step back: `current` goes onto the redo stack and the previous
    /// snapshot is returned. `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        tracing::trace!(
            target: "editor.history",
            undo = self.undo.len(),
            redo = self.redo.len(),
            "undo"
        );
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(current);
        tracing::trace!(
            target: "editor.history",
            undo = self.undo.len(),
            redo = self.redo.len(),
            "redo"
        );
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Buffer;

    fn snap(buf: &Buffer, dirty: bool) -> Snapshot {
        Snapshot {
            buffer: buf.state(),
            dirty,
        }
    }

    #[test]
    fn test_undo_on_empty_history_returns_none() {
        let mut history = History::default();
        let buf = Buffer::from_text("x");
        assert!(history.undo(snap(&buf, false)).is_none());
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_redo_on_empty_stack_returns_none() {
        let mut history = History::default();
        let buf = Buffer::from_text("x");
        assert!(history.redo(snap(&buf, false)).is_none());
        assert_eq!(history.undo_depth(), 0);
    }

    #[test]
    fn test_undo_then_redo_restores_post_mutation_state() {
        let mut history = History::default();
        let mut buf = Buffer::from_text("abc");
        history.begin_mutation(snap(&buf, false));
        buf.move_end();
        buf.insert_char('d');
        let after = snap(&buf, true);

        let before = history.undo(after.clone()).unwrap();
        buf.restore(before.buffer.clone());
        assert_eq!(buf.full_text(), "abc");
        assert!(!before.dirty);

        let redone = history.redo(snap(&buf, before.dirty)).unwrap();
        assert_eq!(redone, after);
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut history = History::default();
        let buf = Buffer::from_text("abc");
        history.begin_mutation(snap(&buf, false));
        history.undo(snap(&buf, true));
        assert_eq!(history.redo_depth(), 1);
        history.begin_mutation(snap(&buf, false));
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_limit_drops_oldest_entry() {
        let mut history = History::new(3);
        for text in ["a", "b", "c", "d"] {
            history.begin_mutation(snap(&Buffer::from_text(text), false));
        }
        assert_eq!(history.undo_depth(), 3);
        let current = snap(&Buffer::from_text("e"), true);
        let mut oldest = None;
        let mut cur = current;
        while let Some(prev) = history.undo(cur.clone()) {
            oldest = Some(prev.clone());
            cur = prev;
        }
        let oldest = oldest.unwrap();
        assert_eq!(oldest.buffer.text.to_string(), "b");
    }
}
