//! Snapshot-based undo/redo history.
//!
//! Each undoable action pushes the full pre-mutation element list; undo and
//! redo swap whole snapshots in and out. History is bounded, session-scoped,
//! and owned by the editor instance; it is never persisted.

use crate::constants::MAX_UNDO_HISTORY;
use crate::types::Sketch;

/// Bounded undo/redo stacks of element-list snapshots.
#[derive(Debug, Clone, Default)]
pub struct UndoHistory {
    undo_stack: Vec<Sketch>,
    redo_stack: Vec<Sketch>,
}

impl UndoHistory {
    /// Creates a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pre-mutation state of the document.
    ///
    /// Clears the redo stack, since a fresh action invalidates anything that
    /// was previously undone. The oldest snapshot is dropped once the bound is
    /// reached.
    pub fn push_snapshot(&mut self, snapshot: Sketch) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Returns `true` if there is a snapshot to restore.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns `true` if there is an undone snapshot to re-apply.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pops the most recent snapshot, pushing `current` onto the redo stack.
    ///
    /// # Arguments
    ///
    /// * `current` - The document state as it is right now
    ///
    /// # Returns
    ///
    /// The state to restore, or `None` if nothing can be undone.
    pub fn undo(&mut self, current: Sketch) -> Option<Sketch> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Pops the most recently undone snapshot, pushing `current` back onto
    /// the undo stack.
    ///
    /// # Returns
    ///
    /// The state to restore, or `None` if nothing can be redone.
    pub fn redo(&mut self, current: Sketch) -> Option<Sketch> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    /// Clears both stacks, e.g. after loading a document.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
