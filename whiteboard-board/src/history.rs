//! Linear undo/redo history of text actions.
//!
//! Each user edit is one [`ActionGroup`]: an id plus the atoms it laid out.
//! The board stamps the id on every tile placement it creates, so undoing
//! is "remove by id everywhere" and redoing is "project the atoms again".

use thiserror::Error;
use whiteboard_core::{ActionId, PlacedAtom};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionGroup {
    pub id: ActionId,
    pub atoms: Vec<PlacedAtom>,
}

impl ActionGroup {
    pub fn new(atoms: Vec<PlacedAtom>) -> Self {
        Self {
            id: ActionId::new(),
            atoms,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActionLog {
    undo: Vec<ActionGroup>,
    redo: Vec<ActionGroup>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh group. Invalidates the redo history.
    pub fn record(&mut self, atoms: Vec<PlacedAtom>) -> ActionId {
        let group = ActionGroup::new(atoms);
        let id = group.id;
        self.push(group);
        id
    }

    /// Push an already-identified group. Invalidates the redo history.
    pub fn push(&mut self, group: ActionGroup) {
        self.undo.push(group);
        self.redo.clear();
    }

    /// Move the newest group to the redo stack and return it.
    pub fn undo(&mut self) -> Result<&ActionGroup, HistoryError> {
        let group = self.undo.pop().ok_or(HistoryError::NothingToUndo)?;
        self.redo.push(group);
        self.redo.last().ok_or(HistoryError::NothingToUndo)
    }

    /// Move the newest undone group back to the undo stack and return it.
    pub fn redo(&mut self) -> Result<&ActionGroup, HistoryError> {
        let group = self.redo.pop().ok_or(HistoryError::NothingToRedo)?;
        self.undo.push(group);
        self.undo.last().ok_or(HistoryError::NothingToRedo)
    }

    /// Forget everything.
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

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Group the next `undo` would revert.
    pub fn peek_undo(&self) -> Option<&ActionGroup> {
        self.undo.last()
    }
}
