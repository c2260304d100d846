//! Operation log — the authoritative, ordered history plus a redo stack.
//!
//! DESIGN
//! ======
//! `committed` is the board: position in this vector is the only ordering
//! authority (server receipt order). `redo` is a single linear branch of
//! undone operations, LIFO.
//!
//! - Any commit clears `redo`. Redo history never forks.
//! - Undo is global: it pops the newest operation whoever drew it.
//! - Redo re-appends the exact value that was undone (same id).
//! - Undo/redo on an empty stack is a no-op, not an error.
//!
//! The log does no geometry validation. A well-formed `kind` is guaranteed
//! by the type.

use crate::operation::Operation;

#[derive(Debug, Default, Clone)]
pub struct OperationLog {
    committed: Vec<Operation>,
    redo: Vec<Operation>,
}

impl OperationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `op` and discard the redo branch.
    pub fn commit(&mut self, op: Operation) -> &Operation {
        self.redo.clear();
        self.committed.push(op);
        &self.committed[self.committed.len() - 1]
    }

    /// Move the newest committed operation onto the redo stack.
    pub fn undo(&mut self) -> Option<&Operation> {
        let op = self.committed.pop()?;
        self.redo.push(op);
        self.redo.last()
    }

    /// Re-append the most recently undone operation.
    pub fn redo(&mut self) -> Option<&Operation> {
        let op = self.redo.pop()?;
        self.committed.push(op);
        self.committed.last()
    }

    /// Empty both the history and the redo branch.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.redo.clear();
    }

    /// Point-in-time copy of the committed history.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Operation> {
        self.committed.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

#[cfg(test)]
#[path = "oplog_test.rs"]
mod tests;
