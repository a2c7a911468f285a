//! Bounded undo/redo history of document snapshots.

use crate::document::{DocumentSnapshot, FloorplanDocument};
use std::collections::VecDeque;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Undo and redo stacks of full element-sequence snapshots.
///
/// Only the document's elements are captured; the view and the selection
/// are not part of history.
#[derive(Debug, Clone)]
pub struct History {
    /// Oldest snapshot at the front.
    undo_stack: VecDeque<DocumentSnapshot>,
    redo_stack: Vec<DocumentSnapshot>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Push the current state to the undo stack (call before making changes).
    pub fn save_state(&mut self, document: &FloorplanDocument) {
        self.push_undo(document.snapshot());
        // Clear redo stack when new changes are made
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, snapshot: DocumentSnapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, document: &mut FloorplanDocument) -> bool {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(document.snapshot());
        document.restore(snapshot);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, document: &mut FloorplanDocument) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.push_undo(document.snapshot());
        document.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Drop all history (e.g. after loading a different document).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Element;
    use kurbo::Point;

    #[test]
    fn test_undo_add() {
        let mut doc = FloorplanDocument::new();
        let mut history = History::default();

        history.save_state(&doc);
        doc.add(Element::cubicle_at(Point::ZERO));
        assert!(history.can_undo());

        assert!(history.undo(&mut doc));
        assert!(doc.is_empty());
        assert!(history.can_redo());

        assert!(history.redo(&mut doc));
        assert_eq!(doc.len(), 1);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut doc = FloorplanDocument::new();
        doc.add(Element::spawn_at(Point::ZERO));
        let mut history = History::default();
        assert!(!history.undo(&mut doc));
        assert!(!history.redo(&mut doc));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_new_change_clears_redo() {
        let mut doc = FloorplanDocument::new();
        let mut history = History::default();
        history.save_state(&doc);
        doc.add(Element::cubicle_at(Point::ZERO));
        history.undo(&mut doc);
        assert!(history.can_redo());

        history.save_state(&doc);
        doc.add(Element::spawn_at(Point::ZERO));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut doc = FloorplanDocument::new();
        let mut history = History::default();
        for i in 0..60 {
            history.save_state(&doc);
            doc.add(Element::cubicle_at(Point::new(i as f64, 0.0)));
        }
        assert_eq!(history.undo_depth(), MAX_UNDO_HISTORY);

        while history.undo(&mut doc) {}
        // The oldest ten states were evicted.
        assert_eq!(doc.len(), 10);
    }
}
