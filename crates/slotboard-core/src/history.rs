//! Bounded undo history of full document snapshots.

use crate::document::Document;

/// Maximum number of undo steps kept in memory.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Snapshot stack pushed immediately before each mutating user action.
/// Undo only, no redo.
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<Document>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Record the document state before a mutation. Oldest snapshots fall
    /// off once the cap is reached.
    pub fn push(&mut self, snapshot: Document) {
        if self.snapshots.len() >= MAX_UNDO_HISTORY {
            self.snapshots.remove(0);
        }
        self.snapshots.push(snapshot);
    }

    /// Pop the most recent snapshot, or None when empty.
    pub fn pop(&mut self) -> Option<Document> {
        self.snapshots.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Status;

    #[test]
    fn test_undo_restores_previous_state() {
        let mut doc = Document::new();
        doc.add_location("BIN1", 0.0, 0.0, Status::Green);
        let mut history = History::new();
        history.push(doc.clone());
        doc.add_location("BIN2", 20.0, 20.0, Status::Green);
        assert_eq!(doc.len(), 2);
        let snapshot = history.pop().unwrap();
        doc.restore(snapshot);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_pop_empty_is_none() {
        let mut history = History::new();
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_history_capped_drops_oldest() {
        let mut history = History::new();
        for i in 0..(MAX_UNDO_HISTORY + 5) {
            let mut doc = Document::new();
            doc.add_text(&format!("step {i}"), 0.0, 0.0);
            history.push(doc);
        }
        assert_eq!(history.len(), MAX_UNDO_HISTORY);
        // The newest snapshot is still on top.
        let top = history.pop().unwrap();
        let Some(crate::item::Item::Text(text)) = top.items().first() else {
            panic!("expected text item");
        };
        assert_eq!(text.content, format!("step {}", MAX_UNDO_HISTORY + 4));
    }
}
