//! Selection set management.

use std::collections::HashSet;

use crate::document::Document;
use crate::item::ItemId;

/// The set of selected item ids. Always a subset of live document ids;
/// callers prune it after deletions via [`Selection::retain_existing`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<ItemId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &HashSet<ItemId> {
        &self.ids
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection with a single item.
    pub fn set(&mut self, id: ItemId) {
        self.ids.clear();
        self.ids.insert(id);
    }

    /// Wholesale replacement, used by marquee live preview.
    pub fn replace(&mut self, ids: HashSet<ItemId>) {
        self.ids = ids;
    }

    /// Shift-click semantics: flip one membership, leave the rest alone.
    pub fn toggle(&mut self, id: ItemId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Click semantics: an already-selected item keeps the whole selection
    /// (so a multi-selection can be dragged by any member), anything else
    /// becomes the sole selection.
    pub fn click(&mut self, id: ItemId) {
        if !self.ids.contains(&id) {
            self.set(id);
        }
    }

    pub fn select_all(&mut self, document: &Document) {
        self.ids = document.ids().into_iter().collect();
    }

    /// Drop ids that no longer exist in the document.
    pub fn retain_existing(&mut self, document: &Document) {
        self.ids.retain(|id| document.contains(*id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Status;

    #[test]
    fn test_click_preserves_multi_selection() {
        let mut sel = Selection::new();
        let a = uuid::Uuid::new_v4();
        let b = uuid::Uuid::new_v4();
        sel.replace(HashSet::from([a, b]));
        sel.click(a);
        assert_eq!(sel.len(), 2);
        let c = uuid::Uuid::new_v4();
        sel.click(c);
        assert_eq!(sel.ids(), &HashSet::from([c]));
    }

    #[test]
    fn test_toggle() {
        let mut sel = Selection::new();
        let a = uuid::Uuid::new_v4();
        let b = uuid::Uuid::new_v4();
        sel.set(a);
        sel.toggle(b);
        assert!(sel.contains(a) && sel.contains(b));
        sel.toggle(a);
        assert_eq!(sel.ids(), &HashSet::from([b]));
    }

    #[test]
    fn test_retain_existing_after_remove() {
        let mut doc = Document::new();
        let a = doc.add_location("A", 0.0, 0.0, Status::Green);
        let b = doc.add_location("B", 20.0, 0.0, Status::Green);
        let mut sel = Selection::new();
        sel.select_all(&doc);
        let removed = HashSet::from([a]);
        doc.remove(&removed);
        sel.retain_existing(&doc);
        assert_eq!(sel.ids(), &HashSet::from([b]));
    }
}
