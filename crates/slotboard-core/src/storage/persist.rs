//! Debounced persistence of document and camera state.
//!
//! Each change resets the debounce window; the write fires once the state
//! has been quiet for the window. The app shell calls [`PersistManager::flush`]
//! unconditionally on teardown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{save_state, Store};
use crate::camera::Camera;
use crate::document::Document;

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

pub struct PersistManager {
    store: Arc<dyn Store>,
    debounce: Duration,
    /// Time of the most recent unflushed change.
    last_change: Option<Instant>,
}

impl PersistManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            last_change: None,
        }
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Record a change at `now`, restarting the debounce window.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.last_change.is_some()
    }

    fn should_save(&self, now: Instant) -> bool {
        match self.last_change {
            Some(changed) => now.duration_since(changed) >= self.debounce,
            None => false,
        }
    }

    /// Write state out if the debounce window has elapsed. Returns true
    /// when a write happened.
    pub fn maybe_save(&mut self, now: Instant, document: &Document, camera: &Camera) -> bool {
        if !self.should_save(now) {
            return false;
        }
        self.flush(document, camera);
        true
    }

    /// Write state out immediately if anything changed since the last
    /// write. Called on all exit paths.
    pub fn flush(&mut self, document: &Document, camera: &Camera) {
        if self.last_change.is_none() {
            return;
        }
        save_state(self.store.as_ref(), document, camera);
        self.last_change = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Status;
    use crate::storage::{load_document, MemoryStore};

    fn manager() -> PersistManager {
        let mut m = PersistManager::new(Arc::new(MemoryStore::new()));
        m.set_debounce(Duration::from_millis(100));
        m
    }

    #[test]
    fn test_save_waits_for_quiet_window() {
        let mut m = manager();
        let doc = Document::new();
        let camera = Camera::default();
        let t0 = Instant::now();
        m.mark_dirty(t0);
        assert!(!m.maybe_save(t0 + Duration::from_millis(50), &doc, &camera));
        // A second change restarts the window.
        m.mark_dirty(t0 + Duration::from_millis(80));
        assert!(!m.maybe_save(t0 + Duration::from_millis(150), &doc, &camera));
        assert!(m.maybe_save(t0 + Duration::from_millis(200), &doc, &camera));
        assert!(!m.is_dirty());
    }

    #[test]
    fn test_flush_writes_pending_changes() {
        let mut m = manager();
        let mut doc = Document::new();
        doc.add_location("BIN1", 0.0, 0.0, Status::Green);
        m.mark_dirty(Instant::now());
        m.flush(&doc, &Camera::default());
        assert_eq!(load_document(m.store().as_ref()), doc);
    }

    #[test]
    fn test_clean_state_never_writes() {
        let mut m = manager();
        let doc = Document::new();
        assert!(!m.maybe_save(Instant::now(), &doc, &Camera::default()));
        m.flush(&doc, &Camera::default());
        assert!(m.store().get(crate::storage::DOCUMENT_KEY).unwrap().is_none());
    }
}
