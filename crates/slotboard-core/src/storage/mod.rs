//! Persistence abstraction for editor state.
//!
//! All reads are best-effort: corrupt or missing data falls back to a
//! default value, never an error surfaced to the caller.

mod file;
mod memory;
mod persist;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use persist::{PersistManager, DEFAULT_DEBOUNCE_MS};

use thiserror::Error;

use crate::camera::Camera;
use crate::document::Document;

/// Key for the serialized item array.
pub const DOCUMENT_KEY: &str = "document";
/// Key for the serialized camera transform.
pub const CAMERA_KEY: &str = "camera";
/// Key for the serialized sync configuration.
pub const SYNC_CONFIG_KEY: &str = "sync_config";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value string store backing all persisted editor state.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Load the persisted document, falling back to empty on any failure.
pub fn load_document(store: &dyn Store) -> Document {
    match store.get(DOCUMENT_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("discarding corrupt persisted document: {e}");
            Document::new()
        }),
        Ok(None) => Document::new(),
        Err(e) => {
            log::warn!("failed to read persisted document: {e}");
            Document::new()
        }
    }
}

/// Load the persisted camera, falling back to the identity view.
/// The loaded transform is sanitized so a tampered or stale file can
/// never violate the zoom bounds.
pub fn load_camera(store: &dyn Store) -> Camera {
    let camera: Camera = match store.get(CAMERA_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
        _ => Camera::default(),
    };
    camera.sanitized()
}

/// Write document and camera. Failures are logged and swallowed, the
/// in-memory state stays authoritative.
pub fn save_state(store: &dyn Store, document: &Document, camera: &Camera) {
    let write = |key: &str, value: Result<String, serde_json::Error>| match value {
        Ok(json) => {
            if let Err(e) = store.set(key, &json) {
                log::warn!("failed to persist {key}: {e}");
            }
        }
        Err(e) => log::warn!("failed to serialize {key}: {e}"),
    };
    write(DOCUMENT_KEY, serde_json::to_string(document));
    write(CAMERA_KEY, serde_json::to_string(camera));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Status;

    #[test]
    fn test_load_missing_document_is_empty() {
        let store = MemoryStore::new();
        assert!(load_document(&store).is_empty());
        assert_eq!(load_camera(&store), Camera::default());
    }

    #[test]
    fn test_corrupt_document_resets_to_empty() {
        let store = MemoryStore::new();
        store.set(DOCUMENT_KEY, "{not json").unwrap();
        store.set(CAMERA_KEY, "[broken").unwrap();
        assert!(load_document(&store).is_empty());
        assert_eq!(load_camera(&store), Camera::default());
    }

    #[test]
    fn test_loaded_camera_zoom_stays_in_bounds() {
        let store = MemoryStore::new();
        store.set(CAMERA_KEY, r#"{"x":0.0,"y":0.0,"z":0.0}"#).unwrap();
        let camera = load_camera(&store);
        assert_eq!(camera.z, crate::camera::MIN_ZOOM);
        store.set(CAMERA_KEY, r#"{"x":5.0,"y":-3.0,"z":500.0}"#).unwrap();
        let camera = load_camera(&store);
        assert_eq!(camera.z, crate::camera::MAX_ZOOM);
        assert_eq!((camera.x, camera.y), (5.0, -3.0));
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = MemoryStore::new();
        let mut doc = Document::new();
        doc.add_location("BIN1", 20.0, 40.0, Status::Red);
        let camera = Camera { x: 12.0, y: -7.0, z: 2.0 };
        save_state(&store, &doc, &camera);
        assert_eq!(load_document(&store), doc);
        assert_eq!(load_camera(&store), camera);
    }
}
