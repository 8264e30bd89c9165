//! Slotboard Core Library
//!
//! Platform-agnostic data structures and logic for the Slotboard
//! warehouse layout editor.

pub mod camera;
pub mod config;
pub mod document;
pub mod editor;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod item;
pub mod selection;
pub mod snap;
pub mod storage;
pub mod sync;
pub mod warehouse;

pub use camera::{Camera, MAX_ZOOM, MIN_ZOOM};
pub use config::{Site, StatusPolicy, SyncConfig};
pub use document::{BatchError, BatchRange, Document};
pub use editor::{DoubleClickAction, DragSession, Editor, EditorState};
pub use history::{History, MAX_UNDO_HISTORY};
pub use input::{Modifiers, PointerButton, ToolKind};
pub use item::{Item, ItemId, LineSegment, Location, Status, TextLabel};
pub use selection::Selection;
pub use snap::{snap_coord, snap_point, GRID_SIZE};
pub use sync::{BatchOutcome, ResultCache, SyncError, SyncState, SyncTarget, SYNC_BATCH_SIZE};
pub use warehouse::{CheckResult, HttpLocationCheck, LocationCheck, StockItem};
