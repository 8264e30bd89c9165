//! Document store: the ordered scene item collection and its mutations.
//!
//! Item order is z-order. All direct-manipulation mutations snap coordinates
//! to the grid; status patches from sync never touch positions.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

use crate::item::{
    DEFAULT_FONT_SIZE, Item, ItemId, LineSegment, LOCATION_HEIGHT, LOCATION_WIDTH, Location,
    Status, TextLabel,
};
use crate::snap::{GRID_SIZE, snap_coord, snap_point};

/// Vertical step between batch-added locations, in grid units.
const BATCH_ROW_STEP: f64 = 2.0 * GRID_SIZE;
/// Items per column before wrapping.
const BATCH_COLUMN_WRAP: usize = 10;
/// Horizontal step between batch columns, in grid units.
const BATCH_COLUMN_STEP: f64 = 5.0 * GRID_SIZE;

/// Validation failures for batch location creation. The whole batch is
/// rejected, nothing is created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("base name is empty")]
    EmptyBaseName,
    #[error("range bound is not a number or a single letter A-Z")]
    MalformedBound,
    #[error("range is reversed (from > to)")]
    ReversedRange,
}

/// An inclusive naming range for batch creation, numeric or alphabetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchRange {
    Numeric { from: i64, to: i64 },
    Letters { from: char, to: char },
}

impl BatchRange {
    /// Parse the raw bound strings from the batch-add form.
    ///
    /// Bounds must both be integers, or both single letters A-Z
    /// (case-insensitive). Reversed bounds are rejected.
    pub fn parse(from: &str, to: &str) -> Result<Self, BatchError> {
        let from = from.trim();
        let to = to.trim();
        if let (Ok(a), Ok(b)) = (from.parse::<i64>(), to.parse::<i64>()) {
            if a > b {
                return Err(BatchError::ReversedRange);
            }
            return Ok(BatchRange::Numeric { from: a, to: b });
        }
        let single_letter = |s: &str| -> Option<char> {
            let mut chars = s.chars();
            let c = chars.next()?.to_ascii_uppercase();
            if chars.next().is_none() && c.is_ascii_uppercase() {
                Some(c)
            } else {
                None
            }
        };
        match (single_letter(from), single_letter(to)) {
            (Some(a), Some(b)) if a <= b => Ok(BatchRange::Letters { from: a, to: b }),
            (Some(_), Some(_)) => Err(BatchError::ReversedRange),
            _ => Err(BatchError::MalformedBound),
        }
    }

    /// The name suffixes this range produces, in order.
    pub fn values(&self) -> Vec<String> {
        match *self {
            BatchRange::Numeric { from, to } => (from..=to).map(|n| n.to_string()).collect(),
            BatchRange::Letters { from, to } => (from..=to).map(|c| c.to_string()).collect(),
        }
    }
}

/// The scene document. Serialized as a bare item array for persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    items: Vec<Item>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Items in z-order (last draws on top).
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// All ids, used by select-all.
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(Item::id).collect()
    }

    /// Ids of Location items in document order, the input to a sync pass.
    pub fn location_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| matches!(item, Item::Location(_)))
            .map(Item::id)
            .collect()
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.items.iter().filter_map(Item::as_location)
    }

    /// Append a location at the snapped position. Returns its id.
    pub fn add_location(&mut self, name: &str, x: f64, y: f64, status: Status) -> ItemId {
        let id = Uuid::new_v4();
        self.items.push(Item::Location(Location {
            id,
            name: name.to_string(),
            x: snap_coord(x),
            y: snap_coord(y),
            width: LOCATION_WIDTH,
            height: LOCATION_HEIGHT,
            status,
        }));
        id
    }

    /// Append a text label at the snapped position. Returns its id.
    pub fn add_text(&mut self, content: &str, x: f64, y: f64) -> ItemId {
        let id = Uuid::new_v4();
        self.items.push(Item::Text(TextLabel {
            id,
            content: content.to_string(),
            x: snap_coord(x),
            y: snap_coord(y),
            font_size: DEFAULT_FONT_SIZE,
        }));
        id
    }

    /// Append a line with both endpoints snapped. Returns its id.
    pub fn add_line(&mut self, start: Point, end: Point) -> ItemId {
        let id = Uuid::new_v4();
        let start = snap_point(start);
        let end = snap_point(end);
        self.items.push(Item::Line(LineSegment {
            id,
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        }));
        id
    }

    /// Create one location per range value, named `base_name + value`,
    /// laid out in columns that advance down two grid units per item and
    /// wrap every ten items.
    ///
    /// Validation happens before any mutation; on error the document is
    /// untouched.
    pub fn batch_add_locations(
        &mut self,
        base_name: &str,
        range: &BatchRange,
        origin: Point,
    ) -> Result<Vec<ItemId>, BatchError> {
        let base_name = base_name.trim();
        if base_name.is_empty() {
            return Err(BatchError::EmptyBaseName);
        }
        let origin = snap_point(origin);
        let mut ids = Vec::new();
        for (i, value) in range.values().iter().enumerate() {
            let col = (i / BATCH_COLUMN_WRAP) as f64;
            let row = (i % BATCH_COLUMN_WRAP) as f64;
            let x = origin.x + col * BATCH_COLUMN_STEP;
            let y = origin.y + row * BATCH_ROW_STEP;
            ids.push(self.add_location(
                &format!("{base_name}{value}"),
                x,
                y,
                Status::Green,
            ));
        }
        Ok(ids)
    }

    /// Translate every named item by a common, already-snapped delta.
    pub fn translate(&mut self, ids: &HashSet<ItemId>, dx: f64, dy: f64) {
        for item in &mut self.items {
            if ids.contains(&item.id()) {
                item.translate(dx, dy);
            }
        }
    }

    /// Set an item's anchor to an absolute position. Used by drag to apply
    /// snapped positions without accumulating per-frame deltas.
    pub fn set_anchor(&mut self, id: ItemId, pos: Point) {
        for item in &mut self.items {
            if item.id() == id {
                let old = item.anchor();
                item.translate(pos.x - old.x, pos.y - old.y);
                return;
            }
        }
    }

    /// Rename a location. Empty trimmed names are rejected as a no-op.
    pub fn rename_location(&mut self, id: ItemId, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        for item in &mut self.items {
            if let Item::Location(loc) = item
                && loc.id == id
            {
                loc.name = name.to_string();
                return;
            }
        }
    }

    /// Replace a text label's content. Empty trimmed content is a no-op.
    pub fn edit_text(&mut self, id: ItemId, content: &str) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }
        for item in &mut self.items {
            if let Item::Text(text) = item
                && text.id == id
            {
                text.content = content.to_string();
                return;
            }
        }
    }

    /// Drop every item whose id is in the set.
    pub fn remove(&mut self, ids: &HashSet<ItemId>) {
        self.items.retain(|item| !ids.contains(&item.id()));
    }

    /// Patch only the status field of matching locations. Unknown ids are
    /// ignored.
    pub fn apply_statuses(&mut self, updates: &HashMap<ItemId, Status>) {
        for item in &mut self.items {
            if let Item::Location(loc) = item
                && let Some(status) = updates.get(&loc.id)
            {
                loc.status = *status;
            }
        }
    }

    /// Wholesale replacement, used only by undo.
    pub fn restore(&mut self, snapshot: Document) {
        self.items = snapshot.items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_snaps_coordinates() {
        let mut doc = Document::new();
        let id = doc.add_location("BIN1", 23.0, 47.0, Status::Green);
        let loc = doc.get(id).unwrap().as_location().unwrap();
        assert_eq!((loc.x, loc.y), (20.0, 40.0));
    }

    #[test]
    fn test_ids_unique_across_adds_and_deletes() {
        let mut doc = Document::new();
        let mut seen = HashSet::new();
        for i in 0..20 {
            let id = doc.add_location(&format!("L{i}"), 0.0, 0.0, Status::Green);
            assert!(seen.insert(id));
        }
        let victims: HashSet<_> = doc.ids().into_iter().take(10).collect();
        doc.remove(&victims);
        for i in 0..20 {
            let id = doc.add_text(&format!("T{i}"), 0.0, 0.0);
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn test_batch_numeric_range() {
        let mut doc = Document::new();
        let range = BatchRange::parse("1", "10").unwrap();
        let ids = doc
            .batch_add_locations("BIN", &range, Point::new(0.0, 0.0))
            .unwrap();
        assert_eq!(ids.len(), 10);
        let names: Vec<_> = doc.locations().map(|l| l.name.clone()).collect();
        assert_eq!(names[0], "BIN1");
        assert_eq!(names[9], "BIN10");
    }

    #[test]
    fn test_batch_letter_range() {
        let mut doc = Document::new();
        let range = BatchRange::parse("a", "C").unwrap();
        doc.batch_add_locations("ROW", &range, Point::new(0.0, 0.0))
            .unwrap();
        let names: Vec<_> = doc.locations().map(|l| l.name.clone()).collect();
        assert_eq!(names, vec!["ROWA", "ROWB", "ROWC"]);
    }

    #[test]
    fn test_batch_reversed_range_rejected() {
        let mut doc = Document::new();
        assert_eq!(BatchRange::parse("10", "1"), Err(BatchError::ReversedRange));
        assert_eq!(BatchRange::parse("Z", "A"), Err(BatchError::ReversedRange));
        assert_eq!(
            BatchRange::parse("1", "banana"),
            Err(BatchError::MalformedBound)
        );
        let range = BatchRange::Numeric { from: 1, to: 3 };
        let err = doc
            .batch_add_locations("  ", &range, Point::new(0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, BatchError::EmptyBaseName);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_batch_wraps_into_columns() {
        let mut doc = Document::new();
        let range = BatchRange::parse("1", "12").unwrap();
        doc.batch_add_locations("S", &range, Point::new(0.0, 0.0))
            .unwrap();
        let locs: Vec<_> = doc.locations().collect();
        // Eleventh item starts a new column at the original y.
        assert_eq!(locs[10].y, locs[0].y);
        assert!(locs[10].x > locs[9].x);
        // Rows advance by two grid units, columns by five.
        assert_eq!(locs[1].y - locs[0].y, 2.0 * GRID_SIZE);
        assert_eq!(locs[10].x - locs[0].x, 5.0 * GRID_SIZE);
    }

    #[test]
    fn test_translate_moves_named_items_by_common_delta() {
        let mut doc = Document::new();
        let a = doc.add_location("A", 0.0, 0.0, Status::Green);
        let b = doc.add_location("B", 100.0, 0.0, Status::Green);
        let line = doc.add_line(Point::new(0.0, 0.0), Point::new(200.0, 200.0));
        let moved = HashSet::from([a, line]);
        doc.translate(&moved, 40.0, -20.0);
        let la = doc.get(a).unwrap().as_location().unwrap();
        assert_eq!((la.x, la.y), (40.0, -20.0));
        // Items outside the set stay put.
        let lb = doc.get(b).unwrap().as_location().unwrap();
        assert_eq!((lb.x, lb.y), (100.0, 0.0));
        // Lines carry both endpoints by the same delta.
        let Some(Item::Line(seg)) = doc.get(line) else {
            panic!("expected line");
        };
        assert_eq!((seg.x1, seg.y1), (40.0, -20.0));
        assert_eq!((seg.x2, seg.y2), (240.0, 180.0));
    }

    #[test]
    fn test_rename_rejects_empty() {
        let mut doc = Document::new();
        let id = doc.add_location("BIN1", 0.0, 0.0, Status::Green);
        doc.rename_location(id, "   ");
        assert_eq!(doc.get(id).unwrap().as_location().unwrap().name, "BIN1");
        doc.rename_location(id, "BIN2");
        assert_eq!(doc.get(id).unwrap().as_location().unwrap().name, "BIN2");
    }

    #[test]
    fn test_apply_statuses_ignores_unknown_ids() {
        let mut doc = Document::new();
        let id = doc.add_location("BIN1", 0.0, 0.0, Status::Green);
        let mut updates = HashMap::new();
        updates.insert(id, Status::Red);
        updates.insert(Uuid::new_v4(), Status::Yellow);
        doc.apply_statuses(&updates);
        assert_eq!(
            doc.get(id).unwrap().as_location().unwrap().status,
            Status::Red
        );
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_document_json_roundtrip() {
        let mut doc = Document::new();
        doc.add_location("BIN1", 0.0, 0.0, Status::Yellow);
        doc.add_text("aisle", 20.0, 20.0);
        doc.add_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.starts_with('['));
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
