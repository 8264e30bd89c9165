//! Point and box queries against the scene.

use kurbo::{Point, Rect};
use std::collections::HashSet;

use crate::document::Document;
use crate::geometry::{point_to_segment_dist, rects_overlap};
use crate::item::{Item, ItemId};

/// Line hit tolerance in screen pixels, converted to world units by zoom
/// so the grab distance stays constant on screen.
pub const LINE_HIT_THRESHOLD_PX: f64 = 6.0;

/// Topmost item under a world point, or None.
///
/// Scans in reverse z-order so the last-drawn item wins ties.
pub fn hit_test(document: &Document, world: Point, zoom: f64) -> Option<&Item> {
    let threshold = LINE_HIT_THRESHOLD_PX / zoom;
    document.items().iter().rev().find(|item| match item {
        Item::Location(_) | Item::Text(_) => item.bounds().contains(world),
        Item::Line(line) => point_to_segment_dist(world, line.start(), line.end()) <= threshold,
    })
}

/// Ids of all items intersecting a world-space box.
///
/// Locations and text match by bounding-box overlap. Lines match only when
/// an endpoint lies inside the box, so a line crossing clean through is
/// not selected.
pub fn box_query(document: &Document, world_box: Rect) -> HashSet<ItemId> {
    document
        .items()
        .iter()
        .filter(|item| match item {
            Item::Location(_) | Item::Text(_) => rects_overlap(item.bounds(), world_box),
            Item::Line(line) => {
                world_box.contains(line.start()) || world_box.contains(line.end())
            }
        })
        .map(Item::id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Status;

    fn doc_with_location() -> (Document, ItemId) {
        let mut doc = Document::new();
        let id = doc.add_location("BIN1", 100.0, 100.0, Status::Green);
        (doc, id)
    }

    #[test]
    fn test_hit_inside_location() {
        let (doc, id) = doc_with_location();
        let hit = hit_test(&doc, Point::new(140.0, 120.0), 1.0).unwrap();
        assert_eq!(hit.id(), id);
    }

    #[test]
    fn test_miss_one_unit_outside() {
        let (doc, _) = doc_with_location();
        // Location spans 100..180 x 100..140.
        assert!(hit_test(&doc, Point::new(181.0, 120.0), 1.0).is_none());
        assert!(hit_test(&doc, Point::new(140.0, 99.0), 1.0).is_none());
    }

    #[test]
    fn test_topmost_wins() {
        let mut doc = Document::new();
        let _below = doc.add_location("A", 100.0, 100.0, Status::Green);
        let above = doc.add_location("B", 100.0, 100.0, Status::Green);
        let hit = hit_test(&doc, Point::new(120.0, 120.0), 1.0).unwrap();
        assert_eq!(hit.id(), above);
    }

    #[test]
    fn test_line_threshold_scales_with_zoom() {
        let mut doc = Document::new();
        let id = doc.add_line(Point::new(0.0, 0.0), Point::new(200.0, 0.0));
        // 5 world units away: inside the 6px threshold at zoom 1.
        let near = Point::new(100.0, 5.0);
        assert_eq!(hit_test(&doc, near, 1.0).map(Item::id), Some(id));
        // At zoom 2 the world tolerance halves to 3, so the same point misses.
        assert!(hit_test(&doc, near, 2.0).is_none());
    }

    #[test]
    fn test_box_query_line_endpoints_only() {
        let mut doc = Document::new();
        let crossing = doc.add_line(Point::new(-100.0, 50.0), Point::new(300.0, 50.0));
        let inside = doc.add_line(Point::new(20.0, 20.0), Point::new(400.0, 400.0));
        let boxed = box_query(&doc, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(!boxed.contains(&crossing));
        assert!(boxed.contains(&inside));
    }

    #[test]
    fn test_box_query_overlap() {
        let (doc, id) = doc_with_location();
        let hits = box_query(&doc, Rect::new(0.0, 0.0, 110.0, 110.0));
        assert_eq!(hits, HashSet::from([id]));
        assert!(box_query(&doc, Rect::new(0.0, 0.0, 50.0, 50.0)).is_empty());
    }
}
