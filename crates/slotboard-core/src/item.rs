//! Scene item model: locations, text labels, and connecting lines.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene items. Never reused, even after deletion.
pub type ItemId = Uuid;

/// Default size of a location rectangle in world units.
pub const LOCATION_WIDTH: f64 = 80.0;
pub const LOCATION_HEIGHT: f64 = 40.0;

/// Default font size for text labels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Approximate advance width per character, as a fraction of font size.
/// Used for hit-testing text without a font system in scope.
pub const TEXT_ADVANCE_RATIO: f64 = 0.6;

/// Occupancy status of a storage location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No flagged occupancy.
    #[default]
    Green,
    /// Unknown: the last lookup failed or the location was not found.
    Yellow,
    /// Flagged occupancy present.
    Red,
}

/// A named storage slot with a rectangular footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: ItemId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub status: Status,
}

impl Location {
    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// A free-standing text annotation. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub id: ItemId,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

impl TextLabel {
    /// Approximate bounding box derived from content length and font size.
    pub fn bounds(&self) -> Rect {
        let width = self.content.chars().count() as f64 * self.font_size * TEXT_ADVANCE_RATIO;
        Rect::new(self.x, self.y, self.x + width.max(1.0), self.y + self.font_size)
    }
}

/// A straight connecting line between two world points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub id: ItemId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineSegment {
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            self.x1.max(self.x2),
            self.y1.max(self.y2),
        )
    }
}

/// Closed union of everything that can live on the canvas.
///
/// Document order is z-order: the last item in the sequence draws on top and
/// wins hit-testing ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    Location(Location),
    Text(TextLabel),
    Line(LineSegment),
}

impl Item {
    pub fn id(&self) -> ItemId {
        match self {
            Item::Location(l) => l.id,
            Item::Text(t) => t.id,
            Item::Line(l) => l.id,
        }
    }

    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Item::Location(l) => l.bounds(),
            Item::Text(t) => t.bounds(),
            Item::Line(l) => l.bounds(),
        }
    }

    /// Translate by a world-space delta. Lines move both endpoints together.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Item::Location(l) => {
                l.x += dx;
                l.y += dy;
            }
            Item::Text(t) => {
                t.x += dx;
                t.y += dy;
            }
            Item::Line(l) => {
                l.x1 += dx;
                l.y1 += dy;
                l.x2 += dx;
                l.y2 += dy;
            }
        }
    }

    /// Anchor position used as the drag reference (top-left / first endpoint).
    pub fn anchor(&self) -> Point {
        match self {
            Item::Location(l) => Point::new(l.x, l.y),
            Item::Text(t) => Point::new(t.x, t.y),
            Item::Line(l) => l.start(),
        }
    }

    pub fn as_location(&self) -> Option<&Location> {
        match self {
            Item::Location(l) => Some(l),
            _ => None,
        }
    }
}
