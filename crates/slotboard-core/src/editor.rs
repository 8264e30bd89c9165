//! The editor: application state container plus the pointer/keyboard
//! interaction state machine.
//!
//! All mutation of the document flows through here (or through the sync
//! orchestrator's status patches). The renderer only reads.

use kurbo::{Point, Rect};
use std::collections::HashSet;

use crate::camera::Camera;
use crate::document::{BatchError, BatchRange, Document};
use crate::geometry::rect_from_corners;
use crate::hit::{box_query, hit_test};
use crate::history::History;
use crate::input::{Modifiers, PointerButton, ToolKind};
use crate::item::{Item, ItemId, Status};
use crate::selection::Selection;
use crate::snap::snap_point;

/// Captured at drag start so multi-item drags move rigidly together and
/// positions are applied absolutely, never by accumulating deltas.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Pointer world position at drag start.
    pub origin: Point,
    /// Item grabbed to start the drag.
    pub primary: ItemId,
    /// The primary item's anchor at drag start.
    pub primary_anchor: Point,
    /// Original anchors of every item captured by the drag.
    pub originals: Vec<(ItemId, Point)>,
}

/// Interaction state. One state at a time, exhaustively matched.
#[derive(Debug, Clone)]
pub enum EditorState {
    Idle,
    Dragging(DragSession),
    Marquee { origin: Point, current: Point },
    Panning { last_screen: Point },
    /// Line tool has consumed its first click and waits for the endpoint.
    LineDrawing { anchor: Point },
}

/// Terminal per-click actions the shell turns into modals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleClickAction {
    OpenLocation(ItemId),
    EditText(ItemId),
}

/// Process-wide editor session: document, view, selection, history, and
/// the interaction state machine.
#[derive(Debug)]
pub struct Editor {
    pub document: Document,
    pub camera: Camera,
    pub selection: Selection,
    pub history: History,
    state: EditorState,
    tool: ToolKind,
    space_held: bool,
    dirty: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Document::new(), Camera::default())
    }
}

impl Editor {
    pub fn new(document: Document, camera: Camera) -> Self {
        Self {
            document,
            camera,
            selection: Selection::new(),
            history: History::new(),
            state: EditorState::Idle,
            tool: ToolKind::Select,
            space_held: false,
            dirty: false,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switching tools cancels any pending modal tool state.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if matches!(self.state, EditorState::LineDrawing { .. }) {
            self.state = EditorState::Idle;
        }
        self.tool = tool;
    }

    pub fn set_space_held(&mut self, held: bool) {
        self.space_held = held;
    }

    /// True after any document or camera change; cleared by the persistence
    /// layer once written out.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Live marquee box in world coordinates, for the overlay pass.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.state {
            EditorState::Marquee { origin, current } => {
                Some(rect_from_corners(origin, current))
            }
            _ => None,
        }
    }

    /// Pending line anchor, for the overlay pass.
    pub fn line_anchor(&self) -> Option<Point> {
        match self.state {
            EditorState::LineDrawing { anchor } => Some(anchor),
            _ => None,
        }
    }

    fn snapshot(&mut self) {
        self.history.push(self.document.clone());
    }

    // --- pointer events ------------------------------------------------

    pub fn pointer_down(&mut self, screen: Point, button: PointerButton, mods: Modifiers) {
        let pan_forced =
            self.tool == ToolKind::Hand || button == PointerButton::Middle || self.space_held;
        if pan_forced {
            self.state = EditorState::Panning { last_screen: screen };
            return;
        }
        if button != PointerButton::Primary {
            return;
        }
        let world = self.camera.to_world(screen);
        if self.tool == ToolKind::Line {
            self.line_click(world);
            return;
        }
        let hit = hit_test(&self.document, world, self.camera.z)
            .map(|item| (item.id(), item.anchor()));
        match hit {
            Some((id, primary_anchor)) => {
                if mods.shift {
                    self.selection.toggle(id);
                    return;
                }
                self.selection.click(id);
                self.snapshot();
                let originals = self
                    .document
                    .items()
                    .iter()
                    .filter(|i| self.selection.contains(i.id()))
                    .map(|i| (i.id(), i.anchor()))
                    .collect();
                self.state = EditorState::Dragging(DragSession {
                    origin: world,
                    primary: id,
                    primary_anchor,
                    originals,
                });
            }
            None => {
                self.selection.clear();
                self.state = EditorState::Marquee { origin: world, current: world };
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        match &mut self.state {
            EditorState::Dragging(session) => {
                let world = self.camera.to_world(screen);
                let pointer_delta = world - session.origin;
                // Snap the primary's would-be anchor, then move everything
                // rigidly by the same snapped delta.
                let snapped = snap_point(session.primary_anchor + pointer_delta);
                let delta = snapped - session.primary_anchor;
                let moves: Vec<(ItemId, Point)> = session
                    .originals
                    .iter()
                    .map(|(id, origin)| (*id, *origin + delta))
                    .collect();
                for (id, pos) in moves {
                    self.document.set_anchor(id, pos);
                }
                self.dirty = true;
            }
            EditorState::Marquee { current, origin } => {
                *current = self.camera.to_world(screen);
                let rect = rect_from_corners(*origin, *current);
                let hits = box_query(&self.document, rect);
                self.selection.replace(hits);
            }
            EditorState::Panning { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                self.camera.pan(delta);
                self.dirty = true;
            }
            EditorState::Idle | EditorState::LineDrawing { .. } => {}
        }
    }

    pub fn pointer_up(&mut self) {
        match self.state {
            EditorState::Dragging(_) | EditorState::Marquee { .. } | EditorState::Panning { .. } => {
                self.state = EditorState::Idle;
            }
            // Line drawing waits for its second click.
            EditorState::Idle | EditorState::LineDrawing { .. } => {}
        }
    }

    fn line_click(&mut self, world: Point) {
        let snapped = snap_point(world);
        match self.state {
            EditorState::LineDrawing { anchor } => {
                self.snapshot();
                self.document.add_line(anchor, snapped);
                self.state = EditorState::Idle;
                self.tool = ToolKind::Select;
                self.dirty = true;
            }
            _ => {
                self.state = EditorState::LineDrawing { anchor: snapped };
            }
        }
    }

    /// Resolve a double-click into a modal-opening action, if it landed on
    /// a location or text item.
    pub fn double_click(&self, screen: Point) -> Option<DoubleClickAction> {
        let world = self.camera.to_world(screen);
        match hit_test(&self.document, world, self.camera.z)? {
            Item::Location(loc) => Some(DoubleClickAction::OpenLocation(loc.id)),
            Item::Text(text) => Some(DoubleClickAction::EditText(text.id)),
            Item::Line(_) => None,
        }
    }

    pub fn wheel_zoom(&mut self, screen_anchor: Point, wheel_delta: f64, ctrl: bool) {
        self.camera.zoom_wheel(screen_anchor, wheel_delta, ctrl);
        self.dirty = true;
    }

    // --- keyboard and command operations --------------------------------

    /// Pop the history onto the live document. No-op when empty.
    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.pop() {
            self.document.restore(snapshot);
            self.selection.clear();
            self.dirty = true;
        }
    }

    /// Delete the current selection, if any.
    pub fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.snapshot();
        let ids: HashSet<ItemId> = self.selection.ids().clone();
        self.document.remove(&ids);
        self.selection.retain_existing(&self.document);
        self.dirty = true;
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.document);
    }

    /// Escape cancels pending modal tool state and clears the selection.
    pub fn escape(&mut self) {
        if matches!(self.state, EditorState::LineDrawing { .. }) {
            self.state = EditorState::Idle;
            self.tool = ToolKind::Select;
        }
        self.selection.clear();
    }

    // --- snapshotting wrappers around document mutations -----------------

    pub fn add_location(&mut self, name: &str, world: Point) -> ItemId {
        self.snapshot();
        self.dirty = true;
        self.document.add_location(name, world.x, world.y, Status::Green)
    }

    pub fn add_text(&mut self, content: &str, world: Point) -> ItemId {
        self.snapshot();
        self.dirty = true;
        self.document.add_text(content, world.x, world.y)
    }

    pub fn batch_add_locations(
        &mut self,
        base_name: &str,
        range: &BatchRange,
        origin: Point,
    ) -> Result<Vec<ItemId>, BatchError> {
        self.snapshot();
        let result = self.document.batch_add_locations(base_name, range, origin);
        match &result {
            Ok(_) => self.dirty = true,
            // Nothing was created, drop the snapshot again.
            Err(_) => {
                self.history.pop();
            }
        }
        result
    }

    pub fn rename_location(&mut self, id: ItemId, name: &str) {
        if name.trim().is_empty() {
            return;
        }
        self.snapshot();
        self.document.rename_location(id, name);
        self.dirty = true;
    }

    pub fn edit_text(&mut self, id: ItemId, content: &str) {
        if content.trim().is_empty() {
            return;
        }
        self.snapshot();
        self.document.edit_text(id, content);
        self.dirty = true;
    }

    /// World center of the current viewport, the spawn point for new items.
    pub fn view_center(&self, viewport: Rect) -> Point {
        self.camera.to_world(viewport.center())
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.dirty = true;
    }
}
