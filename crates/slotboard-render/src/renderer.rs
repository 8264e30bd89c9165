//! Scene rendering onto an egui painter.
//!
//! Rendering is a pure function of the frame state: no caches, no
//! retained GPU resources. Draw order is grid, lines, locations, text,
//! then transient overlays.

use egui::{Align2, CornerRadius, FontId, Pos2, Stroke, StrokeKind};
use kurbo::{Point, Rect};

use slotboard_core::{Camera, Document, Item, Location, Selection, StockItem, GRID_SIZE};

use crate::theme;

/// Screen-space dot spacing below which the grid coarsens by doubling.
const MIN_DOT_SPACING_PX: f64 = 16.0;
/// Tooltip rows shown before truncating with a "+N more" suffix.
const TOOLTIP_MAX_ROWS: usize = 8;

const LOCATION_FONT_SIZE: f64 = 13.0;
const SELECTION_STROKE_PX: f32 = 2.0;
const LINE_STROKE_PX: f32 = 2.0;
const LINE_SELECTED_STROKE_PX: f32 = 3.5;

/// Everything one frame draws from. Borrowed, read-only.
pub struct FrameState<'a> {
    pub document: &'a Document,
    pub selection: &'a Selection,
    pub camera: &'a Camera,
    /// Live marquee box in world coordinates.
    pub marquee: Option<Rect>,
    /// Pending line-tool anchor in world coordinates.
    pub line_anchor: Option<Point>,
    /// Hovered location plus its cached sync rows, for the tooltip.
    pub hover: Option<(&'a Location, &'a [StockItem])>,
}

/// Pick a grid spacing that keeps dot density roughly constant on
/// screen: double the spacing until dots are far enough apart.
pub fn grid_spacing(zoom: f64) -> f64 {
    let mut spacing = GRID_SIZE;
    while spacing * zoom < MIN_DOT_SPACING_PX {
        spacing *= 2.0;
    }
    spacing
}

/// Tooltip cell rows, capped, plus the "+N more" suffix when truncated.
pub fn tooltip_rows(items: &[StockItem]) -> (Vec<[String; 3]>, Option<String>) {
    let rows = items
        .iter()
        .take(TOOLTIP_MAX_ROWS)
        .map(|item| {
            [
                item.tag.to_string(),
                item.item_type.clone(),
                item.vstock_no.clone(),
            ]
        })
        .collect();
    let hidden = items.len().saturating_sub(TOOLTIP_MAX_ROWS);
    let suffix = (hidden > 0).then(|| format!("+{hidden} more"));
    (rows, suffix)
}

fn to_pos2(p: Point) -> Pos2 {
    Pos2::new(p.x as f32, p.y as f32)
}

fn screen_rect(camera: &Camera, world: Rect) -> egui::Rect {
    egui::Rect::from_min_max(
        to_pos2(camera.to_screen(Point::new(world.x0, world.y0))),
        to_pos2(camera.to_screen(Point::new(world.x1, world.y1))),
    )
}

/// Draw one full frame into `painter`, clipped to `viewport`.
pub fn render(painter: &egui::Painter, viewport: egui::Rect, frame: &FrameState<'_>) {
    painter.rect_filled(viewport, CornerRadius::ZERO, theme::BACKGROUND);
    draw_grid(painter, viewport, frame.camera);

    // Lines sit under locations and text.
    for item in frame.document.items() {
        if let Item::Line(line) = item {
            let selected = frame.selection.contains(line.id);
            let (width, color) = if selected {
                (LINE_SELECTED_STROKE_PX, theme::SELECTION)
            } else {
                (LINE_STROKE_PX, theme::LINE_COLOR)
            };
            painter.line_segment(
                [
                    to_pos2(frame.camera.to_screen(line.start())),
                    to_pos2(frame.camera.to_screen(line.end())),
                ],
                Stroke::new(width, color),
            );
        }
    }

    for item in frame.document.items() {
        match item {
            Item::Location(loc) => draw_location(painter, frame, loc),
            Item::Text(text) => draw_text(painter, frame, text),
            Item::Line(_) => {}
        }
    }

    draw_overlays(painter, frame);
}

fn draw_grid(painter: &egui::Painter, viewport: egui::Rect, camera: &Camera) {
    let spacing = grid_spacing(camera.z);
    let top_left = camera.to_world(Point::new(viewport.min.x as f64, viewport.min.y as f64));
    let bottom_right = camera.to_world(Point::new(viewport.max.x as f64, viewport.max.y as f64));
    let start_x = (top_left.x / spacing).floor() * spacing;
    let start_y = (top_left.y / spacing).floor() * spacing;
    let mut y = start_y;
    while y <= bottom_right.y {
        let mut x = start_x;
        while x <= bottom_right.x {
            let pos = to_pos2(camera.to_screen(Point::new(x, y)));
            painter.circle_filled(pos, 1.0, theme::GRID_DOT);
            x += spacing;
        }
        y += spacing;
    }
}

fn draw_location(painter: &egui::Painter, frame: &FrameState<'_>, loc: &Location) {
    let rect = screen_rect(frame.camera, loc.bounds());
    painter.rect_filled(rect, CornerRadius::same(4), theme::LOCATION_FILL);
    let stroke = if frame.selection.contains(loc.id) {
        Stroke::new(SELECTION_STROKE_PX, theme::SELECTION)
    } else {
        Stroke::new(1.0, theme::LOCATION_STROKE)
    };
    painter.rect_stroke(rect, CornerRadius::same(4), stroke, StrokeKind::Middle);

    // Status dot in the top-left corner.
    let dot_radius = (4.0 * frame.camera.z as f32).clamp(2.0, 8.0);
    painter.circle_filled(
        rect.min + egui::vec2(dot_radius + 4.0, dot_radius + 4.0),
        dot_radius,
        theme::status_color(loc.status),
    );

    let font = FontId::proportional((LOCATION_FONT_SIZE * frame.camera.z) as f32);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        &loc.name,
        font,
        theme::LOCATION_LABEL,
    );
}

fn draw_text(painter: &egui::Painter, frame: &FrameState<'_>, text: &slotboard_core::TextLabel) {
    // Baseline-aligned: the anchor sits at the bottom edge of the same
    // bounds hit-testing uses, one font size below the item's y.
    let baseline = to_pos2(
        frame
            .camera
            .to_screen(Point::new(text.x, text.y + text.font_size)),
    );
    let font = FontId::proportional((text.font_size * frame.camera.z) as f32);
    painter.text(baseline, Align2::LEFT_BOTTOM, &text.content, font, theme::TEXT_COLOR);

    if frame.selection.contains(text.id) {
        let rect = screen_rect(frame.camera, text.bounds()).expand(2.0);
        let stroke = Stroke::new(1.0, theme::SELECTION);
        let corners = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
        painter.extend(egui::Shape::dashed_line(&corners, stroke, 4.0, 3.0));
    }
}

fn draw_overlays(painter: &egui::Painter, frame: &FrameState<'_>) {
    if let Some(marquee) = frame.marquee {
        let rect = screen_rect(frame.camera, marquee);
        painter.rect_filled(rect, CornerRadius::ZERO, theme::MARQUEE_FILL);
        painter.rect_stroke(
            rect,
            CornerRadius::ZERO,
            Stroke::new(1.0, theme::SELECTION),
            StrokeKind::Middle,
        );
    }

    if let Some(anchor) = frame.line_anchor {
        let pos = to_pos2(frame.camera.to_screen(anchor));
        painter.circle_filled(pos, 4.0, theme::SELECTION);
        painter.circle_stroke(pos, 7.0, Stroke::new(1.0, theme::SELECTION));
    }

    if let Some((loc, items)) = frame.hover {
        draw_tooltip(painter, frame.camera, loc, items);
    }
}

fn draw_tooltip(painter: &egui::Painter, camera: &Camera, loc: &Location, items: &[StockItem]) {
    let (rows, suffix) = tooltip_rows(items);
    let font = FontId::proportional(12.0);
    let row_height = 16.0_f32;
    let padding = 8.0_f32;
    let col_gap = 14.0_f32;

    // Size each column to its longest cell.
    let cell_width = |text: &str| {
        painter
            .layout_no_wrap(text.to_string(), font.clone(), theme::TOOLTIP_TEXT)
            .size()
            .x
    };
    let mut col_widths = [
        cell_width("Tag"),
        cell_width("Type"),
        cell_width("Stock No"),
    ];
    for row in &rows {
        for (w, cell) in col_widths.iter_mut().zip(row.iter()) {
            *w = w.max(cell_width(cell));
        }
    }

    let mut line_count = rows.len() + 1; // header
    if suffix.is_some() {
        line_count += 1;
    }
    if rows.is_empty() {
        line_count += 1; // "no stock" placeholder
    }
    let width = col_widths.iter().sum::<f32>() + 2.0 * col_gap + 2.0 * padding;
    let height = line_count as f32 * row_height + 2.0 * padding;

    // Anchored below the location, fixed size in screen pixels.
    let bounds = loc.bounds();
    let below = camera.to_screen(Point::new(bounds.x0, bounds.y1));
    let origin = to_pos2(below) + egui::vec2(0.0, 6.0);
    let rect = egui::Rect::from_min_size(origin, egui::vec2(width, height));
    painter.rect_filled(rect, CornerRadius::same(4), theme::TOOLTIP_FILL);
    painter.rect_stroke(
        rect,
        CornerRadius::same(4),
        Stroke::new(1.0, theme::TOOLTIP_STROKE),
        StrokeKind::Middle,
    );

    let mut cursor = origin + egui::vec2(padding, padding);
    let mut draw_row = |cells: [&str; 3], cursor: Pos2| {
        let mut x = cursor.x;
        for (cell, w) in cells.iter().zip(col_widths.iter()) {
            painter.text(
                Pos2::new(x, cursor.y),
                Align2::LEFT_TOP,
                *cell,
                font.clone(),
                theme::TOOLTIP_TEXT,
            );
            x += w + col_gap;
        }
    };

    draw_row(["Tag", "Type", "Stock No"], cursor);
    cursor.y += row_height;
    if rows.is_empty() {
        painter.text(cursor, Align2::LEFT_TOP, "no stock", font.clone(), theme::TOOLTIP_TEXT);
        cursor.y += row_height;
    }
    for row in &rows {
        draw_row([&row[0], &row[1], &row[2]], cursor);
        cursor.y += row_height;
    }
    if let Some(suffix) = suffix {
        painter.text(cursor, Align2::LEFT_TOP, suffix, font, theme::TOOLTIP_TEXT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_spacing_steps() {
        assert_eq!(grid_spacing(1.0), GRID_SIZE);
        // Zoomed out far enough, spacing doubles in discrete steps.
        assert_eq!(grid_spacing(0.6), 2.0 * GRID_SIZE);
        assert_eq!(grid_spacing(0.2), 4.0 * GRID_SIZE);
        // Zooming in never shrinks below the base grid.
        assert_eq!(grid_spacing(8.0), GRID_SIZE);
    }

    #[test]
    fn test_grid_spacing_density_bound() {
        for zoom in [0.1, 0.13, 0.25, 0.5, 1.0, 3.0, 10.0] {
            assert!(grid_spacing(zoom) * zoom >= MIN_DOT_SPACING_PX);
        }
    }

    #[test]
    fn test_tooltip_rows_capped() {
        let items: Vec<StockItem> = (0..12)
            .map(|i| StockItem {
                tag: i,
                item_type: "pallet".to_string(),
                vstock_no: format!("VS-{i}"),
            })
            .collect();
        let (rows, suffix) = tooltip_rows(&items);
        assert_eq!(rows.len(), TOOLTIP_MAX_ROWS);
        assert_eq!(suffix.as_deref(), Some("+4 more"));

        let (rows, suffix) = tooltip_rows(&items[..3]);
        assert_eq!(rows.len(), 3);
        assert!(suffix.is_none());
        assert_eq!(rows[2], ["2".to_string(), "pallet".to_string(), "VS-2".to_string()]);
    }
}
