//! Colors and stroke widths for the canvas.

use egui::Color32;
use slotboard_core::Status;

pub const BACKGROUND: Color32 = Color32::from_rgb(24, 26, 30);
pub const GRID_DOT: Color32 = Color32::from_rgb(52, 56, 64);

pub const LOCATION_FILL: Color32 = Color32::from_rgb(44, 48, 58);
pub const LOCATION_STROKE: Color32 = Color32::from_rgb(90, 96, 110);
pub const LOCATION_LABEL: Color32 = Color32::from_rgb(220, 222, 228);

pub const TEXT_COLOR: Color32 = Color32::from_rgb(200, 204, 212);
pub const LINE_COLOR: Color32 = Color32::from_rgb(140, 146, 160);

pub const SELECTION: Color32 = Color32::from_rgb(86, 156, 255);
pub const MARQUEE_FILL: Color32 = Color32::from_rgba_premultiplied(30, 60, 110, 60);

pub const TOOLTIP_FILL: Color32 = Color32::from_rgb(34, 37, 44);
pub const TOOLTIP_STROKE: Color32 = Color32::from_rgb(70, 75, 86);
pub const TOOLTIP_TEXT: Color32 = Color32::from_rgb(210, 213, 220);

pub const STATUS_GREEN: Color32 = Color32::from_rgb(70, 200, 120);
pub const STATUS_YELLOW: Color32 = Color32::from_rgb(235, 190, 60);
pub const STATUS_RED: Color32 = Color32::from_rgb(235, 80, 80);

pub fn status_color(status: Status) -> Color32 {
    match status {
        Status::Green => STATUS_GREEN,
        Status::Yellow => STATUS_YELLOW,
        Status::Red => STATUS_RED,
    }
}
