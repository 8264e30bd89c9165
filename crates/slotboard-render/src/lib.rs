//! Slotboard rendering: draws the scene onto an egui painter each frame.

pub mod renderer;
pub mod theme;

pub use renderer::{grid_spacing, render, tooltip_rows, FrameState};
