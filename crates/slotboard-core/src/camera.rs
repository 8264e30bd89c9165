//! Camera transform: screen-space translation plus uniform zoom.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Wheel sensitivity without a modifier key.
const WHEEL_FINE: f64 = 0.001;
/// Wheel sensitivity with the precision modifier held (pinch/ctrl zoom).
const WHEEL_COARSE: f64 = 0.01;

/// View transform. `x`/`y` translate in screen space, `z` is the zoom
/// factor applied to world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 1.0 }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a screen point into world coordinates.
    pub fn to_world(&self, screen: Point) -> Point {
        Point::new((screen.x - self.x) / self.z, (screen.y - self.y) / self.z)
    }

    /// Map a world point into screen coordinates.
    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(world.x * self.z + self.x, world.y * self.z + self.y)
    }

    /// Translate by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Zoom by a raw wheel delta, keeping the world point under `anchor`
    /// fixed on screen. Positive delta zooms in.
    pub fn zoom_wheel(&mut self, anchor: Point, wheel_delta: f64, coarse: bool) {
        let sensitivity = if coarse { WHEEL_COARSE } else { WHEEL_FINE };
        let factor = (wheel_delta * sensitivity).exp();
        self.zoom_at(anchor, factor);
    }

    /// Multiply zoom by `factor`, clamp, and recompute translation so the
    /// world point under `anchor` stays put.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let world = self.to_world(anchor);
        self.z = (self.z * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.x = anchor.x - world.x * self.z;
        self.y = anchor.y - world.y * self.z;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Repair a deserialized camera. Non-finite fields discard the whole
    /// transform; an out-of-range zoom is clamped. Keeps the zoom
    /// invariant holding for cameras that bypassed `zoom_at`.
    pub fn sanitized(self) -> Self {
        if !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite()) {
            return Self::default();
        }
        Self { z: self.z.clamp(MIN_ZOOM, MAX_ZOOM), ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_screen_inverse() {
        let camera = Camera { x: 120.0, y: -40.0, z: 2.5 };
        let screen = Point::new(300.0, 200.0);
        let back = camera.to_screen(camera.to_world(screen));
        assert!((back.x - screen.x).abs() < 1e-9);
        assert!((back.y - screen.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_preserves_anchor() {
        let mut camera = Camera { x: 50.0, y: 80.0, z: 1.0 };
        let anchor = Point::new(400.0, 300.0);
        let before = camera.to_world(anchor);
        camera.zoom_at(anchor, 1.7);
        let after = camera.to_world(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = Camera::new();
        for _ in 0..100 {
            camera.zoom_at(Point::new(0.0, 0.0), 2.0);
        }
        assert_eq!(camera.z, MAX_ZOOM);
        for _ in 0..200 {
            camera.zoom_at(Point::new(0.0, 0.0), 0.5);
        }
        assert_eq!(camera.z, MIN_ZOOM);
    }

    #[test]
    fn test_pan_ignores_zoom() {
        let mut camera = Camera { x: 0.0, y: 0.0, z: 4.0 };
        camera.pan(Vec2::new(10.0, -5.0));
        assert_eq!((camera.x, camera.y, camera.z), (10.0, -5.0, 4.0));
    }

    #[test]
    fn test_reset() {
        let mut camera = Camera { x: 33.0, y: 44.0, z: 0.5 };
        camera.reset();
        assert_eq!(camera, Camera::default());
    }

    #[test]
    fn test_sanitized_clamps_zoom() {
        let zero = Camera { x: 10.0, y: 20.0, z: 0.0 }.sanitized();
        assert_eq!(zero.z, MIN_ZOOM);
        assert_eq!((zero.x, zero.y), (10.0, 20.0));
        let huge = Camera { x: 0.0, y: 0.0, z: 1000.0 }.sanitized();
        assert_eq!(huge.z, MAX_ZOOM);
        let fine = Camera { x: 1.0, y: 2.0, z: 3.0 }.sanitized();
        assert_eq!(fine, Camera { x: 1.0, y: 2.0, z: 3.0 });
    }

    #[test]
    fn test_sanitized_rejects_non_finite() {
        let nan = Camera { x: f64::NAN, y: 0.0, z: 1.0 }.sanitized();
        assert_eq!(nan, Camera::default());
        let inf = Camera { x: 0.0, y: 0.0, z: f64::INFINITY }.sanitized();
        assert_eq!(inf, Camera::default());
    }
}
