//! Viewport module for the world/screen transform, zoom and pan.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest world span (on the shorter axis) the viewport may zoom to.
pub const MIN_ZOOM_SPAN: f64 = 50.0;
/// Largest world span (on the shorter axis) the viewport may zoom to.
pub const MAX_ZOOM_SPAN: f64 = 50000.0;
/// World rectangle shown when a document has nothing to frame.
pub const DEFAULT_VIEW: Rect = Rect::new(-1600.0, -900.0, 1600.0, 900.0);

/// Scale applied per wheel notch towards the user (zoom in).
pub const ZOOM_IN_FACTOR: f64 = 0.9;
/// Scale applied per wheel notch away from the user (zoom out).
pub const ZOOM_OUT_FACTOR: f64 = 1.1;

const SCALE_EPSILON: f64 = 1e-6;

/// Viewport maps a world-space rectangle onto the pixel canvas.
///
/// World `y` grows upward while screen `y` grows downward, so the transform
/// flips the vertical axis. The two axes scale independently: the world
/// rectangle always fills the whole canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Visible world rectangle.
    pub world: Rect,
    /// Canvas size in pixels.
    pub size: Size,
    /// Lower clamp for the shorter world span.
    pub min_span: f64,
    /// Upper clamp for the world spans.
    pub max_span: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            world: DEFAULT_VIEW,
            size: Size::new(1200.0, 800.0),
            min_span: MIN_ZOOM_SPAN,
            max_span: MAX_ZOOM_SPAN,
        }
    }
}

impl Viewport {
    /// Create a viewport showing `world` on a canvas of `size` pixels.
    pub fn new(world: Rect, size: Size) -> Self {
        let mut viewport = Self::default();
        viewport.set_size(size);
        viewport.reset(world);
        viewport
    }

    /// Builder-style override of the zoom clamp.
    pub fn with_zoom_limits(mut self, min_span: f64, max_span: f64) -> Self {
        self.min_span = min_span;
        self.max_span = max_span;
        self
    }

    /// World span, with degenerate axes treated as span 1.
    fn spans(&self) -> (f64, f64) {
        let w = self.world.width();
        let h = self.world.height();
        (
            if w.abs() < f64::EPSILON { 1.0 } else { w },
            if h.abs() < f64::EPSILON { 1.0 } else { h },
        )
    }

    /// Get the affine transform for rendering (world to screen).
    pub fn transform(&self) -> Affine {
        let (w, h) = self.spans();
        let sx = self.size.width / w;
        let sy = self.size.height / h;
        Affine::new([
            sx,
            0.0,
            0.0,
            -sy,
            -self.world.x0 * sx,
            self.size.height + self.world.y0 * sy,
        ])
    }

    /// Get the inverse transform for input handling (screen to world).
    pub fn inverse_transform(&self) -> Affine {
        let (w, h) = self.spans();
        let kx = w / self.size.width;
        let ky = h / self.size.height;
        Affine::new([
            kx,
            0.0,
            0.0,
            -ky,
            self.world.x0,
            self.world.y0 + self.size.height * ky,
        ])
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// World units covered by one pixel (horizontally).
    pub fn world_per_pixel(&self) -> f64 {
        self.spans().0 / self.size.width
    }

    /// Resize the canvas. Sizes below one pixel are clamped to one.
    pub fn set_size(&mut self, size: Size) {
        self.size = Size::new(size.width.max(1.0), size.height.max(1.0));
    }

    /// Replace the visible world rectangle.
    pub fn reset(&mut self, world: Rect) {
        self.world = world.abs();
    }

    /// Rescale the world span by `scale`, keeping the world point under
    /// `center` (in pixels) fixed on screen.
    ///
    /// `scale < 1` zooms in. The result is clamped to the span limits.
    /// Returns false, leaving the viewport untouched, when the clamped scale
    /// would not change anything.
    pub fn zoom_at(&mut self, scale: f64, center: Point) -> bool {
        if !scale.is_finite() || scale <= 0.0 {
            return false;
        }
        let (w, h) = self.spans();
        let min_scale = (self.min_span / w).max(self.min_span / h).max(SCALE_EPSILON);
        let max_scale = (self.max_span / w).min(self.max_span / h).max(min_scale);
        let scale = scale.clamp(min_scale, max_scale);
        if (scale - 1.0).abs() < SCALE_EPSILON {
            return false;
        }

        let anchor = self.screen_to_world(center);
        let rx = (anchor.x - self.world.x0) / w;
        let ry = (anchor.y - self.world.y0) / h;
        let new_w = w * scale;
        let new_h = h * scale;
        let x0 = anchor.x - rx * new_w;
        let y0 = anchor.y - ry * new_h;
        self.world = Rect::new(x0, y0, x0 + new_w, y0 + new_h);
        true
    }

    /// Zoom in one step about the canvas center.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_at(ZOOM_IN_FACTOR, self.center())
    }

    /// Zoom out one step about the canvas center.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_at(ZOOM_OUT_FACTOR, self.center())
    }

    /// Zoom for a mouse-wheel delta. Positive notches zoom in; several
    /// notches compound.
    pub fn zoom_wheel(&mut self, notches: i32, at: Point) -> bool {
        let scale = match notches {
            0 => return false,
            n if n > 0 => ZOOM_IN_FACTOR.powi(n),
            n => ZOOM_OUT_FACTOR.powi(-n),
        };
        self.zoom_at(scale, at)
    }

    /// Pan by a pixel delta (content follows the pointer).
    pub fn pan_by(&mut self, delta: Vec2) -> bool {
        if delta.x == 0.0 && delta.y == 0.0 {
            return false;
        }
        let shift = self.screen_to_world(Point::ZERO) - self.screen_to_world(delta.to_point());
        self.world = self.world + shift;
        true
    }

    /// Center of the canvas in pixels.
    pub fn center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// Length of the shorter world span.
    pub fn min_world_span(&self) -> f64 {
        self.world.width().min(self.world.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Rect::new(0.0, 0.0, 1000.0, 500.0), Size::new(1000.0, 500.0))
    }

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.world, DEFAULT_VIEW);
        assert!((viewport.min_span - MIN_ZOOM_SPAN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let viewport = viewport();
        assert_close(viewport.world_to_screen(Point::new(0.0, 0.0)), Point::new(0.0, 500.0));
        assert_close(viewport.world_to_screen(Point::new(1000.0, 500.0)), Point::new(1000.0, 0.0));
    }

    #[test]
    fn test_non_uniform_scale() {
        let viewport = Viewport::new(Rect::new(-100.0, -100.0, 100.0, 100.0), Size::new(400.0, 100.0));
        assert_close(viewport.world_to_screen(Point::new(0.0, 0.0)), Point::new(200.0, 50.0));
        assert!((viewport.world_per_pixel() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let viewport = Viewport::new(Rect::new(-320.0, 40.0, 880.0, 910.0), Size::new(1200.0, 800.0));
        let original = Point::new(123.0, 456.0);
        let world = viewport.screen_to_world(original);
        assert_close(viewport.world_to_screen(world), original);
    }

    #[test]
    fn test_degenerate_span() {
        let mut viewport = viewport();
        viewport.world = Rect::new(5.0, 5.0, 5.0, 5.0);
        let screen = viewport.world_to_screen(Point::new(6.0, 6.0));
        assert!(screen.x.is_finite() && screen.y.is_finite());
    }

    #[test]
    fn test_zoom_keeps_anchor() {
        let mut viewport = viewport();
        let cursor = Point::new(250.0, 100.0);
        let before = viewport.screen_to_world(cursor);
        assert!(viewport.zoom_at(0.5, cursor));
        assert_close(viewport.screen_to_world(cursor), before);
        assert!((viewport.world.width() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = viewport();
        viewport.zoom_at(0.0001, viewport.center());
        assert!((viewport.min_world_span() - MIN_ZOOM_SPAN).abs() < 1e-6);

        // Already at the limit: further zooming in is a no-op.
        let world = viewport.world;
        assert!(!viewport.zoom_at(0.5, viewport.center()));
        assert_eq!(viewport.world, world);

        viewport.zoom_at(1e9, viewport.center());
        assert!(viewport.world.width() <= MAX_ZOOM_SPAN + 1e-6);
        assert!(viewport.world.height() <= MAX_ZOOM_SPAN + 1e-6);
    }

    #[test]
    fn test_zoom_identity_is_noop() {
        let mut viewport = viewport();
        assert!(!viewport.zoom_at(1.0, Point::new(10.0, 10.0)));
        assert!(!viewport.zoom_at(-2.0, Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_wheel_compounds() {
        let mut a = viewport();
        let mut b = viewport();
        a.zoom_wheel(2, a.center());
        b.zoom_wheel(1, b.center());
        b.zoom_wheel(1, b.center());
        assert!((a.world.width() - b.world.width()).abs() < 1e-9);
        assert!((a.world.width() - 1000.0 * 0.81).abs() < 1e-9);
    }

    #[test]
    fn test_pan() {
        let mut viewport = viewport();
        assert!(viewport.pan_by(Vec2::new(100.0, 50.0)));
        assert_close(Point::new(viewport.world.x0, viewport.world.y0), Point::new(-100.0, 50.0));
        assert!(!viewport.pan_by(Vec2::ZERO));
    }
}
