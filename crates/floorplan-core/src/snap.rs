//! Snap functionality for aligning points and elements to the grid.

use crate::elements::Element;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Grid size used when the configured value is unusable.
pub const DEFAULT_GRID_SIZE: f64 = 100.0;

/// Upper bound on grid lines emitted per axis.
const MAX_GRID_LINES: i64 = 10_000;

/// Grid configuration shared by snapping and grid display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Configured grid spacing in world units (may be invalid).
    pub size: f64,
    /// Whether edits snap to the grid.
    pub snap_enabled: bool,
    /// Whether the grid is drawn.
    pub visible: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            snap_enabled: true,
            visible: true,
        }
    }
}

impl GridSettings {
    /// The effective grid size: the configured value if it is a positive
    /// finite number, otherwise [`DEFAULT_GRID_SIZE`].
    pub fn size(&self) -> f64 {
        if self.size.is_finite() && self.size > 0.0 {
            self.size
        } else {
            DEFAULT_GRID_SIZE
        }
    }

    /// Snap a single coordinate if snapping is enabled.
    pub fn snap_value(&self, value: f64) -> f64 {
        if self.snap_enabled {
            snap_value(value, self.size())
        } else {
            value
        }
    }

    /// Snap a point if snapping is enabled.
    pub fn snap_point(&self, point: Point) -> Point {
        Point::new(self.snap_value(point.x), self.snap_value(point.y))
    }
}

/// Round `value` to the nearest multiple of `grid_size` (ties to even).
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round_ties_even() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

/// Snap an element's `Start`/`End` to the grid.
///
/// Cubicle dimensions and other attributes are left alone. Returns true if
/// any coordinate moved by more than the coordinate tolerance; false when
/// snapping is disabled.
pub fn snap_element(element: &mut Element, grid: &GridSettings) -> bool {
    if !grid.snap_enabled {
        return false;
    }
    let size = grid.size();
    element.map_anchors(|p| snap_to_grid(p, size))
}

/// Orientation of a grid line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    /// A line of constant `x`.
    Vertical,
    /// A line of constant `y`.
    Horizontal,
}

/// One world-space grid line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub axis: GridAxis,
    /// The constant coordinate of the line.
    pub position: f64,
    /// Whether this line passes through the origin.
    pub is_axis: bool,
}

impl GridLine {
    /// Endpoints of the line clipped to `world`.
    pub fn endpoints(&self, world: Rect) -> (Point, Point) {
        match self.axis {
            GridAxis::Vertical => (
                Point::new(self.position, world.y0),
                Point::new(self.position, world.y1),
            ),
            GridAxis::Horizontal => (
                Point::new(world.x0, self.position),
                Point::new(world.x1, self.position),
            ),
        }
    }
}

/// Grid lines covering the world rectangle `world`, one per multiple of
/// `grid_size` from just outside one edge to just outside the other.
pub fn grid_lines(world: Rect, grid_size: f64) -> Vec<GridLine> {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return Vec::new();
    }
    let world = world.abs();
    let mut lines = Vec::new();
    for (axis, lo, hi) in [
        (GridAxis::Vertical, world.x0, world.x1),
        (GridAxis::Horizontal, world.y0, world.y1),
    ] {
        let first = (lo / grid_size).floor() as i64;
        let last = (hi / grid_size).ceil() as i64;
        if last - first > MAX_GRID_LINES {
            log::debug!("Skipping {axis:?} grid lines: {} would be drawn", last - first);
            continue;
        }
        lines.extend((first..=last).map(|i| {
            let position = i as f64 * grid_size;
            GridLine {
                axis,
                position,
                is_axis: position.abs() <= 1e-6,
            }
        }));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;
    use serde_json::json;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(Point::new(23.0, 47.0), 20.0), Point::new(20.0, 40.0));
        assert_eq!(snap_to_grid(Point::new(31.0, 51.0), 20.0), Point::new(40.0, 60.0));
        assert_eq!(snap_to_grid(Point::new(-149.0, 251.0), 100.0), Point::new(-100.0, 300.0));
    }

    #[test]
    fn test_snap_ties_to_even() {
        assert_eq!(snap_value(50.0, 100.0), 0.0);
        assert_eq!(snap_value(150.0, 100.0), 200.0);
        assert_eq!(snap_value(-50.0, 100.0), 0.0);
    }

    #[test]
    fn test_snap_idempotent() {
        for v in [-1234.5, -0.1, 0.0, 3.3, 49.999, 77.0, 1e7 + 0.3] {
            for g in [0.5, 10.0, 100.0, 333.3] {
                let once = snap_value(v, g);
                assert_eq!(snap_value(once, g), once);
            }
        }
    }

    #[test]
    fn test_invalid_grid_size_falls_back() {
        for size in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let grid = GridSettings { size, ..Default::default() };
            assert_eq!(grid.size(), DEFAULT_GRID_SIZE);
        }
    }

    #[test]
    fn test_snapping_disabled() {
        let grid = GridSettings {
            snap_enabled: false,
            ..Default::default()
        };
        assert_eq!(grid.snap_point(Point::new(12.3, 45.6)), Point::new(12.3, 45.6));

        let mut wall = Element::segment(ElementKind::Wall, Point::new(12.0, 0.0), Point::ZERO).unwrap();
        assert!(!snap_element(&mut wall, &grid));
    }

    #[test]
    fn test_snap_element_reports_change() {
        let grid = GridSettings::default();
        let mut wall =
            Element::segment(ElementKind::Wall, Point::new(12.0, -3.0), Point::new(480.0, 0.0)).unwrap();
        assert!(snap_element(&mut wall, &grid));
        assert_eq!(wall.anchor_points(), vec![Point::new(0.0, 0.0), Point::new(500.0, 0.0)]);
        assert!(!snap_element(&mut wall, &grid));
    }

    #[test]
    fn test_snap_cubicle_leaves_dimensions() {
        let grid = GridSettings::default();
        let mut cubicle = Element::from_value(json!({
            "Type": "Cubicle",
            "Start": {"X": 140.0, "Y": 260.0},
            "Dimensions": {"X": 333.0, "Y": 250.0},
            "Yaw": 0.0
        }));
        assert!(snap_element(&mut cubicle, &grid));
        let value = cubicle.to_value().unwrap();
        assert_eq!(value["Start"], json!({"X": 100.0, "Y": 300.0}));
        assert_eq!(value["Dimensions"], json!({"X": 333.0, "Y": 250.0}));
    }

    #[test]
    fn test_grid_lines() {
        let lines = grid_lines(Rect::new(-150.0, -50.0, 150.0, 50.0), 100.0);
        let vertical: Vec<f64> = lines
            .iter()
            .filter(|l| l.axis == GridAxis::Vertical)
            .map(|l| l.position)
            .collect();
        assert_eq!(vertical, vec![-200.0, -100.0, 0.0, 100.0, 200.0]);
        let axes = lines.iter().filter(|l| l.is_axis).count();
        assert_eq!(axes, 2);
        assert!(grid_lines(Rect::new(0.0, 0.0, 1.0, 1.0), 0.0).is_empty());
    }
}
