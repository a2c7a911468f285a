//! Rectangular area elements: the floor, ceilings and ceiling light grids.

use super::Coord;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Floor corner used when a `Floor` has no `Start` component.
pub const DEFAULT_FLOOR_START: Point = Point::new(-1600.0, -900.0);
/// Floor corner used when a `Floor` has no `End` component.
pub const DEFAULT_FLOOR_END: Point = Point::new(1600.0, 900.0);
/// Lamp spacing used when a `CeilingLight` has no `Spacing` component.
pub const DEFAULT_LAMP_SPACING: f64 = 400.0;
/// Largest lamp grid that is generated.
pub const MAX_LAMPS: usize = 10_000;

/// A rectangle given by two corners (`Floor`, `Ceiling`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Area {
    #[serde(rename = "Start", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Coord>,
    #[serde(rename = "End", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Coord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Area {
    /// The rectangle with missing corners filled from `start`/`end`.
    pub fn rect_or(&self, start: Point, end: Point) -> Rect {
        let p0 = self.start.as_ref().map_or(start, |c| c.point_or(start));
        let p1 = self.end.as_ref().map_or(end, |c| c.point_or(end));
        Rect::from_points(p0, p1)
    }

    /// The rectangle of a `Floor`, using the default floor extents for
    /// missing components.
    pub fn floor_rect(&self) -> Rect {
        self.rect_or(DEFAULT_FLOOR_START, DEFAULT_FLOOR_END)
    }
}

/// A ceiling area populated with a regular grid of lamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CeilingLight {
    #[serde(rename = "Start", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Coord>,
    #[serde(rename = "End", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Coord>,
    /// Distance between neighbouring lamps.
    #[serde(rename = "Spacing", default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Coord>,
    /// Inset of the lamp grid from the area's edges.
    #[serde(rename = "Padding", default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Coord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CeilingLight {
    pub fn rect(&self) -> Rect {
        let p0 = self.start.as_ref().map(Coord::point).unwrap_or(Point::ZERO);
        let p1 = self.end.as_ref().map(Coord::point).unwrap_or(Point::ZERO);
        Rect::from_points(p0, p1)
    }

    pub fn spacing(&self) -> Point {
        let default = Point::new(DEFAULT_LAMP_SPACING, DEFAULT_LAMP_SPACING);
        self.spacing.as_ref().map_or(default, |c| c.point_or(default))
    }

    pub fn padding(&self) -> Point {
        self.padding.as_ref().map(Coord::point).unwrap_or(Point::ZERO)
    }

    /// World positions of the derived lamp grid.
    ///
    /// Lamps start at the padded min corner and step by `Spacing` while they
    /// stay within the padded max corner. Non-positive spacing yields none,
    /// as does a grid of more than [`MAX_LAMPS`] lamps.
    pub fn lamp_positions(&self) -> Vec<Point> {
        let spacing = self.spacing();
        if !(spacing.x > 0.0 && spacing.y > 0.0) {
            return Vec::new();
        }
        let rect = self.rect();
        let padding = self.padding();
        let (min_x, max_x) = (rect.x0 + padding.x, rect.x1 - padding.x);
        let (min_y, max_y) = (rect.y0 + padding.y, rect.y1 - padding.y);
        if max_x < min_x || max_y < min_y {
            return Vec::new();
        }

        let columns = ((max_x - min_x) / spacing.x).floor() + 1.0;
        let rows = ((max_y - min_y) / spacing.y).floor() + 1.0;
        let total = columns * rows;
        if !total.is_finite() || total > MAX_LAMPS as f64 {
            log::debug!("Skipping lamp grid of {columns} x {rows}");
            return Vec::new();
        }
        let (columns, rows) = (columns as usize, rows as usize);
        let mut lamps = Vec::with_capacity(columns * rows);
        for i in 0..columns {
            for j in 0..rows {
                lamps.push(Point::new(
                    min_x + i as f64 * spacing.x,
                    min_y + j as f64 * spacing.y,
                ));
            }
        }
        lamps
    }

    /// Hit test against the area's outline (the interior is transparent).
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.rect();
        let outer = rect.inflate(tolerance, tolerance);
        let inner = rect.inflate(-tolerance, -tolerance);
        outer.contains(point) && !(inner.width() > 0.0 && inner.height() > 0.0 && inner.contains(point))
    }
}
