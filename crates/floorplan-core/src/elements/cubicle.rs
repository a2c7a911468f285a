//! Cubicle element: an axis-aligned box anchored at its `Start` corner.

use super::{Coord, yaw_steps};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Width/height given to newly placed cubicles.
pub const DEFAULT_CUBICLE_DIMENSIONS: Size = Size::new(300.0, 250.0);

/// A box of `Dimensions` at `Start`, turned in 90° steps by `Yaw`.
///
/// At odd quarter turns the footprint's width and height swap; `Start` is
/// always the min corner of the footprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cubicle {
    #[serde(rename = "Start", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Coord>,
    #[serde(rename = "Dimensions", default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Coord>,
    #[serde(rename = "Yaw", default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cubicle {
    pub fn new(start: Point) -> Self {
        Self {
            start: Some(Coord::new(start)),
            dimensions: Some(Coord::new(Point::new(
                DEFAULT_CUBICLE_DIMENSIONS.width,
                DEFAULT_CUBICLE_DIMENSIONS.height,
            ))),
            yaw: Some(0.0),
            extra: Map::new(),
        }
    }

    pub fn origin(&self) -> Point {
        self.start.as_ref().map(Coord::point).unwrap_or(Point::ZERO)
    }

    /// The unrotated `Dimensions` (missing components as zero).
    pub fn dimensions(&self) -> Size {
        let p = self.dimensions.as_ref().map(Coord::point).unwrap_or(Point::ZERO);
        Size::new(p.x, p.y)
    }

    /// Footprint size at the given yaw.
    pub fn axis_size(&self, yaw: f64) -> Size {
        let dims = self.dimensions();
        let (w, h) = (dims.width.abs(), dims.height.abs());
        if yaw_steps(yaw) % 2 == 0 {
            Size::new(w, h)
        } else {
            Size::new(h, w)
        }
    }

    /// The world-space rectangle this cubicle covers.
    pub fn footprint(&self) -> Rect {
        let size = self.axis_size(self.yaw.unwrap_or(0.0));
        Rect::from_origin_size(self.origin(), size)
    }

    pub fn center(&self) -> Point {
        self.footprint().center()
    }

    /// Change yaw from `old` to `new`, keeping the footprint's center fixed.
    ///
    /// Only moves `Start` when both `Start` and `Dimensions` are present.
    pub fn rotate_to(&mut self, old: f64, new: f64) {
        self.yaw = Some(new);
        if self.dimensions.is_none() {
            return;
        }
        let old_size = self.axis_size(old);
        let new_size = self.axis_size(new);
        if let Some(start) = self.start.as_mut() {
            let center = start.point() + Vec2::new(old_size.width / 2.0, old_size.height / 2.0);
            start.set(center - Vec2::new(new_size.width / 2.0, new_size.height / 2.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint_swaps_at_quarter_turn() {
        let mut cubicle = Cubicle::new(Point::new(0.0, 0.0));
        assert_eq!(cubicle.footprint(), Rect::new(0.0, 0.0, 300.0, 250.0));

        cubicle.yaw = Some(90.0);
        assert_eq!(cubicle.footprint(), Rect::new(0.0, 0.0, 250.0, 300.0));

        cubicle.yaw = Some(-90.0);
        assert_eq!(cubicle.footprint(), Rect::new(0.0, 0.0, 250.0, 300.0));
    }

    #[test]
    fn test_rotate_keeps_center() {
        let mut cubicle = Cubicle::new(Point::new(100.0, 200.0));
        let center = cubicle.center();

        cubicle.rotate_to(0.0, 90.0);
        assert_eq!(cubicle.yaw, Some(90.0));
        let moved = cubicle.center();
        assert!((moved.x - center.x).abs() < 1e-9);
        assert!((moved.y - center.y).abs() < 1e-9);
        assert_eq!(cubicle.origin(), Point::new(125.0, 175.0));
    }

    #[test]
    fn test_rotate_without_dimensions_only_sets_yaw() {
        let mut cubicle = Cubicle {
            start: Some(Coord::new(Point::new(10.0, 10.0))),
            ..Default::default()
        };
        cubicle.rotate_to(0.0, 90.0);
        assert_eq!(cubicle.yaw, Some(90.0));
        assert_eq!(cubicle.origin(), Point::new(10.0, 10.0));
    }
}
