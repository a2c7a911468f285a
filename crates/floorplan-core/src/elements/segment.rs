//! Line-shaped elements: walls, doors and windows.

use super::{Coord, lenient_count, point_to_segment_dist};
use kurbo::{Line, Point};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Thickness assumed when a segment has no `Thickness` attribute.
pub const DEFAULT_SEGMENT_THICKNESS: f64 = 1.0;
/// Most pane dividers drawn for a single window.
pub const MAX_SECTION_DIVIDERS: i64 = 1_000;

/// A straight segment between `Start` and `End`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "Start", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Coord>,
    #[serde(rename = "End", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Coord>,
    #[serde(rename = "Thickness", default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    /// Number of panes (windows only).
    #[serde(
        rename = "SectionCount",
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub section_count: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Segment {
    pub fn new(start: Point, end: Point, thickness: f64) -> Self {
        Self {
            start: Some(Coord::new(start)),
            end: Some(Coord::new(end)),
            thickness: Some(thickness),
            section_count: None,
            extra: Map::new(),
        }
    }

    /// Endpoints with missing components as zero.
    pub fn endpoints(&self) -> (Point, Point) {
        let read = |c: &Option<Coord>| c.as_ref().map(Coord::point).unwrap_or(Point::ZERO);
        (read(&self.start), read(&self.end))
    }

    pub fn as_line(&self) -> Line {
        let (start, end) = self.endpoints();
        Line::new(start, end)
    }

    pub fn thickness(&self) -> f64 {
        self.thickness.unwrap_or(DEFAULT_SEGMENT_THICKNESS)
    }

    pub fn section_count(&self) -> i64 {
        self.section_count.unwrap_or(1)
    }

    /// Points along the segment where window panes are divided.
    pub fn section_dividers(&self) -> Vec<Point> {
        let count = self.section_count();
        if count <= 1 {
            return Vec::new();
        }
        if count > MAX_SECTION_DIVIDERS + 1 {
            log::debug!("Skipping dividers for {count} sections");
            return Vec::new();
        }
        let (start, end) = self.endpoints();
        if (end - start).hypot() < 1e-6 {
            return Vec::new();
        }
        (1..count)
            .map(|i| start.lerp(end, i as f64 / count as f64))
            .collect()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let (start, end) = self.endpoints();
        point_to_segment_dist(point, start, end) <= tolerance + self.thickness().abs() / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_dividers() {
        let mut window = Segment::new(Point::new(0.0, 0.0), Point::new(300.0, 0.0), 1.0);
        assert!(window.section_dividers().is_empty());

        window.section_count = Some(3);
        assert_eq!(
            window.section_dividers(),
            vec![Point::new(100.0, 0.0), Point::new(200.0, 0.0)]
        );
    }

    #[test]
    fn test_section_dividers_huge_count() {
        let window: Segment = serde_json::from_value(json!({
            "Start": {"X": 0, "Y": 0}, "End": {"X": 300, "Y": 0}, "SectionCount": 1e300
        }))
        .unwrap();
        assert!(window.section_dividers().is_empty());

        let mut window = window;
        window.section_count = Some(MAX_SECTION_DIVIDERS + 1);
        assert_eq!(window.section_dividers().len(), MAX_SECTION_DIVIDERS as usize);
    }

    #[test]
    fn test_section_count_accepts_integral_float() {
        let window: Segment = serde_json::from_value(json!({"SectionCount": 4.0})).unwrap();
        assert_eq!(window.section_count, Some(4));

        let bad: Result<Segment, _> = serde_json::from_value(json!({"SectionCount": 2.5}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_hit_includes_half_thickness() {
        let wall = Segment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 20.0);
        assert!(wall.hit_test(Point::new(50.0, 11.0), 2.0));
        assert!(!wall.hit_test(Point::new(50.0, 13.0), 2.0));
    }
}
