//! Player spawn point.

use super::Coord;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Height offset given to newly placed spawn points.
pub const DEFAULT_SPAWN_HEIGHT_OFFSET: f64 = 100.0;

/// Pick radius of the spawn marker, as a multiple of the hit tolerance.
const MARKER_RADIUS_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    #[serde(rename = "Start", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Coord>,
    #[serde(rename = "HeightOffset", default, skip_serializing_if = "Option::is_none")]
    pub height_offset: Option<f64>,
    #[serde(rename = "Yaw", default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SpawnPoint {
    pub fn new(position: Point) -> Self {
        Self {
            start: Some(Coord::new(position)),
            height_offset: Some(DEFAULT_SPAWN_HEIGHT_OFFSET),
            yaw: Some(0.0),
            extra: Map::new(),
        }
    }

    pub fn position(&self) -> Point {
        self.start.as_ref().map(Coord::point).unwrap_or(Point::ZERO)
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position()).hypot() <= tolerance * MARKER_RADIUS_FACTOR
    }
}
