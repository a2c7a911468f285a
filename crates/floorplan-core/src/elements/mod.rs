//! Element definitions for the floorplan document.
//!
//! Every known `Type` gets its own variant with a typed attribute schema.
//! Attribute keys the schema does not know are kept in an `extra` map on the
//! variant, and elements of an unknown `Type` are kept verbatim as
//! [`Element::Opaque`], so a load/save cycle never drops information.

mod area;
mod cubicle;
mod segment;
mod spawn;

pub use area::{Area, CeilingLight, DEFAULT_FLOOR_END, DEFAULT_FLOOR_START, DEFAULT_LAMP_SPACING};
pub use cubicle::{Cubicle, DEFAULT_CUBICLE_DIMENSIONS};
pub use segment::{DEFAULT_SEGMENT_THICKNESS, Segment};
pub use spawn::{DEFAULT_SPAWN_HEIGHT_OFFSET, SpawnPoint};

use kurbo::{Point, Vec2};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for elements.
///
/// Identifiers are runtime-only and never written to the document file;
/// they give each element an identity independent of its (possibly
/// duplicated) contents.
pub type ElementId = Uuid;

/// Tolerance used when comparing coordinates.
pub const COORD_EPSILON: f64 = 1e-6;

/// A 2D attribute of the form `{"X": .., "Y": ..}`.
///
/// Components are optional so that a missing `X` or `Y` is defaulted at the
/// call site without rewriting the stored element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    #[serde(rename = "X", default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(rename = "Y", default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Keys other than `X`/`Y` (e.g. a `Z` component).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Coord {
    pub fn new(point: Point) -> Self {
        Self {
            x: Some(point.x),
            y: Some(point.y),
            extra: Map::new(),
        }
    }

    /// Read the coordinate, substituting `default` for missing components.
    pub fn point_or(&self, default: Point) -> Point {
        Point::new(self.x.unwrap_or(default.x), self.y.unwrap_or(default.y))
    }

    /// Read the coordinate with missing components as zero.
    pub fn point(&self) -> Point {
        self.point_or(Point::ZERO)
    }

    pub fn set(&mut self, point: Point) {
        self.x = Some(point.x);
        self.y = Some(point.y);
    }

    pub fn translate(&mut self, delta: Vec2) {
        let p = self.point() + delta;
        self.set(p);
    }

    /// Replace the coordinate with `f(current)`, writing only when it moved.
    /// Returns true if the stored value changed.
    pub fn update(&mut self, f: impl FnOnce(Point) -> Point) -> bool {
        let current = self.point();
        let next = f(current);
        if points_coincide(current, next) {
            return false;
        }
        self.set(next);
        true
    }
}

/// Whether two points are equal within [`COORD_EPSILON`].
pub fn points_coincide(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() <= COORD_EPSILON && (a.y - b.y).abs() <= COORD_EPSILON
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).hypot()
}

/// Snap a yaw angle to the nearest multiple of 90°, in `[0, 360)`.
pub fn normalize_yaw(yaw: f64) -> f64 {
    if !yaw.is_finite() {
        return 0.0;
    }
    f64::from(yaw_steps(yaw)) * 90.0
}

/// Number of quarter turns a yaw angle rounds to, in `0..4`.
pub fn yaw_steps(yaw: f64) -> u8 {
    if !yaw.is_finite() {
        return 0;
    }
    ((yaw / 90.0).round_ties_even() as i64).rem_euclid(4) as u8
}

/// Deserialize an optional integer that may have been written as `2.0`.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(D::Error::custom(format!("expected an integer, got {value}")));
    }
    Ok(Some(value as i64))
}

/// Element types the editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Floor,
    Ceiling,
    CeilingLight,
    Wall,
    Door,
    Window,
    Cubicle,
    SpawnPoint,
    /// Any other `Type`, kept verbatim.
    Other,
}

impl ElementKind {
    /// The `Type` string used in documents.
    pub fn type_name(self) -> Option<&'static str> {
        match self {
            ElementKind::Floor => Some("Floor"),
            ElementKind::Ceiling => Some("Ceiling"),
            ElementKind::CeilingLight => Some("CeilingLight"),
            ElementKind::Wall => Some("Wall"),
            ElementKind::Door => Some("Door"),
            ElementKind::Window => Some("Window"),
            ElementKind::Cubicle => Some("Cubicle"),
            ElementKind::SpawnPoint => Some("SpawnPoint"),
            ElementKind::Other => None,
        }
    }

    pub fn from_type_name(name: &str) -> Self {
        match name {
            "Floor" => ElementKind::Floor,
            "Ceiling" => ElementKind::Ceiling,
            "CeilingLight" => ElementKind::CeilingLight,
            "Wall" => ElementKind::Wall,
            "Door" => ElementKind::Door,
            "Window" => ElementKind::Window,
            "Cubicle" => ElementKind::Cubicle,
            "SpawnPoint" => ElementKind::SpawnPoint,
            _ => ElementKind::Other,
        }
    }

    /// Kinds that can be picked with the pointer.
    pub fn is_hit_testable(self) -> bool {
        matches!(
            self,
            ElementKind::Wall
                | ElementKind::Door
                | ElementKind::Window
                | ElementKind::Cubicle
                | ElementKind::Floor
                | ElementKind::SpawnPoint
                | ElementKind::CeilingLight
        )
    }

    /// Kinds included by "select all". The floor is deliberately excluded.
    pub fn is_bulk_selectable(self) -> bool {
        self.is_hit_testable() && self != ElementKind::Floor
    }

    pub fn is_segment(self) -> bool {
        matches!(self, ElementKind::Wall | ElementKind::Door | ElementKind::Window)
    }
}

/// One typed geometric entity of a floorplan.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Floor(Area),
    Ceiling(Area),
    CeilingLight(CeilingLight),
    Wall(Segment),
    Door(Segment),
    Window(Segment),
    Cubicle(Cubicle),
    SpawnPoint(SpawnPoint),
    /// An element of unknown `Type` (or one whose attributes do not fit the
    /// schema of its type). Never hit-testable, never rendered.
    Opaque(Value),
}

impl Element {
    /// Create a new cubicle with default dimensions at `start`.
    pub fn cubicle_at(start: Point) -> Self {
        Element::Cubicle(Cubicle::new(start))
    }

    /// Create a new spawn point at `position`.
    pub fn spawn_at(position: Point) -> Self {
        Element::SpawnPoint(SpawnPoint::new(position))
    }

    /// Create a wall, door or window between two points.
    /// Returns `None` for kinds that are not segments.
    pub fn segment(kind: ElementKind, start: Point, end: Point) -> Option<Self> {
        let thickness = match kind {
            ElementKind::Wall => 25.0,
            ElementKind::Door | ElementKind::Window => 1.0,
            _ => return None,
        };
        let segment = Segment::new(start, end, thickness);
        Some(match kind {
            ElementKind::Wall => Element::Wall(segment),
            ElementKind::Door => Element::Door(segment),
            _ => Element::Window(segment),
        })
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Floor(_) => ElementKind::Floor,
            Element::Ceiling(_) => ElementKind::Ceiling,
            Element::CeilingLight(_) => ElementKind::CeilingLight,
            Element::Wall(_) => ElementKind::Wall,
            Element::Door(_) => ElementKind::Door,
            Element::Window(_) => ElementKind::Window,
            Element::Cubicle(_) => ElementKind::Cubicle,
            Element::SpawnPoint(_) => ElementKind::SpawnPoint,
            Element::Opaque(_) => ElementKind::Other,
        }
    }

    /// The `Type` string of this element (empty if an opaque element has none).
    pub fn type_name(&self) -> &str {
        match self {
            Element::Opaque(value) => value.get("Type").and_then(Value::as_str).unwrap_or(""),
            other => other.kind().type_name().unwrap_or(""),
        }
    }

    pub fn as_segment(&self) -> Option<&Segment> {
        match self {
            Element::Wall(s) | Element::Door(s) | Element::Window(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_cubicle(&self) -> Option<&Cubicle> {
        match self {
            Element::Cubicle(c) => Some(c),
            _ => None,
        }
    }

    /// The `Start` attribute, if this element carries one.
    pub fn start(&self) -> Option<&Coord> {
        match self {
            Element::Floor(a) | Element::Ceiling(a) => a.start.as_ref(),
            Element::CeilingLight(c) => c.start.as_ref(),
            Element::Wall(s) | Element::Door(s) | Element::Window(s) => s.start.as_ref(),
            Element::Cubicle(c) => c.start.as_ref(),
            Element::SpawnPoint(s) => s.start.as_ref(),
            Element::Opaque(_) => None,
        }
    }

    /// The `End` attribute, if this element carries one.
    pub fn end(&self) -> Option<&Coord> {
        match self {
            Element::Floor(a) | Element::Ceiling(a) => a.end.as_ref(),
            Element::CeilingLight(c) => c.end.as_ref(),
            Element::Wall(s) | Element::Door(s) | Element::Window(s) => s.end.as_ref(),
            _ => None,
        }
    }

    /// Start and end points present on this element, missing components as 0.
    ///
    /// Opaque elements are read from their raw `Start`/`End` objects.
    pub fn anchor_points(&self) -> Vec<Point> {
        if let Element::Opaque(value) = self {
            return ["Start", "End"]
                .iter()
                .filter_map(|key| raw_point(value.get(*key)?))
                .collect();
        }
        self.start()
            .into_iter()
            .chain(self.end())
            .map(Coord::point)
            .collect()
    }

    /// Apply `f` to every `Start`/`End` point. Returns true if any changed.
    pub fn map_anchors(&mut self, mut f: impl FnMut(Point) -> Point) -> bool {
        let mut changed = false;
        match self {
            Element::Opaque(value) => {
                let Some(object) = value.as_object_mut() else {
                    return false;
                };
                for key in ["Start", "End"] {
                    if let Some(Value::Object(coord)) = object.get_mut(key) {
                        changed |= update_raw_point(coord, &mut f);
                    }
                }
            }
            _ => {
                for coord in self.anchors_mut().into_iter().flatten() {
                    changed |= coord.update(&mut f);
                }
            }
        }
        changed
    }

    /// Translate every `Start`/`End` point by `delta`.
    ///
    /// Present points are always written back, filling in missing components.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Element::Opaque(value) => {
                let Some(object) = value.as_object_mut() else {
                    return;
                };
                for key in ["Start", "End"] {
                    if let Some(Value::Object(coord)) = object.get_mut(key) {
                        let p = raw_point_in(coord) + delta;
                        coord.insert("X".to_string(), Value::from(p.x));
                        coord.insert("Y".to_string(), Value::from(p.y));
                    }
                }
            }
            _ => {
                for coord in self.anchors_mut().into_iter().flatten() {
                    coord.translate(delta);
                }
            }
        }
    }

    fn anchors_mut(&mut self) -> [Option<&mut Coord>; 2] {
        match self {
            Element::Floor(a) | Element::Ceiling(a) => [a.start.as_mut(), a.end.as_mut()],
            Element::CeilingLight(c) => [c.start.as_mut(), c.end.as_mut()],
            Element::Wall(s) | Element::Door(s) | Element::Window(s) => {
                [s.start.as_mut(), s.end.as_mut()]
            }
            Element::Cubicle(c) => [c.start.as_mut(), None],
            Element::SpawnPoint(s) => [s.start.as_mut(), None],
            Element::Opaque(_) => [None, None],
        }
    }

    /// The `Yaw` attribute, if present.
    pub fn yaw(&self) -> Option<f64> {
        match self {
            Element::Cubicle(c) => c.yaw,
            Element::SpawnPoint(s) => s.yaw,
            Element::Opaque(_) => None,
            other => other.extra().and_then(|m| m.get("Yaw")).and_then(Value::as_f64),
        }
    }

    /// Whether this element carries a `Yaw` and can be rotated.
    pub fn can_rotate(&self) -> bool {
        self.yaw().is_some()
    }

    /// Rotate by `delta` degrees in 90° steps.
    ///
    /// Cubicles rotate about their center; other elements only change yaw.
    /// Returns false if the element has no `Yaw`.
    pub fn rotate(&mut self, delta: f64) -> bool {
        let Some(old) = self.yaw() else {
            return false;
        };
        let old = normalize_yaw(old);
        let new = normalize_yaw(old + delta);
        match self {
            Element::Cubicle(c) => c.rotate_to(old, new),
            Element::SpawnPoint(s) => s.yaw = Some(new),
            other => {
                if let Some(extra) = other.extra_mut() {
                    extra.insert("Yaw".to_string(), Value::from(new));
                }
            }
        }
        true
    }

    /// Attribute keys this element's schema does not know.
    pub fn extra(&self) -> Option<&Map<String, Value>> {
        match self {
            Element::Floor(a) | Element::Ceiling(a) => Some(&a.extra),
            Element::CeilingLight(c) => Some(&c.extra),
            Element::Wall(s) | Element::Door(s) | Element::Window(s) => Some(&s.extra),
            Element::Cubicle(c) => Some(&c.extra),
            Element::SpawnPoint(s) => Some(&s.extra),
            Element::Opaque(_) => None,
        }
    }

    fn extra_mut(&mut self) -> Option<&mut Map<String, Value>> {
        match self {
            Element::Floor(a) | Element::Ceiling(a) => Some(&mut a.extra),
            Element::CeilingLight(c) => Some(&mut c.extra),
            Element::Wall(s) | Element::Door(s) | Element::Window(s) => Some(&mut s.extra),
            Element::Cubicle(c) => Some(&mut c.extra),
            Element::SpawnPoint(s) => Some(&mut s.extra),
            Element::Opaque(_) => None,
        }
    }

    /// Check if a world point hits this element.
    ///
    /// `tolerance` is the pick radius in world units.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Element::Floor(a) => a.floor_rect().inflate(tolerance, tolerance).contains(point),
            Element::CeilingLight(c) => c.hit_test(point, tolerance),
            Element::Wall(s) | Element::Door(s) | Element::Window(s) => s.hit_test(point, tolerance),
            Element::Cubicle(c) => c.footprint().inflate(tolerance, tolerance).contains(point),
            Element::SpawnPoint(s) => s.hit_test(point, tolerance),
            Element::Ceiling(_) | Element::Opaque(_) => false,
        }
    }

    /// Build an element from a raw JSON value, dispatching on `Type`.
    ///
    /// Anything that does not fit a known schema is kept as [`Element::Opaque`].
    pub fn from_value(value: Value) -> Self {
        let kind = value
            .get("Type")
            .and_then(Value::as_str)
            .map(ElementKind::from_type_name)
            .unwrap_or(ElementKind::Other);
        if kind == ElementKind::Other {
            return Element::Opaque(value);
        }

        let Value::Object(mut fields) = value.clone() else {
            return Element::Opaque(value);
        };
        fields.shift_remove("Type");
        let fields = Value::Object(fields);

        let parsed = match kind {
            ElementKind::Floor => serde_json::from_value(fields).map(Element::Floor),
            ElementKind::Ceiling => serde_json::from_value(fields).map(Element::Ceiling),
            ElementKind::CeilingLight => serde_json::from_value(fields).map(Element::CeilingLight),
            ElementKind::Wall => serde_json::from_value(fields).map(Element::Wall),
            ElementKind::Door => serde_json::from_value(fields).map(Element::Door),
            ElementKind::Window => serde_json::from_value(fields).map(Element::Window),
            ElementKind::Cubicle => serde_json::from_value(fields).map(Element::Cubicle),
            ElementKind::SpawnPoint => serde_json::from_value(fields).map(Element::SpawnPoint),
            ElementKind::Other => return Element::Opaque(value),
        };

        match parsed {
            Ok(element) => element,
            Err(e) => {
                log::warn!(
                    "Keeping {} element verbatim, attributes do not match its schema: {}",
                    kind.type_name().unwrap_or("unknown"),
                    e
                );
                Element::Opaque(value)
            }
        }
    }

    /// Serialize to a JSON value, `Type` first.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        let body = match self {
            Element::Opaque(value) => return Ok(value.clone()),
            Element::Floor(a) | Element::Ceiling(a) => serde_json::to_value(a)?,
            Element::CeilingLight(c) => serde_json::to_value(c)?,
            Element::Wall(s) | Element::Door(s) | Element::Window(s) => serde_json::to_value(s)?,
            Element::Cubicle(c) => serde_json::to_value(c)?,
            Element::SpawnPoint(s) => serde_json::to_value(s)?,
        };
        let mut object = Map::new();
        object.insert("Type".to_string(), Value::from(self.type_name()));
        if let Value::Object(fields) = body {
            object.extend(fields);
        }
        Ok(Value::Object(object))
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().map_err(S::Error::custom)?.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Element::from_value)
    }
}

fn raw_point(value: &Value) -> Option<Point> {
    value.as_object().map(raw_point_in)
}

fn raw_point_in(coord: &Map<String, Value>) -> Point {
    let read = |key: &str| coord.get(key).and_then(Value::as_f64).unwrap_or(0.0);
    Point::new(read("X"), read("Y"))
}

fn update_raw_point(coord: &mut Map<String, Value>, f: &mut impl FnMut(Point) -> Point) -> bool {
    let current = raw_point_in(coord);
    let next = f(current);
    if points_coincide(current, next) {
        return false;
    }
    coord.insert("X".to_string(), Value::from(next.x));
    coord.insert("Y".to_string(), Value::from(next.y));
    true
}
