//! Properties panel contract: editable fields of a single element.
//!
//! The panel asks for a [`PropertySheet`] describing the primary element and
//! writes back `(path, text)` pairs. Text is parsed and validated here; a
//! rejected edit leaves the element untouched.

use crate::elements::{Coord, Element, normalize_yaw};
use kurbo::Point;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors for rejected property edits.
#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Field {0} is not editable on this element")]
    NotEditable(FieldPath),
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),
    #[error("Value out of range for {path}: {value}")]
    OutOfRange { path: FieldPath, value: String },
    #[error("No single element is selected")]
    NoSelection,
}

/// Attribute names the panel can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Start,
    End,
    Dimensions,
    Yaw,
    HeightOffset,
    Thickness,
    SectionCount,
    Spacing,
    Padding,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::Start => "Start",
            Field::End => "End",
            Field::Dimensions => "Dimensions",
            Field::Yaw => "Yaw",
            Field::HeightOffset => "HeightOffset",
            Field::Thickness => "Thickness",
            Field::SectionCount => "SectionCount",
            Field::Spacing => "Spacing",
            Field::Padding => "Padding",
        }
    }

    pub fn kind(self) -> PropertyKind {
        match self {
            Field::Start | Field::End | Field::Dimensions | Field::Spacing | Field::Padding => {
                PropertyKind::Point
            }
            Field::Yaw => PropertyKind::Yaw,
            Field::HeightOffset | Field::Thickness => PropertyKind::Float,
            Field::SectionCount => PropertyKind::Int,
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "Start" => Field::Start,
            "End" => Field::End,
            "Dimensions" => Field::Dimensions,
            "Yaw" => Field::Yaw,
            "HeightOffset" => Field::HeightOffset,
            "Thickness" => Field::Thickness,
            "SectionCount" => Field::SectionCount,
            "Spacing" => Field::Spacing,
            "Padding" => Field::Padding,
            _ => return None,
        })
    }
}

/// Component of a point-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Path to an editable value: a field, optionally narrowed to one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub field: Field,
    pub axis: Option<Axis>,
}

impl FieldPath {
    pub fn new(field: Field) -> Self {
        Self { field, axis: None }
    }

    pub fn with_axis(field: Field, axis: Axis) -> Self {
        Self {
            field,
            axis: Some(axis),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.axis {
            None => f.write_str(self.field.key()),
            Some(Axis::X) => write!(f, "{}.X", self.field.key()),
            Some(Axis::Y) => write!(f, "{}.Y", self.field.key()),
        }
    }
}

impl FromStr for FieldPath {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || PropertyError::UnknownField(s.to_string());
        let (key, axis) = match s.split_once('.') {
            Some((key, "X")) => (key, Some(Axis::X)),
            Some((key, "Y")) => (key, Some(Axis::Y)),
            Some(_) => return Err(unknown()),
            None => (s, None),
        };
        let field = Field::from_key(key).ok_or_else(unknown)?;
        if axis.is_some() && field.kind() != PropertyKind::Point {
            return Err(unknown());
        }
        Ok(Self { field, axis })
    }
}

/// How the panel should present a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Float,
    Int,
    Point,
    Yaw,
}

/// Current value of a property (missing components read as zero).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Float(f64),
    Int(i64),
    Point(Point),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Point(p) => write!(f, "{}, {}", p.x, p.y),
        }
    }
}

/// One editable row of the properties panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEntry {
    pub path: FieldPath,
    pub value: PropertyValue,
    pub kind: PropertyKind,
}

/// Everything the panel shows for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySheet {
    pub type_name: String,
    pub entries: Vec<PropertyEntry>,
}

impl PropertySheet {
    /// Build the sheet for an element. Only attributes present on the
    /// element are listed; unknown element types list nothing.
    pub fn for_element(element: &Element) -> Self {
        let mut entries = Vec::new();
        let mut point = |field: Field, coord: Option<&Coord>| {
            if let Some(coord) = coord {
                entries.push(PropertyEntry {
                    path: FieldPath::new(field),
                    value: PropertyValue::Point(coord.point()),
                    kind: PropertyKind::Point,
                });
            }
        };
        point(Field::Start, element.start());
        point(Field::End, element.end());
        match element {
            Element::Cubicle(c) => point(Field::Dimensions, c.dimensions.as_ref()),
            Element::CeilingLight(c) => {
                point(Field::Spacing, c.spacing.as_ref());
                point(Field::Padding, c.padding.as_ref());
            }
            _ => {}
        }

        let mut scalar = |field: Field, value: Option<f64>| {
            if let Some(value) = value {
                entries.push(PropertyEntry {
                    path: FieldPath::new(field),
                    value: PropertyValue::Float(value),
                    kind: field.kind(),
                });
            }
        };
        match element {
            Element::Cubicle(c) => scalar(Field::Yaw, c.yaw),
            Element::SpawnPoint(s) => {
                scalar(Field::HeightOffset, s.height_offset);
                scalar(Field::Yaw, s.yaw);
            }
            Element::Wall(s) | Element::Door(s) | Element::Window(s) => {
                scalar(Field::Thickness, s.thickness);
            }
            _ => {}
        }
        let section_count = match element {
            Element::Window(s) => s.section_count,
            _ => None,
        };
        if let Some(count) = section_count {
            entries.push(PropertyEntry {
                path: FieldPath::new(Field::SectionCount),
                value: PropertyValue::Int(count),
                kind: PropertyKind::Int,
            });
        }

        Self {
            type_name: element.type_name().to_string(),
            entries,
        }
    }

    /// Whether `path` addresses one of the listed entries.
    pub fn is_editable(&self, path: &FieldPath) -> bool {
        self.entries.iter().any(|entry| entry.path.field == path.field)
    }

    pub fn get(&self, field: Field) -> Option<&PropertyEntry> {
        self.entries.iter().find(|entry| entry.path.field == field)
    }
}

fn parse_float(text: &str) -> Result<f64, PropertyError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PropertyError::InvalidNumber(trimmed.to_string())),
    }
}

fn parse_point(text: &str) -> Result<Point, PropertyError> {
    let parts: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    match parts.as_slice() {
        [x, y] => Ok(Point::new(parse_float(x)?, parse_float(y)?)),
        _ => Err(PropertyError::InvalidNumber(text.trim().to_string())),
    }
}

fn parse_count(text: &str, path: FieldPath) -> Result<i64, PropertyError> {
    let trimmed = text.trim();
    let value = match trimmed.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let v = parse_float(trimmed)?;
            if v.fract() != 0.0 || v.abs() > i64::MAX as f64 {
                return Err(PropertyError::InvalidNumber(trimmed.to_string()));
            }
            v as i64
        }
    };
    if value < 1 {
        return Err(PropertyError::OutOfRange {
            path,
            value: trimmed.to_string(),
        });
    }
    Ok(value)
}

fn coord_slot(element: &mut Element, field: Field) -> Option<&mut Coord> {
    let slot = match (element, field) {
        (Element::Floor(a) | Element::Ceiling(a), Field::Start) => &mut a.start,
        (Element::Floor(a) | Element::Ceiling(a), Field::End) => &mut a.end,
        (Element::CeilingLight(c), Field::Start) => &mut c.start,
        (Element::CeilingLight(c), Field::End) => &mut c.end,
        (Element::CeilingLight(c), Field::Spacing) => &mut c.spacing,
        (Element::CeilingLight(c), Field::Padding) => &mut c.padding,
        (Element::Wall(s) | Element::Door(s) | Element::Window(s), Field::Start) => &mut s.start,
        (Element::Wall(s) | Element::Door(s) | Element::Window(s), Field::End) => &mut s.end,
        (Element::Cubicle(c), Field::Start) => &mut c.start,
        (Element::Cubicle(c), Field::Dimensions) => &mut c.dimensions,
        (Element::SpawnPoint(s), Field::Start) => &mut s.start,
        _ => return None,
    };
    slot.as_mut()
}

fn scalar_slot(element: &mut Element, field: Field) -> Option<&mut f64> {
    let slot = match (element, field) {
        (Element::Cubicle(c), Field::Yaw) => &mut c.yaw,
        (Element::SpawnPoint(s), Field::Yaw) => &mut s.yaw,
        (Element::SpawnPoint(s), Field::HeightOffset) => &mut s.height_offset,
        (Element::Wall(s) | Element::Door(s) | Element::Window(s), Field::Thickness) => {
            &mut s.thickness
        }
        _ => return None,
    };
    slot.as_mut()
}

/// Parse `text` and write it to `path` on `element`.
///
/// Returns whether the stored value changed. On error the element is left
/// exactly as it was.
pub fn apply_edit(element: &mut Element, path: FieldPath, text: &str) -> Result<bool, PropertyError> {
    if !PropertySheet::for_element(element).is_editable(&path) {
        return Err(PropertyError::NotEditable(path));
    }
    let not_editable = PropertyError::NotEditable(path);

    match path.field.kind() {
        PropertyKind::Point => {
            let coord = coord_slot(element, path.field).ok_or(not_editable)?;
            let before = coord.clone();
            match path.axis {
                Some(Axis::X) => coord.x = Some(parse_float(text)?),
                Some(Axis::Y) => coord.y = Some(parse_float(text)?),
                None => coord.set(parse_point(text)?),
            }
            Ok(*coord != before)
        }
        PropertyKind::Float | PropertyKind::Yaw => {
            let mut value = parse_float(text)?;
            if path.field == Field::Yaw {
                value = normalize_yaw(value);
            }
            let slot = scalar_slot(element, path.field).ok_or(not_editable)?;
            let changed = *slot != value;
            *slot = value;
            Ok(changed)
        }
        PropertyKind::Int => {
            let count = parse_count(text, path)?;
            let Element::Window(window) = element else {
                return Err(not_editable);
            };
            let changed = window.section_count != Some(count);
            window.section_count = Some(count);
            Ok(changed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn window() -> Element {
        Element::from_value(json!({
            "Type": "Window",
            "Start": {"X": 0.0, "Y": 0.0},
            "End": {"X": 300.0, "Y": 0.0},
            "Thickness": 1.0,
            "SectionCount": 3
        }))
    }

    #[test]
    fn test_field_path_parse() {
        let path: FieldPath = "Start.X".parse().unwrap();
        assert_eq!(path, FieldPath::with_axis(Field::Start, Axis::X));
        assert_eq!(path.to_string(), "Start.X");
        assert_eq!("Yaw".parse::<FieldPath>().unwrap(), FieldPath::new(Field::Yaw));
        assert!("Yaw.X".parse::<FieldPath>().is_err());
        assert!("Colour".parse::<FieldPath>().is_err());
        assert!("Start.Z".parse::<FieldPath>().is_err());
    }

    #[test]
    fn test_sheet_lists_present_fields() {
        let sheet = PropertySheet::for_element(&window());
        assert_eq!(sheet.type_name, "Window");
        let fields: Vec<Field> = sheet.entries.iter().map(|e| e.path.field).collect();
        assert_eq!(
            fields,
            vec![Field::Start, Field::End, Field::Thickness, Field::SectionCount]
        );
        assert_eq!(sheet.get(Field::SectionCount).unwrap().value, PropertyValue::Int(3));

        let cubicle = Element::cubicle_at(Point::ZERO);
        let sheet = PropertySheet::for_element(&cubicle);
        assert_eq!(sheet.get(Field::Yaw).unwrap().kind, PropertyKind::Yaw);
        assert!(sheet.get(Field::Dimensions).is_some());
        assert!(sheet.get(Field::End).is_none());
    }

    #[test]
    fn test_edit_axis() {
        let mut element = window();
        let changed = apply_edit(&mut element, "End.X".parse().unwrap(), " 450 ").unwrap();
        assert!(changed);
        assert_eq!(element.anchor_points()[1], Point::new(450.0, 0.0));
        assert!(!apply_edit(&mut element, "End.X".parse().unwrap(), "450").unwrap());
    }

    #[test]
    fn test_edit_point_pair() {
        let mut element = Element::cubicle_at(Point::ZERO);
        apply_edit(&mut element, FieldPath::new(Field::Dimensions), "400, 200").unwrap();
        assert_eq!(
            element.as_cubicle().unwrap().dimensions(),
            kurbo::Size::new(400.0, 200.0)
        );
    }

    #[test]
    fn test_invalid_edits_leave_element_untouched() {
        let mut element = window();
        let before = element.clone();
        assert!(matches!(
            apply_edit(&mut element, "Start.X".parse().unwrap(), "abc"),
            Err(PropertyError::InvalidNumber(_))
        ));
        assert!(matches!(
            apply_edit(&mut element, "Start.Y".parse().unwrap(), "NaN"),
            Err(PropertyError::InvalidNumber(_))
        ));
        assert!(matches!(
            apply_edit(&mut element, FieldPath::new(Field::SectionCount), "0"),
            Err(PropertyError::OutOfRange { .. })
        ));
        assert!(matches!(
            apply_edit(&mut element, FieldPath::new(Field::SectionCount), "2.5"),
            Err(PropertyError::InvalidNumber(_))
        ));
        assert!(matches!(
            apply_edit(&mut element, FieldPath::new(Field::Yaw), "90"),
            Err(PropertyError::NotEditable(_))
        ));
        assert_eq!(element, before);
    }

    #[test]
    fn test_yaw_edit_is_normalized() {
        let mut element = Element::spawn_at(Point::ZERO);
        apply_edit(&mut element, FieldPath::new(Field::Yaw), "-80").unwrap();
        assert_eq!(element.yaw(), Some(270.0));
    }

    #[test]
    fn test_missing_attribute_is_not_editable() {
        let mut element = Element::from_value(json!({"Type": "Wall", "Start": {"X": 0.0, "Y": 0.0}}));
        assert!(matches!(
            apply_edit(&mut element, "End.X".parse().unwrap(), "5"),
            Err(PropertyError::NotEditable(_))
        ));
    }
}
