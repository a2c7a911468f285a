//! Human-readable summary of a floorplan document.

use floorplan_core::{Element, FloorplanDocument};
use kurbo::Point;
use std::collections::BTreeMap;
use std::fmt::Write;

fn point(p: Point) -> String {
    format!("({}, {})", p.x, p.y)
}

/// Count elements by `Type` and describe lights, cubicles, windows and
/// spawn points.
pub fn inspect(document: &FloorplanDocument) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for element in document.elements() {
        *counts.entry(element.type_name()).or_default() += 1;
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} elements", document.len());
    for (type_name, count) in &counts {
        let _ = writeln!(out, "  {:14} {}", type_name, count);
    }

    let mut details = String::new();
    for element in document.elements() {
        let line = match element {
            Element::CeilingLight(c) => format!(
                "CeilingLight spacing {} padding {}, {} lamps",
                point(c.spacing()),
                point(c.padding()),
                c.lamp_positions().len()
            ),
            Element::Cubicle(c) => {
                let size = c.dimensions();
                format!(
                    "Cubicle at {} dimensions {}x{} yaw {}°",
                    point(c.origin()),
                    size.width,
                    size.height,
                    c.yaw.unwrap_or(0.0)
                )
            }
            Element::Window(s) => format!("Window with {} sections", s.section_count()),
            Element::SpawnPoint(s) => format!(
                "SpawnPoint at {} yaw {}°",
                point(s.position()),
                s.yaw.unwrap_or(0.0)
            ),
            _ => continue,
        };
        let _ = writeln!(details, "  - {}", line);
    }
    if !details.is_empty() {
        out.push('\n');
        out.push_str(&details);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inspect_report() {
        let doc = FloorplanDocument::from_value(json!({"Elements": [
            {"Type": "Floor", "Start": {"X": 0, "Y": 0}, "End": {"X": 1000, "Y": 1000}},
            {"Type": "CeilingLight", "Start": {"X": 0, "Y": 0}, "End": {"X": 800, "Y": 400},
             "Spacing": {"X": 400, "Y": 400}, "Padding": {"X": 0, "Y": 0}},
            {"Type": "Cubicle", "Start": {"X": 100, "Y": 200}, "Dimensions": {"X": 300, "Y": 250}, "Yaw": 90},
            {"Type": "Window", "Start": {"X": 0, "Y": 0}, "End": {"X": 300, "Y": 0}, "SectionCount": 3},
            {"Type": "SpawnPoint", "Start": {"X": 5, "Y": 6}, "Yaw": 180},
            {"Type": "Elevator"}
        ]}))
        .unwrap();

        let report = inspect(&doc);
        assert!(report.starts_with("6 elements"));
        assert!(report.contains("Elevator"));
        assert!(report.contains("Cubicle at (100, 200) dimensions 300x250 yaw 90°"));
        assert!(report.contains("Window with 3 sections"));
        assert!(report.contains("SpawnPoint at (5, 6) yaw 180°"));
        assert!(report.contains("CeilingLight spacing (400, 400) padding (0, 0), 6 lamps"));
    }

    #[test]
    fn test_inspect_empty() {
        assert_eq!(inspect(&FloorplanDocument::new()), "0 elements\n");
    }
}
