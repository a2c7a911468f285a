//! Render descriptors handed to the drawing layer.
//!
//! Nothing here draws. A [`Scene`] lists, per element, what it is, whether
//! it is selected and the world-space geometry to draw, together with the
//! world-to-screen transform, grid lines and the pending-line preview.

use crate::document::FloorplanDocument;
use crate::elements::{Element, ElementId, ElementKind, normalize_yaw};
use crate::selection::Selection;
use crate::snap::{GridLine, GridSettings, grid_lines};
use crate::viewport::Viewport;
use kurbo::{Affine, Line, Point, Rect};

/// World-space geometry of one element.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Nothing to draw (unknown types, ceilings).
    None,
    /// The floor outline.
    Rect(Rect),
    /// Wall, door or window.
    Segment {
        line: Line,
        thickness: f64,
        /// Pane divider points (windows).
        dividers: Vec<Point>,
    },
    /// Cubicle footprint.
    Footprint { rect: Rect, yaw: f64 },
    /// Spawn marker with facing direction in degrees.
    Marker { position: Point, yaw: f64 },
    /// Ceiling light area and its lamps (empty when lamps are hidden).
    LampArea { rect: Rect, lamps: Vec<Point> },
}

impl Geometry {
    pub fn of(element: &Element, show_lamps: bool) -> Self {
        match element {
            Element::Floor(area) => Geometry::Rect(area.floor_rect()),
            Element::Wall(s) | Element::Door(s) | Element::Window(s) => Geometry::Segment {
                line: s.as_line(),
                thickness: s.thickness(),
                dividers: if element.kind() == ElementKind::Window {
                    s.section_dividers()
                } else {
                    Vec::new()
                },
            },
            Element::Cubicle(c) => Geometry::Footprint {
                rect: c.footprint(),
                yaw: normalize_yaw(c.yaw.unwrap_or(0.0)),
            },
            Element::SpawnPoint(s) => Geometry::Marker {
                position: s.position(),
                yaw: s.yaw.unwrap_or(0.0),
            },
            Element::CeilingLight(c) => Geometry::LampArea {
                rect: c.rect(),
                lamps: if show_lamps {
                    c.lamp_positions()
                } else {
                    Vec::new()
                },
            },
            Element::Ceiling(_) | Element::Opaque(_) => Geometry::None,
        }
    }
}

/// Descriptor of one element for the drawing layer.
#[derive(Debug, Clone)]
pub struct RenderItem<'a> {
    pub id: ElementId,
    pub element: &'a Element,
    pub selected: bool,
    pub geometry: Geometry,
}

impl RenderItem<'_> {
    pub fn type_name(&self) -> &str {
        self.element.type_name()
    }

    /// Attribute snapshot as stored in the document.
    pub fn attributes(&self) -> Result<serde_json::Value, serde_json::Error> {
        self.element.to_value()
    }
}

/// The in-progress line preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePreview {
    pub kind: ElementKind,
    pub start: Point,
    pub end: Point,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    /// Elements in document order (back to front).
    pub items: Vec<RenderItem<'a>>,
    /// World-to-screen transform.
    pub transform: Affine,
    /// Visible world rectangle.
    pub world: Rect,
    /// Empty when grid display is off.
    pub grid_lines: Vec<GridLine>,
    pub preview: Option<LinePreview>,
}

impl<'a> Scene<'a> {
    pub fn build(
        document: &'a FloorplanDocument,
        selection: &Selection,
        viewport: &Viewport,
        grid: &GridSettings,
        show_lamps: bool,
        preview: Option<LinePreview>,
    ) -> Self {
        let items = document
            .iter()
            .map(|(id, element)| RenderItem {
                id,
                element,
                selected: selection.contains(id),
                geometry: Geometry::of(element, show_lamps),
            })
            .collect();
        Self {
            items,
            transform: viewport.transform(),
            world: viewport.world,
            grid_lines: if grid.visible {
                grid_lines(viewport.world, grid.size())
            } else {
                Vec::new()
            },
            preview,
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &RenderItem<'a>> {
        self.items.iter().filter(|item| item.selected)
    }
}
