//! Document extents and initial view framing.

use crate::document::FloorplanDocument;
use crate::elements::Element;
use kurbo::{Point, Rect};

/// Relative padding added around computed extents.
pub const PADDING_RATIO: f64 = 0.1;
/// Minimum padding added around computed extents, in world units.
pub const PADDING_ABSOLUTE: f64 = 100.0;

/// Compute the padded bounding box of every coordinate-bearing element.
///
/// Scans `Start`/`End` of each element (unknown types included) and the
/// four corners of each cubicle footprint. Returns `None` when no element
/// carries a coordinate.
pub fn compute_bounding_box<'a>(
    elements: impl IntoIterator<Item = &'a Element>,
    padding_ratio: f64,
    padding_absolute: f64,
) -> Option<Rect> {
    let mut extents: Option<Rect> = None;
    let mut include = |p: Point| {
        extents = Some(match extents {
            Some(rect) => rect.union_pt(p),
            None => Rect::from_points(p, p),
        });
    };

    for element in elements {
        for p in element.anchor_points() {
            include(p);
        }
        if let Element::Cubicle(cubicle) = element {
            let footprint = cubicle.footprint();
            include(Point::new(footprint.x0, footprint.y0));
            include(Point::new(footprint.x1, footprint.y0));
            include(Point::new(footprint.x0, footprint.y1));
            include(Point::new(footprint.x1, footprint.y1));
        }
    }

    let rect = extents?;
    let pad = |span: f64| {
        if span == 0.0 {
            padding_absolute
        } else {
            (span * padding_ratio).max(padding_absolute)
        }
    };
    let (pad_x, pad_y) = (pad(rect.width()), pad(rect.height()));
    Some(Rect::new(
        rect.x0 - pad_x,
        rect.y0 - pad_y,
        rect.x1 + pad_x,
        rect.y1 + pad_y,
    ))
}

/// The world rectangle a freshly loaded document should be framed with.
///
/// The first `Floor` wins; otherwise the padded extents of all elements;
/// otherwise `fallback`.
pub fn initial_view(document: &FloorplanDocument, fallback: Rect) -> Rect {
    if let Some(Element::Floor(area)) = document.first_floor() {
        let rect = area.floor_rect();
        if rect.width() > 0.0 && rect.height() > 0.0 {
            return rect;
        }
        log::debug!("Floor has zero area, framing from element extents");
    }
    compute_bounding_box(document.elements(), PADDING_RATIO, PADDING_ABSOLUTE).unwrap_or(fallback)
}
