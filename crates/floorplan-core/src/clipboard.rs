//! Copy/paste of elements.

use crate::document::FloorplanDocument;
use crate::elements::Element;
use crate::selection::Selection;
use crate::snap::GridSettings;
use kurbo::Vec2;

/// Paste offset used when grid snapping is off.
pub const UNSNAPPED_PASTE_OFFSET: f64 = 50.0;

/// Deep copies of elements, independent of the document.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    items: Vec<Element>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the selected elements in selection order.
    ///
    /// An empty selection leaves the clipboard as it was. Returns the number
    /// of elements copied.
    pub fn copy(&mut self, document: &FloorplanDocument, selection: &Selection) -> usize {
        let items: Vec<Element> = selection
            .ids()
            .iter()
            .filter_map(|&id| document.get(id).cloned())
            .collect();
        if items.is_empty() {
            return 0;
        }
        self.items = items;
        self.items.len()
    }

    /// Fresh copies of the clipboard contents shifted by `offset`.
    ///
    /// The offset is always relative to the copied position, so repeated
    /// pastes land in the same place.
    pub fn paste_items(&self, offset: Vec2) -> Vec<Element> {
        self.items
            .iter()
            .map(|item| {
                let mut element = item.clone();
                element.translate(offset);
                element
            })
            .collect()
    }

    pub fn items(&self) -> &[Element] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// The offset applied to pasted elements on both axes.
pub fn paste_offset(grid: &GridSettings) -> Vec2 {
    let d = if grid.snap_enabled {
        grid.size()
    } else {
        UNSNAPPED_PASTE_OFFSET
    };
    Vec2::new(d, d)
}
