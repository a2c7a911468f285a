//! Floorplan document: the ordered element list and its file format.
//!
//! A file is either a JSON array of elements or an object whose `"Elements"`
//! key holds that array. In the second case every sibling key is kept and
//! written back unchanged.
//!
//! Loaded elements remember the JSON they were read from. On save, numbers
//! whose value did not change keep their original spelling (`500` stays
//! `500`, not `500.0`) and keys keep their original order.

use crate::elements::{Element, ElementId, ElementKind};
use kurbo::Point;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Key holding the element array in wrapped documents.
pub const ELEMENTS_KEY: &str = "Elements";

/// Errors produced while reading or writing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid document: {0}")]
    InvalidStructure(String),
}

/// A snapshot of the element sequence for undo/redo.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    elements: HashMap<ElementId, Element>,
    order: Vec<ElementId>,
}

/// An ordered sequence of elements plus an optional pass-through wrapper.
#[derive(Debug, Clone, Default)]
pub struct FloorplanDocument {
    /// All elements, keyed by ID.
    elements: HashMap<ElementId, Element>,
    /// Document order (back to front).
    order: Vec<ElementId>,
    /// Top-level object the element array was loaded from, if any.
    wrapper: Option<Map<String, Value>>,
    /// JSON each loaded element was read from.
    sources: HashMap<ElementId, Value>,
}

impl FloorplanDocument {
    /// Create a new empty document (saved as a bare array).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from elements in order.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut doc = Self::new();
        for element in elements {
            doc.add(element);
        }
        doc
    }

    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let root: Value = serde_json::from_str(json)?;
        Self::from_value(root)
    }

    /// Build a document from a parsed JSON root.
    pub fn from_value(root: Value) -> Result<Self, DocumentError> {
        let (items, wrapper) = match root {
            Value::Array(items) => (items, None),
            Value::Object(mut object) => match object.get_mut(ELEMENTS_KEY).map(Value::take) {
                Some(Value::Array(items)) => (items, Some(object)),
                Some(_) => {
                    return Err(DocumentError::InvalidStructure(format!(
                        "\"{ELEMENTS_KEY}\" must be a list"
                    )));
                }
                None => {
                    return Err(DocumentError::InvalidStructure(format!(
                        "expected a JSON array or an object with \"{ELEMENTS_KEY}\""
                    )));
                }
            },
            _ => {
                return Err(DocumentError::InvalidStructure(format!(
                    "expected a JSON array or an object with \"{ELEMENTS_KEY}\""
                )));
            }
        };

        let mut doc = Self::new();
        for item in items {
            let id = doc.add(Element::from_value(item.clone()));
            doc.sources.insert(id, item);
        }
        doc.wrapper = wrapper;
        Ok(doc)
    }

    /// Serialize back to the shape the document was loaded from.
    pub fn to_value(&self) -> Result<Value, DocumentError> {
        let elements = self
            .iter()
            .map(|(id, element)| {
                let mut value = element.to_value()?;
                if let Some(source) = self.sources.get(&id) {
                    align_to_source(&mut value, source);
                }
                Ok(value)
            })
            .collect::<Result<Vec<_>, DocumentError>>()?;
        Ok(match &self.wrapper {
            Some(wrapper) => {
                let mut out = wrapper.clone();
                out.insert(ELEMENTS_KEY.to_string(), Value::Array(elements));
                Value::Object(out)
            }
            None => Value::Array(elements),
        })
    }

    /// Serialize the document to pretty JSON (two-space indent).
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    /// The pass-through wrapper object, without its `"Elements"` value.
    pub fn wrapper(&self) -> Option<&Map<String, Value>> {
        self.wrapper.as_ref()
    }

    /// Append an element and return its new ID.
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = Uuid::new_v4();
        self.order.push(id);
        self.elements.insert(id, element);
        id
    }

    /// Remove an element from the document.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.order.retain(|&element_id| element_id != id);
        self.elements.remove(&id)
    }

    /// Remove every element matching `predicate`. Returns how many went.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Element) -> bool) -> usize {
        let doomed: Vec<ElementId> = self
            .iter()
            .filter(|(_, element)| predicate(element))
            .map(|(id, _)| id)
            .collect();
        for &id in &doomed {
            self.remove(id);
        }
        doomed.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Element IDs in document order.
    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    /// Elements in document order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.order
            .iter()
            .filter_map(|&id| self.elements.get(&id).map(|element| (id, element)))
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.iter().map(|(_, element)| element)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of elements of the given kind.
    pub fn count_kind(&self, kind: ElementKind) -> usize {
        self.elements().filter(|e| e.kind() == kind).count()
    }

    /// The first `Floor` element in document order.
    pub fn first_floor(&self) -> Option<&Element> {
        self.elements().find(|e| e.kind() == ElementKind::Floor)
    }

    /// Topmost hit-testable element at a world point.
    ///
    /// Later elements are stacked above earlier ones and win.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.order.iter().rev().copied().find(|&id| {
            self.elements
                .get(&id)
                .is_some_and(|e| e.kind().is_hit_testable() && e.hit_test(point, tolerance))
        })
    }

    /// Take a deep snapshot of the element sequence.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            elements: self.elements.clone(),
            order: self.order.clone(),
        }
    }

    /// Replace the element sequence with a snapshot. The wrapper is kept.
    pub fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.elements = snapshot.elements;
        self.order = snapshot.order;
    }
}

/// Give `value` the number spelling and key order of `source` wherever the
/// two still agree.
fn align_to_source(value: &mut Value, source: &Value) {
    match (value, source) {
        (Value::Number(number), Value::Number(original)) => {
            if *number != *original && number.as_f64() == original.as_f64() {
                *number = original.clone();
            }
        }
        (Value::Object(object), Value::Object(original)) => {
            let mut fresh = std::mem::take(object);
            for (key, original_value) in original {
                if let Some(mut entry) = fresh.shift_remove(key) {
                    align_to_source(&mut entry, original_value);
                    object.insert(key.clone(), entry);
                }
            }
            object.extend(fresh);
        }
        (Value::Array(items), Value::Array(originals)) => {
            for (item, original) in items.iter_mut().zip(originals) {
                align_to_source(item, original);
            }
        }
        _ => {}
    }
}
