//! Selection set with a primary element.

use crate::elements::ElementId;

/// An ordered set of selected element IDs.
///
/// Membership is by identity: two structurally identical elements are still
/// distinct members. The primary element exists only while exactly one
/// element is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    members: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `id`, or clear it with `None`.
    /// Returns true if the selection changed.
    pub fn select_single(&mut self, id: Option<ElementId>) -> bool {
        let next: Vec<ElementId> = id.into_iter().collect();
        if self.members == next {
            return false;
        }
        self.members = next;
        true
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(index) = self.members.iter().position(|&m| m == id) {
            self.members.remove(index);
        } else {
            self.members.push(id);
        }
    }

    /// Replace the selection with `ids` in order, dropping duplicates.
    /// Returns true if the selection changed.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) -> bool {
        let mut next: Vec<ElementId> = Vec::new();
        for id in ids {
            if !next.contains(&id) {
                next.push(id);
            }
        }
        if self.members == next {
            return false;
        }
        self.members = next;
        true
    }

    /// Clear the selection. Returns true if anything was selected.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.members.is_empty();
        self.members.clear();
        had_any
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.members.contains(&id)
    }

    /// Selected IDs in selection order.
    pub fn ids(&self) -> &[ElementId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The element driving the properties panel, if exactly one is selected.
    pub fn primary(&self) -> Option<ElementId> {
        match self.members.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_select_single() {
        let mut selection = Selection::new();
        let id = Uuid::new_v4();
        assert!(selection.select_single(Some(id)));
        assert_eq!(selection.primary(), Some(id));
        // Reselecting the sole element changes nothing.
        assert!(!selection.select_single(Some(id)));
        assert!(selection.select_single(None));
        assert!(!selection.select_single(None));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_and_primary() {
        let mut selection = Selection::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        selection.toggle(a);
        selection.toggle(b);
        assert_eq!(selection.ids(), &[a, b]);
        assert_eq!(selection.primary(), None);

        selection.toggle(a);
        assert_eq!(selection.primary(), Some(b));
        selection.toggle(b);
        assert_eq!(selection.primary(), None);
    }

    #[test]
    fn test_set_drops_duplicates() {
        let mut selection = Selection::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(selection.set([a, b, a]));
        assert_eq!(selection.ids(), &[a, b]);
        assert!(!selection.set([a, b]));
    }
}
