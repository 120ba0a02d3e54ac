//! The set of currently selected object ids.

use gallery_core::{Canvas, ObjectId};
use smallvec::SmallVec;

/// Selected ids in the order they were selected. Never holds duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: SmallVec<[ObjectId; 4]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    /// The single selected id, if exactly one object is selected.
    pub fn single(&self) -> Option<ObjectId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Replace the selection.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    /// Add an id. Returns false if it was already selected.
    pub fn add(&mut self, id: ObjectId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: ObjectId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| *s != id);
        self.ids.len() != before
    }

    /// Add if absent, remove if present.
    pub fn toggle(&mut self, id: ObjectId) {
        if !self.remove(id) {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn retain(&mut self, mut keep: impl FnMut(ObjectId) -> bool) {
        self.ids.retain(|id| keep(*id));
    }

    /// Drop ids no longer present in `canvas`. Returns how many were dropped.
    pub fn prune(&mut self, canvas: &Canvas) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| canvas.contains(*id));
        before - self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::{CanvasObject, ObjectKind};

    #[test]
    fn set_dedupes_and_keeps_order() {
        let mut sel = Selection::new();
        let (a, b) = (ObjectId::intern("sel_a"), ObjectId::intern("sel_b"));
        sel.set([b, a, b]);
        assert_eq!(sel.ids(), &[b, a]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = Selection::new();
        let a = ObjectId::intern("sel_t");
        sel.toggle(a);
        assert!(sel.contains(a));
        sel.toggle(a);
        assert!(sel.is_empty());
    }

    #[test]
    fn prune_drops_missing_ids() {
        let mut canvas = Canvas::default();
        let kept = ObjectId::intern("sel_kept");
        canvas
            .objects
            .push(CanvasObject::new(kept, ObjectKind::circle(3.0)));
        let mut sel = Selection::new();
        sel.set([kept, ObjectId::intern("sel_gone")]);
        assert_eq!(sel.prune(&canvas), 1);
        assert_eq!(sel.single(), Some(kept));
    }
}
