//! Copy/paste buffer.
//!
//! Copies are deep clones that keep their original ids; those ids only
//! identify clipboard entries and are never written back to the canvas.
//! Every paste produces a fresh set of ids, recursively for group children.

use gallery_core::{Canvas, CanvasObject, ObjectId};

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entries: Vec<CanvasObject>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[CanvasObject] {
        &self.entries
    }

    /// Replace the clipboard with deep copies of the selected objects, in
    /// paint order. Children of a selected group come along with the group
    /// and are not copied a second time. Returns the number of entries.
    pub fn copy_from(&mut self, canvas: &Canvas, selected: &[ObjectId]) -> usize {
        self.entries = collect_selected(canvas, selected);
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Clone every entry with fresh ids that are unused in `canvas`.
    pub fn instantiate(&self, canvas: &Canvas) -> Vec<CanvasObject> {
        self.entries
            .iter()
            .map(|entry| {
                let mut copy = entry.clone();
                copy.reassign_ids(&mut |prefix: &str| canvas.fresh_id(prefix));
                copy
            })
            .collect()
    }
}

/// Deep copies of the selected objects in paint order, skipping any object
/// whose ancestor is also selected.
pub fn collect_selected(canvas: &Canvas, selected: &[ObjectId]) -> Vec<CanvasObject> {
    let mut out = Vec::new();
    collect_into(&canvas.objects, selected, &mut out);
    out
}

fn collect_into(objects: &[CanvasObject], selected: &[ObjectId], out: &mut Vec<CanvasObject>) {
    for obj in objects {
        if selected.contains(&obj.id) {
            out.push(obj.clone());
        } else {
            collect_into(obj.children(), selected, out);
        }
    }
}
