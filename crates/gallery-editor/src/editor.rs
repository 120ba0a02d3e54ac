//! The editor: canvas plus selection, clipboard and history.
//!
//! `Editor` is the single owner of the canvas. Every mutation goes through
//! a method here, which snapshots the canvas first and records the snapshot
//! once the change has actually happened. Operations that turn out to be
//! no-ops (unknown id, already at the back, patch that changes nothing)
//! record nothing.
//!
//! The editor also counts revisions: each committed change, undo or redo
//! bumps `revision`. The persistence layer remembers which revision it last
//! wrote, so edits made while a save is in flight stay unsaved.

use crate::clipboard::Clipboard;
use crate::error::EditError;
use crate::group;
use crate::history::{DEFAULT_HISTORY_DEPTH, History};
use crate::hit;
use crate::selection::Selection;
use crate::shortcuts::{ShortcutAction, ShortcutEffect};
use crate::snap::{SnapConfig, SnapGuide, snap_position};
use gallery_core::{Canvas, CanvasObject, ObjectId, ObjectKind, ObjectPatch, Rect};
use std::collections::HashMap;

type ReorderFn = fn(&mut Canvas, ObjectId) -> bool;

/// Offset applied to duplicates so they don't sit exactly on the original.
pub const DUPLICATE_OFFSET: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorOptions {
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
    pub snap: SnapConfig,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            snap: SnapConfig::default(),
        }
    }
}

#[derive(Debug)]
pub struct Editor {
    canvas: Canvas,
    selection: Selection,
    clipboard: Clipboard,
    history: History,
    snap: SnapConfig,
    /// Guides produced by the last snapped move, for the UI overlay.
    guides: Vec<SnapGuide>,
    revision: u64,
    saved_revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl Editor {
    /// An editor on an empty default canvas.
    pub fn new(options: EditorOptions) -> Self {
        Self::from_canvas(Canvas::default(), options)
    }

    /// An editor on an already-hydrated canvas. The canvas counts as saved.
    pub fn from_canvas(canvas: Canvas, options: EditorOptions) -> Self {
        Self {
            canvas,
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            history: History::new(options.history_depth),
            snap: options.snap,
            guides: Vec::new(),
            revision: 0,
            saved_revision: 0,
        }
    }

    /// Replace the whole canvas, e.g. after loading from the server.
    ///
    /// Selection and history are reset; the clipboard survives so objects
    /// can be carried between galleries. The new canvas counts as saved.
    pub fn load_canvas(&mut self, canvas: Canvas) {
        log::debug!("loading canvas with {} objects", canvas.len());
        self.canvas = canvas;
        self.selection.clear();
        self.history.clear();
        self.guides.clear();
        self.revision += 1;
        self.saved_revision = self.revision;
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_ids(&self) -> &[ObjectId] {
        self.selection.ids()
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn snap_config(&self) -> &SnapConfig {
        &self.snap
    }

    pub fn set_snap_config(&mut self, config: SnapConfig) {
        self.snap = config;
    }

    /// Guide lines from the most recent snapped move.
    pub fn guides(&self) -> &[SnapGuide] {
        &self.guides
    }

    // ─── Persistence state ───────────────────────────────────────────────

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Record that the canvas as of `revision` has been persisted.
    pub fn mark_saved(&mut self, revision: u64) {
        if revision > self.saved_revision {
            self.saved_revision = revision;
        }
    }

    /// The canvas and the revision it corresponds to, for saving.
    pub fn snapshot(&self) -> (Canvas, u64) {
        (self.canvas.clone(), self.revision)
    }

    fn commit(&mut self, before: Canvas, description: &str) {
        log::debug!("{description}");
        self.history.record(before, description);
        self.revision += 1;
    }

    // ─── Object operations ───────────────────────────────────────────────

    /// Append an object on top of the stack.
    ///
    /// Rejected if its id, or any nested child id, is already in use.
    pub fn add_object(&mut self, obj: CanvasObject) -> Result<ObjectId, EditError> {
        let ids = obj.ids();
        for (i, id) in ids.iter().enumerate() {
            if self.canvas.contains(*id) || ids[..i].contains(id) {
                return Err(EditError::DuplicateId(*id));
            }
        }
        let id = obj.id;
        let description = format!("Add {}", obj.kind.type_name());
        let before = self.canvas.clone();
        self.canvas.objects.push(obj);
        self.commit(before, &description);
        Ok(id)
    }

    /// Create an object of `kind` at `(x, y)` with a fresh id, add it and
    /// select it.
    pub fn add_new(&mut self, mut kind: ObjectKind, x: f64, y: f64) -> ObjectId {
        let id = self.canvas.fresh_id(kind.type_name());
        if let ObjectKind::Group { children } = &mut kind {
            // Children need ids of their own that don't collide either
            for child in children {
                child.reassign_ids(&mut |prefix: &str| self.canvas.fresh_id(prefix));
            }
        }
        let description = format!("Add {}", kind.type_name());
        let before = self.canvas.clone();
        self.canvas
            .objects
            .push(CanvasObject::new(id, kind).at(x, y));
        self.selection.set([id]);
        self.commit(before, &description);
        id
    }

    /// Merge `patch` into the object. Returns false if the id is unknown or
    /// the patch changes nothing.
    pub fn update_object(&mut self, id: ObjectId, patch: &ObjectPatch) -> bool {
        let Some(current) = self.canvas.find(id) else {
            log::warn!("update ignored: no object {id}");
            return false;
        };
        let mut updated = current.clone();
        patch.apply(&mut updated);
        if updated == *current {
            return false;
        }
        let before = self.canvas.clone();
        if let Some(slot) = self.canvas.find_mut(id) {
            *slot = updated;
        }
        self.commit(before, "Update object");
        true
    }

    /// Position an object, snapping when enabled. Objects marked
    /// non-draggable are left in place.
    pub fn move_object(&mut self, id: ObjectId, x: f64, y: f64) -> bool {
        let Some(obj) = self.canvas.find(id) else {
            log::warn!("move ignored: no object {id}");
            return false;
        };
        if !obj.draggable {
            log::debug!("move ignored: {id} is locked");
            return false;
        }
        let snapped = snap_position(&self.canvas, &self.snap, id, x, y);
        self.guides = snapped.guides;
        if obj.x == snapped.x && obj.y == snapped.y {
            return false;
        }
        let before = self.canvas.clone();
        if let Some(obj) = self.canvas.find_mut(id) {
            obj.x = snapped.x;
            obj.y = snapped.y;
        }
        self.commit(before, "Move object");
        true
    }

    /// Shift every selected draggable object by `(dx, dy)`, unsnapped, as
    /// one history entry. Returns how many objects moved.
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> usize {
        if dx == 0.0 && dy == 0.0 {
            return 0;
        }
        let before = self.canvas.clone();
        let mut moved = 0;
        for &id in self.selection.ids() {
            if let Some(obj) = self.canvas.find_mut(id)
                && obj.draggable
            {
                obj.x += dx;
                obj.y += dy;
                moved += 1;
            }
        }
        if moved > 0 {
            self.commit(before, "Nudge");
        }
        moved
    }

    /// Remove an object (with its subtree) and drop every removed id from
    /// the selection.
    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        let before = self.canvas.clone();
        let Some(removed) = self.canvas.remove(id) else {
            log::warn!("delete ignored: no object {id}");
            return false;
        };
        let gone = removed.ids();
        self.selection.retain(|s| !gone.contains(&s));
        self.commit(before, "Delete object");
        true
    }

    /// Delete every selected object as one history entry.
    /// Returns the number of objects removed.
    pub fn delete_selected(&mut self) -> usize {
        self.delete_ids(self.selection.ids().to_vec(), "Delete selection")
    }

    fn delete_ids(&mut self, ids: Vec<ObjectId>, description: &str) -> usize {
        let before = self.canvas.clone();
        // A selected child of a selected group may already be gone
        let removed = ids
            .into_iter()
            .filter(|&id| self.canvas.remove(id).is_some())
            .count();
        if removed == 0 {
            return 0;
        }
        self.selection.prune(&self.canvas);
        self.commit(before, description);
        removed
    }

    /// Remove every object.
    pub fn clear(&mut self) -> bool {
        if self.canvas.is_empty() {
            return false;
        }
        let before = self.canvas.clone();
        self.canvas.objects.clear();
        self.selection.clear();
        self.commit(before, "Clear canvas");
        true
    }

    pub fn set_background(&mut self, color: &str) -> bool {
        if self.canvas.background == color {
            return false;
        }
        let before = self.canvas.clone();
        self.canvas.background = color.to_string();
        self.commit(before, "Change background");
        true
    }

    // ─── Layer ordering ──────────────────────────────────────────────────

    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        self.reorder(id, "Bring to front", Canvas::bring_to_front)
    }

    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        self.reorder(id, "Send to back", Canvas::send_to_back)
    }

    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        self.reorder(id, "Bring forward", Canvas::bring_forward)
    }

    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        self.reorder(id, "Send backward", Canvas::send_backward)
    }

    fn reorder(
        &mut self,
        id: ObjectId,
        description: &str,
        op: ReorderFn,
    ) -> bool {
        if !self.canvas.contains(id) {
            log::warn!("{description} ignored: no object {id}");
            return false;
        }
        let before = self.canvas.clone();
        if !op(&mut self.canvas, id) {
            return false;
        }
        self.commit(before, description);
        true
    }

    /// Apply a z-order operation to every selected object as one undo step.
    ///
    /// Selected siblings move as a block: their stacking relative to each
    /// other is kept, and an object never passes a selected neighbour that
    /// could not move. A block already at the extreme records nothing.
    pub fn reorder_selected(&mut self, action: ShortcutAction) -> bool {
        let (description, toward_front, one_step) = match action {
            ShortcutAction::BringToFront => ("Bring to front", true, false),
            ShortcutAction::SendToBack => ("Send to back", false, false),
            ShortcutAction::BringForward => ("Bring forward", true, true),
            ShortcutAction::SendBackward => ("Send backward", false, true),
            _ => return false,
        };

        let mut ids: Vec<(usize, ObjectId)> = self
            .selection
            .ids()
            .iter()
            .filter_map(|&id| self.canvas.locate(id).map(|(_, pos)| (pos, id)))
            .collect();
        ids.sort_by_key(|(pos, _)| *pos);
        // Leading object first, so it claims its slot before the rest follow
        if toward_front {
            ids.reverse();
        }

        let before = self.canvas.clone();
        // Per sibling list: toward the front, the slot of the last placed
        // object; toward the back, the first slot still free
        let mut limits: HashMap<Option<ObjectId>, usize> = HashMap::new();
        for (_, id) in ids {
            let Some((parent, pos)) = self.canvas.locate(id) else {
                continue;
            };
            let Some(siblings) = self.canvas.siblings_mut(parent) else {
                continue;
            };
            let target = if toward_front {
                let furthest = limits.get(&parent).copied().unwrap_or(siblings.len()) - 1;
                if one_step { furthest.min(pos + 1) } else { furthest }
            } else {
                let floor = limits.get(&parent).copied().unwrap_or(0);
                if one_step { floor.max(pos.saturating_sub(1)) } else { floor }
            };
            if target != pos {
                let obj = siblings.remove(pos);
                siblings.insert(target, obj);
            }
            limits.insert(parent, if toward_front { target } else { target + 1 });
        }

        if self.canvas == before {
            return false;
        }
        self.commit(before, description);
        true
    }

    // ─── Grouping ────────────────────────────────────────────────────────

    /// Group the given top-level objects and select the new group.
    pub fn group_objects(&mut self, ids: &[ObjectId]) -> Result<ObjectId, EditError> {
        let before = self.canvas.clone();
        let group_id = group::group_objects(&mut self.canvas, ids)?;
        self.selection.set([group_id]);
        self.commit(before, "Group");
        Ok(group_id)
    }

    pub fn group_selected(&mut self) -> Result<ObjectId, EditError> {
        let ids = self.selection.ids().to_vec();
        self.group_objects(&ids)
    }

    /// Dissolve a group and select its former children.
    pub fn ungroup_object(&mut self, id: ObjectId) -> Result<Vec<ObjectId>, EditError> {
        let before = self.canvas.clone();
        let children = group::ungroup_object(&mut self.canvas, id)?;
        self.selection.set(children.iter().copied());
        self.commit(before, "Ungroup");
        Ok(children)
    }

    /// Ungroup every selected group as one undo step. Returns the ids of
    /// all released children, which is empty for empty groups even though
    /// their shells are removed; watch [`Editor::revision`] for changes.
    pub fn ungroup_selected(&mut self) -> Vec<ObjectId> {
        let groups: Vec<ObjectId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|&id| self.canvas.find(id).is_some_and(CanvasObject::is_group))
            .collect();
        if groups.is_empty() {
            return Vec::new();
        }
        let before = self.canvas.clone();
        let mut released = Vec::new();
        for id in groups {
            match group::ungroup_object(&mut self.canvas, id) {
                Ok(children) => released.extend(children),
                Err(e) => log::warn!("ungroup skipped: {e}"),
            }
        }
        if self.canvas == before {
            return released;
        }
        self.selection.set(released.iter().copied());
        self.commit(before, "Ungroup");
        released
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    /// Copy the selection into the clipboard. Returns the number of entries.
    pub fn copy_objects(&mut self) -> usize {
        self.clipboard.copy_from(&self.canvas, self.selection.ids())
    }

    /// Copy the selection, then delete it as one history entry.
    pub fn cut_objects(&mut self) -> usize {
        let copied = self.copy_objects();
        if copied > 0 {
            self.delete_ids(self.selection.ids().to_vec(), "Cut");
        }
        copied
    }

    /// Paste clipboard entries on top of the stack with fresh ids and select
    /// them. An empty clipboard pastes nothing.
    pub fn paste_objects(&mut self) -> Vec<ObjectId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let pasted = self.clipboard.instantiate(&self.canvas);
        let ids: Vec<ObjectId> = pasted.iter().map(|o| o.id).collect();
        let before = self.canvas.clone();
        self.canvas.objects.extend(pasted);
        self.selection.set(ids.iter().copied());
        self.commit(before, "Paste");
        ids
    }

    /// Paste clipboard entries directly above `after` in its sibling list.
    pub fn paste_objects_at_position(
        &mut self,
        after: ObjectId,
    ) -> Result<Vec<ObjectId>, EditError> {
        let (parent, pos) = self.canvas.locate(after).ok_or(EditError::NotFound(after))?;
        if self.clipboard.is_empty() {
            return Ok(Vec::new());
        }
        let pasted = self.clipboard.instantiate(&self.canvas);
        let ids: Vec<ObjectId> = pasted.iter().map(|o| o.id).collect();
        let before = self.canvas.clone();
        let siblings = self
            .canvas
            .siblings_mut(parent)
            .ok_or(EditError::NotFound(after))?;
        siblings.splice(pos + 1..pos + 1, pasted);
        self.selection.set(ids.iter().copied());
        self.commit(before, "Paste");
        Ok(ids)
    }

    /// Clone the selection with fresh ids, offset by [`DUPLICATE_OFFSET`],
    /// each copy directly above its original. The clipboard is untouched.
    pub fn duplicate_selected(&mut self) -> Vec<ObjectId> {
        let mut scratch = Clipboard::new();
        if scratch.copy_from(&self.canvas, self.selection.ids()) == 0 {
            return Vec::new();
        }
        let copies = scratch.instantiate(&self.canvas);

        let before = self.canvas.clone();
        let mut ids = Vec::with_capacity(copies.len());
        for (source, mut copy) in scratch.entries().iter().zip(copies) {
            let Some((parent, pos)) = self.canvas.locate(source.id) else {
                continue;
            };
            let Some(siblings) = self.canvas.siblings_mut(parent) else {
                continue;
            };
            copy.x += DUPLICATE_OFFSET;
            copy.y += DUPLICATE_OFFSET;
            ids.push(copy.id);
            siblings.insert(pos + 1, copy);
        }
        self.selection.set(ids.iter().copied());
        self.commit(before, "Duplicate");
        ids
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let Some(description) = self.history.undo(&mut self.canvas) else {
            return false;
        };
        log::debug!("undo: {description}");
        self.after_time_travel();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(description) = self.history.redo(&mut self.canvas) else {
            return false;
        };
        log::debug!("redo: {description}");
        self.after_time_travel();
        true
    }

    fn after_time_travel(&mut self) {
        self.selection.prune(&self.canvas);
        self.guides.clear();
        self.revision += 1;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Start a gesture (e.g. a drag); everything until [`Editor::end_batch`]
    /// undoes as one step.
    pub fn begin_batch(&mut self, description: &str) {
        self.history.begin_batch(&self.canvas, description);
    }

    /// Close a gesture. Returns true if it produced a history entry.
    pub fn end_batch(&mut self) -> bool {
        self.guides.clear();
        self.history.end_batch(&self.canvas)
    }

    // ─── Selection (no history) ──────────────────────────────────────────

    /// Replace the selection. Unknown ids are dropped.
    pub fn select(&mut self, ids: &[ObjectId]) {
        let canvas = &self.canvas;
        self.selection
            .set(ids.iter().copied().filter(|&id| canvas.contains(id)));
    }

    pub fn select_all(&mut self) {
        self.selection.set(self.canvas.top_level_ids());
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    pub fn toggle_selection(&mut self, id: ObjectId) {
        if self.canvas.contains(id) {
            self.selection.toggle(id);
        }
    }

    /// Click-select: pick the front-most object at the point. With
    /// `additive` the hit is toggled into the existing selection; a miss
    /// without `additive` clears the selection.
    pub fn select_at(&mut self, x: f64, y: f64, additive: bool) -> Option<ObjectId> {
        let hit = hit::object_at(&self.canvas, x, y);
        match (hit, additive) {
            (Some(id), true) => self.selection.toggle(id),
            (Some(id), false) => self.selection.set([id]),
            (None, false) => self.selection.clear(),
            (None, true) => {}
        }
        hit
    }

    /// Marquee-select every object intersecting `rect`. Returns the number
    /// of selected objects afterwards.
    pub fn select_in_rect(&mut self, rect: Rect, additive: bool) -> usize {
        let hits = hit::objects_in_rect(&self.canvas, rect);
        if additive {
            for id in hits {
                self.selection.add(id);
            }
        } else {
            self.selection.set(hits);
        }
        self.selection.len()
    }

    // ─── Shortcuts ───────────────────────────────────────────────────────

    /// Run a resolved keyboard shortcut.
    pub fn apply_shortcut(&mut self, action: ShortcutAction) -> ShortcutEffect {
        let changed = match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selected() > 0,
            ShortcutAction::SelectAll => {
                let before = self.selection.clone();
                self.select_all();
                self.selection != before
            }
            ShortcutAction::Duplicate => !self.duplicate_selected().is_empty(),
            ShortcutAction::Copy => {
                self.copy_objects();
                false
            }
            ShortcutAction::Cut => self.cut_objects() > 0,
            ShortcutAction::Paste => !self.paste_objects().is_empty(),
            ShortcutAction::ClearAll => self.clear(),
            ShortcutAction::Group => match self.group_selected() {
                Ok(_) => true,
                Err(e) => {
                    log::debug!("group shortcut ignored: {e}");
                    false
                }
            },
            ShortcutAction::Ungroup => {
                let revision = self.revision;
                self.ungroup_selected();
                self.revision != revision
            }
            ShortcutAction::SendBackward
            | ShortcutAction::BringForward
            | ShortcutAction::SendToBack
            | ShortcutAction::BringToFront => self.reorder_selected(action),
            ShortcutAction::Save => return ShortcutEffect::SaveRequested,
            ShortcutAction::Deselect => {
                let had = !self.selection.is_empty();
                self.deselect();
                had
            }
        };
        if changed {
            ShortcutEffect::Changed
        } else {
            ShortcutEffect::Unchanged
        }
    }
}
