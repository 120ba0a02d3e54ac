//! WASM bridge for the gallery editor: exposes the Rust editor to the
//! browser canvas UI.
//!
//! Compiled via `wasm-pack build --target web`. Structured data crosses the
//! boundary as JSON strings; fallible calls answer
//! `{"ok":true,...}` or `{"ok":false,"error":"..."}` instead of throwing.

use gallery_core::{Canvas, CanvasObject, ObjectId, ObjectKind, ObjectPatch, Rect, validate_canvas};
use gallery_editor::{
    EditError, Editor, EditorOptions, ShortcutAction, ShortcutEffect, ShortcutMap, SnapConfig,
};
use serde_json::json;
use wasm_bindgen::prelude::*;

/// The browser-facing editor handle.
#[wasm_bindgen]
pub struct GalleryCanvas {
    editor: Editor,
}

#[wasm_bindgen]
impl GalleryCanvas {
    /// Create an editor on an empty canvas.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, background: &str) -> Self {
        console_error_panic_hook_setup();
        Self {
            editor: Editor::from_canvas(
                Canvas::new(width, height, background),
                EditorOptions::default(),
            ),
        }
    }

    // ─── Document ────────────────────────────────────────────────────────

    /// Replace the canvas with a persisted document.
    pub fn load_json(&mut self, json: &str) -> String {
        match Canvas::from_json(json) {
            Ok(canvas) => {
                log::debug!("wasm: loaded canvas with {} objects", canvas.len());
                self.editor.load_canvas(canvas);
                ok(json!({}))
            }
            Err(e) => fail(e),
        }
    }

    /// The canvas in its persisted JSON form.
    pub fn to_json(&self) -> String {
        self.editor
            .canvas()
            .to_json()
            .unwrap_or_else(|e| fail(e))
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.editor.has_unsaved_changes()
    }

    /// Current revision (exact up to 2^53).
    pub fn revision(&self) -> f64 {
        self.editor.revision() as f64
    }

    /// Tell the editor the document as of `revision` reached the server.
    pub fn mark_saved(&mut self, revision: f64) {
        self.editor.mark_saved(revision as u64);
    }

    // ─── Objects ─────────────────────────────────────────────────────────

    /// Add a complete object (`{"id":..., "type":..., ...}`).
    pub fn add_object(&mut self, json: &str) -> String {
        let obj: CanvasObject = match serde_json::from_str(json) {
            Ok(obj) => obj,
            Err(e) => return fail(e),
        };
        match self.editor.add_object(obj) {
            Ok(id) => ok(json!({ "id": id })),
            Err(e) => fail_edit(e),
        }
    }

    /// Add a new object from its kind fields (`{"type":"rect","width":..}`)
    /// at `(x, y)`; it gets a fresh id and becomes the selection.
    pub fn add_new(&mut self, kind_json: &str, x: f64, y: f64) -> String {
        match serde_json::from_str::<ObjectKind>(kind_json) {
            Ok(kind) => ok(json!({ "id": self.editor.add_new(kind, x, y) })),
            Err(e) => fail(e),
        }
    }

    /// Apply a camelCase patch. Returns true if anything changed.
    pub fn update_object(&mut self, id: &str, patch_json: &str) -> bool {
        match serde_json::from_str::<ObjectPatch>(patch_json) {
            Ok(patch) => self.editor.update_object(ObjectId::intern(id), &patch),
            Err(e) => {
                log::warn!("wasm: bad patch for {id}: {e}");
                false
            }
        }
    }

    pub fn move_object(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.editor.move_object(ObjectId::intern(id), x, y)
    }

    pub fn delete_object(&mut self, id: &str) -> bool {
        self.editor.delete_object(ObjectId::intern(id))
    }

    pub fn delete_selected(&mut self) -> u32 {
        self.editor.delete_selected() as u32
    }

    pub fn clear(&mut self) -> bool {
        self.editor.clear()
    }

    pub fn set_background(&mut self, color: &str) -> bool {
        self.editor.set_background(color)
    }

    // ─── Layers & groups ─────────────────────────────────────────────────

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.editor.bring_to_front(ObjectId::intern(id))
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.editor.send_to_back(ObjectId::intern(id))
    }

    pub fn bring_forward(&mut self, id: &str) -> bool {
        self.editor.bring_forward(ObjectId::intern(id))
    }

    pub fn send_backward(&mut self, id: &str) -> bool {
        self.editor.send_backward(ObjectId::intern(id))
    }

    /// Group the selection. `{"ok":true,"id":"group_3"}` on success.
    pub fn group_selected(&mut self) -> String {
        match self.editor.group_selected() {
            Ok(id) => ok(json!({ "id": id })),
            Err(e) => fail_edit(e),
        }
    }

    pub fn ungroup_object(&mut self, id: &str) -> String {
        match self.editor.ungroup_object(ObjectId::intern(id)) {
            Ok(children) => ok(json!({ "ids": children })),
            Err(e) => fail_edit(e),
        }
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    pub fn copy(&mut self) -> u32 {
        self.editor.copy_objects() as u32
    }

    pub fn cut(&mut self) -> u32 {
        self.editor.cut_objects() as u32
    }

    /// Paste; returns the pasted ids as a JSON array.
    pub fn paste(&mut self) -> String {
        ids_json(&self.editor.paste_objects())
    }

    pub fn paste_after(&mut self, after_id: &str) -> String {
        match self
            .editor
            .paste_objects_at_position(ObjectId::intern(after_id))
        {
            Ok(ids) => ok(json!({ "ids": ids })),
            Err(e) => fail_edit(e),
        }
    }

    pub fn duplicate(&mut self) -> String {
        ids_json(&self.editor.duplicate_selected())
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    /// Call on drag start; every move until `end_gesture` undoes as one step.
    pub fn begin_gesture(&mut self, description: &str) {
        self.editor.begin_batch(description);
    }

    pub fn end_gesture(&mut self) -> bool {
        self.editor.end_batch()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Replace the selection from a JSON array of ids.
    pub fn select(&mut self, ids_json: &str) -> bool {
        match serde_json::from_str::<Vec<ObjectId>>(ids_json) {
            Ok(ids) => {
                self.editor.select(&ids);
                true
            }
            Err(e) => {
                log::warn!("wasm: bad id list: {e}");
                false
            }
        }
    }

    pub fn select_all(&mut self) {
        self.editor.select_all();
    }

    pub fn deselect(&mut self) {
        self.editor.deselect();
    }

    /// Click-select. Returns the hit id, or an empty string for background.
    pub fn select_at(&mut self, x: f64, y: f64, additive: bool) -> String {
        self.editor
            .select_at(x, y, additive)
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// Marquee-select. Returns the selection size afterwards.
    pub fn select_in_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, additive: bool) -> u32 {
        self.editor
            .select_in_rect(Rect::new(x0, y0, x1, y1), additive) as u32
    }

    /// Selected ids as a JS array of strings.
    pub fn selected_ids(&self) -> js_sys::Array {
        self.editor
            .selected_ids()
            .iter()
            .map(|id| JsValue::from_str(id.as_str()))
            .collect()
    }

    pub fn selected_ids_json(&self) -> String {
        ids_json(self.editor.selected_ids())
    }

    // ─── Snapping ────────────────────────────────────────────────────────

    /// Replace the snap settings from camelCase JSON
    /// (`{"enabled":true,"gridSize":20}`; missing fields take defaults).
    pub fn set_snap(&mut self, json: &str) -> bool {
        match serde_json::from_str::<SnapConfig>(json) {
            Ok(config) => {
                self.editor.set_snap_config(config);
                true
            }
            Err(e) => {
                log::warn!("wasm: bad snap config: {e}");
                false
            }
        }
    }

    /// Guides from the last snapped move, as JSON.
    pub fn guides_json(&self) -> String {
        serde_json::to_string(self.editor.guides()).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool,"action":"<name>","save":bool}`.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return json!({ "changed": false, "action": "none", "save": false }).to_string();
        };
        let effect = self.editor.apply_shortcut(action);
        json!({
            "changed": effect == ShortcutEffect::Changed,
            "action": action_to_name(action),
            "save": effect == ShortcutEffect::SaveRequested,
        })
        .to_string()
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Delete => "delete",
        ShortcutAction::SelectAll => "selectAll",
        ShortcutAction::Duplicate => "duplicate",
        ShortcutAction::Copy => "copy",
        ShortcutAction::Cut => "cut",
        ShortcutAction::Paste => "paste",
        ShortcutAction::ClearAll => "clearAll",
        ShortcutAction::Group => "group",
        ShortcutAction::Ungroup => "ungroup",
        ShortcutAction::SendBackward => "sendBackward",
        ShortcutAction::BringForward => "bringForward",
        ShortcutAction::SendToBack => "sendToBack",
        ShortcutAction::BringToFront => "bringToFront",
        ShortcutAction::Save => "save",
        ShortcutAction::Deselect => "deselect",
    }
}

// ─── JSON envelopes ──────────────────────────────────────────────────────

fn ok(mut fields: serde_json::Value) -> String {
    if let Some(map) = fields.as_object_mut() {
        map.insert("ok".into(), true.into());
    }
    fields.to_string()
}

fn fail(error: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": error.to_string() }).to_string()
}

fn fail_edit(error: EditError) -> String {
    json!({
        "ok": false,
        "error": error.to_string(),
        "validation": error.is_validation(),
    })
    .to_string()
}

fn ids_json(ids: &[ObjectId]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("gallery WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no editor needed) ────────────────────────────

/// Validate a persisted canvas document. Returns JSON:
/// `{"ok":bool,"diagnostics":[{"rule":..,"message":..,"severity":..,"objectId":..}]}`.
#[wasm_bindgen]
pub fn validate(json: &str) -> String {
    let canvas: Canvas = match serde_json::from_str(json) {
        Ok(canvas) => canvas,
        Err(e) => return fail(e),
    };
    let diagnostics = validate_canvas(&canvas);
    let ok = !gallery_core::validate::has_errors(&diagnostics);
    let list: Vec<serde_json::Value> = diagnostics
        .iter()
        .map(|d| {
            json!({
                "rule": d.rule,
                "message": d.message,
                "severity": format!("{:?}", d.severity).to_lowercase(),
                "objectId": d.object_id,
            })
        })
        .collect();
    json!({ "ok": ok, "diagnostics": list }).to_string()
}
