//! Core object model for gallery canvases.
//!
//! A canvas is a flat, ordered list of top-level objects. Array order is
//! paint order: index 0 is drawn first (back), the last element is
//! front-most. Groups own their children in the same back-to-front order;
//! ids are unique across the whole tree, nested children included.
//!
//! The serde layout of these types *is* the persisted document:
//!
//! ```json
//! { "width": 1200, "height": 800, "background": "#ffffff",
//!   "objects": [ { "id": "3", "type": "rect", "x": 10, "y": 20, "width": 50, ... } ] }
//! ```

use crate::id::ObjectId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
pub const DEFAULT_TEXT_FILL: &str = "#000000";

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_text_fill() -> String {
    DEFAULT_TEXT_FILL.to_string()
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

// ─── Object kinds ────────────────────────────────────────────────────────

/// Type-specific payload of a canvas object. Serialized inline with the
/// common fields, discriminated by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ObjectKind {
    /// Text label. `width` is the wrap width; `None` means a single
    /// unwrapped line per `\n`.
    Text {
        text: String,
        #[serde(default = "default_font_family")]
        font_family: String,
        #[serde(default = "default_font_size")]
        font_size: f64,
        #[serde(default = "default_text_fill")]
        fill: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
    },

    /// Raster artwork loaded from `src`, drawn at `width × height`.
    Image { src: String, width: f64, height: f64 },

    /// Rectangle anchored at its top-left corner.
    Rect {
        width: f64,
        height: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        #[serde(default)]
        stroke_width: f64,
        #[serde(default)]
        corner_radius: f64,
    },

    /// Circle centered on the object's `(x, y)`.
    Circle {
        radius: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        #[serde(default)]
        stroke_width: f64,
    },

    /// Picture frame — a visible container drawn behind hung artwork.
    Frame {
        width: f64,
        height: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        #[serde(default)]
        stroke_width: f64,
    },

    /// Group — owns its children; they move and select as one unit.
    /// Child coordinates are relative to the group's `(x, y)`.
    Group {
        #[serde(default)]
        children: Vec<CanvasObject>,
    },
}

impl ObjectKind {
    /// The `"type"` discriminator, also used as the fresh-id prefix.
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Text { .. } => "text",
            ObjectKind::Image { .. } => "image",
            ObjectKind::Rect { .. } => "rect",
            ObjectKind::Circle { .. } => "circle",
            ObjectKind::Frame { .. } => "frame",
            ObjectKind::Group { .. } => "group",
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        ObjectKind::Text {
            text: content.into(),
            font_family: default_font_family(),
            font_size: DEFAULT_FONT_SIZE,
            fill: default_text_fill(),
            width: None,
        }
    }

    pub fn image(src: impl Into<String>, width: f64, height: f64) -> Self {
        ObjectKind::Image {
            src: src.into(),
            width,
            height,
        }
    }

    pub fn rect(width: f64, height: f64) -> Self {
        ObjectKind::Rect {
            width,
            height,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
        }
    }

    pub fn circle(radius: f64) -> Self {
        ObjectKind::Circle {
            radius,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn frame(width: f64, height: f64) -> Self {
        ObjectKind::Frame {
            width,
            height,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn group(children: Vec<CanvasObject>) -> Self {
        ObjectKind::Group { children }
    }
}

// ─── Canvas objects ──────────────────────────────────────────────────────

/// A drawable entity on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasObject {
    pub id: ObjectId,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Clockwise rotation in degrees around `(x, y)`.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub draggable: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl CanvasObject {
    pub fn new(id: ObjectId, kind: ObjectKind) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            visible: true,
            draggable: true,
            opacity: 1.0,
            kind,
        }
    }

    /// Builder-style position setter.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ObjectKind::Group { .. })
    }

    /// Direct children (empty for non-groups).
    pub fn children(&self) -> &[CanvasObject] {
        match &self.kind {
            ObjectKind::Group { children } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<CanvasObject>> {
        match &mut self.kind {
            ObjectKind::Group { children } => Some(children),
            _ => None,
        }
    }

    /// This object's id followed by every descendant id, pre-order.
    pub fn ids(&self) -> Vec<ObjectId> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids(&self, out: &mut Vec<ObjectId>) {
        out.push(self.id);
        for child in self.children() {
            child.collect_ids(out);
        }
    }

    /// Whether `id` is this object or one of its descendants.
    pub fn contains_id(&self, id: ObjectId) -> bool {
        self.id == id || self.children().iter().any(|c| c.contains_id(id))
    }

    /// Replace this object's id and every descendant id with values from
    /// `alloc`, which receives the object's type name as a prefix.
    pub fn reassign_ids(&mut self, alloc: &mut impl FnMut(&str) -> ObjectId) {
        self.id = alloc(self.kind.type_name());
        if let Some(children) = self.children_mut() {
            for child in children {
                child.reassign_ids(alloc);
            }
        }
    }
}

// ─── Partial updates ─────────────────────────────────────────────────────

/// Sparse update for a canvas object. Only present fields are applied;
/// fields that don't exist on the target's kind are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl ObjectPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// Merge the patch into `obj`.
    pub fn apply(&self, obj: &mut CanvasObject) {
        if let Some(x) = self.x {
            obj.x = x;
        }
        if let Some(y) = self.y {
            obj.y = y;
        }
        if let Some(r) = self.rotation {
            obj.rotation = r;
        }
        if let Some(v) = self.visible {
            obj.visible = v;
        }
        if let Some(d) = self.draggable {
            obj.draggable = d;
        }
        if let Some(o) = self.opacity {
            obj.opacity = o;
        }

        match &mut obj.kind {
            ObjectKind::Text {
                text,
                font_family,
                font_size,
                fill,
                width,
            } => {
                set_cloned(text, &self.text);
                set_cloned(font_family, &self.font_family);
                set_copied(font_size, self.font_size);
                set_cloned(fill, &self.fill);
                if let Some(w) = self.width {
                    *width = Some(w);
                }
            }
            ObjectKind::Image { src, width, height } => {
                set_cloned(src, &self.src);
                set_copied(width, self.width);
                set_copied(height, self.height);
            }
            ObjectKind::Rect {
                width,
                height,
                fill,
                stroke,
                stroke_width,
                corner_radius,
            } => {
                set_copied(width, self.width);
                set_copied(height, self.height);
                set_paint(fill, &self.fill);
                set_paint(stroke, &self.stroke);
                set_copied(stroke_width, self.stroke_width);
                set_copied(corner_radius, self.corner_radius);
            }
            ObjectKind::Circle {
                radius,
                fill,
                stroke,
                stroke_width,
            } => {
                set_copied(radius, self.radius);
                set_paint(fill, &self.fill);
                set_paint(stroke, &self.stroke);
                set_copied(stroke_width, self.stroke_width);
            }
            ObjectKind::Frame {
                width,
                height,
                fill,
                stroke,
                stroke_width,
            } => {
                set_copied(width, self.width);
                set_copied(height, self.height);
                set_paint(fill, &self.fill);
                set_paint(stroke, &self.stroke);
                set_copied(stroke_width, self.stroke_width);
            }
            ObjectKind::Group { .. } => {
                if self.width.is_some() || self.height.is_some() {
                    log::debug!("ignoring size patch on group {:?}", obj.id);
                }
            }
        }
    }
}

fn set_copied(target: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn set_cloned(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        target.clone_from(v);
    }
}

fn set_paint(target: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value {
        *target = Some(v.clone());
    }
}

// ─── Canvas ──────────────────────────────────────────────────────────────

/// The complete gallery canvas: metadata plus back-to-front objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub objects: Vec<CanvasObject>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT, DEFAULT_BACKGROUND)
    }
}

impl Canvas {
    /// Create an empty canvas.
    #[must_use]
    pub fn new(width: f64, height: f64, background: impl Into<String>) -> Self {
        Self {
            width,
            height,
            background: background.into(),
            objects: Vec::new(),
        }
    }

    /// Number of top-level objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Top-level ids in paint order.
    pub fn top_level_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    /// Every id in the tree, pre-order.
    pub fn all_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().flat_map(CanvasObject::ids).collect()
    }

    /// Look up an object anywhere in the tree.
    pub fn find(&self, id: ObjectId) -> Option<&CanvasObject> {
        find_in(&self.objects, id)
    }

    /// Look up an object mutably anywhere in the tree.
    pub fn find_mut(&mut self, id: ObjectId) -> Option<&mut CanvasObject> {
        find_in_mut(&mut self.objects, id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.find(id).is_some()
    }

    /// Index among the top-level objects, if `id` is top-level.
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Where an object lives: its parent group (`None` for top level) and
    /// its index within that sibling list.
    pub fn locate(&self, id: ObjectId) -> Option<(Option<ObjectId>, usize)> {
        locate_in(&self.objects, None, id)
    }

    /// The sibling list owned by `parent` (`None` = top level).
    pub fn siblings_mut(&mut self, parent: Option<ObjectId>) -> Option<&mut Vec<CanvasObject>> {
        match parent {
            None => Some(&mut self.objects),
            Some(pid) => self.find_mut(pid)?.children_mut(),
        }
    }

    /// Remove an object (and its subtree) from wherever it lives.
    pub fn remove(&mut self, id: ObjectId) -> Option<CanvasObject> {
        let (parent, pos) = self.locate(id)?;
        let siblings = self.siblings_mut(parent)?;
        Some(siblings.remove(pos))
    }

    /// Allocate an id with `prefix` that is not used anywhere in this canvas.
    pub fn fresh_id(&self, prefix: &str) -> ObjectId {
        loop {
            let id = ObjectId::with_prefix(prefix);
            if !self.contains(id) {
                return id;
            }
        }
    }

    // ─── Layer ordering ──────────────────────────────────────────────────

    /// Move an object one step backward in z-order (swap with previous
    /// sibling). Returns true if the order changed.
    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        let Some((parent, pos)) = self.locate(id) else {
            return false;
        };
        if pos == 0 {
            return false; // already at back
        }
        let Some(siblings) = self.siblings_mut(parent) else {
            return false;
        };
        siblings.swap(pos, pos - 1);
        true
    }

    /// Move an object one step forward in z-order (swap with next sibling).
    /// Returns true if the order changed.
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        let Some((parent, pos)) = self.locate(id) else {
            return false;
        };
        let Some(siblings) = self.siblings_mut(parent) else {
            return false;
        };
        if pos + 1 >= siblings.len() {
            return false; // already at front
        }
        siblings.swap(pos, pos + 1);
        true
    }

    /// Move an object to the back of its sibling list.
    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        let Some((parent, pos)) = self.locate(id) else {
            return false;
        };
        if pos == 0 {
            return false;
        }
        let Some(siblings) = self.siblings_mut(parent) else {
            return false;
        };
        let obj = siblings.remove(pos);
        siblings.insert(0, obj);
        true
    }

    /// Move an object to the front of its sibling list.
    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        let Some((parent, pos)) = self.locate(id) else {
            return false;
        };
        let Some(siblings) = self.siblings_mut(parent) else {
            return false;
        };
        if pos + 1 == siblings.len() {
            return false;
        }
        let obj = siblings.remove(pos);
        siblings.push(obj);
        true
    }
}

fn find_in(objects: &[CanvasObject], id: ObjectId) -> Option<&CanvasObject> {
    for obj in objects {
        if obj.id == id {
            return Some(obj);
        }
        if let Some(found) = find_in(obj.children(), id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut(objects: &mut [CanvasObject], id: ObjectId) -> Option<&mut CanvasObject> {
    for obj in objects {
        if obj.id == id {
            return Some(obj);
        }
        if let ObjectKind::Group { children } = &mut obj.kind
            && let Some(found) = find_in_mut(children, id)
        {
            return Some(found);
        }
    }
    None
}

fn locate_in(
    objects: &[CanvasObject],
    parent: Option<ObjectId>,
    id: ObjectId,
) -> Option<(Option<ObjectId>, usize)> {
    for (i, obj) in objects.iter().enumerate() {
        if obj.id == id {
            return Some((parent, i));
        }
        if let Some(found) = locate_in(obj.children(), Some(obj.id), id) {
            return Some(found);
        }
    }
    None
}
