//! Structural diagnostics for canvas documents.
//!
//! Reports issues without modifying the canvas. Error-level findings break
//! an invariant the editor relies on (unique ids, a drawable canvas) and
//! reject a document on load; warnings are logged and kept.

use crate::id::ObjectId;
use crate::model::{Canvas, CanvasObject, ObjectKind};
use std::collections::HashSet;
use std::fmt;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Breaks an editor invariant — the document cannot be used as-is.
    Error,
    /// Suspicious but usable.
    Warning,
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// The object this diagnostic refers to; `None` for canvas-level issues.
    pub object_id: Option<ObjectId>,
    /// Human-readable message.
    pub message: String,
    pub severity: Severity,
    /// Short rule identifier (e.g. "duplicate-id", "empty-group").
    pub rule: &'static str,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule, self.message)
    }
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all rules over the canvas and return diagnostics.
#[must_use]
pub fn validate_canvas(canvas: &Canvas) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    check_canvas_size(canvas, &mut diags);
    check_duplicate_ids(canvas, &mut diags);
    let mut stack: Vec<&CanvasObject> = canvas.objects.iter().collect();
    while let Some(obj) = stack.pop() {
        check_object(obj, &mut diags);
        stack.extend(obj.children());
    }
    diags
}

/// Whether any diagnostic is error-level.
pub fn has_errors(diags: &[Diagnostic]) -> bool {
    diags.iter().any(|d| d.severity == Severity::Error)
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn check_canvas_size(canvas: &Canvas, diags: &mut Vec<Diagnostic>) {
    if !(canvas.width > 0.0 && canvas.height > 0.0) {
        diags.push(Diagnostic {
            object_id: None,
            message: format!(
                "Canvas size {}×{} must be positive.",
                canvas.width, canvas.height
            ),
            severity: Severity::Error,
            rule: "canvas-size",
        });
    }
}

fn check_duplicate_ids(canvas: &Canvas, diags: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for id in canvas.all_ids() {
        if !seen.insert(id) && reported.insert(id) {
            diags.push(Diagnostic {
                object_id: Some(id),
                message: format!("Id `{id}` is used by more than one object."),
                severity: Severity::Error,
                rule: "duplicate-id",
            });
        }
    }
}

fn check_object(obj: &CanvasObject, diags: &mut Vec<Diagnostic>) {
    let mut warn = |rule: &'static str, message: String| {
        diags.push(Diagnostic {
            object_id: Some(obj.id),
            message,
            severity: Severity::Warning,
            rule,
        });
    };

    match &obj.kind {
        ObjectKind::Rect { width, height, .. }
        | ObjectKind::Frame { width, height, .. }
        | ObjectKind::Image { width, height, .. } => {
            if *width <= 0.0 || *height <= 0.0 {
                warn(
                    "non-positive-size",
                    format!("`{}` has size {width}×{height}.", obj.id),
                );
            }
        }
        ObjectKind::Circle { radius, .. } => {
            if *radius <= 0.0 {
                warn(
                    "non-positive-size",
                    format!("`{}` has radius {radius}.", obj.id),
                );
            }
        }
        ObjectKind::Text { font_size, .. } => {
            if *font_size <= 0.0 {
                warn(
                    "non-positive-size",
                    format!("`{}` has font size {font_size}.", obj.id),
                );
            }
        }
        ObjectKind::Group { children } => {
            if children.is_empty() {
                warn("empty-group", format!("Group `{}` has no children.", obj.id));
            }
        }
    }

    if !(0.0..=1.0).contains(&obj.opacity) {
        warn(
            "opacity-range",
            format!("`{}` has opacity {} outside 0..=1.", obj.id, obj.opacity),
        );
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str) -> CanvasObject {
        CanvasObject::new(ObjectId::intern(id), ObjectKind::rect(10.0, 10.0))
    }

    #[test]
    fn clean_canvas_no_diags() {
        let mut canvas = Canvas::default();
        canvas.objects = vec![rect("a"), rect("b")];
        assert!(validate_canvas(&canvas).is_empty());
    }

    #[test]
    fn duplicate_nested_id_is_error() {
        let mut canvas = Canvas::default();
        canvas.objects = vec![
            rect("dup"),
            CanvasObject::new(ObjectId::intern("g"), ObjectKind::group(vec![rect("dup")])),
        ];
        let diags = validate_canvas(&canvas);
        assert!(diags.iter().any(|d| d.rule == "duplicate-id"));
        assert!(has_errors(&diags));
    }

    #[test]
    fn empty_group_is_warning() {
        let mut canvas = Canvas::default();
        canvas.objects = vec![CanvasObject::new(
            ObjectId::intern("lonely"),
            ObjectKind::group(vec![]),
        )];
        let diags = validate_canvas(&canvas);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "empty-group");
        assert!(!has_errors(&diags));
    }

    #[test]
    fn zero_canvas_is_error() {
        let canvas = Canvas::new(0.0, 600.0, "#fff");
        assert!(has_errors(&validate_canvas(&canvas)));
    }

    #[test]
    fn flat_rect_and_bad_opacity_warn() {
        let mut flat = CanvasObject::new(ObjectId::intern("flat"), ObjectKind::rect(0.0, 10.0));
        flat.opacity = 1.5;
        let mut canvas = Canvas::default();
        canvas.objects = vec![flat];
        let rules: Vec<_> = validate_canvas(&canvas).iter().map(|d| d.rule).collect();
        assert!(rules.contains(&"non-positive-size"));
        assert!(rules.contains(&"opacity-range"));
    }
}
