//! Axis-aligned bounds for canvas objects.
//!
//! Every object is described by a local rectangle and a transform
//! (translate to `(x, y)`, then rotate clockwise by `rotation` degrees).
//! The world bounds are the bounding box of the transformed rectangle.
//! Group bounds are the union of their children, carried through the
//! group's own transform.

use crate::model::{CanvasObject, ObjectKind};
use kurbo::{Affine, Point, Rect};

/// Average glyph advance as a fraction of the font size.
pub const TEXT_ADVANCE_RATIO: f64 = 0.6;
/// Line height as a multiple of the font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.2;

/// The object's transform from local to parent coordinates.
pub fn object_transform(obj: &CanvasObject) -> Affine {
    Affine::translate((obj.x, obj.y)) * Affine::rotate(obj.rotation.to_radians())
}

/// The object's extent in its own (untransformed) coordinate space.
pub fn local_rect(obj: &CanvasObject) -> Rect {
    match &obj.kind {
        ObjectKind::Rect { width, height, .. }
        | ObjectKind::Frame { width, height, .. }
        | ObjectKind::Image { width, height, .. } => Rect::new(0.0, 0.0, *width, *height),
        ObjectKind::Circle { radius, .. } => Rect::new(-radius, -radius, *radius, *radius),
        ObjectKind::Text {
            text,
            font_size,
            width,
            ..
        } => {
            let lines = text.lines().count().max(1);
            let w = width.unwrap_or_else(|| {
                let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                longest as f64 * font_size * TEXT_ADVANCE_RATIO
            });
            Rect::new(0.0, 0.0, w, lines as f64 * font_size * TEXT_LINE_HEIGHT)
        }
        ObjectKind::Group { children } => {
            union_bounds(children.iter()).unwrap_or(Rect::ZERO)
        }
    }
}

/// Bounds of `obj` in its parent's coordinate space.
pub fn object_bounds(obj: &CanvasObject) -> Rect {
    let local = local_rect(obj);
    if obj.rotation == 0.0 {
        return local + kurbo::Vec2::new(obj.x, obj.y);
    }
    object_transform(obj).transform_rect_bbox(local)
}

/// Union of the bounds of several objects, or `None` if there are none.
pub fn union_bounds<'a>(objects: impl IntoIterator<Item = &'a CanvasObject>) -> Option<Rect> {
    objects
        .into_iter()
        .map(object_bounds)
        .reduce(|acc, r| acc.union(r))
}

/// Whether the point lies within the rectangle (edges inclusive).
pub fn rect_contains(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Whether two rectangles overlap (touching edges count).
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}
