//! Hit testing: point / marquee → object lookup.
//!
//! Only top-level objects are hit; clicking inside a group picks the group.
//! Invisible objects are never hit.

use gallery_core::bounds::{object_bounds, rect_contains, rects_intersect};
use gallery_core::{Canvas, ObjectId, Point, Rect};

/// Find the front-most object at `(x, y)`.
/// Returns `None` if only the background is hit.
pub fn object_at(canvas: &Canvas, x: f64, y: f64) -> Option<ObjectId> {
    let p = Point::new(x, y);
    // Walk in reverse (last painted = topmost)
    canvas
        .objects
        .iter()
        .rev()
        .filter(|o| o.visible)
        .find(|o| rect_contains(object_bounds(o), p))
        .map(|o| o.id)
}

/// Every visible object whose bounds intersect `marquee`, in paint order.
/// Used for box selection.
pub fn objects_in_rect(canvas: &Canvas, marquee: Rect) -> Vec<ObjectId> {
    let marquee = marquee.abs();
    canvas
        .objects
        .iter()
        .filter(|o| o.visible && rects_intersect(object_bounds(o), marquee))
        .map(|o| o.id)
        .collect()
}
