//! Group / ungroup.
//!
//! A group owns its children. New groups sit at offset `(0, 0)` with no
//! rotation, so children keep their coordinates unchanged when grouped and
//! get them back bit-for-bit when ungrouped. Moving or rotating a group
//! afterwards changes only the group; ungrouping carries that transform
//! down into each child.

use crate::error::EditError;
use gallery_core::bounds::object_transform;
use gallery_core::{Canvas, CanvasObject, ObjectId, ObjectKind, Point};

/// Wrap the given top-level objects in a new group.
///
/// Children keep their relative paint order. The group takes the slot of
/// the front-most member so it stays at the same visual depth. Returns the
/// new group's id.
pub fn group_objects(canvas: &mut Canvas, ids: &[ObjectId]) -> Result<ObjectId, EditError> {
    let mut unique: Vec<ObjectId> = Vec::with_capacity(ids.len());
    for &id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    if unique.len() < 2 {
        return Err(EditError::TooFewToGroup(unique.len()));
    }

    let mut positions = Vec::with_capacity(unique.len());
    for &id in &unique {
        match canvas.index_of(id) {
            Some(pos) => positions.push(pos),
            None if canvas.contains(id) => return Err(EditError::NotTopLevel(id)),
            None => return Err(EditError::NotFound(id)),
        }
    }
    positions.sort_unstable();

    let front_most = positions[positions.len() - 1];
    let insert_at = front_most + 1 - positions.len();

    // Remove back-to-front indices from the top down so earlier indices stay valid
    let mut children: Vec<CanvasObject> = positions
        .iter()
        .rev()
        .map(|&pos| canvas.objects.remove(pos))
        .collect();
    children.reverse();

    let group_id = canvas.fresh_id("group");
    let group = CanvasObject::new(group_id, ObjectKind::group(children));
    canvas.objects.insert(insert_at, group);
    Ok(group_id)
}

/// Dissolve a group, re-inserting its children where the group was.
///
/// Works for nested groups too: children land in the group's parent.
/// Returns the children's ids in paint order.
pub fn ungroup_object(canvas: &mut Canvas, id: ObjectId) -> Result<Vec<ObjectId>, EditError> {
    let (parent, pos) = canvas.locate(id).ok_or(EditError::NotFound(id))?;
    let siblings = canvas
        .siblings_mut(parent)
        .ok_or(EditError::NotFound(id))?;
    if !siblings[pos].is_group() {
        return Err(EditError::NotAGroup(id));
    }

    let group = siblings.remove(pos);
    let ObjectKind::Group { children } = group.kind.clone() else {
        return Err(EditError::NotAGroup(id));
    };

    let children: Vec<CanvasObject> = children
        .into_iter()
        .map(|child| lift_out_of(&group, child))
        .collect();
    let ids = children.iter().map(|c| c.id).collect();
    siblings.splice(pos..pos, children);
    Ok(ids)
}

/// Re-express a child in its group's parent coordinates.
fn lift_out_of(group: &CanvasObject, mut child: CanvasObject) -> CanvasObject {
    if group.rotation == 0.0 {
        child.x += group.x;
        child.y += group.y;
    } else {
        let p = object_transform(group) * Point::new(child.x, child.y);
        child.x = p.x;
        child.y = p.y;
        child.rotation += group.rotation;
    }
    child
}
