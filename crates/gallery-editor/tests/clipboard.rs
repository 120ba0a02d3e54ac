//! Integration tests: copy / cut / paste / duplicate.

use gallery_core::{Canvas, CanvasObject, ObjectId};
use gallery_editor::{DUPLICATE_OFFSET, Editor, EditorOptions};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn load_wall() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    let canvas = Canvas::from_json(include_str!("fixtures/wall.json")).expect("fixture loads");
    Editor::from_canvas(canvas, EditorOptions::default())
}

fn id(s: &str) -> ObjectId {
    ObjectId::intern(s)
}

/// The object with its id blanked out, for field-by-field comparison.
fn without_ids(obj: &CanvasObject) -> serde_json::Value {
    let mut value = serde_json::to_value(obj).unwrap();
    strip_ids(&mut value);
    value
}

fn strip_ids(value: &mut serde_json::Value) {
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
        if let Some(children) = map.get_mut("children").and_then(|c| c.as_array_mut()) {
            children.iter_mut().for_each(strip_ids);
        }
    }
}

#[test]
fn paste_twice_yields_disjoint_ids_with_matching_fields() {
    let mut editor = load_wall();
    editor.select(&[id("1"), id("3")]);
    assert_eq!(editor.copy_objects(), 2);

    let first = editor.paste_objects();
    let second = editor.paste_objects();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);

    let originals: HashSet<_> = [id("1"), id("3")].into();
    let a: HashSet<_> = first.iter().copied().collect();
    let b: HashSet<_> = second.iter().copied().collect();
    assert!(a.is_disjoint(&b));
    assert!(a.is_disjoint(&originals));
    assert!(b.is_disjoint(&originals));

    let canvas = editor.canvas();
    for (src, (p1, p2)) in ["1", "3"].iter().zip(first.iter().zip(&second)) {
        let src = without_ids(canvas.find(id(src)).unwrap());
        assert_eq!(without_ids(canvas.find(*p1).unwrap()), src);
        assert_eq!(without_ids(canvas.find(*p2).unwrap()), src);
    }
    assert_eq!(editor.selected_ids(), second.as_slice());
}

#[test]
fn pasted_group_children_get_fresh_ids() {
    let mut editor = load_wall();
    let group = editor.group_objects(&[id("1"), id("2")]).unwrap();
    editor.copy_objects();
    let pasted = editor.paste_objects();

    let copy = editor.canvas().find(pasted[0]).unwrap();
    assert_ne!(copy.id, group);
    let child_ids: Vec<_> = copy.children().iter().map(|c| c.id).collect();
    assert_eq!(child_ids.len(), 2);
    assert!(!child_ids.contains(&id("1")));
    assert!(!child_ids.contains(&id("2")));

    let all = editor.canvas().all_ids();
    let unique: HashSet<_> = all.iter().collect();
    assert_eq!(unique.len(), all.len());
}

#[test]
fn paste_survives_deleting_the_source() {
    let mut editor = load_wall();
    editor.select(&[id("2")]);
    editor.cut_objects();
    assert!(!editor.canvas().contains(id("2")));
    let pasted = editor.paste_objects();
    assert_eq!(pasted.len(), 1);
    assert_eq!(editor.canvas().len(), 3);
}

#[test]
fn duplicate_leaves_clipboard_alone() {
    let mut editor = load_wall();
    editor.select(&[id("3")]);
    editor.copy_objects();
    editor.select(&[id("1")]);

    let dups = editor.duplicate_selected();
    assert_eq!(dups.len(), 1);
    assert_eq!(editor.clipboard().entries()[0].id, id("3"));

    let original = editor.canvas().find(id("1")).unwrap().clone();
    let copy = editor.canvas().find(dups[0]).unwrap();
    assert_eq!(copy.x, original.x + DUPLICATE_OFFSET);
    assert_eq!(copy.y, original.y + DUPLICATE_OFFSET);
    assert_eq!(copy.kind, original.kind);
}

#[test]
fn nothing_selected_copies_nothing() {
    let mut editor = load_wall();
    assert_eq!(editor.copy_objects(), 0);
    assert!(editor.paste_objects().is_empty());
    assert!(editor.duplicate_selected().is_empty());
    assert!(!editor.can_undo());
}
