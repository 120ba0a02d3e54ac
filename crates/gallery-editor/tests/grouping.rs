//! Integration tests: grouping, and selection consistency on delete.

use gallery_core::{Canvas, CanvasObject, ObjectId, ObjectKind, object_bounds, union_bounds};
use gallery_editor::{EditError, Editor, EditorOptions, ShortcutAction, ShortcutEffect};
use pretty_assertions::assert_eq;

fn load_wall() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    let canvas = Canvas::from_json(include_str!("fixtures/wall.json")).expect("fixture loads");
    Editor::from_canvas(canvas, EditorOptions::default())
}

fn id(s: &str) -> ObjectId {
    ObjectId::intern(s)
}

// ─── Grouping ───────────────────────────────────────────────────────────

#[test]
fn group_then_ungroup_restores_objects() {
    let mut editor = load_wall();
    let original = editor.canvas().clone();

    let group = editor.group_objects(&[id("1"), id("2")]).unwrap();
    assert_eq!(editor.selected_ids(), &[group]);
    assert_eq!(editor.canvas().len(), 2);

    let children = editor.ungroup_object(group).unwrap();
    assert_eq!(children, vec![id("1"), id("2")]);
    assert_eq!(editor.selected_ids(), &[id("1"), id("2")]);
    assert_eq!(editor.canvas(), &original);
}

#[test]
fn group_bounds_are_union_of_children() {
    let mut editor = load_wall();
    let expected = union_bounds(
        editor
            .canvas()
            .objects
            .iter()
            .filter(|o| o.id == id("1") || o.id == id("3")),
    )
    .unwrap();
    let group = editor.group_objects(&[id("3"), id("1")]).unwrap();
    assert_eq!(object_bounds(editor.canvas().find(group).unwrap()), expected);
}

#[test]
fn non_adjacent_members_collapse_to_front_most_slot() {
    let mut editor = load_wall();
    let group = editor.group_objects(&[id("1"), id("3")]).unwrap();
    assert_eq!(editor.canvas().top_level_ids(), vec![id("2"), group]);
    let children: Vec<_> = editor
        .canvas()
        .find(group)
        .unwrap()
        .children()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(children, vec![id("1"), id("3")]);
}

#[test]
fn invalid_requests_are_validation_errors() {
    let mut editor = load_wall();
    let before = editor.canvas().clone();

    let err = editor.group_objects(&[id("1")]).unwrap_err();
    assert_eq!(err, EditError::TooFewToGroup(1));
    assert!(err.is_validation());

    let err = editor.ungroup_object(id("2")).unwrap_err();
    assert_eq!(err, EditError::NotAGroup(id("2")));
    assert!(err.is_validation());

    let err = editor.ungroup_object(id("nope")).unwrap_err();
    assert!(!err.is_validation());

    assert_eq!(editor.canvas(), &before);
    assert!(!editor.can_undo());
}

#[test]
fn moved_group_ungroups_in_place() {
    let mut editor = load_wall();
    let group = editor.group_objects(&[id("1"), id("2")]).unwrap();
    assert!(editor.move_object(group, 50.0, 25.0));
    editor.ungroup_object(group).unwrap();

    let circle = editor.canvas().find(id("2")).unwrap();
    assert_eq!((circle.x, circle.y), (250.0, 75.0));
}

// ─── Selection consistency ──────────────────────────────────────────────

#[test]
fn deleting_selected_object_updates_selection_atomically() {
    let mut editor = load_wall();
    editor.select(&[id("1"), id("2")]);
    assert!(editor.delete_object(id("1")));
    assert_eq!(editor.selected_ids(), &[id("2")]);
    assert!(!editor.canvas().contains(id("1")));
}

#[test]
fn selection_never_holds_unknown_ids() {
    let mut editor = load_wall();
    editor.select(&[id("1"), id("ghost")]);
    assert_eq!(editor.selected_ids(), &[id("1")]);
}

#[test]
fn redo_of_delete_prunes_selection() {
    let mut editor = load_wall();
    editor.delete_object(id("3"));
    editor.undo();
    editor.select(&[id("3")]);
    editor.redo();
    assert!(editor.selected_ids().is_empty());
}

#[test]
fn ungrouping_empty_group_reports_change() {
    let mut editor = load_wall();
    let shell = editor
        .add_object(CanvasObject::new(id("empty_shell"), ObjectKind::group(Vec::new())))
        .unwrap();
    editor.select(&[shell]);
    let depth = editor.history().past_len();
    assert_eq!(
        editor.apply_shortcut(ShortcutAction::Ungroup),
        ShortcutEffect::Changed
    );
    assert!(!editor.canvas().contains(shell));
    assert_eq!(editor.history().past_len(), depth + 1);
    assert!(editor.undo());
    assert!(editor.canvas().contains(shell));
}

#[test]
fn ungroup_shortcut_without_groups_is_unchanged() {
    let mut editor = load_wall();
    editor.select(&[id("1")]);
    let depth = editor.history().past_len();
    assert_eq!(
        editor.apply_shortcut(ShortcutAction::Ungroup),
        ShortcutEffect::Unchanged
    );
    assert_eq!(editor.history().past_len(), depth);
}
