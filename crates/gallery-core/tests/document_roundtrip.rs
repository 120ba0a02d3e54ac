//! Integration tests: persisted document → Canvas → JSON → Canvas.

use gallery_core::model::*;
use gallery_core::{ObjectId, object_bounds};
use pretty_assertions::assert_eq;

fn load_fixture() -> Canvas {
    Canvas::from_json(include_str!("fixtures/gallery.json")).expect("fixture should load")
}

#[test]
fn fixture_hydrates_every_kind() {
    let canvas = load_fixture();
    assert_eq!(canvas.width, 1600.0);
    assert_eq!(canvas.background, "#f4efe6");
    assert_eq!(
        canvas.top_level_ids(),
        vec![
            ObjectId::intern("frame-1"),
            ObjectId::intern("art-1"),
            ObjectId::intern("caption"),
            ObjectId::intern("spot"),
        ]
    );

    let caption = canvas.find(ObjectId::intern("caption")).unwrap();
    assert!(caption.is_group());
    assert_eq!(caption.children().len(), 2);

    let text = canvas.find(ObjectId::intern("caption-text")).unwrap();
    match &text.kind {
        ObjectKind::Text {
            font_family,
            font_size,
            ..
        } => {
            assert_eq!(font_family, "Playfair Display");
            assert_eq!(*font_size, 20.0);
        }
        other => panic!("expected text, got {other:?}"),
    }

    let spot = canvas.find(ObjectId::intern("spot")).unwrap();
    assert!(!spot.draggable);
    assert_eq!(spot.opacity, 0.6);
}

#[test]
fn roundtrip_preserves_canvas() {
    let canvas = load_fixture();
    let json = canvas.to_json().unwrap();
    let back = Canvas::from_json(&json).unwrap();
    assert_eq!(canvas, back);
}

#[test]
fn all_ids_include_nested_children() {
    let canvas = load_fixture();
    let ids = canvas.all_ids();
    assert_eq!(ids.len(), 6);
    assert!(ids.contains(&ObjectId::intern("caption-bg")));
}

#[test]
fn group_bounds_cover_caption() {
    let canvas = load_fixture();
    let caption = canvas.find(ObjectId::intern("caption")).unwrap();
    let b = object_bounds(caption);
    assert_eq!(b.x0, 100.0);
    assert_eq!(b.y0, 400.0);
    assert_eq!(b.x1, 480.0);
    assert_eq!(b.y1, 448.0);
}
