//! Integration tests: session load/save and the autosave timer.
//!
//! Runs against in-memory stores on a paused clock, so the 60 s interval
//! elapses instantly and deterministically.

use async_trait::async_trait;
use gallery_core::{Canvas, CanvasObject, ObjectId, ObjectKind};
use gallery_editor::EditorOptions;
use gallery_sync::{CanvasStore, GallerySession, SaveStatus, SyncError};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PERIOD: Duration = Duration::from_secs(60);

#[derive(Default)]
struct MemoryStore {
    canvas: Mutex<Option<Canvas>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    fn with(canvas: Canvas) -> Self {
        Self {
            canvas: Mutex::new(Some(canvas)),
            saves: AtomicUsize::new(0),
        }
    }

    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn stored(&self) -> Option<Canvas> {
        self.canvas.lock().unwrap().clone()
    }
}

#[async_trait]
impl CanvasStore for MemoryStore {
    async fn load(&self, _gallery_id: &str) -> Result<Canvas, SyncError> {
        self.canvas.lock().unwrap().clone().ok_or(SyncError::NotFound)
    }

    async fn save(&self, _gallery_id: &str, canvas: &Canvas) -> Result<(), SyncError> {
        *self.canvas.lock().unwrap() = Some(canvas.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Loads fine, rejects every save.
#[derive(Default)]
struct FailingStore {
    attempts: AtomicUsize,
}

#[async_trait]
impl CanvasStore for FailingStore {
    async fn load(&self, _gallery_id: &str) -> Result<Canvas, SyncError> {
        Ok(Canvas::default())
    }

    async fn save(&self, _gallery_id: &str, _canvas: &Canvas) -> Result<(), SyncError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SyncError::from_response(
            400,
            r#"{"detail": "Canvas too large."}"#,
        ))
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

async fn open(store: Arc<dyn CanvasStore>) -> GallerySession {
    GallerySession::open(store, "7", EditorOptions::default())
        .await
        .expect("session opens")
}

fn add_text(session: &GallerySession, text: &str) {
    session.with_editor(|e| {
        e.add_new(ObjectKind::text(text), 10.0, 10.0);
    });
}

#[tokio::test]
async fn missing_canvas_opens_empty() {
    init_logging();
    let session = open(Arc::new(MemoryStore::default())).await;
    session.with_editor(|e| {
        assert!(e.canvas().is_empty());
        assert_eq!(e.canvas().width, 1200.0);
    });
    assert!(!session.has_unsaved_changes());
}

#[tokio::test]
async fn other_load_failures_propagate() {
    struct Broken;

    #[async_trait]
    impl CanvasStore for Broken {
        async fn load(&self, _gallery_id: &str) -> Result<Canvas, SyncError> {
            Err(SyncError::from_response(500, r#"{"error": "db down"}"#))
        }

        async fn save(&self, _gallery_id: &str, _canvas: &Canvas) -> Result<(), SyncError> {
            Ok(())
        }
    }

    let err = GallerySession::open(Arc::new(Broken), "7", EditorOptions::default())
        .await
        .err()
        .expect("open fails");
    assert_eq!(err.to_string(), "server returned 500: db down");
}

#[tokio::test]
async fn invalid_stored_canvas_is_refused() {
    init_logging();
    let mut canvas = Canvas::default();
    for _ in 0..2 {
        canvas.objects.push(CanvasObject::new(
            ObjectId::intern("dup"),
            ObjectKind::rect(20.0, 20.0),
        ));
    }
    let err = GallerySession::open(
        Arc::new(MemoryStore::with(canvas)),
        "7",
        EditorOptions::default(),
    )
    .await
    .err()
    .expect("open fails");
    assert!(matches!(err, SyncError::Document(_)), "{err}");
    assert!(err.to_string().contains("duplicate-id"), "{err}");
}

#[tokio::test]
async fn explicit_save_persists_and_clears_dirty() {
    init_logging();
    let store = Arc::new(MemoryStore::with(Canvas::new(800.0, 600.0, "#101010")));
    let session = open(store.clone()).await;

    add_text(&session, "Opening night");
    assert!(session.has_unsaved_changes());

    let revision = session.save().await.unwrap();
    assert!(!session.has_unsaved_changes());
    assert_eq!(session.with_editor(|e| e.revision()), revision);

    let stored = store.stored().unwrap();
    assert_eq!(stored.background, "#101010");
    assert_eq!(stored.len(), 1);
    assert_eq!(session.save_if_dirty().await.unwrap(), None);
    assert_eq!(store.saves(), 1);
}

#[tokio::test(start_paused = true)]
async fn autosave_fires_after_interval_when_dirty() {
    init_logging();
    let store = Arc::new(MemoryStore::default());
    let session = open(store.clone()).await;
    let autosave = session.spawn_autosave(PERIOD);
    let mut status = autosave.subscribe();

    add_text(&session, "Untitled");
    tokio::time::sleep(PERIOD / 2).await;
    assert_eq!(store.saves(), 0);

    status.changed().await.unwrap();
    let revision = session.with_editor(|e| e.revision());
    assert_eq!(*status.borrow(), SaveStatus::Saved { revision });
    assert_eq!(store.saves(), 1);
    assert!(!session.has_unsaved_changes());
}

#[tokio::test(start_paused = true)]
async fn autosave_skips_clean_canvas() {
    init_logging();
    let store = Arc::new(MemoryStore::default());
    let session = open(store.clone()).await;
    let autosave = session.spawn_autosave(PERIOD);

    tokio::time::sleep(PERIOD * 3 + Duration::from_secs(1)).await;
    assert_eq!(store.saves(), 0);
    assert_eq!(autosave.status(), SaveStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn failed_autosave_reports_and_stays_dirty() {
    init_logging();
    let store = Arc::new(FailingStore::default());
    let session = open(store.clone()).await;
    let autosave = session.spawn_autosave(PERIOD);
    let mut status = autosave.subscribe();

    add_text(&session, "Will not stick");
    status.changed().await.unwrap();
    assert_eq!(
        *status.borrow(),
        SaveStatus::Failed {
            message: "server returned 400: Canvas too large.".into()
        }
    );
    assert!(session.has_unsaved_changes());
    // No retry before the next tick
    assert_eq!(store.attempts.load(Ordering::SeqCst), 1);

    status.changed().await.unwrap();
    assert_eq!(store.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_cancels_autosave() {
    init_logging();
    let store = Arc::new(MemoryStore::default());
    let session = open(store.clone()).await;
    let autosave = session.spawn_autosave(PERIOD);

    add_text(&session, "Draft");
    drop(autosave);
    tokio::time::sleep(PERIOD * 2).await;
    assert_eq!(store.saves(), 0);
    assert!(session.has_unsaved_changes());
}

#[tokio::test]
async fn edits_during_save_stay_unsaved() {
    init_logging();
    let store = Arc::new(MemoryStore::default());
    let session = open(store.clone()).await;
    add_text(&session, "First");

    let (_, in_flight) = session.with_editor(|e| e.snapshot());
    add_text(&session, "Second");
    session.with_editor(|e| e.mark_saved(in_flight));
    assert!(session.has_unsaved_changes());

    session.save().await.unwrap();
    assert!(!session.has_unsaved_changes());
    assert_eq!(store.stored().unwrap().len(), 2);
}
