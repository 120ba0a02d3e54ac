//! A gallery being edited: the shared editor plus its persistence.
//!
//! The editor lives behind `Arc<Mutex<_>>` so UI code and the autosave
//! task can both reach it. The lock is only ever held for synchronous
//! work: saving clones the canvas under the lock, releases it, and then
//! awaits the store. Whatever revision was cloned is what gets marked
//! saved, so edits made during the request stay unsaved.
//!
//! Failed saves are reported, never retried; the next explicit save or
//! autosave tick tries again.

use crate::error::SyncError;
use crate::store::CanvasStore;
use gallery_core::Canvas;
use gallery_editor::{Editor, EditorOptions};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Outcome of the most recent autosave attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saved { revision: u64 },
    Failed { message: String },
}

#[derive(Clone)]
pub struct GallerySession {
    gallery_id: String,
    store: Arc<dyn CanvasStore>,
    editor: Arc<Mutex<Editor>>,
}

impl GallerySession {
    /// Load a gallery's canvas. A gallery that has never been saved opens
    /// on an empty default canvas. Whatever the store returns is checked
    /// again, so a canvas with duplicate ids is refused.
    pub async fn open(
        store: Arc<dyn CanvasStore>,
        gallery_id: impl Into<String>,
        options: EditorOptions,
    ) -> Result<Self, SyncError> {
        let gallery_id = gallery_id.into();
        let canvas = match store.load(&gallery_id).await {
            Ok(canvas) => canvas.validated()?,
            Err(SyncError::NotFound) => {
                log::debug!("gallery {gallery_id} has no canvas yet; starting empty");
                Canvas::default()
            }
            Err(e) => return Err(e),
        };
        log::debug!("opened gallery {gallery_id} ({} objects)", canvas.len());
        Ok(Self {
            gallery_id,
            store,
            editor: Arc::new(Mutex::new(Editor::from_canvas(canvas, options))),
        })
    }

    pub fn gallery_id(&self) -> &str {
        &self.gallery_id
    }

    /// Shared handle to the editor.
    pub fn editor(&self) -> Arc<Mutex<Editor>> {
        Arc::clone(&self.editor)
    }

    /// Run `f` with the editor locked.
    pub fn with_editor<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> R {
        // A panic mid-edit leaves the canvas as it was at that point; keep going
        let mut editor = self.editor.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut editor)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.with_editor(|e| e.has_unsaved_changes())
    }

    /// Save now, dirty or not. Returns the revision that was persisted.
    pub async fn save(&self) -> Result<u64, SyncError> {
        let (canvas, revision) = self.with_editor(|e| e.snapshot());
        match self.store.save(&self.gallery_id, &canvas).await {
            Ok(()) => {
                self.with_editor(|e| e.mark_saved(revision));
                log::debug!("saved gallery {} at revision {revision}", self.gallery_id);
                Ok(revision)
            }
            Err(e) => {
                log::error!("saving gallery {} failed: {e}", self.gallery_id);
                Err(e)
            }
        }
    }

    /// Save only if there are unsaved changes.
    pub async fn save_if_dirty(&self) -> Result<Option<u64>, SyncError> {
        if !self.has_unsaved_changes() {
            return Ok(None);
        }
        self.save().await.map(Some)
    }

    /// Start saving every `period` while there are unsaved changes. The
    /// first attempt happens one full period from now.
    ///
    /// The task stops when the returned handle is dropped.
    #[must_use = "autosave stops when the handle is dropped"]
    pub fn spawn_autosave(&self, period: Duration) -> AutosaveHandle {
        let (status_tx, status_rx) = watch::channel(SaveStatus::Idle);
        let session = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                // Run the request as its own task so cancelling autosave
                // never cuts off a save halfway through
                let attempt = tokio::spawn({
                    let session = session.clone();
                    async move { session.save_if_dirty().await }
                });
                let status = match attempt.await {
                    Ok(Ok(None)) => continue,
                    Ok(Ok(Some(revision))) => SaveStatus::Saved { revision },
                    Ok(Err(e)) => SaveStatus::Failed {
                        message: e.to_string(),
                    },
                    Err(e) => SaveStatus::Failed {
                        message: e.to_string(),
                    },
                };
                if status_tx.send(status).is_err() {
                    // Nobody is listening anymore
                    break;
                }
            }
        });
        log::debug!("autosave every {period:?} for gallery {}", self.gallery_id);
        AutosaveHandle {
            task,
            status: status_rx,
        }
    }
}

/// Running autosave task. Dropping it cancels the timer; a request that is
/// already in flight is not cancelled.
pub struct AutosaveHandle {
    task: JoinHandle<()>,
    status: watch::Receiver<SaveStatus>,
}

impl AutosaveHandle {
    /// Latest status.
    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// A receiver that is notified on every autosave attempt.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
