//! Undo/Redo history.
//!
//! Every mutation pushes an immutable snapshot of the canvas as it was
//! *before* the edit onto `past`; the current state is implicit (it lives
//! in the editor). Undo swaps the current canvas with the top of `past`
//! and parks the previous current on `future`; redo is the inverse. Any
//! new edit clears `future`.
//!
//! Drag gestures use **batching**: the canvas is captured when the gesture
//! starts and a single entry is pushed when it ends, so one undo reverts
//! the whole gesture.

use gallery_core::Canvas;

/// Default maximum undo depth.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// A canvas snapshot plus what produced the change.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub canvas: Canvas,
    pub description: String,
}

/// Past/future snapshot stacks with batch grouping.
#[derive(Debug)]
pub struct History {
    past: Vec<HistoryEntry>,
    future: Vec<HistoryEntry>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Snapshot captured at the start of the outermost batch.
    batch_snapshot: Option<HistoryEntry>,
    /// Whether any edit was recorded during the current batch.
    batch_dirty: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::with_capacity(max_depth.min(DEFAULT_HISTORY_DEPTH)),
            future: Vec::new(),
            max_depth: max_depth.max(1),
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    /// Record an edit: `before` is the canvas prior to the mutation.
    ///
    /// Inside a batch the snapshot is dropped; the batch's own start
    /// snapshot covers it.
    pub fn record(&mut self, before: Canvas, description: &str) {
        if self.batch_depth > 0 {
            self.batch_dirty = true;
            return;
        }
        self.push(HistoryEntry {
            canvas: before,
            description: description.to_string(),
        });
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.past.push(entry);
        if self.past.len() > self.max_depth {
            self.past.remove(0);
        }
        // Clear redo stack on new action
        self.future.clear();
    }

    /// Start a batch group. All edits until the matching `end_batch()` are
    /// tracked as one undo step.
    pub fn begin_batch(&mut self, current: &Canvas, description: &str) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(HistoryEntry {
                canvas: current.clone(),
                description: description.to_string(),
            });
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes and the canvas
    /// actually changed, push one entry. Returns true if an entry was pushed.
    pub fn end_batch(&mut self, current: &Canvas) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }
        let snapshot = self.batch_snapshot.take();
        let dirty = std::mem::take(&mut self.batch_dirty);
        match snapshot {
            Some(entry) if dirty && entry.canvas != *current => {
                self.push(entry);
                true
            }
            _ => false,
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Undo: restore the most recent snapshot into `current`.
    /// Returns the description of the undone edit.
    pub fn undo(&mut self, current: &mut Canvas) -> Option<String> {
        if self.is_batching() {
            log::warn!("undo ignored while a batch is open");
            return None;
        }
        let entry = self.past.pop()?;
        let previous = std::mem::replace(current, entry.canvas);
        self.future.push(HistoryEntry {
            canvas: previous,
            description: entry.description.clone(),
        });
        Some(entry.description)
    }

    /// Redo: re-apply the most recently undone edit.
    pub fn redo(&mut self, current: &mut Canvas) -> Option<String> {
        if self.is_batching() {
            log::warn!("redo ignored while a batch is open");
            return None;
        }
        let entry = self.future.pop()?;
        let previous = std::mem::replace(current, entry.canvas);
        self.past.push(HistoryEntry {
            canvas: previous,
            description: entry.description.clone(),
        });
        Some(entry.description)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Description of the edit `undo()` would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.past.last().map(|e| e.description.as_str())
    }

    /// Description of the edit `redo()` would re-apply.
    pub fn redo_description(&self) -> Option<&str> {
        self.future.last().map(|e| e.description.as_str())
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Forget everything, including an open batch.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.batch_depth = 0;
        self.batch_snapshot = None;
        self.batch_dirty = false;
    }
}
