pub mod clipboard;
pub mod editor;
pub mod error;
pub mod group;
pub mod history;
pub mod hit;
pub mod selection;
pub mod shortcuts;
pub mod snap;

pub use clipboard::Clipboard;
pub use editor::{DUPLICATE_OFFSET, Editor, EditorOptions};
pub use error::EditError;
pub use history::{DEFAULT_HISTORY_DEPTH, History, HistoryEntry};
pub use selection::Selection;
pub use shortcuts::{ShortcutAction, ShortcutEffect, ShortcutMap};
pub use snap::{GuideAxis, SnapConfig, SnapGuide, SnapResult};
