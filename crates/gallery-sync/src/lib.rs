pub mod config;
pub mod error;
pub mod session;
pub mod store;

pub use config::SyncConfig;
pub use error::{SyncError, extract_error_message};
pub use session::{AutosaveHandle, GallerySession, SaveStatus};
pub use store::{CanvasStore, HttpCanvasStore};
