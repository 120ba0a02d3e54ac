pub mod bounds;
pub mod document;
pub mod id;
pub mod model;
pub mod validate;

pub use bounds::{object_bounds, union_bounds};
pub use document::DocumentError;
pub use id::ObjectId;
pub use model::*;
pub use validate::{Diagnostic, Severity, validate_canvas};

// Re-export kurbo geometry so downstream crates share one version
pub use kurbo::{Point, Rect};
