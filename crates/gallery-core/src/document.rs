//! Persisted canvas documents: JSON encode/decode with validation.

use crate::model::Canvas;
use crate::validate::{Diagnostic, Severity, has_errors, validate_canvas};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed canvas document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid canvas document: {}", summarize(.0))]
    Invalid(Vec<Diagnostic>),
}

fn summarize(diags: &[Diagnostic]) -> String {
    diags
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Canvas {
    /// Hydrate a canvas from its persisted JSON form.
    ///
    /// Error-level diagnostics reject the document; warnings are logged.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let canvas: Canvas = serde_json::from_str(json)?;
        canvas.validated()
    }

    /// Same as [`Canvas::from_json`] for an already-parsed value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DocumentError> {
        let canvas: Canvas = serde_json::from_value(value)?;
        canvas.validated()
    }

    /// Run the document checks on a canvas that was built some other way.
    pub fn validated(self) -> Result<Self, DocumentError> {
        let diags = validate_canvas(&self);
        if has_errors(&diags) {
            return Err(DocumentError::Invalid(diags));
        }
        for d in &diags {
            log::warn!("canvas document: {d}");
        }
        Ok(self)
    }

    /// Serialize to the persisted JSON form.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
