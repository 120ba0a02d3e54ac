use gallery_core::DocumentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("gallery canvas not found")]
    NotFound,
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl SyncError {
    /// Build a status error from a failed response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message =
            extract_error_message(body).unwrap_or_else(|| format!("request failed with status {status}"));
        SyncError::Status { status, message }
    }
}

/// Best-effort human-readable message from an API error body.
///
/// Looks at `detail`, `message` and `error` in that order, then at the
/// first field whose value is a list of messages (form validation errors,
/// reported as `field: message`). A bare JSON string is used as-is.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Array(items) => first_string(&items),
        serde_json::Value::Object(map) => {
            for key in ["detail", "message", "error"] {
                if let Some(serde_json::Value::String(s)) = map.get(key)
                    && !s.is_empty()
                {
                    return Some(s.clone());
                }
            }
            map.iter().find_map(|(field, v)| match v {
                serde_json::Value::Array(items) => {
                    first_string(items).map(|msg| format!("{field}: {msg}"))
                }
                _ => None,
            })
        }
        _ => None,
    }
}

fn first_string(items: &[serde_json::Value]) -> Option<String> {
    items.iter().find_map(|v| v.as_str().map(str::to_string))
}
