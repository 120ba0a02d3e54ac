//! Persistence configuration parsed from environment variables.

use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_AUTOSAVE_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// API root, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    /// Autosave period; `None` disables autosave.
    pub autosave: Option<Duration>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            autosave: Some(Duration::from_secs(DEFAULT_AUTOSAVE_SECS)),
        }
    }
}

impl SyncConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `GALLERY_API_URL`: default `http://localhost:8000/api`
    /// - `GALLERY_API_TOKEN`: bearer token
    /// - `GALLERY_AUTOSAVE_SECS`: default 60, `0` disables autosave
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SyncConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("GALLERY_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let token = lookup("GALLERY_API_TOKEN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let autosave_secs = parse_or(lookup("GALLERY_AUTOSAVE_SECS"), DEFAULT_AUTOSAVE_SECS);
        let autosave = (autosave_secs > 0).then(|| Duration::from_secs(autosave_secs));

        Self {
            api_url,
            token,
            autosave,
        }
    }

    /// `GET`/`PUT` endpoint for a gallery's canvas document.
    pub fn canvas_url(&self, gallery_id: &str) -> String {
        format!("{}/galleries/{gallery_id}/canvas/", self.api_url)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
