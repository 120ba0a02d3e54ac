//! Where canvases are loaded from and saved to.

use crate::config::SyncConfig;
use crate::error::SyncError;
use async_trait::async_trait;
use gallery_core::Canvas;
use reqwest::StatusCode;

/// Backing store for gallery canvases.
#[async_trait]
pub trait CanvasStore: Send + Sync {
    /// Fetch a gallery's canvas. A gallery without one yields
    /// [`SyncError::NotFound`].
    async fn load(&self, gallery_id: &str) -> Result<Canvas, SyncError>;

    /// Replace a gallery's canvas.
    async fn save(&self, gallery_id: &str, canvas: &Canvas) -> Result<(), SyncError>;
}

/// The gallery REST API: `GET`/`PUT {api}/galleries/{id}/canvas/`.
pub struct HttpCanvasStore {
    http: reqwest::Client,
    config: SyncConfig,
}

impl HttpCanvasStore {
    pub fn new(config: SyncConfig) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Reuse an existing client (shared connection pool).
    pub fn with_client(http: reqwest::Client, config: SyncConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl CanvasStore for HttpCanvasStore {
    async fn load(&self, gallery_id: &str) -> Result<Canvas, SyncError> {
        let url = self.config.canvas_url(gallery_id);
        log::debug!("GET {url}");
        let response = self.authorize(self.http.get(&url)).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound);
        }
        if !status.is_success() {
            return Err(SyncError::from_response(status.as_u16(), &body));
        }
        Ok(Canvas::from_json(&body)?)
    }

    async fn save(&self, gallery_id: &str, canvas: &Canvas) -> Result<(), SyncError> {
        let url = self.config.canvas_url(gallery_id);
        log::debug!("PUT {url} ({} objects)", canvas.len());
        let response = self
            .authorize(self.http.put(&url))
            .json(canvas)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(SyncError::from_response(status.as_u16(), &body))
    }
}
