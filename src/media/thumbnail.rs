//! Thumbnail generation adapters
//!
//! Generating a frame from a video is an external capability. The pipeline
//! only depends on [`ThumbnailGenerator`]; two adapters are provided:
//! - [`RemoteThumbnailGenerator`]: asks a thumbnail service over HTTP
//! - [`UnsupportedThumbnailGenerator`]: always fails, used when no service is configured

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;

use crate::core::error::MediaError;

/// Produces a thumbnail image URI for a video URL.
///
/// `Ok(None)` means the generator ran but produced nothing; the caller treats
/// it the same as an error.
#[async_trait]
pub trait ThumbnailGenerator: Send + Sync {
    async fn generate(&self, video_url: &str) -> Result<Option<String>, MediaError>;
}

/// Generator used when thumbnails are not available on this deployment
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedThumbnailGenerator;

#[async_trait]
impl ThumbnailGenerator for UnsupportedThumbnailGenerator {
    async fn generate(&self, video_url: &str) -> Result<Option<String>, MediaError> {
        Err(MediaError::Unsupported {
            reason: format!("No thumbnail service configured for {}", video_url),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThumbnailResponse {
    #[serde(default, alias = "uri")]
    thumbnail_url: Option<String>,
}

/// Thumbnail service client: `POST {endpoint}` with `{"url": ...}`, answered
/// by `{"thumbnailUrl": ...}`
pub struct RemoteThumbnailGenerator {
    client: Client,
    endpoint: Url,
}

impl RemoteThumbnailGenerator {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, MediaError> {
        let endpoint = Url::parse(endpoint).map_err(|_| MediaError::InvalidUrl {
            url: endpoint.to_string(),
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MediaError::Unsupported {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ThumbnailGenerator for RemoteThumbnailGenerator {
    async fn generate(&self, video_url: &str) -> Result<Option<String>, MediaError> {
        let failed = |reason: String| MediaError::ThumbnailFailed {
            url: video_url.to_string(),
            reason,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "url": video_url }))
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("status {}", response.status())));
        }

        let body: ThumbnailResponse = response.json().await.map_err(|e| failed(e.to_string()))?;
        Ok(body.thumbnail_url.filter(|uri| !uri.is_empty()))
    }
}
