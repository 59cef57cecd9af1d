//! Image cache warming
//!
//! After a fetch the leading plans' images are requested in the background at
//! a reduced size so the first screen renders from the image cache. Warming is
//! fire-and-forget: nothing awaits it and failures are only logged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tokio::task::JoinHandle;

use super::VideoDetector;
use crate::core::config::MediaConfig;
use crate::core::error::MediaError;
use crate::core::types::Plan;

/// Sink that loads an image into whatever cache backs the UI
#[async_trait]
pub trait ImagePrefetcher: Send + Sync + 'static {
    async fn prefetch(&self, url: &str) -> Result<(), MediaError>;
}

/// Warms an HTTP cache by downloading the image and discarding the body
pub struct HttpImagePrefetcher {
    client: Client,
}

impl HttpImagePrefetcher {
    pub fn new(timeout: Duration) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MediaError::Unsupported {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImagePrefetcher for HttpImagePrefetcher {
    async fn prefetch(&self, url: &str) -> Result<(), MediaError> {
        let failed = |reason: String| MediaError::PrefetchFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(failed(format!("status {}", response.status())));
        }
        response.bytes().await.map_err(|e| failed(e.to_string()))?;
        Ok(())
    }
}

/// Prefetch tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchConfig {
    /// Whether warming runs at all
    pub enabled: bool,
    /// Number of leading plans whose media is warmed
    pub count: usize,
    /// Requested image width
    pub width: u32,
    /// Requested image quality (1-100)
    pub quality: u8,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self::from(&MediaConfig::default())
    }
}

impl From<&MediaConfig> for PrefetchConfig {
    fn from(media: &MediaConfig) -> Self {
        Self {
            enabled: media.prefetch_enabled,
            count: media.prefetch_count,
            width: media.prefetch_width,
            quality: media.prefetch_quality,
        }
    }
}

/// Handles of spawned warm-up tasks.
///
/// Dropping the batch detaches the tasks; they keep running.
#[derive(Debug, Default)]
pub struct PrefetchBatch {
    handles: Vec<JoinHandle<()>>,
}

impl PrefetchBatch {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every warm-up task to finish
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::debug!(error = %e, "Prefetch task did not complete");
            }
        }
    }
}

/// Schedules background warming for the first plans of a list
#[derive(Clone)]
pub struct Prefetcher {
    sink: Arc<dyn ImagePrefetcher>,
    config: PrefetchConfig,
    detector: VideoDetector,
}

impl Prefetcher {
    pub fn new(sink: Arc<dyn ImagePrefetcher>, config: PrefetchConfig, detector: VideoDetector) -> Self {
        Self {
            sink,
            config,
            detector,
        }
    }

    pub fn config(&self) -> &PrefetchConfig {
        &self.config
    }

    /// Optimized URLs that warming `plans` would request, in order
    pub fn targets(&self, plans: &[Plan]) -> Vec<String> {
        if !self.config.enabled {
            return Vec::new();
        }

        let mut targets: Vec<String> = Vec::new();
        for plan in plans.iter().take(self.config.count) {
            for url in primary_image_urls(plan, &self.detector) {
                if let Some(optimized) = optimize_url(&url, self.config.width, self.config.quality) {
                    if !targets.contains(&optimized) {
                        targets.push(optimized);
                    }
                }
            }
        }
        targets
    }

    /// Spawn one warm-up task per target and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn warm(&self, plans: &[Plan]) -> PrefetchBatch {
        let targets = self.targets(plans);
        if targets.is_empty() {
            return PrefetchBatch::default();
        }

        tracing::debug!(count = targets.len(), "Warming image cache");

        let handles = targets
            .into_iter()
            .map(|url| {
                let sink = Arc::clone(&self.sink);
                tokio::spawn(async move {
                    if let Err(error) = sink.prefetch(&url).await {
                        tracing::warn!(%url, %error, "Image prefetch failed");
                    }
                })
            })
            .collect();

        PrefetchBatch { handles }
    }
}

/// First place photo and the myelin display URL; raw videos are skipped
fn primary_image_urls(plan: &Plan, detector: &VideoDetector) -> Vec<String> {
    let mut urls = Vec::with_capacity(2);
    if let Some(photo) = plan.place.as_ref().and_then(|p| p.photos.first()) {
        urls.push(photo.url.clone());
    }
    if let Some(file) = plan.myelin.as_ref().and_then(|m| m.file.as_ref()) {
        let display = file.display_url();
        if !detector.is_video(display) {
            urls.push(display.to_string());
        }
    }
    urls
}

/// Add width and quality hints to a remote image URL.
///
/// Returns `None` for anything that is not http(s); local files are already
/// as cached as they will get.
pub fn optimize_url(url: &str, width: u32, quality: u8) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| key != "w" && key != "q")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("w", &width.to_string())
        .append_pair("q", &quality.to_string());

    Some(parsed.into())
}
