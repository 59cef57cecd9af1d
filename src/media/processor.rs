//! Per-plan media preparation
//!
//! Attaches a thumbnail to plans whose myelin file is a video. Failures never
//! escape: the plan comes back unchanged and the UI falls back to the raw URL.

use std::sync::Arc;

use super::cache::MediaCache;
use super::thumbnail::ThumbnailGenerator;
use super::VideoDetector;
use crate::core::error::MediaError;
use crate::core::types::Plan;

/// Result of preparing one plan
#[derive(Debug, Clone, PartialEq)]
pub enum MediaOutcome {
    /// Thumbnail attached (freshly generated or from cache)
    Enriched(Plan),
    /// Nothing to do: no media, not a video, or already has a thumbnail
    Unchanged(Plan),
    /// Thumbnail could not be produced; the original plan is kept
    Fallback { plan: Plan, error: MediaError },
}

impl MediaOutcome {
    pub fn plan(&self) -> &Plan {
        match self {
            MediaOutcome::Enriched(plan) | MediaOutcome::Unchanged(plan) => plan,
            MediaOutcome::Fallback { plan, .. } => plan,
        }
    }

    pub fn into_plan(self) -> Plan {
        match self {
            MediaOutcome::Enriched(plan) | MediaOutcome::Unchanged(plan) => plan,
            MediaOutcome::Fallback { plan, .. } => plan,
        }
    }

    pub fn is_enriched(&self) -> bool {
        matches!(self, MediaOutcome::Enriched(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, MediaOutcome::Fallback { .. })
    }
}

/// Detects video media and attaches thumbnails through the shared cache
#[derive(Clone)]
pub struct MediaProcessor {
    cache: Arc<MediaCache>,
    generator: Arc<dyn ThumbnailGenerator>,
    detector: VideoDetector,
}

impl MediaProcessor {
    pub fn new(
        cache: Arc<MediaCache>,
        generator: Arc<dyn ThumbnailGenerator>,
        detector: VideoDetector,
    ) -> Self {
        Self {
            cache,
            generator,
            detector,
        }
    }

    pub fn cache(&self) -> &Arc<MediaCache> {
        &self.cache
    }

    pub fn detector(&self) -> &VideoDetector {
        &self.detector
    }

    /// Prepare a single plan
    pub async fn process(&self, plan: Plan) -> MediaOutcome {
        let file = match plan.myelin.as_ref().and_then(|m| m.file.as_ref()) {
            Some(file) => file,
            None => return MediaOutcome::Unchanged(plan),
        };

        if file.thumbnail_url.is_some() || !self.detector.is_video(&file.url) {
            return MediaOutcome::Unchanged(plan);
        }

        let url = file.url.clone();

        if let Some(thumbnail) = self.cache.get(&url) {
            tracing::trace!(plan_id = %plan.id, %url, "Thumbnail cache hit");
            return MediaOutcome::Enriched(with_thumbnail(plan, thumbnail));
        }

        match self.generator.generate(&url).await {
            Ok(Some(thumbnail)) if !thumbnail.is_empty() => {
                self.cache.put(url.clone(), thumbnail.clone());
                tracing::debug!(plan_id = %plan.id, %url, "Generated thumbnail");
                MediaOutcome::Enriched(with_thumbnail(plan, thumbnail))
            }
            Ok(_) => {
                tracing::warn!(plan_id = %plan.id, %url, "Thumbnail generator returned nothing");
                MediaOutcome::Fallback {
                    plan,
                    error: MediaError::EmptyThumbnail { url },
                }
            }
            Err(error) => {
                tracing::warn!(plan_id = %plan.id, %url, %error, "Thumbnail generation failed");
                MediaOutcome::Fallback { plan, error }
            }
        }
    }
}

fn with_thumbnail(mut plan: Plan, thumbnail: String) -> Plan {
    if let Some(file) = plan.myelin.as_mut().and_then(|m| m.file.as_mut()) {
        file.thumbnail_url = Some(thumbnail);
    }
    plan
}
