//! Media pipeline
//!
//! Prepares fetched plans for display:
//! - [`MediaProcessor`]: attaches thumbnails to video media, through [`MediaCache`]
//! - [`BatchScheduler`]: runs the processor over a list with bounded concurrency
//! - [`Prefetcher`]: warms the image cache for the first screen
//!
//! None of these fail a fetch; media problems degrade to the raw URL.

pub mod batch;
pub mod cache;
pub mod prefetch;
pub mod processor;
pub mod thumbnail;


pub use batch::{BatchScheduler, DEFAULT_BATCH_SIZE};
pub use cache::{CacheStats, MediaCache};
pub use prefetch::{
    optimize_url, HttpImagePrefetcher, ImagePrefetcher, PrefetchBatch, PrefetchConfig, Prefetcher,
};
pub use processor::{MediaOutcome, MediaProcessor};
pub use thumbnail::{RemoteThumbnailGenerator, ThumbnailGenerator, UnsupportedThumbnailGenerator};

use crate::core::config::MediaConfig;
use crate::core::utils::url_extension;

/// Classifies media URLs as video by file extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetector {
    extensions: Vec<String>,
}

impl Default for VideoDetector {
    fn default() -> Self {
        Self::from(&MediaConfig::default())
    }
}

impl From<&MediaConfig> for VideoDetector {
    fn from(media: &MediaConfig) -> Self {
        Self::new(media.video_extensions.iter())
    }
}

impl VideoDetector {
    /// Extensions are matched case-insensitively, with or without a leading dot
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn is_video(&self, url: &str) -> bool {
        url_extension(url)
            .map(|ext| self.extensions.iter().any(|e| *e == ext))
            .unwrap_or(false)
    }
}
