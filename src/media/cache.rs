//! Thumbnail URI cache
//!
//! Maps a source media URL to the thumbnail URI generated for it so a video
//! seen in an earlier fetch is not thumbnailed again. Entries live until
//! [`MediaCache::clear`] (logout); there is no eviction.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Concurrent media URL -> thumbnail URI cache
#[derive(Debug, Default)]
pub struct MediaCache {
    entries: DashMap<String, String>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MediaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the thumbnail generated for `url`
    pub fn get(&self, url: &str) -> Option<String> {
        match self.entries.get(url) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Record a generated thumbnail. Writing the same key twice is harmless.
    pub fn put(&self, url: impl Into<String>, thumbnail_uri: impl Into<String>) {
        self.entries.insert(url.into(), thumbnail_uri.into());
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached thumbnails
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that fell through to generation
    pub misses: u64,
}

impl CacheStats {
    /// Hit ratio as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}
