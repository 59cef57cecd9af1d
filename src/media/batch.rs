//! Chunked concurrent processing
//!
//! Work is split into consecutive chunks. Every future of a chunk is started
//! before any is awaited, and the next chunk starts only once the whole
//! current chunk has resolved, so at most `batch_size` items are in flight.

use std::future::Future;

use futures::future::join_all;

use super::processor::{MediaOutcome, MediaProcessor};
use crate::core::types::Plan;

/// Default number of plans processed together
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Runs work in fixed-size sequential chunks
#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler {
    batch_size: usize,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl BatchScheduler {
    /// A batch size of zero is treated as one
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Apply `f` to every item chunk by chunk; results keep input order
    pub async fn run<T, R, F, Fut>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = R>,
    {
        let mut results = Vec::with_capacity(items.len());
        let mut remaining = items.into_iter();
        let mut chunk_index = 0usize;

        loop {
            let chunk: Vec<T> = remaining.by_ref().take(self.batch_size).collect();
            if chunk.is_empty() {
                break;
            }

            tracing::trace!(chunk = chunk_index, size = chunk.len(), "Processing chunk");
            results.extend(join_all(chunk.into_iter().map(&f)).await);
            chunk_index += 1;
        }

        results
    }

    /// Run the media processor over all plans
    pub async fn process_plans(
        &self,
        processor: &MediaProcessor,
        plans: Vec<Plan>,
    ) -> Vec<MediaOutcome> {
        let total = plans.len();
        let outcomes = self.run(plans, |plan| processor.process(plan)).await;

        let enriched = outcomes.iter().filter(|o| o.is_enriched()).count();
        let fallback = outcomes.iter().filter(|o| o.is_fallback()).count();
        tracing::debug!(
            total,
            enriched,
            fallback,
            batch_size = self.batch_size,
            "Media processing finished"
        );

        outcomes
    }
}
