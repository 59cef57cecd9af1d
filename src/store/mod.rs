//! Plan store
//!
//! Owns the user, the flat plan list and the loading/error status. Every
//! fetch runs the same pipeline:
//!
//! ```text
//! get_all_plans -> filter by user -> dedup -> media batches -> prefetch -> state
//! ```
//!
//! The user is captured when an operation starts and passed down explicitly.
//! A fetch that finishes after a newer fetch or a logout is discarded.
//! Grouped views are derived on demand through [`crate::plan::PlanAggregator`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::core::config::MediaConfig;
use crate::core::error::{DefaultErrorFormatter, ErrorFormatter, PlannerError, Result};
use crate::core::types::{Plan, User};
use crate::media::{
    BatchScheduler, ImagePrefetcher, MediaCache, MediaOutcome, MediaProcessor, PrefetchConfig,
    Prefetcher, ThumbnailGenerator, UnsupportedThumbnailGenerator, VideoDetector,
};
use crate::plan::{dedup_plans, distinct_events};
use crate::service::PlanService;


/// Observable store state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanState {
    pub user: Option<User>,
    /// Deduplicated, media-processed plans of `user`
    pub plans: Vec<Plan>,
    /// Set only while a fetch runs against an empty list
    pub is_loading: bool,
    /// Last user-presentable error
    pub error: Option<String>,
}

/// Builder for [`PlanStore`]
pub struct PlanStoreBuilder {
    service: Arc<dyn PlanService>,
    media: MediaConfig,
    generator: Arc<dyn ThumbnailGenerator>,
    prefetch_sink: Option<Arc<dyn ImagePrefetcher>>,
    formatter: Arc<dyn ErrorFormatter>,
}

impl PlanStoreBuilder {
    fn new(service: Arc<dyn PlanService>) -> Self {
        Self {
            service,
            media: MediaConfig::default(),
            generator: Arc::new(UnsupportedThumbnailGenerator),
            prefetch_sink: None,
            formatter: Arc::new(DefaultErrorFormatter),
        }
    }

    pub fn media_config(mut self, media: MediaConfig) -> Self {
        self.media = media;
        self
    }

    pub fn thumbnail_generator(mut self, generator: Arc<dyn ThumbnailGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Enable image cache warming through `sink`
    pub fn image_prefetcher(mut self, sink: Arc<dyn ImagePrefetcher>) -> Self {
        self.prefetch_sink = Some(sink);
        self
    }

    pub fn error_formatter(mut self, formatter: Arc<dyn ErrorFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn build(self) -> PlanStore {
        let detector = VideoDetector::from(&self.media);
        let cache = Arc::new(MediaCache::new());
        let processor = MediaProcessor::new(Arc::clone(&cache), self.generator, detector.clone());
        let prefetcher = self
            .prefetch_sink
            .map(|sink| Prefetcher::new(sink, PrefetchConfig::from(&self.media), detector));
        let (state, _) = watch::channel(PlanState::default());

        PlanStore {
            service: self.service,
            cache,
            processor,
            scheduler: BatchScheduler::new(self.media.batch_size),
            prefetcher,
            formatter: self.formatter,
            state,
            fetch_seq: AtomicU64::new(0),
            loading_seq: AtomicU64::new(0),
        }
    }
}

/// Client-side plan state container
pub struct PlanStore {
    service: Arc<dyn PlanService>,
    cache: Arc<MediaCache>,
    processor: MediaProcessor,
    scheduler: BatchScheduler,
    prefetcher: Option<Prefetcher>,
    formatter: Arc<dyn ErrorFormatter>,
    state: watch::Sender<PlanState>,
    fetch_seq: AtomicU64,
    /// Fetch that currently owns `is_loading`
    loading_seq: AtomicU64,
}

impl PlanStore {
    pub fn builder(service: Arc<dyn PlanService>) -> PlanStoreBuilder {
        PlanStoreBuilder::new(service)
    }

    /// Store with default media settings and no thumbnail service
    pub fn new(service: Arc<dyn PlanService>) -> Self {
        Self::builder(service).build()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> PlanState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PlanState> {
        self.state.subscribe()
    }

    pub fn plans(&self) -> Vec<Plan> {
        self.state.borrow().plans.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn media_cache(&self) -> &Arc<MediaCache> {
        &self.cache
    }

    /// Login hand-off
    pub fn set_user(&self, user: User) {
        tracing::info!(user_id = %user.id, "User set");
        self.state.send_modify(|s| s.user = Some(user));
    }

    /// Replace the plan list as-is
    pub fn set_plans(&self, plans: Vec<Plan>) {
        self.state.send_modify(|s| s.plans = plans);
    }

    /// Fetch and replace the plan list, showing a loading state when empty
    pub async fn fetch_plans(&self) -> Result<()> {
        self.load(true).await
    }

    /// Fetch and replace the plan list without touching the loading flag
    pub async fn refresh_plans(&self) -> Result<()> {
        self.load(false).await
    }

    async fn load(&self, show_loading: bool) -> Result<()> {
        let user_id = match self.state.borrow().user.as_ref() {
            Some(user) => user.id.clone(),
            None => {
                tracing::warn!("Fetch requested without a logged-in user");
                return Err(PlannerError::NotLoggedIn);
            }
        };

        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;

        if show_loading {
            let mut owns_loading = false;
            self.state.send_if_modified(|s| {
                if !s.plans.is_empty() {
                    return false;
                }
                owns_loading = true;
                !std::mem::replace(&mut s.is_loading, true)
            });
            if owns_loading {
                self.loading_seq.store(seq, Ordering::SeqCst);
            }
        }

        let result = self.run_pipeline(&user_id).await;

        if self.fetch_seq.load(Ordering::SeqCst) != seq {
            tracing::debug!(seq, "Discarding stale fetch result");
            // A newer fetch that took over the flag clears it itself
            if self.loading_seq.load(Ordering::SeqCst) == seq {
                self.state
                    .send_if_modified(|s| std::mem::replace(&mut s.is_loading, false));
            }
            return Ok(());
        }

        match result {
            Ok(plans) => {
                tracing::debug!(user_id = %user_id, count = plans.len(), "Plans loaded");
                self.state.send_modify(|s| {
                    s.plans = plans;
                    s.is_loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => Err(self.fail("fetch plans", e)),
        }
    }

    /// The fetch pipeline for one user
    async fn run_pipeline(&self, user_id: &str) -> Result<Vec<Plan>> {
        let response = self.service.get_all_plans().await?;

        let owned: Vec<Plan> = response
            .all_plans
            .into_iter()
            .filter(|plan| plan.user_id == user_id)
            .collect();
        let unique = dedup_plans(owned);

        for event in distinct_events(&unique) {
            tracing::debug!(%event, "Plan event");
        }

        let plans: Vec<Plan> = self
            .scheduler
            .process_plans(&self.processor, unique)
            .await
            .into_iter()
            .map(MediaOutcome::into_plan)
            .collect();

        let stats = self.cache.stats();
        tracing::debug!(
            entries = stats.entries,
            hit_rate = stats.hit_rate(),
            "Thumbnail cache"
        );

        if let Some(prefetcher) = &self.prefetcher {
            // Not awaited; the tasks outlive the batch handle
            let _ = prefetcher.warm(&plans);
        }

        Ok(plans)
    }

    /// Delete a plan on the server, then drop it locally
    pub async fn delete_plan(&self, plan_id: &str) -> Result<()> {
        match self.service.delete_plans(&[plan_id.to_string()]).await {
            Ok(()) => {
                self.remove_local(plan_id);
                Ok(())
            }
            Err(e) => Err(self.fail("delete plan", e.into())),
        }
    }

    /// Delete a single event, drop its plan locally, then refresh quietly
    pub async fn delete_event(&self, event_id: &str) -> Result<()> {
        if let Err(e) = self.service.delete_event(event_id).await {
            return Err(self.fail("delete event", e.into()));
        }

        self.remove_local(event_id);

        if let Err(e) = self.refresh_plans().await {
            tracing::warn!(error = %e, "Refresh after event deletion failed");
        }
        Ok(())
    }

    /// Remove every plan of the account
    pub async fn clear_planner(&self) -> Result<()> {
        if let Err(e) = self.service.clear_planner().await {
            return Err(self.fail("clear planner", e.into()));
        }

        self.fetch_seq.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| {
            s.plans.clear();
            s.error = None;
        });
        Ok(())
    }

    /// Seed demo plans on the server and load them
    pub async fn load_mock_data(&self) -> Result<()> {
        if let Err(e) = self.service.load_mock_data().await {
            return Err(self.fail("load mock data", e.into()));
        }
        self.refresh_plans().await
    }

    /// Clear user, plans, error and the thumbnail cache
    pub fn logout(&self) {
        self.fetch_seq.fetch_add(1, Ordering::SeqCst);
        self.cache.clear();
        self.state.send_modify(|s| {
            *s = PlanState::default();
        });
        tracing::info!("Logged out");
    }

    fn remove_local(&self, plan_id: &str) {
        self.state.send_modify(|s| {
            s.plans.retain(|plan| plan.id != plan_id);
            s.error = None;
        });
    }

    fn fail(&self, operation: &str, err: PlannerError) -> PlannerError {
        let message = self.formatter.format(&err);
        tracing::error!(operation, error = %err, "Store operation failed");
        self.state.send_modify(|s| {
            s.error = Some(message);
            s.is_loading = false;
        });
        err
    }
}
