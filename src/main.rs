//! Planner command-line client
//!
//! Logs in as the given user id, fetches plans and logs the derived views.
//!
//! ```text
//! planner <user-id> [config-file]
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};

use myelin_planner::core::utils::format_title;
use myelin_planner::logging::{init_logging, LoggingConfig};
use myelin_planner::media::{HttpImagePrefetcher, RemoteThumbnailGenerator};
use myelin_planner::plan::saved_events;
use myelin_planner::{AppConfig, HttpPlanService, PlanAggregator, PlanStore, User};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let user_id = match args.next() {
        Some(id) => id,
        None => bail!("usage: planner <user-id> [config-file]"),
    };
    let config_path = args.next().map(PathBuf::from).or_else(|| {
        let path = AppConfig::default_path();
        path.exists().then_some(path)
    });

    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    let logging_config = if cfg!(debug_assertions) {
        LoggingConfig::development()
    } else {
        config.logging.clone()
    };
    // Keep the guard alive so file output is flushed on exit
    let _logging = init_logging(logging_config);

    tracing::info!(base_url = %config.service.base_url, "Starting planner");

    let timeout = Duration::from_millis(config.service.timeout_ms);
    let service = HttpPlanService::new(&config.service).context("Failed to create plan service")?;

    let mut builder = PlanStore::builder(Arc::new(service)).media_config(config.media.clone());
    if let Some(endpoint) = &config.media.thumbnail_endpoint {
        let generator = RemoteThumbnailGenerator::new(endpoint, timeout)
            .context("Failed to create thumbnail generator")?;
        builder = builder.thumbnail_generator(Arc::new(generator));
    }
    if config.media.prefetch_enabled {
        let prefetcher =
            HttpImagePrefetcher::new(timeout).context("Failed to create image prefetcher")?;
        builder = builder.image_prefetcher(Arc::new(prefetcher));
    }
    let store = builder.build();

    store.set_user(User::new(user_id));
    if let Err(e) = store.fetch_plans().await {
        let message = store.snapshot().error.unwrap_or_else(|| e.to_string());
        bail!("Could not load plans: {}", message);
    }

    let plans = store.plans();
    let aggregator = PlanAggregator::default();

    let upcoming = aggregator.upcoming_summary(&plans);
    if let Some(days) = upcoming.nearest_expiry {
        tracing::info!(days, "Next plan expires soon");
    }
    for group in &upcoming.plans {
        tracing::info!(
            title = %group.title,
            day = %group.day,
            expires_in = group.expiry_days,
            likes = group.likes,
            amount = group.amount_paid,
            media = group.media.len(),
            "Upcoming plan"
        );
    }
    if upcoming.show_see_all {
        tracing::info!(total = upcoming.plans.len(), "More plans available");
    }

    for days in aggregator.upcoming_expiry_days(&plans) {
        let quick = aggregator.quick_plans_expiring_in(&plans, days);
        if !quick.is_empty() {
            tracing::info!(days, count = quick.len(), "Quick plans expiring");
        }
    }

    for month in aggregator.by_month(&plans) {
        for group in &month.plans {
            let details = group.event_details();
            tracing::info!(
                month = %month.label,
                plan = %format_title(&group.plan_type),
                event = details.as_ref().map(|d| d.title.as_str()).unwrap_or(""),
                events = details.as_ref().map(|d| d.event_count).unwrap_or(0),
                "Calendar entry"
            );
        }
    }

    let saved = saved_events(&plans);
    tracing::info!(
        total_events = saved.total_events,
        photos = saved.photos.len(),
        "Saved events"
    );

    Ok(())
}
