//! Myelin planner - client-side plan store and media pipeline
//!
//! This crate provides:
//! - A reactive plan store (fetch, refresh, delete, logout)
//! - Per-user filtering and deduplication of plans
//! - Batched video thumbnailing with a shared URI cache
//! - Image cache warming for the first screen
//! - Grouped view models (upcoming, calendar, quick plans, plan events)
//! - Structured logging and layered configuration

pub mod core;
pub mod logging;
pub mod media;
pub mod plan;
pub mod service;
pub mod store;

// Re-export commonly used items
pub use core::config::AppConfig;
pub use core::error::{DefaultErrorFormatter, ErrorFormatter, PlannerError, Result};
pub use core::types::{Plan, User};
pub use media::{MediaCache, ThumbnailGenerator};
pub use plan::{AggregatedPlan, PlanAggregator};
pub use service::{HttpPlanService, PlanService};
pub use store::{PlanState, PlanStore};
