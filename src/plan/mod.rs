//! Plan list shaping
//!
//! Pure functions over plan slices:
//! - [`dedup_plans`]: one plan per (type, raw date)
//! - [`PlanAggregator`]: day/month grouping, expiry views and media listings
//! - [`event_details`] / [`saved_events`]: card contents and totals

pub mod aggregate;
pub mod dedup;
pub mod details;

#[cfg(test)]
mod tests;

pub use aggregate::{
    expiry_days, group_key, AggregatedPlan, MediaItem, MonthGroup, PlanAggregator, UpcomingPlans,
    QUICK_PLAN_TYPE, SEE_ALL_THRESHOLD,
};
pub use dedup::dedup_plans;
pub use details::{distinct_events, event_details, saved_events, EventDetails, SavedEvents};
