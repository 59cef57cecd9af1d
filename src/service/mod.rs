//! Plan backend contract
//!
//! The store only talks to the backend through [`PlanService`]; the HTTP
//! implementation lives in [`http`].

mod http;

pub use http::HttpPlanService;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::ServiceError;
use crate::core::types::Plan;

/// Result type for backend calls
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Body of `GET /plan`: every plan across all users
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllPlansResponse {
    #[serde(rename = "allplans", alias = "allPlans", default)]
    pub all_plans: Vec<Plan>,
}

/// Operations the plan backend exposes to the client
#[async_trait]
pub trait PlanService: Send + Sync {
    /// Fetch every plan; filtering by user happens client-side
    async fn get_all_plans(&self) -> ServiceResult<AllPlansResponse>;

    /// Remove a single event
    async fn delete_event(&self, event_id: &str) -> ServiceResult<()>;

    /// Remove one or more plans by id
    async fn delete_plans(&self, plan_ids: &[String]) -> ServiceResult<()>;

    /// Remove every plan of the account
    async fn clear_planner(&self) -> ServiceResult<()>;

    /// Ask the backend to seed demo plans
    async fn load_mock_data(&self) -> ServiceResult<()>;
}
