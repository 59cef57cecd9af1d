//! HTTP implementation of the plan backend contract

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use super::{AllPlansResponse, PlanService, ServiceResult};
use crate::core::config::ServiceConfig;
use crate::core::error::ServiceError;

/// Error body the backend sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// reqwest-backed plan service
pub struct HttpPlanService {
    client: Client,
    base_url: Url,
    auth_token: Option<SecretString>,
}

impl HttpPlanService {
    /// Build a service from configuration
    pub fn new(config: &ServiceConfig) -> ServiceResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ServiceError::InvalidRequest {
            reason: format!("Invalid base URL {}: {}", config.base_url, e),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ServiceError::InvalidRequest {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            auth_token: config.auth_token.clone(),
        })
    }

    /// Replace the bearer token after login
    pub fn with_auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    /// Resolve an API path against the base URL, keeping any base path prefix
    pub(crate) fn endpoint(&self, path: &str) -> ServiceResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ServiceError::InvalidRequest {
            reason: format!("Invalid endpoint {}: {}", joined, e),
        })
    }

    fn request(&self, method: Method, path: &str) -> ServiceResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> ServiceResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status.as_u16(), &body))
    }
}

/// Map a failed response to a service error, keeping the server's message
pub(crate) fn status_error(status: u16, body: &str) -> ServiceError {
    if status == 401 {
        return ServiceError::Unauthorized;
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_default();

    ServiceError::Status { status, message }
}

#[async_trait]
impl PlanService for HttpPlanService {
    async fn get_all_plans(&self) -> ServiceResult<AllPlansResponse> {
        let response = self.send(self.request(Method::GET, "plan")?).await?;
        let body = response.text().await?;
        let plans: AllPlansResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::Decode {
                reason: e.to_string(),
            })?;
        tracing::debug!(count = plans.all_plans.len(), "Fetched plans");
        Ok(plans)
    }

    async fn delete_event(&self, event_id: &str) -> ServiceResult<()> {
        let path = format!("plan/event/{}", event_id);
        self.send(self.request(Method::DELETE, &path)?).await?;
        Ok(())
    }

    async fn delete_plans(&self, plan_ids: &[String]) -> ServiceResult<()> {
        let builder = self
            .request(Method::DELETE, "plan")?
            .json(&json!({ "plans": plan_ids }));
        self.send(builder).await?;
        Ok(())
    }

    async fn clear_planner(&self) -> ServiceResult<()> {
        self.send(self.request(Method::DELETE, "plan/clear-planner")?)
            .await?;
        Ok(())
    }

    async fn load_mock_data(&self) -> ServiceResult<()> {
        self.send(self.request(Method::GET, "plan/load-data")?).await?;
        Ok(())
    }
}
