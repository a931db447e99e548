//! HTTP client for the plan service

use std::time::Duration;

use async_trait::async_trait;
use daytypes::{GENERATE_PLAN_PATH, HEALTH_PATH, HealthResponse, Plan, PlanRequest};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;

/// Longest slice of an unexpected response body kept for the error message
const MAX_BODY_SNIPPET: usize = 200;

/// Failures talking to the plan service
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Could not reach the plan service: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Plan service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Plan service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The service's own `{"error": ...}` message
    #[error("{0}")]
    Service(String),

    #[error("Invalid plan format")]
    InvalidPlanFormat,

    #[error("Plan service reported status '{0}'")]
    Unhealthy(String),

    #[error("Plan service sent an unreadable health response: {0}")]
    InvalidHealthFormat(String),

    #[error("Invalid service URL '{0}'")]
    InvalidUrl(String),
}

impl ClientError {
    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(timeout)
        } else {
            ClientError::Transport(err)
        }
    }
}

/// Something that can tell whether the plan service is up
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> Result<(), ClientError>;
}

/// Client for `/api/health` and `/api/generate-plan`
#[derive(Debug, Clone)]
pub struct PlanServiceClient {
    base_url: String,
    http: Client,
    request_timeout: Duration,
    health_timeout: Duration,
}

impl PlanServiceClient {
    pub fn new(base_url: &str, request_timeout: Duration, health_timeout: Duration) -> Result<Self, ClientError> {
        debug!(%base_url, ?request_timeout, ?health_timeout, "PlanServiceClient::new: called");
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(base_url));
        }

        let http = Client::builder().build().map_err(ClientError::Transport)?;

        Ok(Self {
            base_url,
            http,
            request_timeout,
            health_timeout,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url, config.request_timeout(), config.health_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One health check: succeeds only on HTTP 200 with `status == "healthy"`
    pub async fn check_health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        debug!(%url, "PlanServiceClient::check_health: called");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.health_timeout))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "PlanServiceClient::check_health: non-success status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: snippet(&text),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.health_timeout))?;
        let health = parse_health_response(&text)?;

        if !health.is_healthy() {
            debug!(status = %health.status, "PlanServiceClient::check_health: service not healthy");
            return Err(ClientError::Unhealthy(health.status));
        }

        debug!("PlanServiceClient::check_health: healthy");
        Ok(health)
    }

    /// Ask the service for a plan
    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<Plan, ClientError> {
        let url = format!("{}{}", self.base_url, GENERATE_PLAN_PATH);
        debug!(%url, %request.mood, "PlanServiceClient::generate_plan: called");
        info!(
            "Requesting plan: mood={}, energy={}, time={}h, goals={}",
            request.mood,
            request.energy,
            request.available_time,
            request.goals_label()
        );

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.request_timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.request_timeout))?;

        let plan = parse_plan_response(status.as_u16(), status.is_success(), &text)?;
        info!("Received plan with {} activities", plan.len());
        Ok(plan)
    }
}

#[async_trait]
impl HealthProbe for PlanServiceClient {
    async fn probe(&self) -> Result<(), ClientError> {
        self.check_health().await.map(|_| ())
    }
}

fn parse_health_response(text: &str) -> Result<HealthResponse, ClientError> {
    serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "Health response is malformed");
        ClientError::InvalidHealthFormat(snippet(text))
    })
}

/// Interpret a generate-plan response
///
/// An `error` field wins whatever the status; a success body must carry a
/// fully typed `plan` array.
fn parse_plan_response(status: u16, success: bool, text: &str) -> Result<Plan, ClientError> {
    debug!(status, success, body_len = text.len(), "parse_plan_response: called");
    let body: Option<Value> = serde_json::from_str(text).ok();

    if let Some(message) = body.as_ref().and_then(|b| b.get("error")).and_then(Value::as_str) {
        debug!(%message, "parse_plan_response: service reported an error");
        return Err(ClientError::Service(message.to_string()));
    }

    if !success {
        return Err(ClientError::Status {
            status,
            message: snippet(text),
        });
    }

    let Some(plan) = body.and_then(|mut b| b.get_mut("plan").map(Value::take)) else {
        warn!("Plan response has no plan field");
        return Err(ClientError::InvalidPlanFormat);
    };
    if !plan.is_array() {
        warn!("Plan response's plan is not an array");
        return Err(ClientError::InvalidPlanFormat);
    }

    serde_json::from_value::<Plan>(plan).map_err(|e| {
        warn!(error = %e, "Plan response items are malformed");
        ClientError::InvalidPlanFormat
    })
}

fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(empty body)".to_string();
    }
    trimmed.chars().take(MAX_BODY_SNIPPET).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use daytypes::Priority;

    const PLAN_BODY: &str = r#"{"plan":[{"time":"09:00","activity":"Deep work","description":"Focus block","duration":120,"priority":1,"completed":false}]}"#;

    #[test]
    fn test_new_rejects_bad_url() {
        let result = PlanServiceClient::new("localhost:5001", Duration::from_secs(1), Duration::from_secs(1));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = PlanServiceClient::new("http://localhost:5001/", Duration::from_secs(1), Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5001");
    }

    #[test]
    fn test_parse_success() {
        let plan = parse_plan_response(200, true, PLAN_BODY).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.get(0).unwrap().priority, Priority::High);
        assert!(!plan.get(0).unwrap().completed);
    }

    #[test]
    fn test_parse_error_field_wins() {
        let err = parse_plan_response(400, false, r#"{"error":"Mood is required"}"#).unwrap_err();
        assert!(matches!(&err, ClientError::Service(m) if m == "Mood is required"));
        assert_eq!(err.to_string(), "Mood is required");

        // Even on a 200
        let err = parse_plan_response(200, true, r#"{"error":"odd"}"#).unwrap_err();
        assert!(matches!(err, ClientError::Service(_)));
    }

    #[test]
    fn test_parse_status_without_error_field() {
        let err = parse_plan_response(500, false, "Internal Server Error").unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("Expected Status, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid_plan_format() {
        for body in [
            r#"{}"#,
            r#"{"plan":"rest all day"}"#,
            r#"{"plan":[{"time":"09:00","activity":"A"}]}"#,
            r#"{"plan":[{"time":"09:00","activity":"A","description":"a","duration":"long","priority":1}]}"#,
            "not json",
        ] {
            let err = parse_plan_response(200, true, body).unwrap_err();
            assert!(matches!(err, ClientError::InvalidPlanFormat), "body: {}", body);
            assert_eq!(err.to_string(), "Invalid plan format");
        }
    }

    #[test]
    fn test_parse_health_response() {
        let health = parse_health_response(r#"{"status":"healthy"}"#).unwrap();
        assert!(health.is_healthy());

        for body in [r#"{"message":"up"}"#, r#"{"status":1}"#, "<html>ok</html>"] {
            let err = parse_health_response(body).unwrap_err();
            assert!(matches!(err, ClientError::InvalidHealthFormat(_)), "body: {}", body);
            assert!(err.to_string().starts_with("Plan service sent an unreadable health response"));
        }
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("  "), "(empty body)");
        assert_eq!(snippet(&"x".repeat(500)).len(), MAX_BODY_SNIPPET);
    }
}
