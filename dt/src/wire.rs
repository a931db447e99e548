//! HTTP bodies shared by the service and the client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::Plan;

/// Status string of a healthy service
pub const HEALTHY: &str = "healthy";

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl HealthResponse {
    /// A healthy response stamped with the current time
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: HEALTHY.to_string(),
            message: message.into(),
            timestamp: Some(Utc::now()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }
}

/// Body of a successful `POST /api/generate-plan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: Plan,
}

/// Body of every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
