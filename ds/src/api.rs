//! HTTP API: health probe and plan generation

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Timelike;
use daytypes::{
    ErrorBody, GENERATE_PLAN_PATH, HEALTH_PATH, HealthResponse, PlanRequestBody, PlanResponse, ValidationError,
};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::planner::{PlanError, PlanGenerator};

/// Health message reported by a running service
pub const HEALTH_MESSAGE: &str = "Plan service is running";

/// Source of the hour the schedule starts at
pub type StartHourFn = Box<dyn Fn() -> u32 + Send + Sync>;

/// Shared, immutable per-process state
pub struct ServiceState {
    generator: PlanGenerator,
    start_hour: StartHourFn,
}

impl ServiceState {
    /// State whose schedules start at the current local hour
    pub fn new(generator: PlanGenerator) -> Self {
        Self {
            generator,
            start_hour: Box::new(|| chrono::Local::now().hour()),
        }
    }

    /// Fix the start hour (useful for deterministic responses)
    pub fn with_start_hour(mut self, start_hour: impl Fn() -> u32 + Send + Sync + 'static) -> Self {
        self.start_hour = Box::new(start_hour);
        self
    }
}

/// Request failures, each rendered as `{"error": ...}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request data")]
    InvalidRequest,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to generate plan: {0}")]
    Generation(#[from] PlanError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Build the service router with CORS and request tracing
pub fn router(state: Arc<ServiceState>, cors_origins: &[String]) -> Router {
    debug!(?cors_origins, "router: called");
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(GENERATE_PLAN_PATH, post(generate_plan))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins; unparseable origins are skipped
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// `GET /api/health`; never touches the provider
async fn health() -> Json<HealthResponse> {
    debug!("health: called");
    Json(HealthResponse::healthy(HEALTH_MESSAGE))
}

/// `POST /api/generate-plan`
async fn generate_plan(
    State(state): State<Arc<ServiceState>>,
    body: Result<Json<PlanRequestBody>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
    debug!("generate_plan: called");
    let Json(body) = body.map_err(|rejection| {
        warn!(error = %rejection, "Rejected malformed plan request");
        ApiError::InvalidRequest
    })?;

    let request = body.validate().inspect_err(|e| {
        info!(error = %e, "Plan request failed validation");
    })?;

    let start_hour = (state.start_hour)();
    let plan = state
        .generator
        .generate(&request, start_hour)
        .await
        .inspect_err(|e| {
            error!(provider = state.generator.provider(), error = %e, "Plan generation failed");
        })?;

    Ok(Json(PlanResponse { plan }))
}
