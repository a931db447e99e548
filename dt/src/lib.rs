//! DayTypes - shared model for the DayPlan client and plan service
//!
//! Everything that crosses the wire between `dp` (client) and `ds` (plan
//! service) lives here, together with the two pure steps both sides rely on:
//!
//! - [`request`] - turning untrusted form/wire input into a typed [`PlanRequest`]
//! - [`decode`] - turning raw provider text into a fully typed [`Plan`]
//!
//! # Modules
//!
//! - [`vocab`] - fixed mood and goal vocabularies
//! - [`priority`] - plan item priority (1 = High, 2 = Medium, 3 = Low)
//! - [`plan`] - plan items and the ordered plan
//! - [`wire`] - HTTP bodies and endpoint paths
//! - [`log_level`] - log level resolution for the binaries

pub mod decode;
mod json;
pub mod log_level;
pub mod plan;
pub mod priority;
pub mod request;
pub mod vocab;
pub mod wire;

pub use decode::{DecodeError, decode_plan};
pub use plan::{Plan, PlanItem};
pub use priority::Priority;
pub use request::{PlanRequest, PlanRequestBody, ValidationError};
pub use vocab::{Goal, Mood};
pub use wire::{ErrorBody, HealthResponse, PlanResponse};

/// Default port the plan service listens on
pub const DEFAULT_SERVICE_PORT: u16 = 5001;

/// Liveness probe path
pub const HEALTH_PATH: &str = "/api/health";

/// Plan generation path
pub const GENERATE_PLAN_PATH: &str = "/api/generate-plan";
