//! DayPlan - daily planning client
//!
//! Talks to the plan service: polls its health endpoint on a fixed interval,
//! submits mood, energy, time and goals for a generated plan, and lets the
//! user tick off tasks locally.
//!
//! # Modules
//!
//! - [`api`] - HTTP client for the plan service
//! - [`health`] - periodic health monitor task
//! - [`state`] - the client state container
//! - [`tui`] - interactive terminal view
//! - [`report`] - plan output for the non-interactive `generate` command
//! - [`config`] - YAML configuration

pub mod api;
pub mod cli;
pub mod config;
pub mod health;
pub mod report;
pub mod state;
pub mod tui;

pub use api::{ClientError, HealthProbe, PlanServiceClient};
pub use config::Config;
pub use health::{HealthMonitor, HealthMonitorHandle, HealthStatus, HealthUpdate};
pub use state::{AppState, GenerateBlocked};
