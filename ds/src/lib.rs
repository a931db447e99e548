//! DayServe - DayPlan plan service
//!
//! An HTTP service with two endpoints: a health probe and a plan generator
//! that forwards mood, energy, time and goals to a generative-AI provider and
//! strictly decodes the answer into a typed plan.
//!
//! # Modules
//!
//! - [`api`] - axum router, handlers and error responses
//! - [`planner`] - prompt, provider call and decode for one request
//! - [`prompt`] - Handlebars plan prompt
//! - [`llm`] - provider clients (Gemini, OpenAI) behind [`llm::LlmClient`]
//! - [`retry`] - exponential backoff for transient provider failures
//! - [`server`] - startup and graceful shutdown
//! - [`config`] - YAML configuration

pub mod api;
pub mod cli;
pub mod config;
pub mod llm;
pub mod planner;
pub mod prompt;
pub mod retry;
pub mod server;

pub use api::{ApiError, ServiceState, router};
pub use config::Config;
pub use planner::{PlanError, PlanGenerator};
pub use prompt::PromptRenderer;
