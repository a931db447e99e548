//! Client state container
//!
//! All mutable client state lives in [`AppState`]. Inputs, health updates and
//! generation results arrive as method calls; nothing else mutates it.

use std::collections::BTreeSet;

use chrono::{DateTime, Local};
use daytypes::request::{MAX_AVAILABLE_HOURS, MAX_ENERGY, MIN_AVAILABLE_HOURS, MIN_ENERGY};
use daytypes::{Goal, Mood, Plan, PlanRequest, ValidationError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::ClientError;
use crate::health::{HealthStatus, HealthUpdate};

pub const DEFAULT_ENERGY: u8 = 3;
pub const DEFAULT_AVAILABLE_HOURS: f64 = 8.0;

/// Why a generate action was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateBlocked {
    #[error("A plan is already being generated")]
    Loading,

    #[error("Plan service is not connected")]
    ServiceUnavailable,

    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

/// Everything the client shows and edits
#[derive(Debug, Clone)]
pub struct AppState {
    /// Latest health verdict
    pub health: HealthStatus,
    /// Reason for the latest failed check
    pub health_message: Option<String>,
    pub last_health_check: Option<DateTime<Local>>,

    pub mood: Option<Mood>,
    pub energy: u8,
    /// Hours
    pub available_time: f64,
    pub goals: BTreeSet<Goal>,

    /// Current plan; cleared when a generation fails
    pub plan: Option<Plan>,
    /// Single user-facing error message
    pub error: Option<String>,
    /// A generation request is in flight
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            health: HealthStatus::Checking,
            health_message: None,
            last_health_check: None,
            mood: None,
            energy: DEFAULT_ENERGY,
            available_time: DEFAULT_AVAILABLE_HOURS,
            goals: BTreeSet::new(),
            plan: None,
            error: None,
            loading: false,
        }
    }

    pub fn select_mood(&mut self, mood: Mood) {
        debug!(%mood, "AppState::select_mood: called");
        self.mood = Some(mood);
    }

    /// Set energy, clamped into 1..=5
    pub fn set_energy(&mut self, energy: u8) {
        self.energy = energy.clamp(MIN_ENERGY, MAX_ENERGY);
        debug!(energy = self.energy, "AppState::set_energy: called");
    }

    /// Set available hours, clamped into 0.5..=24
    pub fn set_available_time(&mut self, hours: f64) {
        if hours.is_nan() {
            return;
        }
        self.available_time = hours.clamp(MIN_AVAILABLE_HOURS, MAX_AVAILABLE_HOURS);
        debug!(available_time = self.available_time, "AppState::set_available_time: called");
    }

    /// Add the goal if absent, remove it if present
    pub fn toggle_goal(&mut self, goal: Goal) {
        if !self.goals.remove(&goal) {
            self.goals.insert(goal);
        }
        debug!(%goal, selected = self.goals.contains(&goal), "AppState::toggle_goal: called");
    }

    /// Whether a generate action would be accepted right now
    pub fn can_generate(&self) -> bool {
        self.check_generate().is_ok()
    }

    fn check_generate(&self) -> Result<PlanRequest, GenerateBlocked> {
        if self.loading {
            return Err(GenerateBlocked::Loading);
        }
        let mood = self.mood.ok_or(ValidationError::MissingMood)?;
        if self.health != HealthStatus::Connected {
            return Err(GenerateBlocked::ServiceUnavailable);
        }
        Ok(PlanRequest::from_form(
            mood,
            self.energy,
            self.available_time,
            self.goals.iter().copied(),
        ))
    }

    /// Start a generation: checks preconditions, marks loading, clears the error
    ///
    /// On refusal the reason is also stored as the error message, except when a
    /// request is already in flight.
    pub fn begin_generate(&mut self) -> Result<PlanRequest, GenerateBlocked> {
        debug!(loading = self.loading, health = ?self.health, "AppState::begin_generate: called");
        match self.check_generate() {
            Ok(request) => {
                self.loading = true;
                self.error = None;
                Ok(request)
            }
            Err(GenerateBlocked::Loading) => Err(GenerateBlocked::Loading),
            Err(blocked) => {
                self.error = Some(blocked.to_string());
                Err(blocked)
            }
        }
    }

    /// Apply the outcome of a generation
    pub fn finish_generate(&mut self, result: Result<Plan, ClientError>) {
        debug!(ok = result.is_ok(), "AppState::finish_generate: called");
        self.loading = false;
        match result {
            Ok(plan) => {
                info!("Plan ready with {} activities", plan.len());
                self.plan = Some(plan);
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, "Plan generation failed");
                self.plan = None;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Flip completion of one plan item; no-op without a plan or out of range
    pub fn toggle_complete(&mut self, index: usize) -> bool {
        match self.plan.as_mut() {
            Some(plan) => plan.toggle_complete(index),
            None => {
                debug!(index, "AppState::toggle_complete: no plan");
                false
            }
        }
    }

    /// Record the result of a health check
    pub fn apply_health(&mut self, update: HealthUpdate) {
        debug!(status = ?update.status, "AppState::apply_health: called");
        self.health = update.status;
        self.health_message = update.message;
        self.last_health_check = Some(update.checked_at);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
