//! Plan requests and input validation

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::json::{as_integer, as_number};
use crate::vocab::{Goal, Mood};

pub const MIN_ENERGY: u8 = 1;
pub const MAX_ENERGY: u8 = 5;
pub const MIN_AVAILABLE_HOURS: f64 = 0.5;
pub const MAX_AVAILABLE_HOURS: f64 = 24.0;

/// Input problems, worded for display to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Mood is required")]
    MissingMood,

    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    #[error("Energy is required")]
    MissingEnergy,

    #[error("Energy level must be between 1 and 5")]
    EnergyOutOfRange,

    #[error("Available time is required")]
    MissingAvailableTime,

    #[error("Available time must be between 0.5 and 24 hours")]
    AvailableTimeOutOfRange,

    #[error("At least one goal is required")]
    MissingGoals,

    #[error("Unknown goal: {0}")]
    UnknownGoal(String),
}

/// A request for a plan
///
/// Deserializing goes through [`PlanRequestBody::validate`], so a decoded
/// request always satisfies every range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlanRequestBody")]
pub struct PlanRequest {
    pub mood: Mood,
    pub energy: u8,
    /// Hours
    pub available_time: f64,
    pub goals: BTreeSet<Goal>,
}

impl PlanRequest {
    /// Build a request, checking every range
    pub fn new(
        mood: Mood,
        energy: u8,
        available_time: f64,
        goals: impl IntoIterator<Item = Goal>,
    ) -> Result<Self, ValidationError> {
        let goals: BTreeSet<Goal> = goals.into_iter().collect();
        check_energy(i64::from(energy))?;
        check_available_time(available_time)?;
        if goals.is_empty() {
            return Err(ValidationError::MissingGoals);
        }
        Ok(Self {
            mood,
            energy,
            available_time,
            goals,
        })
    }

    /// Assemble a request from form input without range or goal checks
    ///
    /// The client only insists on a mood; the service reports anything else.
    pub fn from_form(mood: Mood, energy: u8, available_time: f64, goals: impl IntoIterator<Item = Goal>) -> Self {
        Self {
            mood,
            energy,
            available_time,
            goals: goals.into_iter().collect(),
        }
    }

    /// Time budget in whole minutes
    pub fn minute_budget(&self) -> u32 {
        (self.available_time * 60.0).round() as u32
    }

    /// Goals joined for prose, e.g. "work, exercise"
    pub fn goals_label(&self) -> String {
        self.goals.iter().map(|g| g.as_str()).collect::<Vec<_>>().join(", ")
    }
}

/// A plan request exactly as it arrived over the wire
///
/// Every field is optional and loosely typed so that validation, not
/// deserialization, decides what the user is told.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanRequestBody {
    #[serde(default)]
    pub mood: Option<String>,

    #[serde(default)]
    pub energy: Option<Value>,

    #[serde(default)]
    pub available_time: Option<Value>,

    #[serde(default)]
    pub goals: Option<Vec<String>>,
}

impl PlanRequestBody {
    /// Validate into a typed request, reporting the first problem found
    pub fn validate(self) -> Result<PlanRequest, ValidationError> {
        debug!(?self, "PlanRequestBody::validate: called");

        let mood: Mood = match self.mood.as_deref().map(str::trim) {
            None | Some("") => return Err(ValidationError::MissingMood),
            Some(m) => m.parse()?,
        };

        let energy_value = self.energy.ok_or(ValidationError::MissingEnergy)?;
        let energy = as_integer(&energy_value).ok_or(ValidationError::EnergyOutOfRange)?;
        check_energy(energy)?;

        let time_value = self.available_time.ok_or(ValidationError::MissingAvailableTime)?;
        let available_time = as_number(&time_value).ok_or(ValidationError::AvailableTimeOutOfRange)?;
        check_available_time(available_time)?;

        let raw_goals = self.goals.unwrap_or_default();
        if raw_goals.is_empty() {
            return Err(ValidationError::MissingGoals);
        }
        let goals = raw_goals
            .iter()
            .map(|g| g.parse::<Goal>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        debug!(%mood, energy, available_time, goal_count = goals.len(), "PlanRequestBody::validate: ok");
        Ok(PlanRequest {
            mood,
            energy: energy as u8,
            available_time,
            goals,
        })
    }
}

impl TryFrom<PlanRequestBody> for PlanRequest {
    type Error = ValidationError;

    fn try_from(body: PlanRequestBody) -> Result<Self, Self::Error> {
        body.validate()
    }
}

impl From<&PlanRequest> for PlanRequestBody {
    fn from(request: &PlanRequest) -> Self {
        Self {
            mood: Some(request.mood.to_string()),
            energy: Some(Value::from(request.energy)),
            available_time: Some(Value::from(request.available_time)),
            goals: Some(request.goals.iter().map(|g| g.to_string()).collect()),
        }
    }
}

fn check_energy(energy: i64) -> Result<(), ValidationError> {
    if (i64::from(MIN_ENERGY)..=i64::from(MAX_ENERGY)).contains(&energy) {
        Ok(())
    } else {
        Err(ValidationError::EnergyOutOfRange)
    }
}

fn check_available_time(hours: f64) -> Result<(), ValidationError> {
    if (MIN_AVAILABLE_HOURS..=MAX_AVAILABLE_HOURS).contains(&hours) {
        Ok(())
    } else {
        Err(ValidationError::AvailableTimeOutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> PlanRequestBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_validate_accepts_well_formed_body() {
        let request = body(json!({
            "mood": "focused",
            "energy": 4,
            "available_time": 8,
            "goals": ["work", "exercise"]
        }))
        .validate()
        .unwrap();

        assert_eq!(request.mood, Mood::Focused);
        assert_eq!(request.energy, 4);
        assert_eq!(request.available_time, 8.0);
        assert_eq!(request.goals_label(), "work, exercise");
        assert_eq!(request.minute_budget(), 480);
    }

    #[test]
    fn test_validate_coerces_strings() {
        let request = body(json!({
            "mood": "Calm",
            "energy": "2",
            "available_time": "1.5",
            "goals": ["Study"]
        }))
        .validate()
        .unwrap();

        assert_eq!(request.energy, 2);
        assert_eq!(request.minute_budget(), 90);
    }

    #[test]
    fn test_validate_missing_fields() {
        let full = json!({"mood": "happy", "energy": 3, "available_time": 2, "goals": ["work"]});

        let mut v = full.clone();
        v.as_object_mut().unwrap().remove("mood");
        assert_eq!(body(v).validate(), Err(ValidationError::MissingMood));

        let mut v = full.clone();
        v.as_object_mut().unwrap().remove("energy");
        assert_eq!(body(v).validate(), Err(ValidationError::MissingEnergy));

        let mut v = full.clone();
        v.as_object_mut().unwrap().remove("available_time");
        assert_eq!(body(v).validate(), Err(ValidationError::MissingAvailableTime));

        let mut v = full;
        v["goals"] = json!([]);
        assert_eq!(body(v).validate(), Err(ValidationError::MissingGoals));
    }

    #[test]
    fn test_validate_ranges() {
        let out_of_range = body(json!({"mood": "happy", "energy": 6, "available_time": 2, "goals": ["work"]}));
        assert_eq!(out_of_range.validate(), Err(ValidationError::EnergyOutOfRange));

        let fractional = body(json!({"mood": "happy", "energy": 2.5, "available_time": 2, "goals": ["work"]}));
        assert_eq!(fractional.validate(), Err(ValidationError::EnergyOutOfRange));

        let too_long = body(json!({"mood": "happy", "energy": 3, "available_time": 30, "goals": ["work"]}));
        assert_eq!(too_long.validate(), Err(ValidationError::AvailableTimeOutOfRange));

        let too_short = body(json!({"mood": "happy", "energy": 3, "available_time": 0.25, "goals": ["work"]}));
        assert_eq!(too_short.validate(), Err(ValidationError::AvailableTimeOutOfRange));
    }

    #[test]
    fn test_validate_unknown_vocabulary() {
        let mood = body(json!({"mood": "grumpy", "energy": 3, "available_time": 2, "goals": ["work"]}));
        assert_eq!(mood.validate(), Err(ValidationError::UnknownMood("grumpy".to_string())));

        let goal = body(json!({"mood": "happy", "energy": 3, "available_time": 2, "goals": ["napping"]}));
        assert_eq!(goal.validate(), Err(ValidationError::UnknownGoal("napping".to_string())));
    }

    #[test]
    fn test_new_rejects_bad_ranges() {
        assert_eq!(
            PlanRequest::new(Mood::Happy, 0, 2.0, [Goal::Work]),
            Err(ValidationError::EnergyOutOfRange)
        );
        assert_eq!(
            PlanRequest::new(Mood::Happy, 3, 2.0, []),
            Err(ValidationError::MissingGoals)
        );
    }

    #[test]
    fn test_request_wire_shape() {
        let request = PlanRequest::new(Mood::Focused, 4, 8.0, [Goal::Exercise, Goal::Work]).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["mood"], "focused");
        assert_eq!(json["energy"], 4);
        assert_eq!(json["available_time"], 8.0);
        assert_eq!(json["goals"], json!(["work", "exercise"]));
    }

    #[test]
    fn test_deserialize_request_checks_ranges() {
        let ok: PlanRequest =
            serde_json::from_value(json!({"mood": "happy", "energy": 3, "available_time": 2, "goals": ["work"]})).unwrap();
        assert_eq!(ok.energy, 3);

        let err = serde_json::from_value::<PlanRequest>(json!({"mood": "happy", "energy": 9, "available_time": 2, "goals": ["work"]}))
            .unwrap_err();
        assert!(err.to_string().contains("Energy level must be between 1 and 5"), "{}", err);

        let err = serde_json::from_value::<PlanRequest>(json!({"mood": "happy", "energy": 3, "available_time": 2, "goals": []}))
            .unwrap_err();
        assert!(err.to_string().contains("At least one goal is required"), "{}", err);
    }

    #[test]
    fn test_from_form_skips_checks() {
        let request = PlanRequest::from_form(Mood::Calm, 3, 2.0, []);
        assert!(request.goals.is_empty());
        assert_eq!(
            PlanRequestBody::from(&request).validate(),
            Err(ValidationError::MissingGoals)
        );
    }

    #[test]
    fn test_body_from_request_validates_back() {
        let request = PlanRequest::new(Mood::Tired, 1, 0.5, [Goal::Relaxation]).unwrap();
        let body = PlanRequestBody::from(&request);
        assert_eq!(body.validate().unwrap(), request);
    }
}
