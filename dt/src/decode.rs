//! Strict decoding of provider output into a [`Plan`]
//!
//! The provider is asked for a bare JSON array, but models wrap answers in
//! prose or markdown fences often enough that the array is located first.
//! After that nothing is forgiven: one malformed activity fails the whole
//! decode so a partially typed plan can never reach the client.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::json::as_integer;
use crate::plan::{Plan, PlanItem};
use crate::priority::Priority;

/// Why provider text could not become a plan
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Empty response from provider")]
    Empty,

    #[error("Invalid response format: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response format: expected a JSON array of activities")]
    NotAnArray,

    #[error("No activities in response")]
    NoActivities,

    #[error("Invalid activity at index {index}: {reason}")]
    InvalidItem { index: usize, reason: String },
}

/// Decode raw provider text into a fully typed plan
///
/// Every returned item has `completed == false`, whatever the provider said.
pub fn decode_plan(raw: &str) -> Result<Plan, DecodeError> {
    debug!(raw_len = raw.len(), "decode_plan: called");
    let text = strip_code_fence(raw.trim());
    if text.is_empty() {
        debug!("decode_plan: empty text");
        return Err(DecodeError::Empty);
    }

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "decode_plan: whole text is not JSON, looking for an array");
            let Some(slice) = extract_array(text) else {
                return Err(DecodeError::Json(e));
            };
            serde_json::from_str(slice)?
        }
    };

    let Value::Array(elements) = value else {
        debug!("decode_plan: top-level value is not an array");
        return Err(DecodeError::NotAnArray);
    };
    if elements.is_empty() {
        return Err(DecodeError::NoActivities);
    }

    let items = elements
        .iter()
        .enumerate()
        .map(|(index, element)| decode_item(index, element))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = items.len(), "decode_plan: decoded");
    Ok(Plan::new(items))
}

/// Drop a surrounding ```json ... ``` fence if present
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the info string ("json") on the opening line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Slice from the first '[' to the last ']'
fn extract_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

fn decode_item(index: usize, value: &Value) -> Result<PlanItem, DecodeError> {
    let invalid = |reason: String| DecodeError::InvalidItem { index, reason };

    let obj = value
        .as_object()
        .ok_or_else(|| invalid("expected an object".to_string()))?;

    let time = required_str(obj, "time").map_err(invalid)?;
    let activity = required_str(obj, "activity").map_err(invalid)?;
    let description = required_str(obj, "description").map_err(invalid)?;

    if activity.trim().is_empty() {
        return Err(invalid("activity is empty".to_string()));
    }

    let duration = required(obj, "duration").map_err(invalid)?;
    let duration = as_integer(duration)
        .filter(|d| *d > 0)
        .and_then(|d| u32::try_from(d).ok())
        .ok_or_else(|| invalid(format!("duration must be a positive integer, got {}", duration)))?;

    let priority = required(obj, "priority").map_err(invalid)?;
    let priority = as_integer(priority)
        .map(Priority::clamped)
        .ok_or_else(|| invalid(format!("priority must be an integer, got {}", priority)))?;

    Ok(PlanItem::new(time, activity, description, duration, priority))
}

fn required<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value, String> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(format!("missing field '{}'", field)),
        Some(value) => Ok(value),
    }
}

fn required_str(obj: &Map<String, Value>, field: &str) -> Result<String, String> {
    required(obj, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("field '{}' must be a string", field))
}
