//! Plan prompt rendering
//!
//! The prompt is a Handlebars template. The embedded `prompts/plan.pmt` is used
//! unless `plan.prompt-path` points at an override.

use std::path::Path;

use daytypes::PlanRequest;
use eyre::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

/// Embedded default plan prompt
pub const PLAN_TEMPLATE: &str = include_str!("../prompts/plan.pmt");

const TEMPLATE_NAME: &str = "plan";

/// Values available to the plan template
#[derive(Debug, Clone, Serialize)]
pub struct PlanPromptContext {
    pub mood: String,
    pub energy: u8,
    /// Hours, rendered without a trailing ".0"
    pub available_time: String,
    /// Comma separated goal labels
    pub goals: String,
    /// Zero padded, e.g. "09"
    pub start_hour: String,
    pub minute_budget: u32,
}

impl PlanPromptContext {
    pub fn new(request: &PlanRequest, start_hour: u32) -> Self {
        debug!(%request.mood, start_hour, "PlanPromptContext::new: called");
        Self {
            mood: request.mood.to_string(),
            energy: request.energy,
            available_time: request.available_time.to_string(),
            goals: request.goals_label(),
            start_hour: format!("{:02}", start_hour % 24),
            minute_budget: request.minute_budget(),
        }
    }
}

/// Renders plan prompts from a pre-compiled template
pub struct PromptRenderer {
    hbs: Handlebars<'static>,
}

impl PromptRenderer {
    /// Renderer over the embedded template
    pub fn embedded() -> Result<Self> {
        debug!("PromptRenderer::embedded: called");
        Self::from_template(PLAN_TEMPLATE)
    }

    /// Renderer over the override file when given, the embedded template otherwise
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        debug!(?override_path, "PromptRenderer::load: called");
        match override_path {
            Some(path) => {
                let template = std::fs::read_to_string(path)
                    .context(format!("Failed to read prompt template {}", path.display()))?;
                info!("Using plan prompt from {}", path.display());
                Self::from_template(&template)
            }
            None => Self::embedded(),
        }
    }

    /// Compile a template; syntax errors surface here rather than per request
    pub fn from_template(template: &str) -> Result<Self> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.register_template_string(TEMPLATE_NAME, template)
            .context("Failed to compile plan prompt template")?;
        Ok(Self { hbs })
    }

    /// Render the prompt for one request
    pub fn render(&self, context: &PlanPromptContext) -> Result<String, handlebars::RenderError> {
        debug!(?context, "PromptRenderer::render: called");
        self.hbs.render(TEMPLATE_NAME, context)
    }
}
