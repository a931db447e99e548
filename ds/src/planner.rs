//! Plan generation: prompt, provider call, strict decode

use std::sync::Arc;

use daytypes::{DecodeError, Plan, PlanRequest, decode_plan};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{LlmConfig, PlanConfig};
use crate::llm::{CompletionRequest, LlmClient, LlmError, StopReason};
use crate::prompt::{PlanPromptContext, PromptRenderer};
use crate::retry::{RetryPolicy, with_retry};

/// Framing sent alongside every plan prompt
const SYSTEM_PROMPT: &str = "You plan realistic days and reply with machine-readable JSON only.";

/// Why a plan could not be produced
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Prompt rendering failed: {0}")]
    Prompt(#[from] handlebars::RenderError),

    #[error("{0}")]
    Provider(#[from] LlmError),

    #[error("{0}")]
    Decode(#[from] DecodeError),
}

/// Turns validated requests into plans
pub struct PlanGenerator {
    llm: Arc<dyn LlmClient>,
    prompts: PromptRenderer,
    retry: RetryPolicy,
    max_tokens: u32,
    retime_items: bool,
}

impl PlanGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptRenderer) -> Self {
        let defaults = LlmConfig::default();
        Self {
            llm,
            prompts,
            retry: RetryPolicy::from(&defaults.retry),
            max_tokens: defaults.max_tokens,
            retime_items: false,
        }
    }

    /// Generator configured from the service's `llm` and `plan` sections
    pub fn from_config(llm: Arc<dyn LlmClient>, prompts: PromptRenderer, llm_config: &LlmConfig, plan: &PlanConfig) -> Self {
        Self::new(llm, prompts)
            .with_retry(RetryPolicy::from(&llm_config.retry))
            .with_max_tokens(llm_config.max_tokens)
            .with_retime(plan.retime_items)
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_retime(mut self, retime_items: bool) -> Self {
        self.retime_items = retime_items;
        self
    }

    /// Generate a plan starting at `start_hour:00`
    ///
    /// Provider calls are retried per the retry policy; a response that does
    /// not decode is never retried.
    pub async fn generate(&self, request: &PlanRequest, start_hour: u32) -> Result<Plan, PlanError> {
        debug!(%request.mood, request.energy, request.available_time, start_hour, "PlanGenerator::generate: called");
        let prompt = self.prompts.render(&PlanPromptContext::new(request, start_hour))?;

        info!(
            "Generating plan: mood={}, energy={}, time={}h, goals={}",
            request.mood,
            request.energy,
            request.available_time,
            request.goals_label()
        );

        let llm = self.llm.clone();
        let max_tokens = self.max_tokens;
        let response = with_retry(&self.retry, || {
            let llm = llm.clone();
            let completion = CompletionRequest::new(SYSTEM_PROMPT, prompt.clone(), max_tokens);
            async move { llm.complete(completion).await }
        })
        .await?;

        debug!(stop_reason = ?response.stop_reason, usage = ?response.usage, "PlanGenerator::generate: provider answered");
        match response.stop_reason {
            StopReason::MaxTokens => warn!("Provider hit the token limit; the plan may be truncated"),
            StopReason::Safety => warn!("Provider stopped for safety reasons"),
            _ => {}
        }

        let content = response.content.ok_or(DecodeError::Empty)?;
        let mut plan = decode_plan(&content).inspect_err(|e| {
            warn!(error = %e, "Provider output did not decode into a plan");
            debug!(%content, "PlanGenerator::generate: undecodable output");
        })?;

        if self.retime_items {
            debug!(start_hour, "PlanGenerator::generate: retiming items");
            plan.retime_from(start_hour);
        }

        let budget = request.minute_budget();
        let total = plan.total_minutes();
        if total > budget {
            warn!(total, budget, "Plan exceeds the available time");
        }

        info!("Generated plan with {} activities ({} min)", plan.len(), total);
        Ok(plan)
    }

    pub fn provider(&self) -> &str {
        self.llm.provider()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;
    use daytypes::{Goal, Mood, Priority};
    use std::time::Duration;

    const ONE_ITEM: &str =
        r#"[{"time":"09:00","activity":"Deep work","description":"Focus block","duration":120,"priority":1}]"#;

    fn request() -> PlanRequest {
        PlanRequest::new(Mood::Focused, 4, 8.0, [Goal::Work, Goal::Exercise]).unwrap()
    }

    fn generator(mock: Arc<MockLlmClient>) -> PlanGenerator {
        PlanGenerator::new(mock, PromptRenderer::embedded().unwrap())
            .with_retry(RetryPolicy::new(1, Duration::from_millis(10)))
    }

    #[tokio::test]
    async fn test_generate_decodes_provider_output() {
        let mock = Arc::new(MockLlmClient::with_text(ONE_ITEM, 1));
        let plan = generator(mock.clone()).generate(&request(), 9).await.unwrap();

        assert_eq!(plan.len(), 1);
        let item = plan.get(0).unwrap();
        assert_eq!(item.activity, "Deep work");
        assert_eq!(item.priority, Priority::High);
        assert!(!item.completed);
        assert_eq!(mock.call_count(), 1);

        let prompts = mock.prompts();
        assert!(prompts[0].contains("feels focused"));
        assert!(prompts[0].contains("starts at 09:00"));
    }

    #[tokio::test]
    async fn test_generate_rejects_prose() {
        let mock = Arc::new(MockLlmClient::with_text("Sorry, I cannot do that.", 2));
        let err = generator(mock.clone()).generate(&request(), 9).await.unwrap_err();

        assert!(matches!(err, PlanError::Decode(DecodeError::Json(_))));
        // Decode failures are not retried
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_rejects_missing_duration() {
        let raw = r#"[{"time":"09:00","activity":"A","description":"a","priority":1}]"#;
        let mock = Arc::new(MockLlmClient::with_text(raw, 1));
        let err = generator(mock).generate(&request(), 9).await.unwrap_err();

        assert!(matches!(err, PlanError::Decode(DecodeError::InvalidItem { index: 0, .. })));
    }

    #[tokio::test]
    async fn test_generate_empty_content() {
        let mock = Arc::new(MockLlmClient::new(vec![Ok(CompletionResponse::default())]));
        let err = generator(mock).generate(&request(), 9).await.unwrap_err();
        assert!(matches!(err, PlanError::Decode(DecodeError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_retries_transient_provider_error() {
        let mock = Arc::new(MockLlmClient::new(vec![
            Err(LlmError::ApiError {
                status: 503,
                message: "overloaded".to_string(),
            }),
            Ok(CompletionResponse::text(ONE_ITEM)),
        ]));
        let plan = generator(mock.clone()).generate(&request(), 9).await.unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_generate_surfaces_permanent_provider_error() {
        let mock = Arc::new(MockLlmClient::new(vec![Err(LlmError::ApiError {
            status: 403,
            message: "API key not valid".to_string(),
        })]));
        let err = generator(mock.clone()).generate(&request(), 9).await.unwrap_err();

        assert!(matches!(err, PlanError::Provider(LlmError::ApiError { status: 403, .. })));
        assert!(err.to_string().contains("API key not valid"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_retimes_when_enabled() {
        let raw = r#"[
            {"time":"07:00","activity":"A","description":"a","duration":45,"priority":1},
            {"time":"07:00","activity":"B","description":"b","duration":30,"priority":2}
        ]"#;
        let mock = Arc::new(MockLlmClient::with_text(raw, 1));
        let plan = generator(mock).with_retime(true).generate(&request(), 14).await.unwrap();

        let times: Vec<&str> = plan.iter().map(|i| i.time.as_str()).collect();
        assert_eq!(times, vec!["14:00", "14:45"]);
    }

    #[tokio::test]
    async fn test_generate_keeps_over_budget_plan() {
        let short = PlanRequest::new(Mood::Calm, 3, 0.5, [Goal::Chores]).unwrap();
        let mock = Arc::new(MockLlmClient::with_text(ONE_ITEM, 1));
        let plan = generator(mock).generate(&short, 9).await.unwrap();

        assert_eq!(plan.total_minutes(), 120);
    }
}
