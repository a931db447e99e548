//! Provider-agnostic completion request/response types

use serde::{Deserialize, Serialize};

/// One stateless completion call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Instructions that frame the answer (may be empty)
    pub system_prompt: String,

    /// The rendered user prompt
    pub prompt: String,

    /// Upper bound on response tokens; providers cap it at their configured maximum
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

/// What a provider sent back
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Concatenated text output; `None` when the provider returned no text
    pub content: Option<String>,

    pub stop_reason: StopReason,

    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// A plain text response, mostly for tests and fakes
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

/// Why the provider stopped generating
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StopReason {
    #[default]
    EndTurn,
    MaxTokens,
    /// Blocked by the provider's safety filters
    Safety,
    Other(String),
}

impl StopReason {
    /// Map a Gemini `finishReason`
    pub fn from_gemini(s: &str) -> Self {
        match s {
            "STOP" => StopReason::EndTurn,
            "MAX_TOKENS" => StopReason::MaxTokens,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => StopReason::Safety,
            other => StopReason::Other(other.to_string()),
        }
    }

    /// Map an OpenAI `finish_reason`
    pub fn from_openai(s: &str) -> Self {
        match s {
            "stop" => StopReason::EndTurn,
            "length" => StopReason::MaxTokens,
            "content_filter" => StopReason::Safety,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
