//! Completion client trait and the values that cross it

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Expected shape of a structured response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    Sentiment,
    Topics,
}

/// What the caller expects the model to send back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseContract {
    FreeText,
    StructuredJson(Schema),
}

impl ResponseContract {
    pub fn is_structured(&self) -> bool {
        matches!(self, ResponseContract::StructuredJson(_))
    }
}

/// Prompt ready to send: one system message and one user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub system_instruction: String,
    pub user_prompt: String,
    pub response_contract: ResponseContract,
}

/// Generation parameters for a single call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub model_identifier: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model_identifier: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_output_tokens: 1000,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Result of one remote call. Always a value, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    Success { raw_text: String },
    TransportFailure { message: String },
    Timeout { after: Duration },
}

impl CompletionOutcome {
    pub fn success(raw_text: impl Into<String>) -> Self {
        CompletionOutcome::Success { raw_text: raw_text.into() }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        CompletionOutcome::TransportFailure { message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CompletionOutcome::Success { .. })
    }
}

/// Trait for remote completion services (OpenAI-compatible APIs, test doubles)
///
/// Implementations issue exactly one request per call, enforce
/// `params.timeout`, and classify every failure into a [`CompletionOutcome`]
/// instead of returning an error. When the prompt carries a structured
/// contract the implementation asks the service for JSON output but leaves
/// decoding to the caller.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the prompt and return the raw outcome
    async fn complete(&self, prompt: &RenderedPrompt, params: &GenerationParams) -> CompletionOutcome;

    /// Name used in logs and report metadata
    fn provider_name(&self) -> &str;
}
