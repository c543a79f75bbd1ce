//! OpenAI-compatible chat completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, warn};

use scribe_core::{
    CompletionClient, CompletionOutcome, Error, GenerationParams, RenderedPrompt, Result,
};

use crate::config::OpenAiConfig;

/// Client for `POST {base_url}/chat/completions`
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

/// Internal classification of a failed call
enum CallError {
    TimedOut,
    Transport(String),
}

impl From<reqwest::Error> for CallError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CallError::TimedOut
        } else {
            CallError::Transport(err.to_string())
        }
    }
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OpenAiConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Perform the actual HTTP request and pull the first choice's content out
    async fn perform_completion(
        &self,
        prompt: &RenderedPrompt,
        params: &GenerationParams,
    ) -> std::result::Result<String, CallError> {
        let request_body = request_body(prompt, params);

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .timeout(params.timeout)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(CallError::Transport(format!(
                "API request failed with status {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| CallError::Transport(format!("Malformed response envelope: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CallError::Transport("Response contained no message content".to_string()))
    }
}

/// Chat request for a prompt; structured contracts switch on JSON mode
fn request_body<'a>(prompt: &'a RenderedPrompt, params: &'a GenerationParams) -> ChatRequest<'a> {
    ChatRequest {
        model: &params.model_identifier,
        messages: vec![
            ChatMessage {
                role: "system",
                content: &prompt.system_instruction,
            },
            ChatMessage {
                role: "user",
                content: &prompt.user_prompt,
            },
        ],
        temperature: params.temperature,
        max_tokens: params.max_output_tokens,
        response_format: prompt
            .response_contract
            .is_structured()
            .then_some(ResponseFormat { kind: "json_object" }),
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &RenderedPrompt, params: &GenerationParams) -> CompletionOutcome {
        debug!(
            model = %params.model_identifier,
            structured = prompt.response_contract.is_structured(),
            "sending completion request"
        );

        match timeout(params.timeout, self.perform_completion(prompt, params)).await {
            Ok(Ok(raw_text)) => CompletionOutcome::Success { raw_text },
            Ok(Err(CallError::Transport(message))) => {
                warn!(%message, "completion request failed");
                CompletionOutcome::TransportFailure { message }
            }
            Ok(Err(CallError::TimedOut)) | Err(_) => {
                warn!(timeout_secs = params.timeout.as_secs_f64(), "completion request timed out");
                CompletionOutcome::Timeout { after: params.timeout }
            }
        }
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
