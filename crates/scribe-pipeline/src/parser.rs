//! Response decoding and schema validation

use scribe_core::{
    AnalysisResult, CompletionOutcome, FailureKind, Payload, RawSentimentRecord, RawTopicList,
    ResponseContract, Schema, SchemaViolation, StructuredPayload,
};
use serde::de::DeserializeOwned;

/// Turns a [`CompletionOutcome`] into an [`AnalysisResult`].
///
/// Structured responses go through two gates: a typed serde decode (failure
/// is a parse error) and a range/enum check (failure is a schema violation).
/// Free text is passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, outcome: CompletionOutcome, contract: &ResponseContract) -> AnalysisResult {
        let raw_text = match outcome {
            CompletionOutcome::Success { raw_text } => raw_text,
            CompletionOutcome::TransportFailure { message } => {
                return AnalysisResult::failed(FailureKind::Transport, message);
            }
            CompletionOutcome::Timeout { after } => {
                return AnalysisResult::failed(
                    FailureKind::Transport,
                    format!("Request timed out after {}s", after.as_secs_f64()),
                );
            }
        };

        match contract {
            ResponseContract::FreeText => AnalysisResult::ok(Payload::Text(raw_text)),
            ResponseContract::StructuredJson(schema) => self.parse_structured(*schema, &raw_text),
        }
    }

    fn parse_structured(&self, schema: Schema, raw_text: &str) -> AnalysisResult {
        let validated = match schema {
            Schema::Sentiment => decode::<RawSentimentRecord>(raw_text)
                .map(|raw| raw.validate().map(StructuredPayload::Sentiment)),
            Schema::Topics => decode::<RawTopicList>(raw_text)
                .map(|raw| raw.validate().map(StructuredPayload::Topics)),
        };

        match validated {
            Err(detail) => AnalysisResult::failed(FailureKind::Parse, detail),
            Ok(Err(SchemaViolation(detail))) => {
                AnalysisResult::failed(FailureKind::SchemaViolation, detail)
            }
            Ok(Ok(payload)) => AnalysisResult::ok(Payload::Structured(payload)),
        }
    }
}

fn decode<T: DeserializeOwned>(raw_text: &str) -> Result<T, String> {
    serde_json::from_str(raw_text.trim()).map_err(|e| format!("Invalid JSON response: {e}"))
}
