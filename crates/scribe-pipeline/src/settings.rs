//! Per-task generation settings

use scribe_core::{AnalysisRequest, GenerationParams, SummaryLength, TaskKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Temperature and output size a task uses unless overridden
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskDefaults {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl TaskDefaults {
    /// Analytic tasks run cold, prose-generating tasks run warmer.
    pub fn for_task(kind: TaskKind) -> Self {
        let (temperature, max_output_tokens) = match kind {
            TaskKind::CodeReview => (0.3, 1500),
            TaskKind::Sentiment => (0.2, 500),
            TaskKind::TopicExtraction => (0.2, 800),
            TaskKind::EmailDraft => (0.7, 500),
            TaskKind::EmailImprovement => (0.5, 500),
            TaskKind::Summarize => (0.5, 250),
        };
        Self { temperature, max_output_tokens }
    }
}

/// Builds [`GenerationParams`] for each request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub model_identifier: String,
    pub timeout: Duration,
    pub temperature_override: Option<f32>,
    pub max_tokens_override: Option<u32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            model_identifier: params.model_identifier,
            timeout: params.timeout,
            temperature_override: None,
            max_tokens_override: None,
        }
    }
}

impl GenerationSettings {
    pub fn new(model_identifier: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model_identifier: model_identifier.into(),
            timeout,
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature_override = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens_override = max_tokens;
        self
    }

    pub fn params_for(&self, request: &AnalysisRequest) -> GenerationParams {
        let defaults = TaskDefaults::for_task(request.task_kind());
        let max_output_tokens = match request.task_kind() {
            TaskKind::Summarize => match request.parameters().summary_length_or_default() {
                SummaryLength::Short => 100,
                SummaryLength::Medium => defaults.max_output_tokens,
                SummaryLength::Detailed => 600,
            },
            _ => defaults.max_output_tokens,
        };

        GenerationParams {
            model_identifier: self.model_identifier.clone(),
            temperature: self.temperature_override.unwrap_or(defaults.temperature),
            max_output_tokens: self.max_tokens_override.unwrap_or(max_output_tokens),
            timeout: self.timeout,
        }
    }
}
