//! Per-item results and the batch report

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::payload::Payload;
use crate::request::TaskKind;

/// Pipeline stage a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Transport,
    Parse,
    Validation,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Transport => f.write_str("transport"),
            FailureStage::Parse => f.write_str("parse"),
            FailureStage::Validation => f.write_str("validation"),
        }
    }
}

/// What went wrong for a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Unreadable input, unsupported file type, bad parameters. No remote call was made.
    InvalidInput,
    /// Network or service fault, including timeouts
    Transport,
    /// Structured response could not be decoded
    Parse,
    /// Structured response decoded but broke a declared range or enum
    SchemaViolation,
}

impl FailureKind {
    pub fn stage(&self) -> FailureStage {
        match self {
            FailureKind::InvalidInput | FailureKind::SchemaViolation => FailureStage::Validation,
            FailureKind::Transport => FailureStage::Transport,
            FailureKind::Parse => FailureStage::Parse,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::InvalidInput => "invalid input",
            FailureKind::Transport => "transport failure",
            FailureKind::Parse => "parse failure",
            FailureKind::SchemaViolation => "schema violation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub detail: String,
}

impl Failure {
    pub fn stage(&self) -> FailureStage {
        self.kind.stage()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage, {}: {}", self.stage(), self.kind.label(), self.detail)
    }
}

/// Outcome of analysing one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisResult {
    Ok { payload: Payload },
    Failed(Failure),
}

impl AnalysisResult {
    pub fn ok(payload: Payload) -> Self {
        AnalysisResult::Ok { payload }
    }

    pub fn failed(kind: FailureKind, detail: impl Into<String>) -> Self {
        AnalysisResult::Failed(Failure { kind, detail: detail.into() })
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AnalysisResult::Ok { .. })
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            AnalysisResult::Ok { payload } => Some(payload),
            AnalysisResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            AnalysisResult::Ok { .. } => None,
            AnalysisResult::Failed(failure) => Some(failure),
        }
    }

    /// Stage of the failure, if this result failed
    pub fn failed_stage(&self) -> Option<FailureStage> {
        self.failure().map(Failure::stage)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub input_identity: String,
    pub task: TaskKind,
    pub result: AnalysisResult,
}

/// Ordered results of one batch. Entry order is input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    entries: Vec<ReportEntry>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, input_identity: impl Into<String>, task: TaskKind, result: AnalysisResult) {
        self.entries.push(ReportEntry {
            input_identity: input_identity.into(),
            task,
            result,
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn is_fully_ok(&self) -> bool {
        self.entries.iter().all(|e| e.result.is_ok())
    }

    /// The task shared by every entry, if there is exactly one
    pub fn common_task(&self) -> Option<TaskKind> {
        let first = self.entries.first()?.task;
        self.entries.iter().all(|e| e.task == first).then_some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds_map_to_stages() {
        assert_eq!(FailureKind::InvalidInput.stage(), FailureStage::Validation);
        assert_eq!(FailureKind::SchemaViolation.stage(), FailureStage::Validation);
        assert_eq!(FailureKind::Transport.stage(), FailureStage::Transport);
        assert_eq!(FailureKind::Parse.stage(), FailureStage::Parse);
    }

    #[test]
    fn test_report_counts_and_common_task() {
        let mut report = BatchReport::new();
        report.push("a", TaskKind::Sentiment, AnalysisResult::ok(Payload::Text("x".into())));
        report.push("b", TaskKind::Sentiment, AnalysisResult::failed(FailureKind::Parse, "bad json"));

        assert_eq!(report.len(), 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_fully_ok());
        assert_eq!(report.common_task(), Some(TaskKind::Sentiment));

        report.push("c", TaskKind::Summarize, AnalysisResult::ok(Payload::Text("y".into())));
        assert_eq!(report.common_task(), None);
    }

    #[test]
    fn test_failure_display_names_stage_and_kind() {
        let failure = Failure {
            kind: FailureKind::SchemaViolation,
            detail: "score out of range".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "validation stage, schema violation: score out of range"
        );
    }
}
