//! Analysis requests and the task vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

/// The kinds of analysis the pipeline knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    CodeReview,
    Sentiment,
    TopicExtraction,
    EmailDraft,
    EmailImprovement,
    Summarize,
}

impl TaskKind {
    /// Stable machine name, also accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::CodeReview => "code_review",
            TaskKind::Sentiment => "sentiment",
            TaskKind::TopicExtraction => "topic_extraction",
            TaskKind::EmailDraft => "email_draft",
            TaskKind::EmailImprovement => "email_improvement",
            TaskKind::Summarize => "summarize",
        }
    }

    /// Human readable name used in report titles
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskKind::CodeReview => "Code Review",
            TaskKind::Sentiment => "Sentiment Analysis",
            TaskKind::TopicExtraction => "Topic Extraction",
            TaskKind::EmailDraft => "Email Draft",
            TaskKind::EmailImprovement => "Email Improvement",
            TaskKind::Summarize => "Summary",
        }
    }

    /// Whether the task expects a JSON object back from the model
    pub fn is_structured(&self) -> bool {
        matches!(self, TaskKind::Sentiment | TaskKind::TopicExtraction)
    }

    pub fn all() -> [TaskKind; 6] {
        [
            TaskKind::CodeReview,
            TaskKind::Sentiment,
            TaskKind::TopicExtraction,
            TaskKind::EmailDraft,
            TaskKind::EmailImprovement,
            TaskKind::Summarize,
        ]
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "code_review" | "review" => Ok(TaskKind::CodeReview),
            "sentiment" => Ok(TaskKind::Sentiment),
            "topic_extraction" | "topics" => Ok(TaskKind::TopicExtraction),
            "email_draft" | "email" => Ok(TaskKind::EmailDraft),
            "email_improvement" | "improve" => Ok(TaskKind::EmailImprovement),
            "summarize" | "summary" => Ok(TaskKind::Summarize),
            other => Err(Error::Validation(format!("Unsupported task kind: {other}"))),
        }
    }
}

/// Register requested for generated or improved emails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Formal,
    Casual,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Formal => "formal",
            Tone::Casual => "casual",
        }
    }
}

/// Target size of a summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Detailed,
}

impl SummaryLength {
    /// Instruction fragment describing the length
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryLength::Short => "in two or three sentences",
            SummaryLength::Medium => "in one concise paragraph",
            SummaryLength::Detailed => "in several paragraphs covering every main point",
        }
    }
}

/// Task-specific options. Fields that do not apply to a task are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskParameters {
    /// Programming language hint for code review
    pub language: Option<String>,
    pub tone: Option<Tone>,
    /// Number of topics to extract
    pub topic_count: Option<u8>,
    pub summary_length: Option<SummaryLength>,
    /// What a drafted email is for
    pub purpose: Option<String>,
    /// Who a drafted email is addressed to
    pub recipient: Option<String>,
}

impl TaskParameters {
    pub const DEFAULT_TOPIC_COUNT: u8 = 5;
    pub const MAX_TOPIC_COUNT: u8 = 20;

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn with_topic_count(mut self, count: u8) -> Self {
        self.topic_count = Some(count);
        self
    }

    pub fn with_summary_length(mut self, length: SummaryLength) -> Self {
        self.summary_length = Some(length);
        self
    }

    pub fn with_email_context(
        mut self,
        purpose: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        self.purpose = Some(purpose.into());
        self.recipient = Some(recipient.into());
        self
    }

    pub fn tone_or_default(&self) -> Tone {
        self.tone.unwrap_or_default()
    }

    pub fn topic_count_or_default(&self) -> u8 {
        self.topic_count.unwrap_or(Self::DEFAULT_TOPIC_COUNT)
    }

    pub fn summary_length_or_default(&self) -> SummaryLength {
        self.summary_length.unwrap_or_default()
    }
}

/// Where the subject content of an item comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectSource {
    File(PathBuf),
    Inline(String),
}

/// An unresolved unit of work handed to the batch runner.
///
/// Content is not read until the runner reaches the item, so an unreadable
/// file fails that item alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub identity: String,
    pub source: SubjectSource,
    pub task: TaskKind,
    pub parameters: TaskParameters,
}

impl BatchItem {
    /// Item backed by a local file; the path doubles as the identity
    pub fn file(path: impl Into<PathBuf>, task: TaskKind) -> Self {
        let path = path.into();
        Self {
            identity: path.display().to_string(),
            source: SubjectSource::File(path),
            task,
            parameters: TaskParameters::default(),
        }
    }

    /// Item backed by literal text under a logical label
    pub fn text(label: impl Into<String>, text: impl Into<String>, task: TaskKind) -> Self {
        Self {
            identity: label.into(),
            source: SubjectSource::Inline(text.into()),
            task,
            parameters: TaskParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: TaskParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// A fully resolved request: content has been loaded and parameters checked
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    input_identity: String,
    subject_content: String,
    task_kind: TaskKind,
    parameters: TaskParameters,
}

impl AnalysisRequest {
    pub fn new(
        input_identity: impl Into<String>,
        subject_content: impl Into<String>,
        task_kind: TaskKind,
        parameters: TaskParameters,
    ) -> Self {
        Self {
            input_identity: input_identity.into(),
            subject_content: subject_content.into(),
            task_kind,
            parameters,
        }
    }

    pub fn input_identity(&self) -> &str {
        &self.input_identity
    }

    pub fn subject_content(&self) -> &str {
        &self.subject_content
    }

    pub fn task_kind(&self) -> TaskKind {
        self.task_kind
    }

    pub fn parameters(&self) -> &TaskParameters {
        &self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_kind_round_trips_through_names() {
        for kind in TaskKind::all() {
            assert_eq!(kind.as_str().parse::<TaskKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_task_kind_accepts_short_aliases() {
        assert_eq!("Review".parse::<TaskKind>().unwrap(), TaskKind::CodeReview);
        assert_eq!("topics".parse::<TaskKind>().unwrap(), TaskKind::TopicExtraction);
        assert_eq!("email-draft".parse::<TaskKind>().unwrap(), TaskKind::EmailDraft);
    }

    #[test]
    fn test_unknown_task_kind_is_a_validation_error() {
        let err = "translate".parse::<TaskKind>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("translate"));
    }

    #[test]
    fn test_file_item_uses_path_as_identity() {
        let item = BatchItem::file("src/lib.rs", TaskKind::CodeReview);
        assert_eq!(item.identity, "src/lib.rs");
        assert_eq!(item.source, SubjectSource::File(PathBuf::from("src/lib.rs")));
    }

    #[test]
    fn test_parameter_defaults() {
        let params = TaskParameters::default();
        assert_eq!(params.tone_or_default(), Tone::Professional);
        assert_eq!(params.topic_count_or_default(), 5);
        assert_eq!(params.summary_length_or_default(), SummaryLength::Medium);
    }
}
