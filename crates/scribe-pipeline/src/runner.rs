//! Sequential batch execution with per-item isolation

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use scribe_core::{
    AnalysisRequest, AnalysisResult, BatchItem, BatchReport, CompletionClient, Error, FailureKind,
    Result, SubjectSource, TaskKind, TaskParameters,
};

use crate::language::{language_for_path, supported_extensions};
use crate::loader::{ContentLoader, FsLoader};
use crate::parser::ResponseParser;
use crate::prompt::PromptBuilder;
use crate::settings::GenerationSettings;

/// Detail recorded for items skipped after cancellation
pub const CANCELLED_DETAIL: &str = "Batch cancelled before this item was processed";

/// Shared flag a caller flips to stop a batch between items
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Emitted before each item is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent<'a> {
    /// 1-based position in the batch
    pub index: usize,
    pub total: usize,
    pub identity: &'a str,
    pub task: TaskKind,
}

type ProgressObserver = Box<dyn Fn(&ProgressEvent<'_>) + Send + Sync>;

/// Drives prompt building, completion and parsing across a batch.
///
/// Items are processed one at a time in input order. Every item produces
/// exactly one report entry: failures are recorded, never propagated.
pub struct BatchRunner<C: CompletionClient, L: ContentLoader = FsLoader> {
    client: C,
    loader: L,
    builder: PromptBuilder,
    parser: ResponseParser,
    settings: GenerationSettings,
    cancellation: Option<CancellationFlag>,
    observer: Option<ProgressObserver>,
}

impl<C: CompletionClient> BatchRunner<C, FsLoader> {
    /// Create a runner that reads file inputs from the local file system
    pub fn new(client: C, settings: GenerationSettings) -> Self {
        Self::with_loader(client, FsLoader, settings)
    }
}

impl<C: CompletionClient, L: ContentLoader> BatchRunner<C, L> {
    pub fn with_loader(client: C, loader: L, settings: GenerationSettings) -> Self {
        Self {
            client,
            loader,
            builder: PromptBuilder::new(),
            parser: ResponseParser::new(),
            settings,
            cancellation: None,
            observer: None,
        }
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn with_progress<F>(mut self, observer: F) -> Self
    where
        F: Fn(&ProgressEvent<'_>) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run every item in order and collect the report
    pub async fn run(&self, items: Vec<BatchItem>) -> BatchReport {
        let total = items.len();
        let mut report = BatchReport::with_capacity(total);

        info!(total, provider = self.client.provider_name(), "starting batch");

        for (position, item) in items.into_iter().enumerate() {
            if self.is_cancelled() {
                debug!(identity = %item.identity, "skipping item after cancellation");
                report.push(
                    item.identity,
                    item.task,
                    AnalysisResult::failed(FailureKind::InvalidInput, CANCELLED_DETAIL),
                );
                continue;
            }

            let event = ProgressEvent {
                index: position + 1,
                total,
                identity: &item.identity,
                task: item.task,
            };
            info!(index = event.index, total, identity = %item.identity, "processing item");
            if let Some(observer) = &self.observer {
                observer(&event);
            }

            let result = self.process(&item).await;
            if let Some(failure) = result.failure() {
                warn!(identity = %item.identity, kind = failure.kind.label(), detail = %failure.detail, "item failed");
            }
            report.push(item.identity, item.task, result);
        }

        info!(
            total,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch finished"
        );
        report
    }

    /// Process a single item end to end
    pub async fn process(&self, item: &BatchItem) -> AnalysisResult {
        let request = match self.resolve(item).await {
            Ok(request) => request,
            Err(Error::Validation(detail)) => {
                return AnalysisResult::failed(FailureKind::InvalidInput, detail);
            }
            Err(other) => return AnalysisResult::failed(FailureKind::InvalidInput, other.to_string()),
        };

        let prompt = self.builder.render(&request);
        let params = self.settings.params_for(&request);
        let outcome = self.client.complete(&prompt, &params).await;
        self.parser.parse(outcome, &prompt.response_contract)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationFlag::is_cancelled)
    }

    /// Load content and check parameters. Nothing here touches the network.
    async fn resolve(&self, item: &BatchItem) -> Result<AnalysisRequest> {
        let content = self.loader.load(&item.source).await?;
        if content.trim().is_empty() {
            return Err(Error::Validation("Input is empty".to_string()));
        }

        let parameters = validate_parameters(item)?;
        Ok(AnalysisRequest::new(
            item.identity.clone(),
            content,
            item.task,
            parameters,
        ))
    }
}

/// Check task parameters and fill in anything derivable from the input
fn validate_parameters(item: &BatchItem) -> Result<TaskParameters> {
    let mut parameters = item.parameters.clone();

    match item.task {
        TaskKind::CodeReview => {
            let hint = parameters
                .language
                .as_deref()
                .map(str::trim)
                .filter(|hint| !hint.is_empty())
                .map(str::to_string);
            parameters.language = match (hint, &item.source) {
                (Some(hint), _) => Some(hint),
                (None, SubjectSource::File(path)) => Some(detect_language(path)?.to_string()),
                (None, SubjectSource::Inline(_)) => Some("text".to_string()),
            };
        }
        TaskKind::TopicExtraction => {
            let count = parameters.topic_count_or_default();
            if !(1..=TaskParameters::MAX_TOPIC_COUNT).contains(&count) {
                return Err(Error::Validation(format!(
                    "Topic count must be between 1 and {}, got {count}",
                    TaskParameters::MAX_TOPIC_COUNT
                )));
            }
        }
        TaskKind::EmailDraft => {
            require(&parameters.purpose, "purpose")?;
            require(&parameters.recipient, "recipient")?;
        }
        TaskKind::Sentiment | TaskKind::EmailImprovement | TaskKind::Summarize => {}
    }

    Ok(parameters)
}

fn detect_language(path: &Path) -> Result<&'static str> {
    language_for_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| "(none)".to_string());
        Error::Validation(format!(
            "Unsupported file type: {ext} (supported: {})",
            supported_extensions().collect::<Vec<_>>().join(", ")
        ))
    })
}

fn require(value: &Option<String>, name: &str) -> Result<()> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(Error::Validation(format!("Email {name} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_review_language_from_extension() {
        let item = BatchItem::file("src/main.rs", TaskKind::CodeReview);
        let params = validate_parameters(&item).unwrap();
        assert_eq!(params.language.as_deref(), Some("rust"));
    }

    #[test]
    fn test_language_hint_overrides_extension() {
        let item = BatchItem::file("build.txt", TaskKind::CodeReview)
            .with_parameters(TaskParameters::default().with_language("kotlin"));
        let params = validate_parameters(&item).unwrap();
        assert_eq!(params.language.as_deref(), Some("kotlin"));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let item = BatchItem::file("notes.txt", TaskKind::CodeReview);
        let err = validate_parameters(&item).unwrap_err();
        assert!(err.to_string().contains("Unsupported file type: .txt"));
    }

    #[test]
    fn test_topic_count_bounds() {
        let zero = BatchItem::text("t", "x", TaskKind::TopicExtraction)
            .with_parameters(TaskParameters::default().with_topic_count(0));
        assert!(validate_parameters(&zero).is_err());

        let many = BatchItem::text("t", "x", TaskKind::TopicExtraction)
            .with_parameters(TaskParameters::default().with_topic_count(21));
        assert!(validate_parameters(&many).is_err());
    }

    #[test]
    fn test_email_draft_requires_purpose_and_recipient() {
        let item = BatchItem::text("draft", "points", TaskKind::EmailDraft);
        let err = validate_parameters(&item).unwrap_err();
        assert!(err.to_string().contains("purpose"));

        let ok = item.with_parameters(
            TaskParameters::default().with_email_context("follow up", "Sam"),
        );
        assert!(validate_parameters(&ok).is_ok());
    }

    #[test]
    fn test_cancellation_flag_is_shared() {
        let flag = CancellationFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_cancelled());
        clone.cancel();
        assert!(flag.is_cancelled());
    }
}
