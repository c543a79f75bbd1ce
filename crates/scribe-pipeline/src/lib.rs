//! Batch analysis pipeline for Scribe
//!
//! This crate provides the stages between a list of inputs and a finished
//! report: prompt building, response parsing, sequential batch execution and
//! report rendering. It performs no terminal I/O.

mod language;
mod loader;
mod parser;
mod prompt;
mod report;
mod runner;
mod settings;

#[cfg(test)]
mod tests;

pub use language::{language_for_path, supported_extensions};
pub use loader::{ContentLoader, FsLoader};
pub use parser::ResponseParser;
pub use prompt::PromptBuilder;
pub use report::ReportAggregator;
pub use runner::{BatchRunner, CANCELLED_DETAIL, CancellationFlag, ProgressEvent};
pub use settings::{GenerationSettings, TaskDefaults};

// Re-export core types for convenience
pub use scribe_core::{
    AnalysisRequest, AnalysisResult, BatchItem, BatchReport, CompletionClient, CompletionOutcome,
    Error, FailureKind, FailureStage, GenerationParams, Payload, RenderedPrompt, ResponseContract,
    Result, TaskKind, TaskParameters,
};
