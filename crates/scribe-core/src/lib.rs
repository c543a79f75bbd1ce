//! Core traits and types for Scribe
//!
//! This crate defines the data model shared by every stage of the analysis
//! pipeline: requests, prompts, completion outcomes, structured payloads and
//! batch reports, plus the [`CompletionClient`] seam that remote services
//! implement.

pub mod error;
pub mod llm;
pub mod payload;
pub mod request;
pub mod result;


pub use error::{Error, Result};
pub use llm::{
    CompletionClient, CompletionOutcome, GenerationParams, RenderedPrompt, ResponseContract, Schema,
};
pub use payload::{
    Confidence, Payload, RawSentimentRecord, RawTopicList, SchemaViolation, Sentiment,
    SentimentRecord, StructuredPayload, Topic, TopicList,
};
pub use request::{
    AnalysisRequest, BatchItem, SubjectSource, SummaryLength, TaskKind, TaskParameters, Tone,
};
pub use result::{AnalysisResult, BatchReport, Failure, FailureKind, FailureStage, ReportEntry};
