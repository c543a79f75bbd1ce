//! OpenAI-compatible completion service integration for Scribe
//!
//! This crate provides the HTTP implementation of the `CompletionClient` trait.

mod client;
mod config;


pub use client::OpenAiClient;
pub use config::OpenAiConfig;

// Re-export core types for convenience
pub use scribe_core::{
    CompletionClient, CompletionOutcome, Error, GenerationParams, RenderedPrompt, Result,
};
