//! OpenAI client configuration

use scribe_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

/// Configuration for the OpenAI-compatible client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub default_model: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Create configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// Fails when the API key is missing or blank, when the base URL does not
    /// parse, or when the timeout is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Configuration("OPENAI_API_KEY environment variable not found".to_string())
            })?;

        let base_url = lookup("OPENAI_BASE_URL")
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        Self::validate_base_url(&base_url)?;

        let default_model = lookup("SCRIBE_MODEL")
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_MODEL.to_string());

        let timeout = match lookup("SCRIBE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(Self::parse_timeout(&raw)?),
            None => Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
            timeout,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            default_model: Self::DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn validate_base_url(raw: &str) -> Result<()> {
        let url = Url::parse(raw)
            .map_err(|e| Error::Configuration(format!("OPENAI_BASE_URL is not a valid URL: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Error::Configuration(format!(
                "OPENAI_BASE_URL must use http or https, got {scheme}"
            ))),
        }
    }

    fn parse_timeout(raw: &str) -> Result<u64> {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(Error::Configuration(format!(
                "SCRIBE_TIMEOUT_SECS must be a positive integer, got {raw:?}"
            ))),
        }
    }
}
