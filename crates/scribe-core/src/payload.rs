//! Structured payloads returned by JSON-contract tasks.
//!
//! Each payload has a raw, loosely-typed wire form (what serde decodes) and a
//! validated form (what the pipeline hands out). Field names live in the
//! `*_FIELDS` constants so the prompt builder and the parser cannot drift.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall polarity of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Sentiment {
    pub const ALLOWED: [&'static str; 4] = ["positive", "negative", "neutral", "mixed"];

    fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            "mixed" => Some(Sentiment::Mixed),
            _ => None,
        }
    }
}

/// How sure the model claims to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub const ALLOWED: [&'static str; 3] = ["low", "medium", "high"];

    fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Confidence::Low),
            "medium" => Some(Confidence::Medium),
            "high" => Some(Confidence::High),
            _ => None,
        }
    }
}

/// A value that decoded fine but is outside its declared domain
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolation(pub String);

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated sentiment analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub sentiment: Sentiment,
    #[serde(rename = "sentiment_score")]
    pub score: f64,
    pub primary_emotion: String,
    pub confidence: Confidence,
    pub key_phrases: Vec<String>,
}

impl SentimentRecord {
    pub const SCORE_RANGE: (f64, f64) = (-1.0, 1.0);
    pub const FIELDS: [&'static str; 5] = [
        "sentiment",
        "sentiment_score",
        "primary_emotion",
        "confidence",
        "key_phrases",
    ];
}

/// Sentiment record as the model sends it, before domain checks
#[derive(Debug, Clone, Deserialize)]
pub struct RawSentimentRecord {
    pub sentiment: String,
    pub sentiment_score: f64,
    pub primary_emotion: String,
    pub confidence: String,
    pub key_phrases: Vec<String>,
}

impl RawSentimentRecord {
    pub fn validate(self) -> Result<SentimentRecord, SchemaViolation> {
        let sentiment = Sentiment::from_wire(&self.sentiment).ok_or_else(|| {
            SchemaViolation(format!(
                "sentiment must be one of {}, got {:?}",
                Sentiment::ALLOWED.join(", "),
                self.sentiment
            ))
        })?;

        let (min, max) = SentimentRecord::SCORE_RANGE;
        if !(min..=max).contains(&self.sentiment_score) {
            return Err(SchemaViolation(format!(
                "sentiment_score must be within [{min}, {max}], got {}",
                self.sentiment_score
            )));
        }

        let confidence = Confidence::from_wire(&self.confidence).ok_or_else(|| {
            SchemaViolation(format!(
                "confidence must be one of {}, got {:?}",
                Confidence::ALLOWED.join(", "),
                self.confidence
            ))
        })?;

        if self.primary_emotion.trim().is_empty() {
            return Err(SchemaViolation("primary_emotion must not be empty".to_string()));
        }

        Ok(SentimentRecord {
            sentiment,
            score: self.sentiment_score,
            primary_emotion: self.primary_emotion,
            confidence,
            key_phrases: self.key_phrases,
        })
    }
}

/// A single extracted topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub topic_name: String,
    pub relevance_score: f64,
    pub related_terms: Vec<String>,
}

/// Ordered list of topics, most relevant first as returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicList {
    pub topics: Vec<Topic>,
}

impl TopicList {
    pub const RELEVANCE_RANGE: (f64, f64) = (0.0, 1.0);
    pub const ENVELOPE_FIELD: &'static str = "topics";
    pub const TOPIC_FIELDS: [&'static str; 3] = ["topic_name", "relevance_score", "related_terms"];
}

/// Topic list as the model sends it
#[derive(Debug, Clone, Deserialize)]
pub struct RawTopicList {
    pub topics: Vec<Topic>,
}

impl RawTopicList {
    pub fn validate(self) -> Result<TopicList, SchemaViolation> {
        let (min, max) = TopicList::RELEVANCE_RANGE;
        for (i, topic) in self.topics.iter().enumerate() {
            if topic.topic_name.trim().is_empty() {
                return Err(SchemaViolation(format!("topics[{i}].topic_name must not be empty")));
            }
            if !(min..=max).contains(&topic.relevance_score) {
                return Err(SchemaViolation(format!(
                    "topics[{i}].relevance_score must be within [{min}, {max}], got {}",
                    topic.relevance_score
                )));
            }
        }

        Ok(TopicList { topics: self.topics })
    }
}

/// Validated structured payload, one variant per JSON-contract task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuredPayload {
    Sentiment(SentimentRecord),
    Topics(TopicList),
}

/// Successful analysis output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Text(String),
    Structured(StructuredPayload),
}
