use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::Category;

/// One entry as handed over by a feed fetcher, before normalization.
///
/// Feeds disagree about which fields they carry, so every field is optional.
/// The normalizer decides which one wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Content blocks in feed order; only the first one is ever used.
    pub content: Vec<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    /// Published timestamp exactly as the feed wrote it.
    pub published_raw: Option<String>,
}

impl RawEntry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            link: Some(link.into()),
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content.push(content.into());
        self
    }

    pub fn with_published(mut self, published: DateTime<Utc>) -> Self {
        self.published = Some(published);
        self
    }

    pub fn with_updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = Some(updated);
        self
    }

    pub fn with_published_raw(mut self, raw: impl Into<String>) -> Self {
        self.published_raw = Some(raw.into());
        self
    }
}

/// A normalized, classified article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    /// `YYYY-MM-DD HH:MM`
    pub date: String,
    pub summary: String,
    pub source: String,
    pub category: Category,
    pub keywords: Vec<String>,
    pub content_hash: String,
}

impl NewsItem {
    /// Keywords joined the way search and export see them.
    pub fn keywords_str(&self) -> String {
        self.keywords.join(", ")
    }
}

/// A named feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub endpoint: String,
}

impl Source {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// What happened to one source during a collection cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: String,
    pub endpoint: String,
    pub success: bool,
    pub entries_found: usize,
    pub new_items: usize,
    pub error: Option<String>,
    pub response_time_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Fetch timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
