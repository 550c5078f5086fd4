use crate::types::{AggregatorError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_MAX_WORKERS: usize = 5;
pub const DEFAULT_MAX_ENTRIES_PER_SOURCE: usize = 20;
pub const DEFAULT_SUMMARY_MAX_LENGTH: usize = 300;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "SecNews-Aggregator/1.0".to_string(),
            timeout_seconds: 15,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Knobs for one collection cycle.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Upper bound on simultaneous source fetches.
    pub max_workers: usize,
    /// Raw entries considered per source, in feed order.
    pub max_entries_per_source: usize,
    pub summary_max_length: usize,
    pub fetch: FetchConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            max_entries_per_source: DEFAULT_MAX_ENTRIES_PER_SOURCE,
            summary_max_length: DEFAULT_SUMMARY_MAX_LENGTH,
            fetch: FetchConfig::default(),
        }
    }
}

impl CollectorConfig {
    /// Defaults overlaid with `SECNEWS_*` environment variables.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    /// Only unparsable numbers fail here; call [`CollectorConfig::validate`]
    /// once every override has been applied.
    pub fn from_env() -> Result<Self> {
        if dotenvy::dotenv().is_ok() {
            debug!("Loaded .env file");
        }

        let mut config = Self::default();
        if let Some(workers) = env_number("SECNEWS_MAX_WORKERS")? {
            config.max_workers = workers;
        }
        if let Some(entries) = env_number("SECNEWS_MAX_ENTRIES")? {
            config.max_entries_per_source = entries;
        }
        if let Some(length) = env_number("SECNEWS_SUMMARY_LENGTH")? {
            config.summary_max_length = length;
        }
        if let Some(timeout) = env_number("SECNEWS_TIMEOUT_SECONDS")? {
            config.fetch.timeout_seconds = timeout;
        }
        if let Ok(user_agent) = env::var("SECNEWS_USER_AGENT") {
            config.fetch.user_agent = user_agent;
        }

        Ok(config)
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.fetch.timeout_seconds = timeout_seconds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(AggregatorError::Config("max_workers must be at least 1".to_string()));
        }
        if self.max_entries_per_source == 0 {
            return Err(AggregatorError::Config(
                "max_entries_per_source must be at least 1".to_string(),
            ));
        }
        if self.summary_max_length == 0 {
            return Err(AggregatorError::Config(
                "summary_max_length must be at least 1".to_string(),
            ));
        }
        if self.fetch.timeout_seconds == 0 {
            return Err(AggregatorError::Config(
                "timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_number<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AggregatorError::Config(format!("{} is not a valid number: {:?}", key, raw))),
        Err(_) => Ok(None),
    }
}
