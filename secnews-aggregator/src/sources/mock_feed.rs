use crate::traits::FeedFetcher;
use crate::types::{AggregatorError, RawEntry, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::{sleep, Duration};

#[derive(Debug, Clone)]
enum CannedFeed {
    Entries(Vec<RawEntry>),
    Failure(String),
}

/// Canned feed fetcher for development and testing.
///
/// Each endpoint answers with fixed entries or a fixed failure, optionally
/// after a delay. Unknown endpoints fail. The fetcher also tracks how many
/// fetches were in flight at once.
#[derive(Debug, Default)]
pub struct MockFeedFetcher {
    feeds: HashMap<String, CannedFeed>,
    delays_ms: HashMap<String, u64>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockFeedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, endpoint: impl Into<String>, entries: Vec<RawEntry>) -> Self {
        self.feeds.insert(endpoint.into(), CannedFeed::Entries(entries));
        self
    }

    pub fn with_failure(mut self, endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        self.feeds.insert(endpoint.into(), CannedFeed::Failure(message.into()));
        self
    }

    pub fn with_delay(mut self, endpoint: impl Into<String>, delay_ms: u64) -> Self {
        self.delays_ms.insert(endpoint.into(), delay_ms);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous `fetch` calls observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn respond(&self, endpoint: &str) -> Result<Vec<RawEntry>> {
        if let Some(&delay_ms) = self.delays_ms.get(endpoint) {
            sleep(Duration::from_millis(delay_ms)).await;
        }

        match self.feeds.get(endpoint) {
            Some(CannedFeed::Entries(entries)) => Ok(entries.clone()),
            Some(CannedFeed::Failure(message)) => Err(AggregatorError::General(message.clone())),
            None => Err(AggregatorError::General(format!("no canned feed for {}", endpoint))),
        }
    }
}

#[async_trait]
impl FeedFetcher for MockFeedFetcher {
    fn fetcher_name(&self) -> String {
        "mock".to_string()
    }

    async fn fetch(&self, endpoint: &str) -> Result<Vec<RawEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        let result = self.respond(endpoint).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
