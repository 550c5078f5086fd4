use crate::types::{RawEntry, Result};
use async_trait::async_trait;

/// Trait for pulling raw entries from a feed endpoint (RSS, Atom, canned data, ...)
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Human-readable name for this fetcher
    fn fetcher_name(&self) -> String;

    /// Fetch every entry the endpoint currently publishes, in feed order.
    ///
    /// Network, timeout and malformed-feed failures all come back as `Err`;
    /// the collector turns them into an empty result for that source.
    async fn fetch(&self, endpoint: &str) -> Result<Vec<RawEntry>>;
}

/// Turns markup into plain text: tags removed, text nodes joined by single spaces.
pub trait HtmlStripper: Send + Sync {
    fn strip(&self, markup: &str) -> String;
}
