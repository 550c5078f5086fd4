use crate::config::FetchConfig;
use crate::parser::FeedParser;
use crate::traits::FeedFetcher;
use crate::types::{AggregatorError, RawEntry, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

const BYTES_PER_MB: usize = 1024 * 1024;

/// Fetches feeds over HTTP(S) and parses them with [`FeedParser`].
///
/// One attempt per call; retrying is left to the next collection cycle.
pub struct HttpFeedFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFeedFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn fetch_bytes(&self, endpoint: &str) -> Result<Vec<u8>> {
        let url = Url::parse(endpoint)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AggregatorError::General(format!(
                "unsupported scheme {:?} for {}",
                url.scheme(),
                endpoint
            )));
        }

        let start_time = Instant::now();
        let mut response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AggregatorError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let limit = self.size_limit_bytes();
        if let Some(content_length) = response.content_length() {
            if content_length as usize > limit {
                return Err(AggregatorError::FeedTooLarge {
                    size_mb: content_length as usize / BYTES_PER_MB,
                });
            }
        }

        // Content-Length may be missing or wrong; cap what is actually read.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            if body.len() > limit {
                return Err(AggregatorError::FeedTooLarge {
                    size_mb: body.len() / BYTES_PER_MB,
                });
            }
        }

        debug!(
            "Fetched feed: {} ({} bytes in {}ms)",
            endpoint,
            body.len(),
            start_time.elapsed().as_millis()
        );
        Ok(body)
    }

    fn size_limit_bytes(&self) -> usize {
        self.config.max_feed_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    fn fetcher_name(&self) -> String {
        "http".to_string()
    }

    async fn fetch(&self, endpoint: &str) -> Result<Vec<RawEntry>> {
        let body = self.fetch_bytes(endpoint).await?;
        let feed = FeedParser::parse_feed(&body)?;
        Ok(feed.entries)
    }
}
