pub mod types;
pub mod config;
pub mod traits;
pub mod html;
pub mod normalizer;
pub mod classifier;
pub mod dedup;
pub mod registry;
pub mod parser;
pub mod fetcher;
pub mod sources;
pub mod collection;
pub mod collector;
pub mod state;
pub mod demo;
pub mod export;

pub use types::*;
pub use config::{CollectorConfig, FetchConfig};
pub use traits::{FeedFetcher, HtmlStripper};
pub use html::ScraperStripper;
pub use normalizer::{NormalizedEntry, Normalizer};
pub use classifier::{classify, Category, Classification};
pub use dedup::{fingerprint, Admission, Deduplicator};
pub use registry::{SourceListing, SourceRegistry, DEFAULT_SOURCES};
pub use parser::FeedParser;
pub use fetcher::HttpFeedFetcher;
pub use sources::MockFeedFetcher;
pub use collection::{Collection, DateRange, SummaryStats};
pub use collector::{CollectionRun, Collector};
pub use state::{CacheStatus, CollectionCache};
pub use demo::{demo_collection, demo_items};
