pub mod mock_feed;

pub use mock_feed::MockFeedFetcher;
