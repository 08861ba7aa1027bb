mod fetcher;
mod models;
mod parser;

pub use fetcher::{FeedFetcher, FetchFeed};
pub use models::{FeedSource, NewsItem, RawFeedEntry, PUBLISHED_FORMAT};
pub use parser::parse_feed;
