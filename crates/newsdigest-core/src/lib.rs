pub mod collector;
pub mod config;
pub mod dedup;
pub mod error;
pub mod feed;
pub mod relevance;

pub use collector::{CollectStats, Collection, Collector, SourceFailure};
pub use config::{DigestConfig, FetchConfig, GeneralConfig};
pub use dedup::{compute_fingerprint, Fingerprint, SeenSet};
pub use error::{Error, Result};
pub use feed::{FeedSource, NewsItem, RawFeedEntry};
pub use relevance::{is_relevant, KeywordPolicy};
