use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display pattern for `NewsItem::published_at`
pub const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A configured feed, tagged with the category it was listed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    pub category: String,
}

/// An entry as parsed from a feed, before any filtering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeedEntry {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

type TimestampField = fn(&RawFeedEntry) -> Option<DateTime<Utc>>;

/// Timestamp fields in order of preference
const TIMESTAMP_FIELDS: &[TimestampField] = &[published_field, updated_field];

fn published_field(entry: &RawFeedEntry) -> Option<DateTime<Utc>> {
    entry.published
}

fn updated_field(entry: &RawFeedEntry) -> Option<DateTime<Utc>> {
    entry.updated
}

impl RawFeedEntry {
    /// Publication time: `published`, falling back to `updated`
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        TIMESTAMP_FIELDS.iter().find_map(|field| field(self))
    }
}

/// A collected item handed to downstream summarization and delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub source: String,
    pub category: String,
    /// UTC publication time, formatted with [`PUBLISHED_FORMAT`]
    pub published_at: String,
}

impl NewsItem {
    pub fn new(entry: RawFeedEntry, published: DateTime<Utc>, source: &FeedSource) -> Self {
        Self {
            title: entry.title,
            link: entry.link,
            summary: entry.summary,
            source: source.name.clone(),
            category: source.category.clone(),
            published_at: published.format(PUBLISHED_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, h, 5, 9).unwrap()
    }

    #[test]
    fn test_published_preferred_over_updated() {
        let entry = RawFeedEntry {
            published: Some(ts(8)),
            updated: Some(ts(9)),
            ..Default::default()
        };
        assert_eq!(entry.published_at(), Some(ts(8)));
    }

    #[test]
    fn test_falls_back_to_updated() {
        let entry = RawFeedEntry {
            updated: Some(ts(9)),
            ..Default::default()
        };
        assert_eq!(entry.published_at(), Some(ts(9)));
    }

    #[test]
    fn test_no_timestamp() {
        assert_eq!(RawFeedEntry::default().published_at(), None);
    }

    #[test]
    fn test_news_item_takes_source_and_category() {
        let source = FeedSource {
            name: "Source A".into(),
            url: "https://a.example/rss".into(),
            category: "tech".into(),
        };
        let entry = RawFeedEntry {
            title: "LiDAR hits 500m range".into(),
            link: "https://a.example/1".into(),
            summary: "Long range sensing".into(),
            published: Some(ts(8)),
            updated: None,
        };

        let item = NewsItem::new(entry, ts(8), &source);
        assert_eq!(item.source, "Source A");
        assert_eq!(item.category, "tech");
        assert_eq!(item.published_at, "2025-03-14 08:05");
        assert_eq!(item.link, "https://a.example/1");
    }

    #[test]
    fn test_news_item_serializes_flat() {
        let item = NewsItem {
            title: "t".into(),
            link: "l".into(),
            summary: "s".into(),
            source: "src".into(),
            category: "tech".into(),
            published_at: "2025-03-14 08:05".into(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["category"], "tech");
        assert_eq!(json["published_at"], "2025-03-14 08:05");
    }
}
