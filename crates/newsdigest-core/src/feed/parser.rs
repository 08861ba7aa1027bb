use feed_rs::parser;

use super::models::RawFeedEntry;
use crate::{Error, Result};

/// Parse RSS/Atom/JSON Feed content into raw entries.
///
/// Every entry is returned, including ones without a timestamp; the collector
/// skips and counts those.
pub fn parse_feed(content: &[u8]) -> Result<Vec<RawFeedEntry>> {
    let feed = parser::parse(content).map_err(|e| Error::FeedParse(e.to_string()))?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry.title.map(|t| t.content).unwrap_or_default();

            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();

            // RSS <description> is surfaced as the summary
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();

            RawFeedEntry {
                title,
                link,
                summary,
                published: entry.published,
                updated: entry.updated,
            }
        })
        .collect();

    Ok(entries)
}
