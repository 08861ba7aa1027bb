use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::config::DigestConfig;
use crate::dedup::{compute_fingerprint, SeenSet};
use crate::feed::{FeedFetcher, FeedSource, FetchFeed, NewsItem, RawFeedEntry};
use crate::relevance::{is_relevant, KeywordPolicy};
use crate::{Error, Result};

/// A source that produced nothing this run, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: String,
    pub url: String,
    pub reason: String,
}

/// Counters for one collection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub sources: usize,
    pub sources_failed: usize,
    pub entries_seen: usize,
    pub skipped_undated: usize,
    pub skipped_stale: usize,
    pub skipped_duplicate: usize,
    pub skipped_irrelevant: usize,
    pub deadline_hit: bool,
}

/// Outcome of one collection run
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Accepted items in discovery order
    pub items: Vec<NewsItem>,
    pub failures: Vec<SourceFailure>,
    pub stats: CollectStats,
}

impl Collection {
    /// Items grouped by category, keeping discovery order inside and across groups
    pub fn by_category(&self) -> IndexMap<&str, Vec<&NewsItem>> {
        let mut groups: IndexMap<&str, Vec<&NewsItem>> = IndexMap::new();
        for item in &self.items {
            groups.entry(item.category.as_str()).or_default().push(item);
        }
        groups
    }
}

type FetchOutcome = Result<Vec<RawFeedEntry>>;

/// Runs every configured source through the time, dedup and relevance filters.
///
/// Sources are fetched concurrently (up to `fetch.concurrency` at a time), but
/// their entries are filtered in configured order, so the output order does
/// not depend on which fetch finished first. Each run starts with an empty
/// [`SeenSet`].
pub struct Collector {
    sources: Vec<FeedSource>,
    policy: KeywordPolicy,
    fetcher: Arc<dyn FetchFeed>,
    concurrency: usize,
    request_timeout: Duration,
    run_deadline: Option<Duration>,
}

impl Collector {
    pub fn new(config: &DigestConfig, fetcher: Arc<dyn FetchFeed>) -> Self {
        let fetch = &config.fetch;
        Self {
            sources: config.sources(),
            policy: config.keywords.clone(),
            fetcher,
            concurrency: fetch.concurrency.max(1),
            request_timeout: Duration::from_secs(fetch.request_timeout_secs),
            run_deadline: (fetch.run_deadline_secs > 0)
                .then(|| Duration::from_secs(fetch.run_deadline_secs)),
        }
    }

    /// Build a collector backed by the HTTP fetcher
    pub fn from_config(config: &DigestConfig) -> Result<Self> {
        let fetcher = FeedFetcher::new(&config.fetch)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    /// Collect and return only the accepted items
    pub async fn run(&self, hours_back: u32) -> Vec<NewsItem> {
        self.collect(hours_back).await.items
    }

    pub async fn collect(&self, hours_back: u32) -> Collection {
        self.collect_at(Utc::now(), hours_back).await
    }

    /// Collect items published in `[now - hours_back, now]`
    pub async fn collect_at(&self, now: DateTime<Utc>, hours_back: u32) -> Collection {
        let mut collection = Collection::default();
        collection.stats.sources = self.sources.len();

        if self.sources.is_empty() {
            tracing::info!("No feed sources configured");
            return collection;
        }

        // a window reaching past the earliest representable time keeps everything
        let cutoff = now
            .checked_sub_signed(chrono::Duration::hours(i64::from(hours_back)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let (outcomes, deadline_hit) = self.fetch_all().await;
        collection.stats.deadline_hit = deadline_hit;

        let seen = SeenSet::new();

        for (source, outcome) in self.sources.iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|| {
                Err(Error::Timeout(if deadline_hit {
                    "run deadline exceeded".to_string()
                } else {
                    "fetch task aborted".to_string()
                }))
            });

            match outcome {
                Ok(entries) => {
                    let before = collection.items.len();
                    self.filter_entries(source, entries, cutoff, &seen, &mut collection);
                    tracing::info!(
                        "Feed '{}': {} matching items",
                        source.name,
                        collection.items.len() - before
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        source = %source.name,
                        url = %source.url,
                        "Failed to fetch feed: {}",
                        e
                    );
                    collection.stats.sources_failed += 1;
                    collection.failures.push(SourceFailure {
                        source: source.name.clone(),
                        url: source.url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Collected {} relevant items from {} sources ({} failed)",
            collection.items.len(),
            collection.stats.sources,
            collection.stats.sources_failed
        );

        collection
    }

    /// Apply time, dedup and relevance filters, in that order, to one source's entries
    fn filter_entries(
        &self,
        source: &FeedSource,
        entries: Vec<RawFeedEntry>,
        cutoff: DateTime<Utc>,
        seen: &SeenSet,
        collection: &mut Collection,
    ) {
        let stats = &mut collection.stats;

        for entry in entries {
            stats.entries_seen += 1;

            let Some(published) = entry.published_at() else {
                stats.skipped_undated += 1;
                tracing::debug!(source = %source.name, "Skipping entry without timestamp: {}", entry.title);
                continue;
            };

            if published < cutoff {
                stats.skipped_stale += 1;
                tracing::debug!(source = %source.name, "Skipping entry older than cutoff: {}", entry.title);
                continue;
            }

            if seen.is_duplicate_and_record(compute_fingerprint(&entry.title)) {
                stats.skipped_duplicate += 1;
                tracing::debug!(source = %source.name, "Skipping duplicate: {}", entry.title);
                continue;
            }

            if !is_relevant(&entry.title, &entry.summary, &self.policy) {
                stats.skipped_irrelevant += 1;
                tracing::debug!(source = %source.name, "Skipping irrelevant entry: {}", entry.title);
                continue;
            }

            collection.items.push(NewsItem::new(entry, published, source));
        }
    }

    /// Fetch every source, keeping at most `concurrency` requests in flight.
    ///
    /// Returns one slot per source in configured order; a slot is `None` when
    /// the run deadline passed before that source finished.
    async fn fetch_all(&self) -> (Vec<Option<FetchOutcome>>, bool) {
        let mut outcomes: Vec<Option<FetchOutcome>> = self.sources.iter().map(|_| None).collect();
        let mut join_set: JoinSet<(usize, FetchOutcome)> = JoinSet::new();
        let mut pending = self.sources.iter().cloned().enumerate();
        let deadline = self.run_deadline.map(|d| Instant::now() + d);

        for _ in 0..self.concurrency {
            if let Some((index, source)) = pending.next() {
                self.spawn_fetch(&mut join_set, index, source);
            }
        }

        loop {
            let joined = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, join_set.join_next()).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            tracing::warn!(
                                "Run deadline exceeded, abandoning {} outstanding fetches",
                                join_set.len() + pending.len()
                            );
                            join_set.abort_all();
                            return (outcomes, true);
                        }
                    }
                }
                None => join_set.join_next().await,
            };

            match joined {
                Some(Ok((index, outcome))) => outcomes[index] = Some(outcome),
                Some(Err(e)) => tracing::error!("Fetch task join error: {}", e),
                None => break,
            }

            if let Some((index, source)) = pending.next() {
                self.spawn_fetch(&mut join_set, index, source);
            }
        }

        (outcomes, false)
    }

    fn spawn_fetch(
        &self,
        join_set: &mut JoinSet<(usize, FetchOutcome)>,
        index: usize,
        source: FeedSource,
    ) {
        let fetcher = Arc::clone(&self.fetcher);
        let limit = self.request_timeout;

        join_set.spawn(async move {
            let outcome = match tokio::time::timeout(limit, fetcher.fetch(&source)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(Error::Timeout(format!(
                    "no response from '{}' within {}s",
                    source.name,
                    limit.as_secs()
                ))),
            };
            (index, outcome)
        });
    }
}
