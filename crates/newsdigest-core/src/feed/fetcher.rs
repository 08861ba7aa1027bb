use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING};
use reqwest::{Client, Proxy, Response};
use url::Url;

use super::models::{FeedSource, RawFeedEntry};
use super::parser::parse_feed;
use crate::config::FetchConfig;
use crate::{Error, Result};

const USER_AGENT: &str = concat!("newsdigest/", env!("CARGO_PKG_VERSION"));

/// Retrieves and parses one feed source.
///
/// Any error returned is scoped to that source; the collector logs it and
/// moves on to the next one.
#[async_trait]
pub trait FetchFeed: Send + Sync {
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<RawFeedEntry>>;
}

/// HTTP feed fetcher. One attempt per call, bounded by the request timeout.
pub struct FeedFetcher {
    client: Client,
    max_feed_bytes: usize,
}

impl FeedFetcher {
    /// Create a new feed fetcher with configuration
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Self::build_client(config)?;

        Ok(Self {
            client,
            max_feed_bytes: config.max_feed_bytes,
        })
    }

    /// Use an already configured client
    pub fn with_client(client: Client, max_feed_bytes: usize) -> Self {
        Self {
            client,
            max_feed_bytes,
        }
    }

    /// Build HTTP client with optional proxy
    fn build_client(config: &FetchConfig) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(Self::build_headers())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        if let Some(ref proxy) = config.proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for feed fetching");
        }

        builder.build().map_err(Error::Http)
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "application/rss+xml,application/atom+xml,application/feed+json,application/xml;q=0.9,text/xml;q=0.8,*/*;q=0.5",
            ),
        );
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
        headers
    }

    async fn read_body(&self, response: Response, url: &str) -> Result<Bytes> {
        if let Some(len) = response.content_length() {
            self.ensure_content_size(len as usize, url)?;
        }

        let body = response.bytes().await?;
        self.ensure_content_size(body.len(), url)?;
        Ok(body)
    }

    fn ensure_content_size(&self, size: usize, url: &str) -> Result<()> {
        if size > self.max_feed_bytes {
            return Err(Error::FeedTooLarge {
                size,
                url: url.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FetchFeed for FeedFetcher {
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<RawFeedEntry>> {
        let url = Url::parse(&source.url)?;

        tracing::info!("Fetching feed '{}' from: {}", source.name, url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status,
                url: source.url.clone(),
            });
        }

        let content = self.read_body(response, &source.url).await?;
        parse_feed(&content)
    }
}
