use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::feed::FeedSource;
use crate::relevance::KeywordPolicy;
use crate::{Error, Result};

/// Top-level configuration document.
///
/// `[feeds]` maps a category name to its ordered list of sources. The category
/// order of the document is kept, and it decides the discovery order of the
/// collected items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DigestConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub keywords: KeywordPolicy,
    #[serde(default)]
    pub feeds: IndexMap<String, Vec<FeedEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Size of the collection window in hours
    #[serde(default = "default_hours_back")]
    pub hours_back: u32,
    /// Log level used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            hours_back: default_hours_back(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Per-source request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Whole-run deadline in seconds (0 = no deadline)
    #[serde(default = "default_run_deadline")]
    pub run_deadline_secs: u64,
    /// Number of sources fetched at the same time (1 = sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Maximum redirects followed per request
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Feed bodies above this size are rejected
    #[serde(default = "default_max_feed_bytes")]
    pub max_feed_bytes: usize,
    /// HTTP proxy URL for feed fetching (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            run_deadline_secs: default_run_deadline(),
            concurrency: default_concurrency(),
            max_redirects: default_max_redirects(),
            max_feed_bytes: default_max_feed_bytes(),
            proxy_url: None,
        }
    }
}

/// A feed as written in the configuration document
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub name: String,
    pub url: String,
}

fn default_hours_back() -> u32 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_run_deadline() -> u64 {
    300
}

fn default_concurrency() -> usize {
    4
}

fn default_max_redirects() -> usize {
    10
}

fn default_max_feed_bytes() -> usize {
    5 * 1024 * 1024
}

impl DigestConfig {
    /// Load configuration from a TOML file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse and validate a configuration document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (category, entries) in &self.feeds {
            for (index, entry) in entries.iter().enumerate() {
                if entry.name.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "feed #{} in category '{}' has an empty name",
                        index + 1,
                        category
                    )));
                }
                if entry.url.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "feed '{}' in category '{}' has an empty url",
                        entry.name, category
                    )));
                }
            }
        }

        if self.fetch.concurrency == 0 {
            return Err(Error::Config("fetch.concurrency must be at least 1".into()));
        }

        if self.fetch.request_timeout_secs == 0 {
            return Err(Error::Config(
                "fetch.request_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// All configured sources, in category order then feed order
    pub fn sources(&self) -> Vec<FeedSource> {
        self.feeds
            .iter()
            .flat_map(|(category, entries)| {
                entries.iter().map(move |entry| FeedSource {
                    name: entry.name.trim().to_string(),
                    url: entry.url.trim().to_string(),
                    category: category.clone(),
                })
            })
            .collect()
    }

    /// Get the configuration file path
    /// Always uses ~/.config/newsdigest/config.toml on all platforms
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("newsdigest")
            .join("config.toml")
    }
}
