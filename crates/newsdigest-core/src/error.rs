use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for URL: {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Feed too large ({size} bytes) for URL: {url}")]
    FeedTooLarge { size: usize, url: String },

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
