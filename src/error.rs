use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a single fetch chain ended without a saved page.
///
/// The `Display` output of each variant is the exact message carried by
/// [`FetchResult::Failure`](crate::fetcher::FetchResult) and printed to the report sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Invalid URL")]
    InvalidUrl,

    /// DNS, connection, TLS, timeout, body read, or a response that could not be processed.
    #[error("Error crawling {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to crawl {url}: {code} {reason}")]
    HttpStatus {
        url: String,
        code: u16,
        reason: String,
    },

    #[error("Error crawling {url}: Too many redirects")]
    TooManyRedirects { url: String },
}

impl FetchError {
    pub fn transport(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        FetchError::Transport {
            url: url.into(),
            message: err.to_string(),
        }
    }

    /// Like [`FetchError::transport`], but the message walks `err`'s `source()` chain so
    /// the root cause (connection refused, DNS, TLS) is not lost behind a generic wrapper.
    pub fn transport_chain(url: impl Into<String>, err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let cause_msg = cause.to_string();
            if !message.contains(&cause_msg) {
                message = format!("{}: {}", message, cause_msg);
            }
            source = cause.source();
        }
        FetchError::Transport {
            url: url.into(),
            message,
        }
    }
}
