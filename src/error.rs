use thiserror::Error;

/// Configuration problems. Always fatal at load time, before any cycle runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}")]
    Parse { key: String, value: String },

    #[error("{key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// A bar sequence that violates the series contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index} is not after the previous bar")]
    NotIncreasing { index: usize },

    #[error("bar {index} carries a non-finite price")]
    NonFinite { index: usize },
}

/// Errors raised inside a `BarProvider` implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider error: {0}")]
    Api(String),

    #[error("cannot decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no data loaded for {0}")]
    NotLoaded(String),

    #[error("provider returned no bars")]
    Empty,

    #[error("corrupt series: {0}")]
    Corrupt(#[from] SeriesError),
}
