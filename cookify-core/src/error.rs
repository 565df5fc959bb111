use thiserror::Error;

/// Failure of a single remote fetch, or of a whole retried fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Connection-level failure reported without a reqwest error.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// Every attempt failed. Carries the last attempt's message.
    #[error("Failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },
}

/// Key-value store I/O failure. Always swallowed by callers.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode store record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Corrupt cache entry for {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stored ingredient or recipe list is not the expected shape.
#[derive(Error, Debug)]
#[error("Malformed local state under {key}: {reason}")]
pub struct LocalStateError {
    pub key: String,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid value for {var}: {value}")]
    InvalidEnvVar { var: String, value: String },
}

/// The one failure a search surfaces to the presentation layer.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Recipe source is misconfigured: {0}")]
    Config(#[from] ConfigError),

    #[error("No candidates could be produced for {ingredient_count} ingredients")]
    NoCandidates { ingredient_count: usize },
}

impl SearchError {
    /// Whether a retry action makes sense for this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::NoCandidates { .. })
    }
}
