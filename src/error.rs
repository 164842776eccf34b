//! Error types shared by the client, runner and storage layers.

/// All errors the harness can produce.
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    #[error("Invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid timeout: must be greater than 0 ms")]
    InvalidTimeout,

    #[error("Cannot connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Unknown patient field `{0}`")]
    UnknownField(String),

    #[error("Invalid value `{value}` for `{field}`: expected {expected}")]
    InvalidFieldValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl ProbeError {
    /// Whether the error means the service could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, ProbeError::Connect { .. })
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
