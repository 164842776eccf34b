use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::{ProbeError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_DATA_DIR: &str = ".riskprobe";
pub const BASE_URL_ENV: &str = "RISKPROBE_BASE_URL";

/// Resolved harness settings.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub data_dir: PathBuf,
    pub color: bool,
    pub record_history: bool,
}

impl ProbeConfig {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: timeout_from_ms(timeout_ms)?,
            data_dir: default_data_dir(),
            color: false,
            record_history: false,
        })
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    pub fn history_db_path(&self) -> PathBuf {
        self.data_dir.join("history.db")
    }
}

/// Parse the service base URL, rejecting anything that is not plain http(s).
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ProbeError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("URL cannot be empty".to_string()));
    }

    let mut url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed".to_string()));
    }

    // Url::join treats a base without a trailing slash as a file and drops its
    // last segment, so mounted APIs (e.g. http://host/api) need the slash.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn timeout_from_ms(ms: u64) -> Result<Duration> {
    if ms == 0 {
        return Err(ProbeError::InvalidTimeout);
    }
    Ok(Duration::from_millis(ms))
}

fn default_data_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DEFAULT_DATA_DIR)
}

/// Color is on unless disabled explicitly or through `NO_COLOR`.
pub fn color_enabled(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none_or(|value| value.is_empty())
}
