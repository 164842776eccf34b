//! # Request History
//!
//! Buffers the requests made during one invocation so they can be written to
//! the history database afterwards.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::http::{HttpMethod, HttpResponse};

/// Maximum number of history entries to retain in memory.
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// A single history entry recording a past request and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: u64,
    pub method: HttpMethod,
    pub url: String,
    pub status: Option<u16>,
    pub duration_ms: Option<u64>,
    pub outcome: String,
}

impl HistoryEntry {
    pub fn from_result(
        method: HttpMethod,
        url: &str,
        outcome: &str,
        result: Result<&HttpResponse, &ProbeError>,
    ) -> Self {
        let (status, duration_ms, outcome) = match result {
            Ok(response) => (
                Some(response.status),
                Some(response.duration_ms as u64),
                outcome.to_string(),
            ),
            Err(err) => (None, None, format!("{outcome}: {err}")),
        };

        Self {
            timestamp: current_unix_timestamp(),
            method,
            url: url.to_string(),
            status,
            duration_ms,
            outcome,
        }
    }
}

/// Newest-first request list, bounded at [`MAX_HISTORY_ENTRIES`].
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Add an entry to the front of the history list, evicting the oldest
    /// entry if the list exceeds the maximum size.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() >= MAX_HISTORY_ENTRIES {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    /// Return all history entries (most recent first).
    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(url: &str) -> HistoryEntry {
        HistoryEntry {
            timestamp: 0,
            method: HttpMethod::Get,
            url: url.to_string(),
            status: None,
            duration_ms: None,
            outcome: String::new(),
        }
    }

    #[test]
    fn push_and_retrieve() {
        let mut history = History::new();
        history.push(make_entry("http://localhost:8000/"));
        history.push(make_entry("http://localhost:8000/health"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].url, "http://localhost:8000/health");
        assert_eq!(history.entries()[1].url, "http://localhost:8000/");
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut history = History::new();
        for i in 0..MAX_HISTORY_ENTRIES + 5 {
            history.push(make_entry(&format!("http://localhost:8000/{i}")));
        }
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        // Most recent is first
        assert_eq!(
            history.entries()[0].url,
            format!("http://localhost:8000/{}", MAX_HISTORY_ENTRIES + 4)
        );
    }

    #[test]
    fn entry_from_response_keeps_status() {
        let response = HttpResponse {
            status: 422,
            status_text: "Unprocessable Entity".into(),
            duration_ms: 12,
            size_bytes: 0,
            body: String::new(),
        };
        let entry = HistoryEntry::from_result(
            HttpMethod::Post,
            "http://localhost:8000/predict",
            "passed",
            Ok(&response),
        );
        assert_eq!(entry.status, Some(422));
        assert_eq!(entry.duration_ms, Some(12));
        assert_eq!(entry.outcome, "passed");
    }

    #[test]
    fn entry_from_error_has_no_status() {
        let err = ProbeError::UnknownField("x".into());
        let entry = HistoryEntry::from_result(HttpMethod::Get, "http://h/", "error", Err(&err));
        assert_eq!(entry.status, None);
        assert!(entry.outcome.starts_with("error: "));
    }
}
