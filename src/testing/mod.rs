//! # Testing & Assertions
//!
//! Test cases against the prediction service, the sequential runner, and the
//! summary report.

pub mod suite;

use std::io::Write;
use std::time::Instant;

use serde::Serialize;

use crate::error::Result;
use crate::history::{History, HistoryEntry};
use crate::http::{ApiClient, HttpResponse, RequestInput};
use crate::ui::console::Console;

pub use suite::{default_suite, filter_cases};

/// Expected status code for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assertion {
    pub expected_status: u16,
}

impl Assertion {
    pub fn status(expected_status: u16) -> Self {
        Self { expected_status }
    }

    pub fn evaluate(&self, response: &HttpResponse) -> bool {
        response.status == self.expected_status
    }
}

#[derive(Debug, Clone)]
pub struct TestCase {
    /// Label used in the summary.
    pub name: String,
    /// Banner printed above the response.
    pub title: String,
    pub request: RequestInput,
    pub assertion: Assertion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    Failed { actual: u16 },
    Error { message: String, connect: bool },
}

impl TestOutcome {
    /// Summary label, e.g. `✓ PASSED`.
    pub fn label(&self) -> String {
        match self {
            TestOutcome::Passed => "✓ PASSED".to_string(),
            TestOutcome::Failed { .. } => "✗ FAILED".to_string(),
            TestOutcome::Error { message, .. } => format!("✗ ERROR: {message}"),
        }
    }

    fn history_label(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "passed",
            TestOutcome::Failed { .. } => "failed",
            TestOutcome::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    #[serde(flatten)]
    pub outcome: TestOutcome,
    pub expected_status: u16,
    pub status: Option<u16>,
    pub duration_ms: u64,
}

/// Summary report for a suite run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl RunReport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, result: TestResult) {
        self.total += 1;
        match result.outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed { .. } => self.failed += 1,
            TestOutcome::Error { .. } => self.errored += 1,
        }
        self.results.push(result);
    }

    pub fn success(&self) -> bool {
        self.passed == self.total
    }

    /// True when the suite ran and not a single request reached the service.
    pub fn all_unreachable(&self) -> bool {
        !self.results.is_empty()
            && self
                .results
                .iter()
                .all(|r| matches!(r.outcome, TestOutcome::Error { connect: true, .. }))
    }
}

/// Execute `cases` one after another, printing each response to `console`
/// and recording every request in `history`.
pub async fn run_suite<W: Write>(
    client: &ApiClient,
    cases: &[TestCase],
    console: &mut Console<W>,
    history: &mut History,
) -> Result<RunReport> {
    let started = Instant::now();
    let mut report = RunReport::new(client.base_url().as_str());
    tracing::info!(base_url = %client.base_url(), cases = cases.len(), "starting test suite");

    for case in cases {
        let result = run_case(client, case, console, history).await?;
        if !matches!(result.outcome, TestOutcome::Passed) {
            tracing::warn!(test = %case.name, outcome = %result.outcome.label(), "test did not pass");
        }
        report.record(result);
    }

    report.duration_ms = started.elapsed().as_millis() as u64;
    tracing::info!(
        passed = report.passed,
        total = report.total,
        duration_ms = report.duration_ms,
        "test suite finished"
    );

    Ok(report)
}

async fn run_case<W: Write>(
    client: &ApiClient,
    case: &TestCase,
    console: &mut Console<W>,
    history: &mut History,
) -> Result<TestResult> {
    let url = client
        .url_for(&case.request.path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| case.request.path.clone());
    let sent = client.send(&case.request).await;

    let (outcome, status, duration_ms) = match &sent {
        Ok(response) => {
            console.print_response(&case.title, response)?;
            let outcome = if case.assertion.evaluate(response) {
                TestOutcome::Passed
            } else {
                TestOutcome::Failed {
                    actual: response.status,
                }
            };
            (outcome, Some(response.status), response.duration_ms as u64)
        }
        Err(err) => {
            let message = err.to_string();
            console.print_error(&case.name, &message)?;
            (
                TestOutcome::Error {
                    message,
                    connect: err.is_connect(),
                },
                None,
                0,
            )
        }
    };

    history.push(HistoryEntry::from_result(
        case.request.method,
        &url,
        outcome.history_label(),
        sent.as_ref(),
    ));

    Ok(TestResult {
        name: case.name.clone(),
        outcome,
        expected_status: case.assertion.expected_status,
        status,
        duration_ms,
    })
}
