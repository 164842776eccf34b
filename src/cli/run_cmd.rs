//! Run the endpoint test suite.

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};

use crate::cli::{OutputFormat, RunArgs};
use crate::history::History;
use crate::http::ApiClient;
use crate::testing::{RunReport, TestCase, default_suite, filter_cases, run_suite};
use crate::ui::console::Console;

pub const SUITE_TITLE: &str = "HEART DISEASE PREDICTION API - TEST SUITE";

/// Returns whether every selected case passed.
pub async fn run(
    client: &ApiClient,
    args: &RunArgs,
    color: bool,
    history: &mut History,
) -> Result<bool> {
    let cases = filter_cases(default_suite()?, &args.only);
    if cases.is_empty() {
        anyhow::bail!("No tests match {:?}", args.only);
    }

    let report = match args.format {
        OutputFormat::Text => {
            let mut console = Console::stdout(color);
            let report = run_text(client, &cases, &mut console, history).await?;
            console.flush()?;
            report
        }
        OutputFormat::Json => {
            let mut console = Console::silent();
            let report = run_suite(client, &cases, &mut console, history).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            report
        }
    };

    if let Some(path) = &args.report {
        let raw = serde_json::to_string_pretty(&report)?;
        fs::write(path, raw)
            .with_context(|| format!("Failed to write report file `{}`", path.display()))?;
        tracing::info!(path = %path.display(), "wrote JSON report");
    }

    Ok(report.success())
}

/// Human-readable run: preamble, every response, summary, closing hint.
pub async fn run_text<W: Write>(
    client: &ApiClient,
    cases: &[TestCase],
    console: &mut Console<W>,
    history: &mut History,
) -> Result<RunReport> {
    console.blank()?;
    console.line("Make sure the API is running: uvicorn api.main:app --reload")?;
    console.line("Or with Docker: docker-compose up")?;
    console.blank()?;
    console.banner(SUITE_TITLE)?;

    let report = run_suite(client, cases, console, history).await?;
    console.print_summary(&report)?;

    if report.all_unreachable() {
        console.blank()?;
        let base = client.base_url().as_str().trim_end_matches('/');
        console.line(&format!("❌ ERROR: Cannot connect to API at {base}"))?;
        console.line("Please make sure the API is running!")?;
    } else {
        console.blank()?;
        console.blank()?;
        console.line("Run 'riskprobe --interactive' for interactive prediction mode")?;
    }

    Ok(report)
}
