use std::io::{self, Write};

use crate::history::HistoryEntry;
use crate::http::HttpResponse;
use crate::prediction::{PredictionResult, format_probability};
use crate::testing::{RunReport, TestOutcome};

use super::style;

pub const RULE_WIDTH: usize = 80;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Line-oriented reporter over any writer.
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl Console<io::Sink> {
    /// Swallows everything; used when only the JSON report should reach stdout.
    pub fn silent() -> Self {
        Self::new(io::sink(), false)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", rule())
    }

    pub fn banner(&mut self, title: &str) -> io::Result<()> {
        self.blank()?;
        self.rule()?;
        writeln!(self.out, "{}", style::paint(title, style::BOLD, self.color))?;
        self.rule()
    }

    pub fn print_response(&mut self, title: &str, response: &HttpResponse) -> io::Result<()> {
        self.banner(title)?;
        let status = style::paint(
            &response.status.to_string(),
            style::status_code_color(response.status),
            self.color,
        );
        writeln!(self.out, "Status Code: {status}")?;
        writeln!(self.out, "Response:")?;
        writeln!(self.out, "{}", response.pretty_body())
    }

    pub fn print_error(&mut self, name: &str, message: &str) -> io::Result<()> {
        self.blank()?;
        self.rule()?;
        let text = format!("ERROR in {name}: {message}");
        writeln!(self.out, "{}", style::paint(&text, style::DANGER, self.color))?;
        self.rule()
    }

    pub fn print_summary(&mut self, report: &RunReport) -> io::Result<()> {
        self.banner("TEST SUMMARY")?;
        for result in &report.results {
            // Pad before painting so escape codes don't eat into the width.
            let label = format!("{:<12}", result.outcome.label());
            let color = match result.outcome {
                TestOutcome::Passed => style::PRIMARY,
                _ => style::DANGER,
            };
            writeln!(
                self.out,
                "{} {}",
                style::paint(&label, color, self.color),
                result.name
            )?;
        }
        self.blank()?;
        writeln!(
            self.out,
            "Total: {}/{} tests passed",
            report.passed, report.total
        )?;
        self.rule()
    }

    pub fn print_prediction(&mut self, result: &PredictionResult) -> io::Result<()> {
        self.blank()?;
        writeln!(self.out, "Prediction: {}", result.prediction_label)?;
        writeln!(self.out, "Risk Level: {}", result.risk_level)?;
        self.blank()?;
        writeln!(self.out, "Probabilities:")?;
        writeln!(
            self.out,
            "  No Disease: {}",
            format_probability(result.probability_no_disease)
        )?;
        writeln!(
            self.out,
            "  Disease:    {}",
            format_probability(result.probability_disease)
        )?;
        self.blank()?;
        writeln!(self.out, "Timestamp: {}", result.timestamp)
    }

    pub fn print_history(&mut self, entries: &[HistoryEntry]) -> io::Result<()> {
        if entries.is_empty() {
            return writeln!(self.out, "No recorded requests.");
        }

        for entry in entries {
            let when = chrono::DateTime::from_timestamp(entry.timestamp as i64, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| entry.timestamp.to_string());
            let status = match entry.status {
                Some(code) => style::paint(&format!("{code:<3}"), style::status_code_color(code), self.color),
                None => style::paint("---", style::TEXT_MUTED, self.color),
            };
            let duration = entry
                .duration_ms
                .map(|ms| format!("{ms} ms"))
                .unwrap_or_default();
            let method = style::paint(
                &format!("{:<4}", entry.method.to_string()),
                style::method_color(entry.method),
                self.color,
            );
            writeln!(
                self.out,
                "{when}  {method} {status}  {:<8} {}  {}",
                duration, entry.url, entry.outcome
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
