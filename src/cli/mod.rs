//! # CLI Support
//!
//! Command-line surface: the suite runner for CI pipelines, ad-hoc
//! predictions, and the request history.

pub mod history_cmd;
pub mod interactive;
pub mod predict_cmd;
pub mod run_cmd;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::config::{self, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, ProbeConfig};
use crate::history::History;
use crate::patient::Sample;
use crate::storage;

#[derive(Parser, Debug)]
#[command(
    name = "riskprobe",
    about = "Endpoint checks and ad-hoc predictions for the disease prediction API",
    version,
    after_help = "Run 'riskprobe <command> --help' for details on each command.\nRun 'riskprobe' with no command to run the full test suite."
)]
pub struct Cli {
    /// Base URL of the prediction service
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Directory holding the history database
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Record every request in the history database
    #[arg(long, global = true)]
    pub record: bool,

    /// Shorthand for the `interactive` command
    #[arg(long)]
    pub interactive: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the endpoint test suite (default)
    Run(RunArgs),
    /// Prompt for patient data and request a prediction
    Interactive,
    /// Request a single prediction for a sample record or a JSON file
    Predict(PredictArgs),
    /// Show or clear recorded requests
    History(HistoryArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Only run tests whose name contains PATTERN (case-insensitive). Can be repeated.
    #[arg(long = "only", value_name = "PATTERN")]
    pub only: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Built-in sample record (defaults to high-risk)
    #[arg(long, value_enum, conflicts_with = "file")]
    pub sample: Option<Sample>,

    /// JSON file containing a patient record
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Delete all recorded requests
    #[arg(long)]
    pub clear: bool,
}

/// Output format for CLI reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    pub fn config(&self) -> crate::error::Result<ProbeConfig> {
        let mut config = ProbeConfig::new(&self.base_url, self.timeout_ms)?
            .with_color(config::color_enabled(self.no_color))
            .with_history(self.record);
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        Ok(config)
    }

    /// The command to execute, resolving `--interactive` and the default.
    pub fn resolved_command(&self) -> Commands {
        match (&self.command, self.interactive) {
            (Some(command), _) => command.clone(),
            (None, true) => Commands::Interactive,
            (None, false) => Commands::Run(RunArgs::default()),
        }
    }
}

/// Write buffered requests to the history database when recording is on.
/// Storage problems are logged, never fatal.
pub fn persist_history(config: &ProbeConfig, history: &History) {
    if !config.record_history || history.is_empty() {
        return;
    }

    let path = config.history_db_path();
    let stored = storage::open_db(&path).and_then(|mut conn| storage::append_history(&mut conn, history));
    match stored {
        Ok(count) => tracing::debug!(count, path = %path.display(), "recorded requests"),
        Err(err) => tracing::warn!(path = %path.display(), "failed to record history: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_command_means_run() {
        let cli = Cli::try_parse_from(["riskprobe"]).unwrap();
        assert!(matches!(cli.resolved_command(), Commands::Run(args) if args.only.is_empty()));
    }

    #[test]
    fn interactive_flag_maps_to_command() {
        let cli = Cli::try_parse_from(["riskprobe", "--interactive"]).unwrap();
        assert!(matches!(cli.resolved_command(), Commands::Interactive));
    }

    #[test]
    fn run_args_parse() {
        let cli = Cli::try_parse_from([
            "riskprobe",
            "run",
            "--only",
            "health",
            "--only",
            "batch",
            "--format",
            "json",
            "--base-url",
            "http://api.internal:9000",
        ])
        .unwrap();

        match cli.resolved_command() {
            Commands::Run(args) => {
                assert_eq!(args.only, vec!["health", "batch"]);
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        let config = cli.config().unwrap();
        assert_eq!(config.base_url.as_str(), "http://api.internal:9000/");
    }

    #[test]
    fn predict_sample_and_file_conflict() {
        let parsed = Cli::try_parse_from([
            "riskprobe",
            "predict",
            "--sample",
            "low-risk",
            "--file",
            "p.json",
        ]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from(["riskprobe", "predict", "--sample", "elevated-risk"]).unwrap();
        assert!(matches!(
            cli.resolved_command(),
            Commands::Predict(PredictArgs { sample: Some(Sample::ElevatedRisk), .. })
        ));
    }

    #[test]
    fn persist_history_is_noop_without_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProbeConfig::new(DEFAULT_BASE_URL, 100)
            .unwrap()
            .with_data_dir(dir.path().join("data"));
        let mut history = History::new();
        history.push(crate::history::HistoryEntry {
            timestamp: 0,
            method: crate::http::HttpMethod::Get,
            url: "http://localhost:8000/".into(),
            status: Some(200),
            duration_ms: Some(1),
            outcome: "passed".into(),
        });

        persist_history(&config, &history);
        assert!(!config.history_db_path().exists());

        persist_history(&config.clone().with_history(true), &history);
        assert!(config.history_db_path().exists());
    }
}
