use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use riskprobe::cli::{self, Cli, Commands};
use riskprobe::history::History;
use riskprobe::http::ApiClient;
use riskprobe::ui::console::Console;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match execute(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatch the command. `Ok(false)` means it ran but the checks did not pass.
async fn execute(cli: &Cli) -> Result<bool> {
    let config = cli.config()?;
    let command = cli.resolved_command();

    match &command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "riskprobe", &mut std::io::stdout());
            return Ok(true);
        }
        Commands::History(args) => {
            cli::history_cmd::run(&config, args)?;
            return Ok(true);
        }
        _ => {}
    }

    let client = ApiClient::new(&config)?;
    let mut history = History::new();

    let result = match command {
        Commands::Run(args) => cli::run_cmd::run(&client, &args, config.color, &mut history).await,
        Commands::Predict(args) => {
            cli::predict_cmd::run(&client, &args, config.color, &mut history).await
        }
        Commands::Interactive => {
            let mut editor = cli::interactive::editor()?;
            let mut console = Console::stdout(config.color);
            cli::interactive::run(&client, &mut editor, &mut console, &mut history)
                .await
                .map_err(Into::into)
        }
        Commands::History(_) | Commands::Completions { .. } => Ok(true),
    };

    cli::persist_history(&config, &history);
    result
}
