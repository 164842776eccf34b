//! One-shot prediction for a sample record or a JSON file.

use anyhow::{Context, Result};

use crate::cli::interactive::{send_prediction, submit_prediction};
use crate::cli::{OutputFormat, PredictArgs};
use crate::history::History;
use crate::http::ApiClient;
use crate::patient::{PatientRecord, Sample};
use crate::ui::console::Console;

pub fn resolve_record(args: &PredictArgs) -> Result<PatientRecord> {
    match (&args.file, args.sample) {
        (Some(path), _) => PatientRecord::load(path)
            .with_context(|| format!("Failed to load patient record from `{}`", path.display())),
        (None, Some(sample)) => Ok(sample.record()),
        (None, None) => Ok(Sample::HighRisk.record()),
    }
}

/// Returns whether the service produced a prediction.
pub async fn run(
    client: &ApiClient,
    args: &PredictArgs,
    color: bool,
    history: &mut History,
) -> Result<bool> {
    let record = resolve_record(args)?;

    match args.format {
        OutputFormat::Text => {
            let mut console = Console::stdout(color);
            Ok(submit_prediction(client, &record, &mut console, history).await?)
        }
        OutputFormat::Json => {
            let response = send_prediction(client, &record, history).await?;
            println!("{}", response.pretty_body());
            Ok(response.status == 200)
        }
    }
}
