//! Interactive prediction mode.
//!
//! Prompts for every patient field with the high-risk sample as defaults,
//! then sends the record to `POST /predict`.

use std::io::Write;

use rustyline::error::ReadlineError;

use crate::error::Result;
use crate::history::{History, HistoryEntry};
use crate::http::{ApiClient, HttpMethod, HttpResponse};
use crate::patient::PatientRecord;
use crate::prediction::PredictionResult;
use crate::ui::console::Console;

/// Source of prompted input lines.
pub trait LineSource {
    /// `Ok(None)` means the user aborted (Ctrl-C / Ctrl-D).
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineSource for rustyline::DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

pub fn editor() -> Result<rustyline::DefaultEditor> {
    let config = rustyline::Config::builder()
        .auto_add_history(false)
        .build();
    Ok(rustyline::DefaultEditor::with_config(config)?)
}

/// Run the whole interactive flow. Returns whether a prediction came back.
pub async fn run<S: LineSource, W: Write>(
    client: &ApiClient,
    input: &mut S,
    console: &mut Console<W>,
    history: &mut History,
) -> Result<bool> {
    console.banner("INTERACTIVE PREDICTION MODE")?;
    console.blank()?;
    console.line("Enter patient data (or press Enter for example values):")?;
    console.blank()?;
    console.flush()?;

    let Some(record) = collect_patient(input, console, PatientRecord::high_risk())? else {
        console.blank()?;
        console.line("Cancelled, no prediction requested.")?;
        return Ok(false);
    };

    submit_prediction(client, &record, console, history).await
}

/// Prompt for each field of `defaults`. Empty input keeps the default;
/// unparsable input is reported and also keeps the default.
pub fn collect_patient<S: LineSource, W: Write>(
    input: &mut S,
    console: &mut Console<W>,
    defaults: PatientRecord,
) -> Result<Option<PatientRecord>> {
    let mut record = defaults;

    for (name, default_value) in record.fields() {
        let Some(raw) = input.read_line(&format!("{name} [{default_value}]: "))? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        if let Err(err) = record.set_field(name, raw) {
            tracing::debug!(field = name, "rejected input: {err}");
            console.line(&format!("Invalid value, using default: {default_value}"))?;
            console.flush()?;
        }
    }

    Ok(Some(record))
}

/// POST `record` to `/predict` and record the request in `history`.
pub async fn send_prediction(
    client: &ApiClient,
    record: &PatientRecord,
    history: &mut History,
) -> Result<HttpResponse> {
    let url = client.url_for("/predict")?.to_string();
    let sent = client.post_json("/predict", record).await;

    let outcome = match &sent {
        Ok(response) if response.status == 200 => "prediction",
        Ok(_) => "rejected",
        Err(_) => "error",
    };
    history.push(HistoryEntry::from_result(
        HttpMethod::Post,
        &url,
        outcome,
        sent.as_ref(),
    ));

    sent
}

/// Send `record` to `/predict` and print the outcome block.
pub async fn submit_prediction<W: Write>(
    client: &ApiClient,
    record: &PatientRecord,
    console: &mut Console<W>,
    history: &mut History,
) -> Result<bool> {
    let response = match send_prediction(client, record, history).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!("prediction request failed: {err}");
            console.blank()?;
            console.line(&format!("Error making prediction: {err}"))?;
            return Ok(false);
        }
    };

    console.banner("PREDICTION RESULT")?;
    let predicted = if response.status == 200 {
        match response.json::<PredictionResult>() {
            Ok(result) => {
                console.print_prediction(&result)?;
                true
            }
            Err(err) => {
                console.line(&format!("Unexpected prediction body: {err}"))?;
                console.line(&response.pretty_body())?;
                false
            }
        }
    } else {
        console.line(&format!("Error: Status Code {}", response.status))?;
        console.line(&response.pretty_body())?;
        false
    };
    console.rule()?;

    Ok(predicted)
}
