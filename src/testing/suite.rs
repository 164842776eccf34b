use crate::error::Result;
use crate::http::RequestInput;
use crate::patient::{PatientRecord, batch_sample, missing_fields_payload};

use super::{Assertion, TestCase};

const OK: u16 = 200;
const UNPROCESSABLE: u16 = 422;

fn case(name: &str, title: &str, request: RequestInput, expected_status: u16) -> TestCase {
    TestCase {
        name: name.to_string(),
        title: format!("TEST: {title}"),
        request,
        assertion: Assertion::status(expected_status),
    }
}

/// The full endpoint suite, in execution order.
pub fn default_suite() -> Result<Vec<TestCase>> {
    let batch = batch_sample();

    Ok(vec![
        case("Root Endpoint", "Root Endpoint", RequestInput::get("/"), OK),
        case("Health Check", "Health Check", RequestInput::get("/health"), OK),
        case(
            "Model Information",
            "Model Information",
            RequestInput::get("/model/info"),
            OK,
        ),
        case("Feature List", "Feature List", RequestInput::get("/features"), OK),
        case(
            "Single Prediction (High Risk)",
            "Single Prediction (High Risk Case)",
            RequestInput::post_json("/predict", &PatientRecord::high_risk())?,
            OK,
        ),
        case(
            "Single Prediction (Low Risk)",
            "Single Prediction (Low Risk Case)",
            RequestInput::post_json("/predict", &PatientRecord::low_risk())?,
            OK,
        ),
        case(
            "Batch Prediction",
            &format!("Batch Prediction ({} patients)", batch.len()),
            RequestInput::post_json("/predict/batch", &batch)?,
            OK,
        ),
        case(
            "Invalid Input Handling",
            "Invalid Input (Missing Fields)",
            RequestInput::post_json("/predict", &missing_fields_payload())?,
            UNPROCESSABLE,
        ),
        case(
            "Out-of-Range Value Handling",
            "Out-of-Range Values",
            RequestInput::post_json("/predict", &PatientRecord::out_of_range())?,
            UNPROCESSABLE,
        ),
    ])
}

/// Keep cases whose name contains any of `patterns`, ignoring case. No
/// patterns keeps everything.
pub fn filter_cases(cases: Vec<TestCase>, patterns: &[String]) -> Vec<TestCase> {
    if patterns.is_empty() {
        return cases;
    }

    let patterns: Vec<String> = patterns.iter().map(|p| p.to_lowercase()).collect();
    cases
        .into_iter()
        .filter(|case| {
            let name = case.name.to_lowercase();
            patterns.iter().any(|p| name.contains(p.as_str()))
        })
        .collect()
}
