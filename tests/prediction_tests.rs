use std::collections::VecDeque;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use riskprobe::cli::interactive::{self, LineSource, submit_prediction};
use riskprobe::cli::{OutputFormat, PredictArgs, predict_cmd};
use riskprobe::history::History;
use riskprobe::http::ApiClient;
use riskprobe::patient::{PatientRecord, Sample};
use riskprobe::ui::console::Console;
use riskprobe::{ProbeConfig, Result};

struct Scripted(VecDeque<String>);

impl Scripted {
    fn new(lines: &[&str]) -> Self {
        Self(lines.iter().map(|l| l.to_string()).collect())
    }
}

impl LineSource for Scripted {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.0.pop_front())
    }
}

fn client_for(uri: &str) -> ApiClient {
    ApiClient::new(&ProbeConfig::new(uri, 2_000).unwrap()).unwrap()
}

#[tokio::test]
async fn interactive_sends_edited_record() {
    let server = MockServer::start().await;
    let edited = PatientRecord {
        age: 47,
        st_depression: 0.5,
        ..PatientRecord::high_risk()
    };
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(&edited))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "prediction_label": "No Heart Disease",
            "risk_level": "Low",
            "probability_no_disease": 0.91,
            "probability_disease": 0.09,
            "timestamp": "2024-05-01T10:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut lines = vec![""; 13];
    lines[0] = "47";
    lines[9] = "0.5";
    let mut input = Scripted::new(&lines);
    let mut console = Console::new(Vec::new(), false);
    let mut history = History::new();

    let predicted = interactive::run(&client_for(&server.uri()), &mut input, &mut console, &mut history)
        .await
        .unwrap();
    assert!(predicted);
    assert_eq!(history.len(), 1);

    let out = String::from_utf8(console.into_inner()).unwrap();
    assert!(out.contains("INTERACTIVE PREDICTION MODE\n"));
    assert!(out.contains("\nEnter patient data (or press Enter for example values):\n\n"));
    assert!(out.contains("PREDICTION RESULT\n"));
    assert!(out.contains("Prediction: No Heart Disease\n"));
    assert!(out.contains("  No Disease: 91.00%\n"));
    assert!(out.contains("  Disease:    9.00%\n"));
}

#[tokio::test]
async fn interactive_abort_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut input = Scripted::new(&["50"]);
    let mut console = Console::new(Vec::new(), false);
    let mut history = History::new();

    let predicted = interactive::run(&client_for(&server.uri()), &mut input, &mut console, &mut history)
        .await
        .unwrap();
    assert!(!predicted);
    assert!(history.is_empty());
}

#[tokio::test]
async fn rejected_prediction_prints_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "age must be <= 120"})))
        .mount(&server)
        .await;

    let mut console = Console::new(Vec::new(), false);
    let mut history = History::new();
    let predicted = submit_prediction(
        &client_for(&server.uri()),
        &PatientRecord::out_of_range(),
        &mut console,
        &mut history,
    )
    .await
    .unwrap();

    assert!(!predicted);
    assert_eq!(history.entries()[0].status, Some(422));
    assert_eq!(history.entries()[0].outcome, "rejected");
    let out = String::from_utf8(console.into_inner()).unwrap();
    assert!(out.contains("Error: Status Code 422\n"));
    assert!(out.contains("\"detail\": \"age must be <= 120\""));
}

#[tokio::test]
async fn malformed_prediction_body_is_shown_raw() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"label": 1})))
        .mount(&server)
        .await;

    let mut console = Console::new(Vec::new(), false);
    let mut history = History::new();
    let predicted = submit_prediction(
        &client_for(&server.uri()),
        &PatientRecord::low_risk(),
        &mut console,
        &mut history,
    )
    .await
    .unwrap();

    assert!(!predicted);
    let out = String::from_utf8(console.into_inner()).unwrap();
    assert!(out.contains("Unexpected prediction body:"));
    assert!(out.contains("\"label\": 1"));
}

#[tokio::test]
async fn unreachable_service_prints_error_line() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut console = Console::new(Vec::new(), false);
    let mut history = History::new();
    let predicted = submit_prediction(
        &client_for(&format!("http://127.0.0.1:{port}")),
        &PatientRecord::high_risk(),
        &mut console,
        &mut history,
    )
    .await
    .unwrap();

    assert!(!predicted);
    assert_eq!(history.entries()[0].status, None);
    let out = String::from_utf8(console.into_inner()).unwrap();
    assert!(out.starts_with("\nError making prediction: Cannot connect to"));
}

#[tokio::test]
async fn json_prediction_records_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(PatientRecord::low_risk()))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "invalid"})))
        .expect(1)
        .mount(&server)
        .await;

    let args = PredictArgs {
        sample: Some(Sample::LowRisk),
        file: None,
        format: OutputFormat::Json,
    };
    let mut history = History::new();
    let predicted = predict_cmd::run(&client_for(&server.uri()), &args, false, &mut history)
        .await
        .unwrap();

    assert!(!predicted);
    assert_eq!(history.len(), 1);
    assert_eq!(history.entries()[0].status, Some(422));
    assert_eq!(history.entries()[0].outcome, "rejected");
}

#[tokio::test]
async fn json_prediction_transport_failure_is_recorded() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let args = PredictArgs {
        sample: None,
        file: None,
        format: OutputFormat::Json,
    };
    let mut history = History::new();
    let result = predict_cmd::run(
        &client_for(&format!("http://127.0.0.1:{port}")),
        &args,
        false,
        &mut history,
    )
    .await;

    assert!(result.is_err());
    assert_eq!(history.entries()[0].status, None);
    assert!(history.entries()[0].outcome.starts_with("error: "));
}
