use serde::{Deserialize, Serialize};

/// Body of a successful `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction_label: String,
    pub risk_level: String,
    pub probability_no_disease: f64,
    pub probability_disease: f64,
    #[serde(default)]
    pub timestamp: String,
}

/// `0.8734` -> `87.34%`
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}
