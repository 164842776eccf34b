//! Patient records sent to the prediction endpoint, plus the hardcoded
//! sample payloads the suite and the CLI use.

use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ProbeError, Result};

/// The clinical features the prediction endpoint expects, in wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: i64,
    pub sex: i64,
    pub chest_pain_type: i64,
    pub resting_blood_pressure: i64,
    pub cholesterol: i64,
    pub fasting_blood_sugar: i64,
    pub resting_ecg: i64,
    pub max_heart_rate: i64,
    pub exercise_induced_angina: i64,
    pub st_depression: f64,
    pub st_slope: i64,
    pub num_major_vessels: i64,
    pub thalassemia: i64,
}

/// Value of a single feature, keeping the integer/float distinction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{value}"),
            // `{:?}` keeps the trailing `.0` on whole floats.
            FieldValue::Float(value) => write!(f, "{value:?}"),
        }
    }
}

pub const FIELD_NAMES: [&str; 13] = [
    "age",
    "sex",
    "chest_pain_type",
    "resting_blood_pressure",
    "cholesterol",
    "fasting_blood_sugar",
    "resting_ecg",
    "max_heart_rate",
    "exercise_induced_angina",
    "st_depression",
    "st_slope",
    "num_major_vessels",
    "thalassemia",
];

impl PatientRecord {
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        FIELD_NAMES
            .iter()
            .filter_map(|name| self.field(name).map(|value| (*name, value)))
            .collect()
    }

    pub fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "age" => FieldValue::Integer(self.age),
            "sex" => FieldValue::Integer(self.sex),
            "chest_pain_type" => FieldValue::Integer(self.chest_pain_type),
            "resting_blood_pressure" => FieldValue::Integer(self.resting_blood_pressure),
            "cholesterol" => FieldValue::Integer(self.cholesterol),
            "fasting_blood_sugar" => FieldValue::Integer(self.fasting_blood_sugar),
            "resting_ecg" => FieldValue::Integer(self.resting_ecg),
            "max_heart_rate" => FieldValue::Integer(self.max_heart_rate),
            "exercise_induced_angina" => FieldValue::Integer(self.exercise_induced_angina),
            "st_depression" => FieldValue::Float(self.st_depression),
            "st_slope" => FieldValue::Integer(self.st_slope),
            "num_major_vessels" => FieldValue::Integer(self.num_major_vessels),
            "thalassemia" => FieldValue::Integer(self.thalassemia),
            _ => return None,
        };
        Some(value)
    }

    /// Parse `raw` according to the field's kind and store it. On error the
    /// record is unchanged.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<()> {
        let current = self
            .field(name)
            .ok_or_else(|| ProbeError::UnknownField(name.to_string()))?;
        let raw = raw.trim();
        let invalid = |expected: &'static str| ProbeError::InvalidFieldValue {
            field: name.to_string(),
            value: raw.to_string(),
            expected,
        };

        match current {
            FieldValue::Integer(_) => {
                let value: i64 = raw.parse().map_err(|_| invalid("an integer"))?;
                *self.integer_slot(name).ok_or_else(|| ProbeError::UnknownField(name.to_string()))? = value;
            }
            FieldValue::Float(_) => {
                let value: f64 = raw.parse().map_err(|_| invalid("a number"))?;
                if !value.is_finite() {
                    return Err(invalid("a finite number"));
                }
                self.st_depression = value;
            }
        }

        Ok(())
    }

    fn integer_slot(&mut self, name: &str) -> Option<&mut i64> {
        let slot = match name {
            "age" => &mut self.age,
            "sex" => &mut self.sex,
            "chest_pain_type" => &mut self.chest_pain_type,
            "resting_blood_pressure" => &mut self.resting_blood_pressure,
            "cholesterol" => &mut self.cholesterol,
            "fasting_blood_sugar" => &mut self.fasting_blood_sugar,
            "resting_ecg" => &mut self.resting_ecg,
            "max_heart_rate" => &mut self.max_heart_rate,
            "exercise_induced_angina" => &mut self.exercise_induced_angina,
            "st_slope" => &mut self.st_slope,
            "num_major_vessels" => &mut self.num_major_vessels,
            "thalassemia" => &mut self.thalassemia,
            _ => return None,
        };
        Some(slot)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn high_risk() -> Self {
        Self {
            age: 63,
            sex: 1,
            chest_pain_type: 3,
            resting_blood_pressure: 145,
            cholesterol: 233,
            fasting_blood_sugar: 1,
            resting_ecg: 0,
            max_heart_rate: 150,
            exercise_induced_angina: 0,
            st_depression: 2.3,
            st_slope: 0,
            num_major_vessels: 0,
            thalassemia: 1,
        }
    }

    pub fn low_risk() -> Self {
        Self {
            age: 35,
            sex: 0,
            chest_pain_type: 0,
            resting_blood_pressure: 120,
            cholesterol: 180,
            fasting_blood_sugar: 0,
            resting_ecg: 0,
            max_heart_rate: 180,
            exercise_induced_angina: 0,
            st_depression: 0.0,
            st_slope: 1,
            num_major_vessels: 0,
            thalassemia: 2,
        }
    }

    pub fn moderate_risk() -> Self {
        Self {
            age: 45,
            sex: 0,
            chest_pain_type: 1,
            resting_blood_pressure: 130,
            cholesterol: 200,
            fasting_blood_sugar: 0,
            resting_ecg: 1,
            max_heart_rate: 165,
            exercise_induced_angina: 0,
            st_depression: 0.8,
            st_slope: 1,
            num_major_vessels: 0,
            thalassemia: 2,
        }
    }

    pub fn elevated_risk() -> Self {
        Self {
            age: 55,
            sex: 1,
            chest_pain_type: 2,
            resting_blood_pressure: 140,
            cholesterol: 250,
            fasting_blood_sugar: 1,
            resting_ecg: 0,
            max_heart_rate: 140,
            exercise_induced_angina: 1,
            st_depression: 1.5,
            st_slope: 2,
            num_major_vessels: 1,
            thalassemia: 2,
        }
    }

    /// The high-risk record with an impossible age.
    pub fn out_of_range() -> Self {
        Self {
            age: 200,
            ..Self::high_risk()
        }
    }
}

pub fn batch_sample() -> Vec<PatientRecord> {
    vec![
        PatientRecord::high_risk(),
        PatientRecord::moderate_risk(),
        PatientRecord::elevated_risk(),
    ]
}

/// A payload missing every field except `age` and `sex`.
pub fn missing_fields_payload() -> Value {
    json!({
        "age": 50,
        "sex": 1
    })
}

/// Named sample records selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Sample {
    HighRisk,
    LowRisk,
    ModerateRisk,
    ElevatedRisk,
}

impl Sample {
    pub fn record(self) -> PatientRecord {
        match self {
            Sample::HighRisk => PatientRecord::high_risk(),
            Sample::LowRisk => PatientRecord::low_risk(),
            Sample::ModerateRisk => PatientRecord::moderate_risk(),
            Sample::ElevatedRisk => PatientRecord::elevated_risk(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_wire_order() {
        let value = serde_json::to_value(PatientRecord::high_risk()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, FIELD_NAMES);
    }

    #[test]
    fn fields_display_like_source_literals() {
        let fields = PatientRecord::low_risk().fields();
        assert_eq!(fields.len(), 13);
        assert_eq!(fields[0], ("age", FieldValue::Integer(35)));
        let (name, depression) = fields[9];
        assert_eq!(name, "st_depression");
        assert_eq!(depression.to_string(), "0.0");
        assert_eq!(FieldValue::Float(2.3).to_string(), "2.3");
    }

    #[test]
    fn set_field_parses_by_kind() {
        let mut record = PatientRecord::high_risk();
        record.set_field("age", "70").unwrap();
        record.set_field("st_depression", "1").unwrap();
        assert_eq!(record.age, 70);
        assert_eq!(record.st_depression, 1.0);
    }

    #[test]
    fn set_field_rejects_bad_values_without_changing_record() {
        let mut record = PatientRecord::high_risk();
        assert!(matches!(
            record.set_field("cholesterol", "2.5"),
            Err(ProbeError::InvalidFieldValue { .. })
        ));
        assert!(matches!(
            record.set_field("st_depression", "abc"),
            Err(ProbeError::InvalidFieldValue { .. })
        ));
        assert!(matches!(
            record.set_field("weight", "80"),
            Err(ProbeError::UnknownField(_))
        ));
        assert_eq!(record, PatientRecord::high_risk());
    }

    #[test]
    fn out_of_range_only_changes_age() {
        let record = PatientRecord::out_of_range();
        assert_eq!(record.age, 200);
        assert_eq!(
            PatientRecord { age: 63, ..record },
            PatientRecord::high_risk()
        );
    }

    #[test]
    fn missing_fields_payload_has_two_keys() {
        let payload = missing_fields_payload();
        assert_eq!(payload.as_object().unwrap().len(), 2);
        assert!(serde_json::from_value::<PatientRecord>(payload).is_err());
    }

    #[test]
    fn load_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patient.json");
        std::fs::write(&path, serde_json::to_string(&PatientRecord::low_risk()).unwrap()).unwrap();
        assert_eq!(PatientRecord::load(&path).unwrap(), PatientRecord::low_risk());
    }
}
