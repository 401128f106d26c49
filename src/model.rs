use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RecordError;

/// Input type sent to the provider when a record does not name one.
pub const DEFAULT_INPUT_TYPE: &str = "search_query";

/// Entries stay raw JSON until processed, so a malformed entry only fails
/// its own record.
#[derive(Deserialize, Serialize)]
pub struct BatchRequest {
    pub values: Vec<Value>,
}

/// One incoming record. The id is opaque and echoed back untouched, so it is
/// kept as raw JSON. `data` stays raw too and is read per record.
#[derive(Deserialize)]
pub struct Record {
    #[serde(rename = "recordId", default)]
    pub record_id: Value,
    #[serde(default)]
    pub data: Option<Value>,
}

impl TryFrom<Value> for Record {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if !value.is_object() {
            return Err(RecordError::NotAnObject);
        }
        serde_json::from_value(value).map_err(|e| RecordError::InvalidData(e.to_string()))
    }
}

/// The fields of a record's `data` object that the skill reads.
#[derive(Debug, Deserialize)]
pub struct RecordData {
    pub text: String,
    #[serde(default = "default_input_type")]
    pub input_type: String,
}

fn default_input_type() -> String {
    DEFAULT_INPUT_TYPE.to_owned()
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct BatchResponse {
    pub values: Vec<OutputRecord>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct OutputRecord {
    #[serde(rename = "recordId")]
    pub record_id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Either `data` or `errors`, never both.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Outcome {
    Success { data: VectorData },
    Failure { errors: Vec<ErrorMessage> },
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct VectorData {
    pub vector: Vec<f64>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ErrorMessage {
    pub message: String,
}

impl OutputRecord {
    pub fn success(record_id: Value, vector: Vec<f64>) -> Self {
        Self {
            record_id,
            outcome: Outcome::Success {
                data: VectorData { vector },
            },
        }
    }

    pub fn failure(record_id: Value, message: impl Into<String>) -> Self {
        Self {
            record_id,
            outcome: Outcome::Failure {
                errors: vec![ErrorMessage {
                    message: message.into(),
                }],
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }
}
