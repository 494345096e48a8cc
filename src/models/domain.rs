use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the input file: a free-text place description and the
/// coordinate it is expected to resolve to.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    /// 0-based position among the data rows (header excluded)
    pub index: usize,
    pub text: String,
    pub expected_lat: f64,
    pub expected_long: f64,
}

impl InputRecord {
    pub fn new(
        index: usize,
        text: impl Into<String>,
        expected_lat: f64,
        expected_long: f64,
    ) -> Self {
        Self {
            index,
            text: text.into(),
            expected_lat,
            expected_long,
        }
    }
}

/// Top-ranked candidate returned by the geocoding provider
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub label: String,
    pub confidence: f64,
    pub resolved_lat: f64,
    pub resolved_long: f64,
}

/// Classification of a successful resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "LOW CONFIDENCE")]
    LowConfidence,
}

impl MatchStatus {
    /// Confidence equal to the threshold is accepted.
    pub fn classify(confidence: f64, threshold: f64) -> Self {
        if confidence < threshold {
            MatchStatus::LowConfidence
        } else {
            MatchStatus::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Ok => "OK",
            MatchStatus::LowConfidence => "LOW CONFIDENCE",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Success-stream row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "Index")]
    pub index: usize,
    #[serde(rename = "InputText")]
    pub input_text: String,
    #[serde(rename = "InputLat")]
    pub expected_lat: f64,
    #[serde(rename = "InputLong")]
    pub expected_long: f64,
    #[serde(rename = "OutputText")]
    pub resolved_text: String,
    #[serde(rename = "OutputLat")]
    pub resolved_lat: f64,
    #[serde(rename = "OutputLong")]
    pub resolved_long: f64,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
    /// Kilometres, pre-formatted with three decimals
    #[serde(rename = "Distance")]
    pub distance_km: String,
    #[serde(rename = "Status")]
    pub status: MatchStatus,
}

/// Error-stream row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "Index")]
    pub index: usize,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Error")]
    pub error_message: String,
}
