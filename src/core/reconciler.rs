use crate::core::distance::{format_distance_km, haversine_distance};
use crate::models::{ErrorRecord, GeocodeResult, InputRecord, MatchStatus, OutputRecord};
use crate::services::{GeocodeError, Geocoder};

/// Outcome of reconciling a single input record
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    Resolved(OutputRecord),
    Failed(ErrorRecord),
}

/// Resolves one record through the geocoder and grades the result
///
/// Each call is independent: nothing is cached between records.
#[derive(Debug, Clone)]
pub struct Reconciler<G> {
    geocoder: G,
    countries: Vec<String>,
    confidence_threshold: f64,
}

impl<G: Geocoder> Reconciler<G> {
    pub fn new(geocoder: G, countries: Vec<String>, confidence_threshold: f64) -> Self {
        Self {
            geocoder,
            countries,
            confidence_threshold,
        }
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Resolve `record` and build either its success or its error row
    pub async fn reconcile(&self, record: &InputRecord) -> Reconciliation {
        let resolved = if record.text.trim().is_empty() {
            Err(GeocodeError::EmptyText)
        } else {
            self.geocoder.resolve(&record.text, &self.countries).await
        };

        match resolved {
            Ok(result) => Reconciliation::Resolved(self.grade(record, result)),
            Err(e) => {
                tracing::warn!(index = record.index, error = %e, "Failed to resolve place");
                Reconciliation::Failed(ErrorRecord {
                    index: record.index,
                    text: record.text.clone(),
                    error_message: e.to_string(),
                })
            }
        }
    }

    fn grade(&self, record: &InputRecord, result: GeocodeResult) -> OutputRecord {
        let status = MatchStatus::classify(result.confidence, self.confidence_threshold);
        let distance_km = haversine_distance(
            record.expected_lat,
            record.expected_long,
            result.resolved_lat,
            result.resolved_long,
        );

        tracing::debug!(
            index = record.index,
            confidence = result.confidence,
            distance_km,
            status = %status,
            "Resolved place"
        );

        OutputRecord {
            index: record.index,
            input_text: record.text.clone(),
            expected_lat: record.expected_lat,
            expected_long: record.expected_long,
            resolved_text: result.label,
            resolved_lat: result.resolved_lat,
            resolved_long: result.resolved_long,
            confidence: result.confidence,
            distance_km: format_distance_km(distance_km),
            status,
        }
    }
}
