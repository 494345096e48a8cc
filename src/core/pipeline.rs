use crate::core::reconciler::{Reconciler, Reconciliation};
use crate::models::{ErrorRecord, InputRecord, MatchStatus, OutputRecord};
use crate::services::Geocoder;

/// Counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub ok: usize,
    pub low_confidence: usize,
    pub failed: usize,
}

/// Both output streams of a run, each in input order
#[derive(Debug, Default)]
pub struct PipelineResult {
    pub outputs: Vec<OutputRecord>,
    pub errors: Vec<ErrorRecord>,
}

impl PipelineResult {
    pub fn processed(&self) -> usize {
        self.outputs.len() + self.errors.len()
    }

    pub fn summary(&self) -> RunSummary {
        let low_confidence = self
            .outputs
            .iter()
            .filter(|o| o.status == MatchStatus::LowConfidence)
            .count();

        RunSummary {
            total: self.processed(),
            ok: self.outputs.len() - low_confidence,
            low_confidence,
            failed: self.errors.len(),
        }
    }
}

/// Sequential driver: one record is fully reconciled before the next starts
///
/// A failing record never stops the run.
#[derive(Debug, Clone)]
pub struct Pipeline<G> {
    reconciler: Reconciler<G>,
}

impl<G: Geocoder> Pipeline<G> {
    pub fn new(reconciler: Reconciler<G>) -> Self {
        Self { reconciler }
    }

    /// Reconcile every record, in the order given
    pub async fn run(&self, records: &[InputRecord]) -> PipelineResult {
        let mut result = PipelineResult {
            outputs: Vec::with_capacity(records.len()),
            errors: Vec::new(),
        };

        tracing::info!(
            records = records.len(),
            threshold = self.reconciler.confidence_threshold(),
            "Reconciling records"
        );

        for record in records {
            match self.reconciler.reconcile(record).await {
                Reconciliation::Resolved(output) => result.outputs.push(output),
                Reconciliation::Failed(error) => result.errors.push(error),
            }
        }

        debug_assert_eq!(result.processed(), records.len());

        result
    }
}
