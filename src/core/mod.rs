// Core algorithm exports
pub mod distance;
pub mod pipeline;
pub mod reconciler;

pub use distance::{haversine_distance, format_distance_km};
pub use pipeline::{Pipeline, PipelineResult, RunSummary};
pub use reconciler::{Reconciler, Reconciliation};
