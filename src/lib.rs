//! Geocode Audit - bulk reconciliation of place descriptions against a place index
//!
//! Each input row (free text plus an expected coordinate) is resolved through a
//! geocoding provider, graded by confidence, and measured against the expected
//! location. Results land in a success stream or an error stream, both in input order.

pub mod config;
pub mod core;
pub mod io;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Pipeline, PipelineResult, Reconciler, Reconciliation, RunSummary};
pub use crate::core::distance::{haversine_distance, format_distance_km};
pub use models::{InputRecord, GeocodeResult, MatchStatus, OutputRecord, ErrorRecord};
pub use services::{Geocoder, GeocodeError, LocationClient};
