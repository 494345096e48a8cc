// Model exports
pub mod domain;

pub use domain::{InputRecord, GeocodeResult, MatchStatus, OutputRecord, ErrorRecord};
