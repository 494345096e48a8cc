use crate::models::GeocodeResult;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when resolving a place description
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Unauthorized: invalid API key or missing permissions")]
    Unauthorized,

    #[error("Request throttled by provider")]
    Throttled,

    #[error("API returned error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("no result found")]
    NoMatch,

    #[error("empty place text")]
    EmptyText,
}

impl GeocodeError {
    /// True when the provider answered but had no candidate for the text
    pub fn is_no_match(&self) -> bool {
        matches!(self, GeocodeError::NoMatch)
    }
}

/// Free-text geocoding capability
///
/// Implementations return the top-ranked candidate for `text`, restricted to
/// `countries` when the list is non-empty. `text` is never empty.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(
        &self,
        text: &str,
        countries: &[String],
    ) -> Result<GeocodeResult, GeocodeError>;
}

#[async_trait]
impl<G: Geocoder + ?Sized> Geocoder for std::sync::Arc<G> {
    async fn resolve(
        &self,
        text: &str,
        countries: &[String],
    ) -> Result<GeocodeResult, GeocodeError> {
        (**self).resolve(text, countries).await
    }
}
