use crate::config::ProviderSettings;
use crate::models::GeocodeResult;
use crate::services::geocoder::{GeocodeError, Geocoder};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default request timeout when the settings leave it unset
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Place index text-search client
///
/// Talks to the location service REST API:
/// `POST {base_url}/places/v0/indexes/{index}/search/text`
/// with an optional `key` query parameter for API-key authentication.
pub struct LocationClient {
    base_url: String,
    index_name: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SearchTextRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_countries: Option<&'a [String]>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchTextResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchResult {
    place: Place,
    #[serde(default)]
    relevance: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Place {
    #[serde(default)]
    label: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Geometry {
    /// [longitude, latitude]
    point: Vec<f64>,
}

impl LocationClient {
    /// Create a new location client
    pub fn new(
        base_url: String,
        index_name: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            index_name,
            api_key,
            client,
        })
    }

    /// Build a client from provider settings, defaulting to the regional endpoint
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, GeocodeError> {
        let base_url = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| regional_endpoint(&settings.region));
        let timeout = Duration::from_secs(settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

        Self::new(base_url, settings.index_name.clone(), settings.api_key.clone(), timeout)
    }

    fn search_url(&self) -> String {
        format!(
            "{}/places/v0/indexes/{}/search/text",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.index_name)
        )
    }
}

/// Public endpoint of the places API in `region`
pub fn regional_endpoint(region: &str) -> String {
    format!("https://places.geo.{}.amazonaws.com", region)
}

/// Pull the provider's error message out of a JSON error body
fn error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("message")
        .or_else(|| json.get("Message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

#[async_trait]
impl Geocoder for LocationClient {
    async fn resolve(
        &self,
        text: &str,
        countries: &[String],
    ) -> Result<GeocodeResult, GeocodeError> {
        if text.trim().is_empty() {
            return Err(GeocodeError::EmptyText);
        }

        let body = SearchTextRequest {
            text,
            filter_countries: if countries.is_empty() { None } else { Some(countries) },
        };

        let mut request = self.client.post(self.search_url()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        tracing::debug!(index = %self.index_name, "Searching place index for text");

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Place search failed: {} - {}", status, body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GeocodeError::Unauthorized,
                StatusCode::TOO_MANY_REQUESTS => GeocodeError::Throttled,
                _ => GeocodeError::ApiError {
                    status: status.as_u16(),
                    message: error_message(&body).unwrap_or_else(|| status.to_string()),
                },
            });
        }

        let parsed: SearchTextResponse = response
            .json()
            .await
            .map_err(|e| {
                GeocodeError::InvalidResponse(format!("Failed to parse search results: {}", e))
            })?;

        // Only the top-ranked candidate counts
        let top = parsed.results.into_iter().next().ok_or(GeocodeError::NoMatch)?;

        let (resolved_long, resolved_lat) = match top.place.geometry.point.as_slice() {
            [long, lat, ..] => (*long, *lat),
            _ => {
                return Err(GeocodeError::InvalidResponse(
                    "Place geometry point must hold longitude and latitude".into(),
                ))
            }
        };

        Ok(GeocodeResult {
            label: top.place.label.unwrap_or_default(),
            confidence: top.relevance.unwrap_or(0.0),
            resolved_lat,
            resolved_long,
        })
    }
}
