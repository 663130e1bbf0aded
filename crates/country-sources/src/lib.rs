//! # Country Sources
//!
//! HTTP clients for the three external collaborators of the passport
//! explorer:
//!
//! - [`RestCountriesClient`]: country metadata (`/all` and `/name/{name}`)
//! - [`GeolocationClient`]: the visitor's country from an IP lookup
//! - [`BoundaryClient`]: country boundary polygons as GeoJSON
//!
//! Every client is built with a request timeout. Each fetch has a
//! companion that logs the failure and returns an empty default, so a
//! caller can always render something.
//!
//! ```rust,ignore
//! let config = SourceConfig::default();
//! let rest = RestCountriesClient::new(config.clone())?;
//! let metadata = rest.fetch_all_or_empty().await;
//! ```

pub mod boundaries;
pub mod geolocation;
pub mod liveness;
pub mod rest_countries;

#[cfg(test)]
pub(crate) mod test_support;

pub use boundaries::BoundaryClient;
pub use geolocation::GeolocationClient;
pub use liveness::Liveness;
pub use rest_countries::RestCountriesClient;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REST_BASE: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_GEOLOCATION_URL: &str = "https://ipapi.co/json/";
pub const DEFAULT_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/datasets/geo-countries/master/data/countries.geojson";

/// Endpoints and client limits shared by all sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the REST countries API, without trailing slash
    pub rest_base: String,
    pub geolocation_url: String,
    pub boundaries_url: String,
    /// Request timeout in seconds (default: 5)
    pub timeout_sec: u64,
    /// TTL for cached by-name lookups in seconds (default: 300 = 5 minutes)
    pub cache_ttl_sec: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            rest_base: DEFAULT_REST_BASE.to_string(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
            boundaries_url: DEFAULT_BOUNDARIES_URL.to_string(),
            timeout_sec: 5,
            cache_ttl_sec: 300,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_sec)
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// GET `url` and decode the body as JSON, mapping each failure stage to
/// its own error variant.
pub(crate) async fn get_json<T>(
    client: &reqwest::Client,
    service: &'static str,
    url: reqwest::Url,
) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    tracing::debug!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound(service.to_string()));
    }
    if !status.is_success() {
        return Err(SourceError::Status {
            service,
            status: status.as_u16(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| SourceError::Parse(e.to_string()))
}

pub(crate) fn parse_url(raw: &str) -> Result<reqwest::Url> {
    reqwest::Url::parse(raw).map_err(|e| SourceError::RequestFailed(format!("{}: {}", raw, e)))
}
