//! IP geolocation client

use crate::{get_json, parse_url, Result, SourceConfig, SourceError};
use serde::Deserialize;
use tracing::{info, warn};

const SERVICE: &str = "geolocation";

#[derive(Debug, Deserialize)]
struct GeolocationResponse {
    #[serde(default)]
    country_name: Option<String>,
}

#[derive(Clone)]
pub struct GeolocationClient {
    config: SourceConfig,
    client: reqwest::Client,
}

impl GeolocationClient {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self { config, client })
    }

    /// The caller's country name as reported by the geolocation service
    pub async fn detect_country(&self) -> Result<String> {
        let url = parse_url(&self.config.geolocation_url)?;
        let body: GeolocationResponse = get_json(&self.client, SERVICE, url).await?;

        match body.country_name.map(|n| n.trim().to_string()) {
            Some(name) if !name.is_empty() => {
                info!("Detected country {}", name);
                Ok(name)
            }
            _ => Err(SourceError::NotFound("country_name".to_string())),
        }
    }

    /// [`detect_country`](Self::detect_country), degrading to `None`
    pub async fn detect_or_none(&self) -> Option<String> {
        match self.detect_country().await {
            Ok(name) => Some(name),
            Err(e) => {
                warn!("Location detection failed: {}", e);
                None
            }
        }
    }
}
