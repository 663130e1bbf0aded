//! Country boundary GeoJSON feed

use crate::{get_json, parse_url, Result, SourceConfig, SourceError};
use geojson::{FeatureCollection, GeoJson};
use tracing::{info, warn};

const SERVICE: &str = "boundaries";

#[derive(Clone)]
pub struct BoundaryClient {
    config: SourceConfig,
    client: reqwest::Client,
}

impl BoundaryClient {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self { config, client })
    }

    /// Fetch the boundary feature collection
    pub async fn fetch(&self) -> Result<FeatureCollection> {
        let url = parse_url(&self.config.boundaries_url)?;
        let payload: serde_json::Value = get_json(&self.client, SERVICE, url).await?;

        match GeoJson::from_json_value(payload).map_err(|e| SourceError::Parse(e.to_string()))? {
            GeoJson::FeatureCollection(collection) => {
                info!("Loaded {} boundary features", collection.features.len());
                Ok(collection)
            }
            _ => Err(SourceError::Parse(
                "boundary feed is not a FeatureCollection".to_string(),
            )),
        }
    }

    /// [`fetch`](Self::fetch), degrading to an empty collection
    pub async fn fetch_or_empty(&self) -> FeatureCollection {
        match self.fetch().await {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Boundary data unavailable: {}", e);
                FeatureCollection {
                    bbox: None,
                    features: Vec::new(),
                    foreign_members: None,
                }
            }
        }
    }
}
