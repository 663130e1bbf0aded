//! REST countries metadata client
//!
//! Two lookups: the whole catalog (`/all`, restricted to the fields the
//! merge step reads) and a single country by exact name
//! (`/name/{name}?fullText=true`). By-name results are cached for
//! `cache_ttl_sec`.

use crate::{get_json, parse_url, Result, SourceConfig, SourceError};
use passport_core::ExternalMetadata;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const SERVICE: &str = "rest countries";

/// Fields requested from `/all`
pub const CATALOG_FIELDS: &str = "name,capital,region,subregion,languages,currencies,population,area,timezones,continents,flags,coatOfArms,borders,independent,unMember,startOfWeek,car,maps,idd";

struct CacheEntry {
    metadata: ExternalMetadata,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct RestCountriesClient {
    config: SourceConfig,
    client: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl RestCountriesClient {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self {
            config,
            client,
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = parse_url(&self.config.rest_base)?;
        url.path_segments_mut()
            .map_err(|_| SourceError::RequestFailed(format!("{} cannot be a base", self.config.rest_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetch metadata for every country
    pub async fn fetch_all(&self) -> Result<Vec<ExternalMetadata>> {
        let mut url = self.endpoint(&["all"])?;
        url.query_pairs_mut().append_pair("fields", CATALOG_FIELDS);

        let payload: serde_json::Value = get_json(&self.client, SERVICE, url).await?;
        let records = ExternalMetadata::parse_collection(payload);
        info!("Fetched metadata for {} countries", records.len());
        Ok(records)
    }

    /// [`fetch_all`](Self::fetch_all), degrading to an empty list
    pub async fn fetch_all_or_empty(&self) -> Vec<ExternalMetadata> {
        match self.fetch_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!("Country metadata unavailable, continuing without it: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch one country by its full common name. The first record of the
    /// response wins.
    pub async fn fetch_by_name(&self, name: &str) -> Result<ExternalMetadata> {
        let key = name.trim().to_lowercase();

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                if entry.expires_at > Instant::now() {
                    debug!("Metadata cache hit for {}", name);
                    return Ok(entry.metadata.clone());
                }
            }
        }

        let mut url = self.endpoint(&["name", name.trim()])?;
        url.query_pairs_mut().append_pair("fullText", "true");

        let payload: serde_json::Value = get_json(&self.client, SERVICE, url).await?;
        let metadata = ExternalMetadata::parse_collection(payload)
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(name.to_string()))?;

        {
            let mut cache = self.cache.write().await;
            let now = Instant::now();
            cache.retain(|_, entry| entry.expires_at > now);
            cache.insert(
                key,
                CacheEntry {
                    metadata: metadata.clone(),
                    expires_at: now + self.config.cache_ttl(),
                },
            );
        }

        Ok(metadata)
    }

    /// [`fetch_by_name`](Self::fetch_by_name), degrading to `None`
    pub async fn fetch_by_name_or_none(&self, name: &str) -> Option<ExternalMetadata> {
        match self.fetch_by_name(name).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!("No metadata for {}: {}", name, e);
                None
            }
        }
    }

    /// (total, valid) entries in the by-name cache
    pub async fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.read().await;
        let now = Instant::now();
        let valid = cache.values().filter(|e| e.expires_at > now).count();
        (cache.len(), valid)
    }

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }
}
