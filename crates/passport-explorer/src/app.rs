//! Explorer state: the reference table plus the external sources a
//! command may consult. Offline explorers never touch the network and
//! behave exactly as if every source had failed.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use country_sources::{
    BoundaryClient, GeolocationClient, Liveness, RestCountriesClient, SourceConfig,
};
use geojson::{FeatureCollection, GeoJson};
use passport_core::{
    merge, merge_catalog, select_featured, shade_features, CountryDetail, ExternalMetadata,
    FeaturedCountry, MergeConfig, MergedCountryRecord, Metric, ReferenceTable,
    DEFAULT_FEATURED_COUNTRY,
};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

struct Sources {
    rest: RestCountriesClient,
    geolocation: GeolocationClient,
    boundaries: BoundaryClient,
}

pub struct Explorer {
    table: ReferenceTable,
    merge_config: MergeConfig,
    sources: Option<Sources>,
    liveness: Liveness,
}

/// Serialized output of the `snapshot` command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    pub catalog: bool,
    pub reference_countries: usize,
    pub metadata_countries: usize,
    pub records: Vec<MergedCountryRecord>,
}

impl Explorer {
    /// `source_config` of `None` builds an offline explorer
    pub fn new(
        table: ReferenceTable,
        merge_config: MergeConfig,
        source_config: Option<SourceConfig>,
    ) -> Result<Self> {
        let sources = match source_config {
            Some(config) => Some(Sources {
                rest: RestCountriesClient::new(config.clone())?,
                geolocation: GeolocationClient::new(config.clone())?,
                boundaries: BoundaryClient::new(config)?,
            }),
            None => {
                info!("Offline mode: external sources disabled");
                None
            }
        };

        Ok(Self {
            table,
            merge_config,
            sources,
            liveness: Liveness::new(),
        })
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    /// Handle used to discard in-flight fetches on interrupt
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    async fn catalog_metadata(&self) -> Result<Vec<ExternalMetadata>> {
        let Some(sources) = &self.sources else {
            return Ok(Vec::new());
        };
        self.delivered(sources.rest.fetch_all_or_empty()).await
    }

    async fn country_metadata(&self, name: &str) -> Result<Option<ExternalMetadata>> {
        let Some(sources) = &self.sources else {
            return Ok(None);
        };
        self.delivered(sources.rest.fetch_by_name_or_none(name))
            .await
    }

    async fn delivered<F, T>(&self, fetch: F) -> Result<T>
    where
        F: std::future::Future<Output = T>,
    {
        match self.liveness.deliver_if_alive(fetch).await {
            Some(value) => Ok(value),
            None => bail!("interrupted"),
        }
    }

    /// Merged records: one per reference entry, or one per metadata
    /// record when `catalog` is set
    pub async fn records(&self, catalog: bool) -> Result<Vec<MergedCountryRecord>> {
        let metadata = self.catalog_metadata().await?;
        if catalog {
            if metadata.is_empty() {
                warn!("Catalog listing needs country metadata; falling back to reference rows");
                return Ok(merge(&self.table, &metadata));
            }
            Ok(merge_catalog(&self.table, &metadata, &self.merge_config))
        } else {
            Ok(merge(&self.table, &metadata))
        }
    }

    pub async fn detail(&self, name: &str) -> Result<Option<CountryDetail>> {
        let Some(entry) = self.table.get(name) else {
            return Ok(None);
        };
        let metadata = self.country_metadata(&entry.country).await?;
        Ok(CountryDetail::build(&self.table, name, metadata.as_ref()))
    }

    /// Featured country for `explicit`, else the detected location, else
    /// the default country. An explicit name must be a reference country.
    pub async fn featured(&self, explicit: Option<&str>) -> Result<Option<FeaturedCountry>> {
        let detected = match (explicit, &self.sources) {
            (Some(name), _) => {
                if self.table.get(name).is_none() {
                    bail!("{} is not in the reference table", name);
                }
                Some(name.to_string())
            }
            (None, Some(sources)) => self.delivered(sources.geolocation.detect_or_none()).await?,
            (None, None) => None,
        };
        Ok(select_featured(
            &self.table,
            detected.as_deref(),
            DEFAULT_FEATURED_COUNTRY,
        ))
    }

    /// Shaded boundaries, read from `local` when given, else fetched
    pub async fn map(&self, metric: Metric, local: Option<&Path>) -> Result<FeatureCollection> {
        let collection = match (local, &self.sources) {
            (Some(path), _) => load_boundaries(path)?,
            (None, Some(sources)) => self.delivered(sources.boundaries.fetch_or_empty()).await?,
            (None, None) => {
                warn!("No boundary data offline; pass --boundaries-file");
                empty_collection()
            }
        };
        Ok(shade_features(collection, &self.table, metric))
    }

    pub async fn snapshot(&self, catalog: bool) -> Result<Snapshot> {
        let records = self.records(catalog).await?;
        let metadata_countries = records.iter().filter(|r| r.has_metadata).count();
        Ok(Snapshot {
            generated_at: Utc::now(),
            catalog,
            reference_countries: self.table.len(),
            metadata_countries,
            records,
        })
    }
}

fn empty_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    }
}

fn load_boundaries(path: &Path) -> Result<FeatureCollection> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading boundaries from {}", path.display()))?;
    match raw
        .parse::<GeoJson>()
        .with_context(|| format!("parsing {}", path.display()))?
    {
        GeoJson::FeatureCollection(collection) => {
            info!(
                "Loaded {} boundary features from {}",
                collection.features.len(),
                path.display()
            );
            Ok(collection)
        }
        _ => bail!("{} is not a FeatureCollection", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passport_core::featured::FALLBACK_NOTE;
    use passport_core::{FeaturedOrigin, ReferenceEntry};
    use std::io::Write;

    fn offline() -> Explorer {
        let table = ReferenceTable::new(vec![
            ReferenceEntry::new("United States", 172, 186),
            ReferenceEntry::new("United Kingdom", 187, 189),
            ReferenceEntry::new("Germany", 190, 192),
        ])
        .unwrap();
        Explorer::new(table, MergeConfig::default(), None).unwrap()
    }

    #[tokio::test]
    async fn test_offline_records_are_reference_only() {
        let explorer = offline();
        let records = explorer.records(false).await.unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["United States", "United Kingdom", "Germany"]);
        assert!(records.iter().all(|r| !r.has_metadata));

        // Catalog mode has nothing to list offline and keeps reference rows
        assert_eq!(explorer.records(true).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_offline_featured_falls_back() {
        let explorer = offline();
        let featured = explorer.featured(None).await.unwrap().unwrap();
        assert_eq!(featured.entry.country, "United States");
        assert_eq!(
            featured.origin,
            FeaturedOrigin::Fallback {
                note: FALLBACK_NOTE.to_string()
            }
        );

        let chosen = explorer.featured(Some("Germany")).await.unwrap().unwrap();
        assert_eq!(chosen.origin, FeaturedOrigin::Detected);
        assert_eq!(chosen.rank, 1);
    }

    #[tokio::test]
    async fn test_unknown_explicit_country_is_an_error() {
        let explorer = offline();
        let err = explorer.featured(Some("Narnia")).await.unwrap_err();
        assert!(err.to_string().contains("Narnia"));
        assert!(!err.to_string().contains("detect"));
    }

    #[tokio::test]
    async fn test_offline_detail() {
        let explorer = offline();
        let detail = explorer.detail("germany").await.unwrap().unwrap();
        assert_eq!(detail.record.country, "Germany");
        assert!(explorer.detail("Atlantis").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_map_from_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type": "FeatureCollection", "features": [
                {{"type": "Feature", "properties": {{"ADMIN": "Germany"}}, "geometry": null}}
            ]}}"#
        )
        .unwrap();

        let explorer = offline();
        let shaded = explorer
            .map(Metric::CanTravelTo, Some(file.path()))
            .await
            .unwrap();
        assert_eq!(
            shaded.features[0].property("tooltip").unwrap(),
            "Germany: Can travel to 190 countries"
        );

        let empty = explorer.map(Metric::CanTravelTo, None).await.unwrap();
        assert!(empty.features.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_counts() {
        let snapshot = offline().snapshot(false).await.unwrap();
        assert_eq!(snapshot.reference_countries, 3);
        assert_eq!(snapshot.metadata_countries, 0);
        assert_eq!(snapshot.records.len(), 3);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("generatedAt").is_some());
        assert_eq!(json["records"][2]["rank"], 1);
    }

    #[tokio::test]
    async fn test_interrupted_fetch_is_discarded() {
        let explorer = offline();
        explorer.liveness().tear_down();
        assert!(explorer.delivered(async { 1 }).await.is_err());
    }
}
