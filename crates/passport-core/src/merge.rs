//! Merge & rank engine
//!
//! Joins reference rows with external metadata by common country name
//! (case-insensitive, exact). Two directions are supported:
//!
//! - [`merge`]: one record per reference entry. Unmatched entries keep
//!   their counts and get default descriptive fields.
//! - [`merge_catalog`]: one record per external record. Countries missing
//!   from the reference table get the configured [`MobilityFloor`].
//!
//! Both are pure and rank the produced set densely from 1.

use crate::format;
use crate::metadata::{ExternalMetadata, MapLinks};
use crate::{name_key, Result};
use crate::rank::RankTable;
use crate::reference::{check_count, ReferenceTable};
use crate::region::{classify_region, RegionBucket};
use crate::tier::StrengthTier;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Visa-free destinations assumed for a country absent from the reference table
pub const FLOOR_CAN_TRAVEL_TO: u32 = 50;
/// Visa-free origins assumed for a country absent from the reference table
pub const FLOOR_CAN_TRAVEL_FROM: u32 = 47;

/// Region placeholder when no metadata matched
pub const UNKNOWN_REGION: &str = "Unknown";

/// Counts substituted for unranked countries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobilityFloor {
    pub can_travel_to: u32,
    pub can_travel_from: u32,
}

impl Default for MobilityFloor {
    fn default() -> Self {
        Self {
            can_travel_to: FLOOR_CAN_TRAVEL_TO,
            can_travel_from: FLOOR_CAN_TRAVEL_FROM,
        }
    }
}

impl MobilityFloor {
    /// Floor counts, bounded like reference rows
    pub fn new(can_travel_to: u32, can_travel_from: u32) -> Result<Self> {
        check_count("mobility floor", "canTravelTo", can_travel_to)?;
        check_count("mobility floor", "canTravelFrom", can_travel_from)?;
        Ok(Self {
            can_travel_to,
            can_travel_from,
        })
    }
}

/// Merge configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Counts used by [`merge_catalog`] for countries with no reference row
    pub floor: MobilityFloor,
}

/// Flat per-country record consumed by list, detail, and map views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedCountryRecord {
    pub country: String,
    pub can_travel_to: u32,
    pub can_travel_from: u32,
    pub rank: u32,
    pub strength_tier: StrengthTier,

    pub official_name: String,
    pub native_name: String,
    pub region: String,
    pub subregion: String,
    pub capital: String,
    pub languages: String,
    pub currencies: String,
    pub population: u64,
    pub area: f64,
    pub timezones: Vec<String>,
    pub continents: Vec<String>,
    pub flag: String,
    pub coat_of_arms: String,
    pub borders: Vec<String>,
    pub independent: bool,
    pub un_member: bool,
    pub start_of_week: String,
    pub driving_side: String,
    pub car_signs: Vec<String>,
    pub maps: MapLinks,
    pub phone_code: String,
    /// ISO 3166-1 alpha-2 code, empty when unknown
    pub code: String,

    /// Whether an external record matched
    pub has_metadata: bool,
}

impl MergedCountryRecord {
    pub(crate) fn build(
        country: &str,
        can_travel_to: u32,
        can_travel_from: u32,
        rank: u32,
        metadata: Option<&ExternalMetadata>,
    ) -> Self {
        let mut record = Self {
            country: country.to_string(),
            can_travel_to,
            can_travel_from,
            rank,
            strength_tier: StrengthTier::from_visa_free(can_travel_to),
            official_name: country.to_string(),
            native_name: country.to_string(),
            region: UNKNOWN_REGION.to_string(),
            subregion: String::new(),
            capital: format::NOT_AVAILABLE.to_string(),
            languages: String::new(),
            currencies: String::new(),
            population: 0,
            area: 0.0,
            timezones: Vec::new(),
            continents: Vec::new(),
            flag: String::new(),
            coat_of_arms: String::new(),
            borders: Vec::new(),
            independent: false,
            un_member: false,
            start_of_week: String::new(),
            driving_side: String::new(),
            car_signs: Vec::new(),
            maps: MapLinks::default(),
            phone_code: format::NOT_AVAILABLE.to_string(),
            code: String::new(),
            has_metadata: false,
        };

        if let Some(meta) = metadata {
            record.apply_metadata(meta);
        }

        record
    }

    /// Copy descriptive fields, keeping defaults where the source is empty
    fn apply_metadata(&mut self, meta: &ExternalMetadata) {
        self.has_metadata = true;

        if !meta.official_name().is_empty() {
            self.official_name = meta.official_name().to_string();
        }
        if !meta.native_name().is_empty() {
            self.native_name = meta.native_name().to_string();
        }
        if !meta.region.is_empty() {
            self.region = meta.region.clone();
        }
        self.subregion = meta.subregion.clone();
        self.capital = meta.capital().to_string();
        self.languages = meta.languages_joined();
        self.currencies = meta.currencies_joined();
        self.population = meta.population;
        self.area = meta.area;
        self.timezones = meta.timezones.clone();
        self.continents = meta.continents.clone();
        self.flag = meta.flags.svg.clone();
        self.coat_of_arms = meta.coat_of_arms.svg.clone();
        self.borders = meta.borders.clone();
        self.independent = meta.independent;
        self.un_member = meta.un_member;
        self.start_of_week = meta.start_of_week.clone();
        self.driving_side = meta.car.side.clone();
        self.car_signs = meta.car.signs.clone();
        self.maps = meta.maps.clone();
        self.phone_code = meta.phone_code();
        self.code = meta.cca2.clone();
    }

    /// Coarse display region for the list filter
    pub fn region_bucket(&self) -> RegionBucket {
        classify_region(&self.region, &self.subregion)
    }
}

/// Index metadata by common name; the first record for a name wins
fn index_metadata(metadata: &[ExternalMetadata]) -> HashMap<String, &ExternalMetadata> {
    let mut index = HashMap::with_capacity(metadata.len());
    for meta in metadata {
        if meta.common_name().trim().is_empty() {
            continue;
        }
        index.entry(name_key(meta.common_name())).or_insert(meta);
    }
    index
}

/// One record per reference entry, in canonical order
pub fn merge(table: &ReferenceTable, metadata: &[ExternalMetadata]) -> Vec<MergedCountryRecord> {
    let index = index_metadata(metadata);
    let ranks = table.ranks();

    let records: Vec<MergedCountryRecord> = table
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let meta = index.get(&name_key(&entry.country)).copied();
            if meta.is_none() {
                debug!("No metadata for {}, using defaults", entry.country);
            }
            MergedCountryRecord::build(
                &entry.country,
                entry.can_travel_to,
                entry.can_travel_from,
                ranks.rank_at(position).unwrap_or(0),
                meta,
            )
        })
        .collect();

    let matched = records.iter().filter(|r| r.has_metadata).count();
    info!(
        "Merged {} reference entries ({} with metadata, {} defaulted)",
        records.len(),
        matched,
        records.len() - matched
    );

    records
}

/// One record per external record, ranked over the merged set
pub fn merge_catalog(
    table: &ReferenceTable,
    metadata: &[ExternalMetadata],
    config: &MergeConfig,
) -> Vec<MergedCountryRecord> {
    let mut seen = HashSet::new();
    let mut floored = 0;

    let mut records: Vec<MergedCountryRecord> = metadata
        .iter()
        .filter(|meta| !meta.common_name().trim().is_empty())
        .filter(|meta| seen.insert(name_key(meta.common_name())))
        .map(|meta| {
            let (to, from) = match table.get(meta.common_name()) {
                Some(entry) => (entry.can_travel_to, entry.can_travel_from),
                None => {
                    floored += 1;
                    (config.floor.can_travel_to, config.floor.can_travel_from)
                }
            };
            MergedCountryRecord::build(meta.common_name(), to, from, 0, Some(meta))
        })
        .collect();

    let ranks = RankTable::compute(
        records
            .iter()
            .map(|r| (r.country.as_str(), r.can_travel_to)),
    );
    for (position, record) in records.iter_mut().enumerate() {
        record.rank = ranks.rank_at(position).unwrap_or(0);
    }

    info!(
        "Merged {} catalog countries ({} at floor {}/{})",
        records.len(),
        floored,
        config.floor.can_travel_to,
        config.floor.can_travel_from
    );

    records
}
