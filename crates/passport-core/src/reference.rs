//! Static passport reference table
//!
//! Loaded once, validated, then read-only. Ranks are computed at load
//! and cached; the canonical entry order is never changed.

use crate::rank::RankTable;
use crate::tier::StrengthTier;
use crate::{name_key, PassportError, Result, TOTAL_KNOWN_COUNTRIES};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Embedded hand-maintained dataset
const BUILTIN_DATA: &str = include_str!("../data/passport_data.json");

/// One row of the reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub country: String,
    /// Destinations reachable without a visa
    pub can_travel_to: u32,
    /// Origins whose citizens enter visa-free
    pub can_travel_from: u32,
}

impl ReferenceEntry {
    pub fn new(country: impl Into<String>, can_travel_to: u32, can_travel_from: u32) -> Self {
        Self {
            country: country.into(),
            can_travel_to,
            can_travel_from,
        }
    }

    pub fn strength_tier(&self) -> StrengthTier {
        StrengthTier::from_visa_free(self.can_travel_to)
    }
}

/// Validated, immutable reference table
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
    index: HashMap<String, usize>,
    ranks: RankTable,
}

impl ReferenceTable {
    /// Validate entries and build the lookup and rank caches.
    ///
    /// Duplicate names (case-insensitive), empty names, and counts above
    /// [`TOTAL_KNOWN_COUNTRIES`] are rejected.
    pub fn new(entries: Vec<ReferenceEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            if entry.country.trim().is_empty() {
                return Err(PassportError::EmptyCountryName(position));
            }
            check_count(&entry.country, "canTravelTo", entry.can_travel_to)?;
            check_count(&entry.country, "canTravelFrom", entry.can_travel_from)?;

            if index.insert(name_key(&entry.country), position).is_some() {
                return Err(PassportError::DuplicateCountry(entry.country.clone()));
            }
        }

        let ranks = RankTable::compute(
            entries
                .iter()
                .map(|e| (e.country.as_str(), e.can_travel_to)),
        );

        debug!("Reference table validated: {} entries", entries.len());

        Ok(Self {
            entries,
            index,
            ranks,
        })
    }

    /// The embedded dataset shipped with the crate
    pub fn builtin() -> Result<Self> {
        let table = Self::from_reader(BUILTIN_DATA.as_bytes())?;
        info!("Loaded {} built-in reference entries", table.len());
        Ok(table)
    }

    /// Parse a JSON array of entries
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let entries: Vec<ReferenceEntry> = serde_json::from_reader(reader)?;
        Self::new(entries)
    }

    /// Load a JSON array of entries from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading reference table from {:?}", path);

        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;

        info!("Loaded {} reference entries", table.len());
        Ok(table)
    }

    /// Case-insensitive lookup
    pub fn get(&self, country: &str) -> Option<&ReferenceEntry> {
        self.position(country).map(|i| &self.entries[i])
    }

    pub(crate) fn position(&self, country: &str) -> Option<usize> {
        self.index.get(&name_key(country)).copied()
    }

    /// Cached global rank, case-insensitive
    pub fn rank_of(&self, country: &str) -> Option<u32> {
        self.position(country).and_then(|i| self.ranks.rank_at(i))
    }

    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    /// Entries in canonical (load) order
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Entries from rank 1 downwards
    pub fn ranked(&self) -> impl Iterator<Item = (u32, &ReferenceEntry)> {
        self.ranks
            .positions_in_rank_order()
            .iter()
            .enumerate()
            .map(|(slot, &i)| (slot as u32 + 1, &self.entries[i]))
    }

    pub fn max_can_travel_to(&self) -> u32 {
        self.entries.iter().map(|e| e.can_travel_to).max().unwrap_or(0)
    }

    pub fn max_can_travel_from(&self) -> u32 {
        self.entries.iter().map(|e| e.can_travel_from).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn check_count(country: &str, field: &'static str, value: u32) -> Result<()> {
    if value > TOTAL_KNOWN_COUNTRIES {
        return Err(PassportError::CountOutOfRange {
            country: country.to_string(),
            field,
            value,
            max: TOTAL_KNOWN_COUNTRIES,
        });
    }
    Ok(())
}
