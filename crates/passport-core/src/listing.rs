//! List view shaping: search, region filter, and stable sorting

use crate::merge::MergedCountryRecord;
use crate::region::RegionBucket;
use crate::tier::StrengthTier;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegionFilter {
    #[default]
    All,
    /// Premium-tier passports regardless of region
    TopTier,
    Bucket(RegionBucket),
}

impl RegionFilter {
    pub fn matches(&self, record: &MergedCountryRecord) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::TopTier => record.strength_tier == StrengthTier::Premium,
            RegionFilter::Bucket(bucket) => record.region_bucket() == *bucket,
        }
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => f.write_str("All Regions"),
            RegionFilter::TopTier => f.write_str("Top Tier"),
            RegionFilter::Bucket(bucket) => write!(f, "{}", bucket),
        }
    }
}

impl FromStr for RegionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" | "all regions" | "all-regions" => Ok(RegionFilter::All),
            "top tier" | "top-tier" | "toptier" => Ok(RegionFilter::TopTier),
            _ => s.parse::<RegionBucket>().map(RegionFilter::Bucket),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Country,
    CanTravelTo,
    CanTravelFrom,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "country" | "name" => Ok(SortKey::Country),
            "to" | "cantravelto" | "can-travel-to" => Ok(SortKey::CanTravelTo),
            "from" | "cantravelfrom" | "can-travel-from" => Ok(SortKey::CanTravelFrom),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Search term, region filter, and sort order for the list view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: String,
    pub region: RegionFilter,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl ListQuery {
    /// Re-selecting the active key flips direction; a new key starts ascending
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Filtered, stably sorted view over `records`
    pub fn apply<'a>(&self, records: &'a [MergedCountryRecord]) -> Vec<&'a MergedCountryRecord> {
        let needle = self.search.to_lowercase();
        let mut view: Vec<&MergedCountryRecord> = records
            .iter()
            .filter(|r| matches_search(&r.country, &needle))
            .filter(|r| self.region.matches(r))
            .collect();

        view.sort_by(|a, b| {
            let ord = compare_by(self.sort_key, a, b);
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });

        view
    }
}

fn matches_search(country: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || country.to_lowercase().contains(needle_lower)
}

fn compare_by(key: SortKey, a: &MergedCountryRecord, b: &MergedCountryRecord) -> Ordering {
    match key {
        SortKey::Country => compare_names(&a.country, &b.country),
        SortKey::CanTravelTo => a.can_travel_to.cmp(&b.can_travel_to),
        SortKey::CanTravelFrom => a.can_travel_from.cmp(&b.can_travel_from),
    }
}

/// Name ordering: accent- and case-folded first, exact text as tie-break
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    let folded = s
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase);
    for ch in folded {
        // Letters with no canonical decomposition
        match ch {
            'ı' => key.push('i'),
            'ł' => key.push('l'),
            'ø' => key.push('o'),
            'đ' => key.push('d'),
            'æ' => key.push_str("ae"),
            'œ' => key.push_str("oe"),
            'ß' => key.push_str("ss"),
            other => key.push(other),
        }
    }
    key
}

/// Case-insensitive substring filter over plain names (detail-page lists)
pub fn filter_names<'a>(names: &'a [String], term: &str) -> Vec<&'a str> {
    let needle = term.to_lowercase();
    names
        .iter()
        .map(String::as_str)
        .filter(|n| matches_search(n, &needle))
        .collect()
}
