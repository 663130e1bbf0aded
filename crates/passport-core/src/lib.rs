//! Passport Index Core
//!
//! Merges the hand-maintained passport reference table with country
//! metadata from an external source, ranks passports by visa-free
//! access, and shapes the result for list, detail, and map views.
//!
//! # Strength Tiers
//!
//! | canTravelTo | Tier    |
//! |-------------|---------|
//! | > 180       | Premium |
//! | 151 - 180   | High    |
//! | 101 - 150   | Medium  |
//! | 51 - 100    | Low     |
//! | <= 50       | Basic   |
//!
//! # Data Flow
//!
//! ```text
//! ReferenceTable ──┐
//!                  ├─► merge / merge_catalog ─► MergedCountryRecord ─► ListQuery / CountryDetail / shade_features
//! ExternalMetadata ┘
//! ```
//!
//! Nothing here performs network I/O. A missing or malformed external
//! payload only ever degrades fields to their defaults; the sole hard
//! failure is an invalid reference table, reported at load time.

use thiserror::Error;

pub mod choropleth;
pub mod detail;
pub mod featured;
pub mod format;
pub mod listing;
pub mod merge;
pub mod metadata;
pub mod rank;
pub mod reference;
pub mod region;
pub mod tier;

pub use choropleth::{shade_features, ChoroplethBand, Metric};
pub use detail::CountryDetail;
pub use featured::{select_featured, FeaturedCountry, FeaturedOrigin};
pub use listing::{ListQuery, RegionFilter, SortDirection, SortKey};
pub use merge::{merge, merge_catalog, MergeConfig, MergedCountryRecord, MobilityFloor};
pub use metadata::ExternalMetadata;
pub use rank::RankTable;
pub use reference::{ReferenceEntry, ReferenceTable};
pub use region::{classify_region, RegionBucket};
pub use tier::{StrengthTier, TierAccent};

/// Upper bound for either visa-free count
pub const TOTAL_KNOWN_COUNTRIES: u32 = 195;

/// Country featured when location detection fails or finds no match
pub const DEFAULT_FEATURED_COUNTRY: &str = "United States";

#[derive(Error, Debug)]
pub enum PassportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate country in reference table: {0}")]
    DuplicateCountry(String),
    #[error("Reference entry {country}: {field} = {value} exceeds {max}")]
    CountOutOfRange {
        country: String,
        field: &'static str,
        value: u32,
        max: u32,
    },
    #[error("Reference entry at position {0} has an empty country name")]
    EmptyCountryName(usize),
}

pub type Result<T> = std::result::Result<T, PassportError>;

/// Case-insensitive key used for every country-name match
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
