//! Featured country selection
//!
//! One selection rule shared by every surface that highlights a single
//! passport (the landing banner and the "my country" shortcut): use the
//! detected country when it is in the reference table, otherwise fall
//! back to a default with an informational note.

use crate::reference::{ReferenceEntry, ReferenceTable};
use crate::tier::StrengthTier;
use serde::Serialize;
use tracing::{debug, info};

/// Note shown when the featured country is a fallback
pub const FALLBACK_NOTE: &str = "Could not detect your location - showing default data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeaturedOrigin {
    /// Matched the visitor's detected country
    Detected,
    /// Detection failed or did not match a reference row
    Fallback { note: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedCountry {
    pub entry: ReferenceEntry,
    pub rank: u32,
    pub strength_tier: StrengthTier,
    pub origin: FeaturedOrigin,
}

impl FeaturedCountry {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, FeaturedOrigin::Fallback { .. })
    }

    /// Banner heading: "Your Location" or "Featured Country"
    pub fn heading(&self) -> &'static str {
        match self.origin {
            FeaturedOrigin::Detected => "Your Location",
            FeaturedOrigin::Fallback { .. } => "Featured Country",
        }
    }
}

/// Pick the featured country.
///
/// Returns `None` only when neither the detected nor the default country
/// is present in the table.
pub fn select_featured(
    table: &ReferenceTable,
    detected: Option<&str>,
    default_country: &str,
) -> Option<FeaturedCountry> {
    if let Some(name) = detected {
        if let Some(found) = feature(table, name, FeaturedOrigin::Detected) {
            info!("Featuring detected country {}", found.entry.country);
            return Some(found);
        }
        debug!("Detected country {:?} not in reference table", name);
    }

    let fallback = FeaturedOrigin::Fallback {
        note: FALLBACK_NOTE.to_string(),
    };
    let found = feature(table, default_country, fallback);
    if let Some(ref f) = found {
        info!("Featuring default country {}", f.entry.country);
    }
    found
}

fn feature(table: &ReferenceTable, name: &str, origin: FeaturedOrigin) -> Option<FeaturedCountry> {
    let entry = table.get(name)?;
    let rank = table.rank_of(name)?;
    Some(FeaturedCountry {
        entry: entry.clone(),
        rank,
        strength_tier: entry.strength_tier(),
        origin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_FEATURED_COUNTRY;

    fn table() -> ReferenceTable {
        ReferenceTable::new(vec![
            ReferenceEntry::new("United States", 172, 186),
            ReferenceEntry::new("United Kingdom", 187, 189),
            ReferenceEntry::new("Germany", 190, 192),
        ])
        .unwrap()
    }

    #[test]
    fn test_detected_country_featured() {
        let featured = select_featured(&table(), Some("germany"), DEFAULT_FEATURED_COUNTRY).unwrap();
        assert_eq!(featured.entry.country, "Germany");
        assert_eq!(featured.rank, 1);
        assert_eq!(featured.origin, FeaturedOrigin::Detected);
        assert_eq!(featured.heading(), "Your Location");
        assert!(!featured.is_fallback());
    }

    #[test]
    fn test_unmatched_detection_falls_back() {
        let featured = select_featured(&table(), Some("Narnia"), DEFAULT_FEATURED_COUNTRY).unwrap();
        assert_eq!(featured.entry.country, "United States");
        assert_eq!(featured.rank, 3);
        assert_eq!(featured.strength_tier, StrengthTier::High);
        assert!(featured.is_fallback());
        assert_eq!(
            featured.origin,
            FeaturedOrigin::Fallback {
                note: FALLBACK_NOTE.to_string()
            }
        );
    }

    #[test]
    fn test_no_detection_falls_back() {
        let featured = select_featured(&table(), None, DEFAULT_FEATURED_COUNTRY).unwrap();
        assert_eq!(featured.entry.country, "United States");
        assert_eq!(featured.heading(), "Featured Country");
    }

    #[test]
    fn test_missing_default_yields_none() {
        assert!(select_featured(&table(), None, "Atlantis").is_none());
    }

    #[test]
    fn test_selection_does_not_reorder_table() {
        let table = table();
        let _ = select_featured(&table, Some("Germany"), DEFAULT_FEATURED_COUNTRY);
        let _ = select_featured(&table, None, DEFAULT_FEATURED_COUNTRY);
        let order: Vec<&str> = table.iter().map(|e| e.country.as_str()).collect();
        assert_eq!(order, vec!["United States", "United Kingdom", "Germany"]);
    }
}
