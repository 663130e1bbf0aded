//! Coarse display regions
//!
//! Classification is an ordered rule list over (region, subregion
//! substring). The first matching rule wins; subregion carve-outs come
//! before the region-wide defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionBucket {
    StrongEuropean,
    EasternEuropean,
    Asian,
    MiddleEastern,
    African,
    American,
    Caribbean,
    Pacific,
    Other,
}

impl RegionBucket {
    pub const ALL: [RegionBucket; 9] = [
        RegionBucket::StrongEuropean,
        RegionBucket::EasternEuropean,
        RegionBucket::Asian,
        RegionBucket::MiddleEastern,
        RegionBucket::African,
        RegionBucket::American,
        RegionBucket::Caribbean,
        RegionBucket::Pacific,
        RegionBucket::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegionBucket::StrongEuropean => "Strong European",
            RegionBucket::EasternEuropean => "Eastern European",
            RegionBucket::Asian => "Asian",
            RegionBucket::MiddleEastern => "Middle Eastern",
            RegionBucket::African => "African",
            RegionBucket::American => "American",
            RegionBucket::Caribbean => "Caribbean",
            RegionBucket::Pacific => "Pacific",
            RegionBucket::Other => "Other",
        }
    }
}

impl fmt::Display for RegionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RegionBucket {
    type Err = String;

    /// Accepts the display label or a compact form ("eastern-european")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = compact(s);
        RegionBucket::ALL
            .iter()
            .copied()
            .find(|b| compact(b.label()) == wanted)
            .ok_or_else(|| format!("unknown region: {}", s))
    }
}

fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One classification rule; `None` matches anything
struct RegionRule {
    region: Option<&'static str>,
    subregion_contains: Option<&'static str>,
    bucket: RegionBucket,
}

const fn rule(
    region: Option<&'static str>,
    subregion_contains: Option<&'static str>,
    bucket: RegionBucket,
) -> RegionRule {
    RegionRule {
        region,
        subregion_contains,
        bucket,
    }
}

const RULES: &[RegionRule] = &[
    rule(None, Some("Eastern Europe"), RegionBucket::EasternEuropean),
    rule(None, Some("Caribbean"), RegionBucket::Caribbean),
    rule(None, Some("Pacific"), RegionBucket::Pacific),
    rule(Some("Europe"), None, RegionBucket::StrongEuropean),
    rule(Some("Asia"), Some("Western Asia"), RegionBucket::MiddleEastern),
    rule(Some("Asia"), None, RegionBucket::Asian),
    rule(Some("Americas"), None, RegionBucket::American),
    rule(Some("Africa"), None, RegionBucket::African),
    rule(Some("Oceania"), None, RegionBucket::Pacific),
];

/// Classify a country from its region and subregion text
pub fn classify_region(region: &str, subregion: &str) -> RegionBucket {
    if region.is_empty() {
        return RegionBucket::Other;
    }

    RULES
        .iter()
        .find(|r| {
            r.region.map_or(true, |want| want == region)
                && r.subregion_contains.map_or(true, |needle| subregion.contains(needle))
        })
        .map(|r| r.bucket)
        .unwrap_or(RegionBucket::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_europe() {
        assert_eq!(classify_region("Europe", "Western Europe"), RegionBucket::StrongEuropean);
        assert_eq!(classify_region("Europe", "Northern Europe"), RegionBucket::StrongEuropean);
        assert_eq!(classify_region("Europe", "Eastern Europe"), RegionBucket::EasternEuropean);
        assert_eq!(classify_region("Europe", ""), RegionBucket::StrongEuropean);
    }

    #[test]
    fn test_asia() {
        assert_eq!(classify_region("Asia", "Western Asia"), RegionBucket::MiddleEastern);
        assert_eq!(classify_region("Asia", "Eastern Asia"), RegionBucket::Asian);
        assert_eq!(classify_region("Asia", "South-Eastern Asia"), RegionBucket::Asian);
    }

    #[test]
    fn test_americas() {
        assert_eq!(classify_region("Americas", "Caribbean"), RegionBucket::Caribbean);
        assert_eq!(classify_region("Americas", "South America"), RegionBucket::American);
        assert_eq!(classify_region("Americas", "North America"), RegionBucket::American);
    }

    #[test]
    fn test_africa_oceania_other() {
        assert_eq!(classify_region("Africa", "Northern Africa"), RegionBucket::African);
        assert_eq!(classify_region("Oceania", "Polynesia"), RegionBucket::Pacific);
        assert_eq!(classify_region("Antarctic", ""), RegionBucket::Other);
        assert_eq!(classify_region("Unknown", ""), RegionBucket::Other);
        assert_eq!(classify_region("", "Eastern Europe"), RegionBucket::Other);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("Middle Eastern".parse::<RegionBucket>(), Ok(RegionBucket::MiddleEastern));
        assert_eq!("eastern-european".parse::<RegionBucket>(), Ok(RegionBucket::EasternEuropean));
        assert_eq!("CARIBBEAN".parse::<RegionBucket>(), Ok(RegionBucket::Caribbean));
        assert!("Atlantis".parse::<RegionBucket>().is_err());

        for bucket in RegionBucket::ALL {
            assert_eq!(bucket.label().parse::<RegionBucket>(), Ok(bucket));
        }
    }
}
