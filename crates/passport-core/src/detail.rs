//! Per-country detail view
//!
//! Combines the merged record for one reference country with the
//! reciprocal travel lists derived from the whole table and formatted
//! extras from its external metadata.

use crate::format;
use crate::listing::compare_names;
use crate::merge::MergedCountryRecord;
use crate::metadata::ExternalMetadata;
use crate::reference::{ReferenceEntry, ReferenceTable};
use crate::tier::TierAccent;
use serde::Serialize;

/// Formatted descriptive fields; "N/A" where metadata is missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailExtras {
    pub population: String,
    pub area: String,
    pub demonyms: String,
    pub gini: String,
    pub capital_coordinates: String,
    pub top_level_domains: String,
    pub country_codes: String,
    pub timezones: String,
    pub driving_side: String,
    pub car_signs: String,
    pub week_start: String,
    pub status: String,
}

impl DetailExtras {
    fn from_parts(record: &MergedCountryRecord, meta: Option<&ExternalMetadata>) -> Self {
        let na = || format::NOT_AVAILABLE.to_string();
        match meta {
            Some(meta) => Self {
                population: format::format_number(record.population),
                area: format::format_area(record.area),
                demonyms: meta.demonyms_eng(),
                gini: format::gini_index(&meta.gini),
                capital_coordinates: format::capital_coordinates(&meta.capital_info.latlng),
                top_level_domains: format::join_or_na(&meta.tld),
                country_codes: format::country_codes(&meta.cca2, &meta.cca3, &meta.fifa),
                timezones: format::format_timezones(&record.timezones),
                driving_side: format::driving_side(&record.driving_side),
                car_signs: format::join_or_na(&record.car_signs),
                week_start: format::capitalize(&record.start_of_week),
                status: format::country_status(record.independent, record.un_member),
            },
            None => Self {
                population: na(),
                area: na(),
                demonyms: na(),
                gini: na(),
                capital_coordinates: na(),
                top_level_domains: na(),
                country_codes: na(),
                timezones: na(),
                driving_side: na(),
                car_signs: na(),
                week_start: na(),
                status: na(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDetail {
    pub record: MergedCountryRecord,
    pub accent: TierAccent,
    /// Countries whose receptivity covers this passport's reach
    /// (`their can_travel_from >= our can_travel_to`), sorted by name
    pub visa_free_countries: Vec<String>,
    /// Countries whose reach covers this country's receptivity
    /// (`their can_travel_to >= our can_travel_from`), sorted by name
    pub countries_can_visit: Vec<String>,
    pub extras: DetailExtras,
}

impl CountryDetail {
    /// Build the detail view for `country`; `None` when it is not a
    /// reference country. `metadata` is whatever the external source
    /// returned for it, if anything.
    pub fn build(
        table: &ReferenceTable,
        country: &str,
        metadata: Option<&ExternalMetadata>,
    ) -> Option<Self> {
        let entry = table.get(country)?;
        let rank = table.rank_of(country)?;

        let record = MergedCountryRecord::build(
            &entry.country,
            entry.can_travel_to,
            entry.can_travel_from,
            rank,
            metadata,
        );

        let visa_free_countries =
            related(table, entry, |other| other.can_travel_from >= entry.can_travel_to);
        let countries_can_visit =
            related(table, entry, |other| other.can_travel_to >= entry.can_travel_from);

        let extras = DetailExtras::from_parts(&record, metadata);

        Some(Self {
            accent: record.strength_tier.accent(),
            record,
            visa_free_countries,
            countries_can_visit,
            extras,
        })
    }
}

fn related<F>(table: &ReferenceTable, this: &ReferenceEntry, keep: F) -> Vec<String>
where
    F: Fn(&ReferenceEntry) -> bool,
{
    let mut names: Vec<String> = table
        .iter()
        .filter(|other| other.country != this.country)
        .filter(|other| keep(*other))
        .map(|other| other.country.clone())
        .collect();
    names.sort_by(|a, b| compare_names(a, b));
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::StrengthTier;
    use serde_json::json;

    fn table() -> ReferenceTable {
        ReferenceTable::new(vec![
            ReferenceEntry::new("United States", 172, 186),
            ReferenceEntry::new("United Kingdom", 187, 189),
            ReferenceEntry::new("Germany", 190, 192),
            ReferenceEntry::new("India", 62, 60),
        ])
        .unwrap()
    }

    #[test]
    fn test_detail_without_metadata() {
        let detail = CountryDetail::build(&table(), "united states", None).unwrap();

        assert_eq!(detail.record.country, "United States");
        assert_eq!(detail.record.rank, 3);
        assert_eq!(detail.record.strength_tier, StrengthTier::High);
        assert_eq!(detail.accent, StrengthTier::High.accent());
        assert_eq!(detail.record.region, "Unknown");
        assert_eq!(detail.extras.population, "N/A");
        assert_eq!(detail.extras.status, "N/A");

        // can_travel_from >= 172
        assert_eq!(detail.visa_free_countries, vec!["Germany", "United Kingdom"]);
        // can_travel_to >= 186
        assert_eq!(detail.countries_can_visit, vec!["Germany", "United Kingdom"]);
    }

    #[test]
    fn test_detail_lists_for_weak_passport() {
        let detail = CountryDetail::build(&table(), "India", None).unwrap();
        assert_eq!(detail.record.rank, 4);
        assert_eq!(
            detail.visa_free_countries,
            vec!["Germany", "United Kingdom", "United States"]
        );
        assert_eq!(
            detail.countries_can_visit,
            vec!["Germany", "United Kingdom", "United States"]
        );
    }

    #[test]
    fn test_detail_with_metadata() {
        let meta: ExternalMetadata = serde_json::from_value(json!({
            "name": {"common": "Germany", "official": "Federal Republic of Germany"},
            "region": "Europe",
            "subregion": "Western Europe",
            "population": 83240525,
            "area": 357114.0,
            "timezones": ["UTC+01:00"],
            "independent": true,
            "unMember": true,
            "startOfWeek": "monday",
            "car": {"signs": ["DY"], "side": "right"},
            "tld": [".de"],
            "cca2": "DE", "cca3": "DEU", "fifa": "GER",
            "demonyms": {"eng": {"f": "German", "m": "German"}},
            "gini": {"2016": 31.9},
            "capitalInfo": {"latlng": [52.52, 13.4]}
        }))
        .unwrap();

        let detail = CountryDetail::build(&table(), "Germany", Some(&meta)).unwrap();
        assert_eq!(detail.record.rank, 1);
        assert_eq!(detail.record.official_name, "Federal Republic of Germany");
        assert_eq!(detail.extras.population, "83,240,525");
        assert_eq!(detail.extras.area, "357,114 km²");
        assert_eq!(detail.extras.timezones, "GMT+01:00");
        assert_eq!(detail.extras.driving_side, "Right side");
        assert_eq!(detail.extras.week_start, "Monday");
        assert_eq!(detail.extras.status, "Independent State, UN Member");
        assert_eq!(detail.extras.country_codes, "ISO 2: DE | ISO 3: DEU | FIFA: GER");
        assert_eq!(detail.extras.gini, "31.9 (2016)");
        assert_eq!(detail.extras.capital_coordinates, "52.52°N, 13.40°E");
        assert_eq!(detail.extras.demonyms, "German (m), German (f)");
        assert_eq!(detail.extras.top_level_domains, ".de");
        assert!(detail.visa_free_countries.is_empty());
    }

    #[test]
    fn test_unknown_country() {
        assert!(CountryDetail::build(&table(), "Atlantis", None).is_none());
    }
}
