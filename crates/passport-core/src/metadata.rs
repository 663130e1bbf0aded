//! External country metadata
//!
//! Mirrors the REST country JSON shape. Every field is optional and is
//! recovered on its own: a missing, null, or mistyped field falls back to
//! its default without failing the rest of the record.

use crate::format;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Deserialize a field, substituting the default on any shape mismatch
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryName {
    #[serde(default, deserialize_with = "lenient")]
    pub common: String,
    #[serde(default, deserialize_with = "lenient")]
    pub official: String,
    #[serde(default, deserialize_with = "lenient")]
    pub native_name: BTreeMap<String, NativeName>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeName {
    #[serde(default, deserialize_with = "lenient")]
    pub official: String,
    #[serde(default, deserialize_with = "lenient")]
    pub common: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageLinks {
    #[serde(default, deserialize_with = "lenient")]
    pub png: String,
    #[serde(default, deserialize_with = "lenient")]
    pub svg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub signs: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub side: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLinks {
    #[serde(default, deserialize_with = "lenient")]
    pub google_maps: String,
    #[serde(default, deserialize_with = "lenient")]
    pub open_street_maps: String,
}

/// International dialing prefix: root ("+4") plus suffixes ("4")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Idd {
    #[serde(default, deserialize_with = "lenient")]
    pub root: String,
    #[serde(default, deserialize_with = "lenient")]
    pub suffixes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demonym {
    #[serde(default, deserialize_with = "lenient")]
    pub f: String,
    #[serde(default, deserialize_with = "lenient")]
    pub m: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub latlng: Vec<f64>,
}

/// One country record from the external metadata source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMetadata {
    #[serde(default, deserialize_with = "lenient")]
    pub name: CountryName,
    #[serde(default, deserialize_with = "lenient")]
    pub capital: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub region: String,
    #[serde(default, deserialize_with = "lenient")]
    pub subregion: String,
    #[serde(default, deserialize_with = "lenient")]
    pub languages: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient")]
    pub currencies: BTreeMap<String, Currency>,
    #[serde(default, deserialize_with = "lenient")]
    pub population: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub area: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub timezones: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub continents: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub flags: ImageLinks,
    #[serde(default, deserialize_with = "lenient")]
    pub coat_of_arms: ImageLinks,
    #[serde(default, deserialize_with = "lenient")]
    pub borders: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub independent: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub un_member: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub start_of_week: String,
    #[serde(default, deserialize_with = "lenient")]
    pub car: CarInfo,
    #[serde(default, deserialize_with = "lenient")]
    pub maps: MapLinks,
    #[serde(default, deserialize_with = "lenient")]
    pub idd: Idd,
    #[serde(default, deserialize_with = "lenient")]
    pub demonyms: BTreeMap<String, Demonym>,
    #[serde(default, deserialize_with = "lenient")]
    pub gini: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub tld: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cca2: String,
    #[serde(default, deserialize_with = "lenient")]
    pub cca3: String,
    #[serde(default, deserialize_with = "lenient")]
    pub fifa: String,
    #[serde(default, deserialize_with = "lenient")]
    pub capital_info: CapitalInfo,
}

impl ExternalMetadata {
    /// Parse a JSON payload holding either one record or an array of
    /// records. Elements that are not objects are skipped.
    pub fn parse_collection(payload: serde_json::Value) -> Vec<ExternalMetadata> {
        let items = match payload {
            serde_json::Value::Array(items) => items,
            obj @ serde_json::Value::Object(_) => vec![obj],
            other => {
                warn!("Unexpected metadata payload type: {}", json_kind(&other));
                return Vec::new();
            }
        };

        let total = items.len();
        let records: Vec<ExternalMetadata> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<ExternalMetadata>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("Skipping metadata element: {}", e);
                    None
                }
            })
            .collect();

        if records.len() < total {
            warn!(
                "Skipped {} of {} metadata elements",
                total - records.len(),
                total
            );
        }

        records
    }

    pub fn common_name(&self) -> &str {
        &self.name.common
    }

    /// Official name, or the common name when absent
    pub fn official_name(&self) -> &str {
        if self.name.official.is_empty() {
            &self.name.common
        } else {
            &self.name.official
        }
    }

    /// First native official name, falling back to the official name
    pub fn native_name(&self) -> &str {
        self.name
            .native_name
            .values()
            .map(|n| n.official.as_str())
            .find(|n| !n.is_empty())
            .unwrap_or_else(|| self.official_name())
    }

    /// First capital or "N/A"
    pub fn capital(&self) -> &str {
        self.capital
            .first()
            .map(String::as_str)
            .filter(|c| !c.is_empty())
            .unwrap_or(format::NOT_AVAILABLE)
    }

    pub fn languages_joined(&self) -> String {
        self.languages
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// "Euro (€), Swiss franc (Fr.)"
    pub fn currencies_joined(&self) -> String {
        self.currencies
            .values()
            .map(|c| format!("{} ({})", c.name, c.symbol))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn phone_code(&self) -> String {
        format::phone_code(&self.idd.root, &self.idd.suffixes)
    }

    /// English demonyms as "m (m), f (f)", or "N/A"
    pub fn demonyms_eng(&self) -> String {
        match self.demonyms.get("eng") {
            Some(d) if !d.m.is_empty() || !d.f.is_empty() => format!("{} (m), {} (f)", d.m, d.f),
            _ => format::NOT_AVAILABLE.to_string(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn switzerland() -> serde_json::Value {
        json!({
            "name": {
                "common": "Switzerland",
                "official": "Swiss Confederation",
                "nativeName": {
                    "deu": {"official": "Schweizerische Eidgenossenschaft", "common": "Schweiz"}
                }
            },
            "capital": ["Bern"],
            "region": "Europe",
            "subregion": "Western Europe",
            "languages": {"deu": "German", "fra": "French"},
            "currencies": {"CHF": {"name": "Swiss franc", "symbol": "Fr."}},
            "population": 8654622,
            "area": 41284.0,
            "timezones": ["UTC+01:00"],
            "continents": ["Europe"],
            "flags": {"png": "https://flagcdn.com/w320/ch.png", "svg": "https://flagcdn.com/ch.svg"},
            "borders": ["AUT", "FRA", "ITA", "LIE", "DEU"],
            "independent": true,
            "unMember": true,
            "startOfWeek": "monday",
            "car": {"signs": ["CH"], "side": "right"},
            "idd": {"root": "+4", "suffixes": ["1"]},
            "demonyms": {"eng": {"f": "Swiss", "m": "Swiss"}},
            "cca2": "CH"
        })
    }

    #[test]
    fn test_parse_full_record() {
        let record: ExternalMetadata = serde_json::from_value(switzerland()).unwrap();

        assert_eq!(record.common_name(), "Switzerland");
        assert_eq!(record.official_name(), "Swiss Confederation");
        assert_eq!(record.native_name(), "Schweizerische Eidgenossenschaft");
        assert_eq!(record.capital(), "Bern");
        assert_eq!(record.languages_joined(), "German, French");
        assert_eq!(record.currencies_joined(), "Swiss franc (Fr.)");
        assert_eq!(record.phone_code(), "+41");
        assert_eq!(record.demonyms_eng(), "Swiss (m), Swiss (f)");
        assert_eq!(record.population, 8654622);
        assert_eq!(record.borders.len(), 5);
        assert!(record.un_member);
        // Absent nested object
        assert_eq!(record.coat_of_arms, ImageLinks::default());
    }

    #[test]
    fn test_missing_and_mistyped_fields_default() {
        let record: ExternalMetadata = serde_json::from_value(json!({
            "name": {"common": "Atlantis"},
            "population": "lots",
            "subregion": null,
            "borders": null,
            "capital": "not-a-list",
            "idd": {"root": "+9"}
        }))
        .unwrap();

        assert_eq!(record.common_name(), "Atlantis");
        assert_eq!(record.official_name(), "Atlantis");
        assert_eq!(record.native_name(), "Atlantis");
        assert_eq!(record.population, 0);
        assert_eq!(record.subregion, "");
        assert!(record.borders.is_empty());
        assert_eq!(record.capital(), "N/A");
        assert_eq!(record.phone_code(), "N/A");
        assert_eq!(record.demonyms_eng(), "N/A");
    }

    #[test]
    fn test_parse_collection_shapes() {
        let records = ExternalMetadata::parse_collection(json!([switzerland(), 42, {"region": "Asia"}]));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].region, "Asia");
        assert_eq!(records[1].common_name(), "");

        let single = ExternalMetadata::parse_collection(switzerland());
        assert_eq!(single.len(), 1);

        assert!(ExternalMetadata::parse_collection(json!("oops")).is_empty());
        assert!(ExternalMetadata::parse_collection(json!(null)).is_empty());
    }
}
