//! Choropleth shading for boundary GeoJSON
//!
//! Features are joined to the reference table on their `ADMIN`
//! property. Only properties are read or written; geometry passes
//! through untouched.

use crate::reference::{ReferenceEntry, ReferenceTable};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Feature property holding the country's common name
pub const ADMIN_PROPERTY: &str = "ADMIN";

/// Fill for features with no reference row
pub const UNMATCHED_COLOR: &str = "#d3d3d3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Metric {
    #[default]
    CanTravelTo,
    CanTravelFrom,
}

impl Metric {
    pub fn value(&self, entry: &ReferenceEntry) -> u32 {
        match self {
            Metric::CanTravelTo => entry.can_travel_to,
            Metric::CanTravelFrom => entry.can_travel_from,
        }
    }

    pub fn max_over(&self, table: &ReferenceTable) -> u32 {
        match self {
            Metric::CanTravelTo => table.max_can_travel_to(),
            Metric::CanTravelFrom => table.max_can_travel_from(),
        }
    }

    /// Tooltip phrase
    pub fn phrase(&self) -> &'static str {
        match self {
            Metric::CanTravelTo => "Can travel to",
            Metric::CanTravelFrom => "Can be visited by",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::CanTravelTo => f.write_str("canTravelTo"),
            Metric::CanTravelFrom => f.write_str("canTravelFrom"),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "to" | "cantravelto" | "can-travel-to" => Ok(Metric::CanTravelTo),
            "from" | "cantravelfrom" | "can-travel-from" => Ok(Metric::CanTravelFrom),
            other => Err(format!("unknown metric: {}", other)),
        }
    }
}

/// Five shading bands over `value / max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChoroplethBand {
    Lowest,
    Low,
    Middle,
    High,
    Highest,
}

impl ChoroplethBand {
    /// Band for `value` relative to the metric's maximum
    pub fn classify(value: u32, max: u32) -> Self {
        let normalized = if max == 0 {
            0.0
        } else {
            value as f64 / max as f64
        };

        if normalized > 0.8 {
            ChoroplethBand::Highest
        } else if normalized > 0.6 {
            ChoroplethBand::High
        } else if normalized > 0.4 {
            ChoroplethBand::Middle
        } else if normalized > 0.2 {
            ChoroplethBand::Low
        } else {
            ChoroplethBand::Lowest
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ChoroplethBand::Highest => "#1a9850",
            ChoroplethBand::High => "#91cf60",
            ChoroplethBand::Middle => "#d9ef8b",
            ChoroplethBand::Low => "#fee08b",
            ChoroplethBand::Lowest => "#fc8d59",
        }
    }
}

/// Annotate every feature with `fill_color` and `tooltip` properties.
///
/// Matched features also get `value`, `band`, and `rank`.
pub fn shade_features(
    mut collection: FeatureCollection,
    table: &ReferenceTable,
    metric: Metric,
) -> FeatureCollection {
    let max = metric.max_over(table);
    let mut matched = 0;

    for feature in collection.features.iter_mut() {
        let admin = feature
            .property(ADMIN_PROPERTY)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        match table.get(&admin) {
            Some(entry) => {
                matched += 1;
                let value = metric.value(entry);
                let band = ChoroplethBand::classify(value, max);

                feature.set_property("fill_color", band.color());
                feature.set_property("band", format!("{:?}", band));
                feature.set_property("value", value);
                feature.set_property("rank", table.rank_of(&admin));
                feature.set_property(
                    "tooltip",
                    format!("{}: {} {} countries", admin, metric.phrase(), value),
                );
            }
            None => {
                debug!("No reference row for boundary {:?}", admin);
                feature.set_property("fill_color", UNMATCHED_COLOR);
                feature.set_property("tooltip", admin);
            }
        }
    }

    info!(
        "Shaded {} of {} boundary features by {}",
        matched,
        collection.features.len(),
        metric
    );

    collection
}
