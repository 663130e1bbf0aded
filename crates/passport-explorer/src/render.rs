//! Plain-text rendering for terminal output

use passport_core::format::{format_population, NOT_AVAILABLE};
use passport_core::listing::filter_names;
use passport_core::{CountryDetail, FeaturedCountry, ListQuery, MergedCountryRecord};
use std::io::{self, Write};

pub fn write_list<W: Write>(
    out: &mut W,
    query: &ListQuery,
    rows: &[&MergedCountryRecord],
) -> io::Result<()> {
    writeln!(
        out,
        "{:>4}  {:<34} {:>6} {:>6}  {:<8} {:<18} {:>10}",
        "Rank", "Country", "To", "From", "Tier", "Region", "Population"
    )?;
    writeln!(out, "{}", "-".repeat(94))?;

    for record in rows {
        let population = if record.has_metadata {
            format_population(record.population)
        } else {
            NOT_AVAILABLE.to_string()
        };
        writeln!(
            out,
            "{:>4}  {:<34} {:>6} {:>6}  {:<8} {:<18} {:>10}",
            record.rank,
            record.country,
            record.can_travel_to,
            record.can_travel_from,
            record.strength_tier.to_string(),
            record.region_bucket().to_string(),
            population
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{} countries ({})", rows.len(), query.region)
}

pub fn write_detail<W: Write>(
    out: &mut W,
    detail: &CountryDetail,
    list_filter: Option<&str>,
) -> io::Result<()> {
    let record = &detail.record;
    let extras = &detail.extras;

    writeln!(
        out,
        "{} {}  #{}  {} passport",
        detail.accent.emoji, record.country, record.rank, record.strength_tier
    )?;
    if record.official_name != record.country {
        writeln!(out, "{}", record.official_name)?;
    }
    writeln!(out)?;

    let rows = [
        ("Visa-free destinations", record.can_travel_to.to_string()),
        ("Visa-free visitors", record.can_travel_from.to_string()),
        ("Region", region_line(record)),
        ("Capital", record.capital.clone()),
        ("Capital coordinates", extras.capital_coordinates.clone()),
        ("Languages", record.languages.clone()),
        ("Currencies", record.currencies.clone()),
        ("Population", extras.population.clone()),
        ("Area", extras.area.clone()),
        ("Demonyms", extras.demonyms.clone()),
        ("Gini index", extras.gini.clone()),
        ("Calling code", record.phone_code.clone()),
        ("Top-level domains", extras.top_level_domains.clone()),
        ("Codes", extras.country_codes.clone()),
        ("Timezones", extras.timezones.clone()),
        ("Driving", extras.driving_side.clone()),
        ("Car signs", extras.car_signs.clone()),
        ("Week starts", extras.week_start.clone()),
        ("Status", extras.status.clone()),
    ];
    for (label, value) in rows {
        writeln!(out, "  {:<24} {}", label, value)?;
    }

    let term = list_filter.unwrap_or_default();
    write_names(
        out,
        "Visa-free access to",
        &filter_names(&detail.visa_free_countries, term),
    )?;
    write_names(
        out,
        "Can be visited visa-free from",
        &filter_names(&detail.countries_can_visit, term),
    )
}

fn region_line(record: &MergedCountryRecord) -> String {
    if record.subregion.is_empty() {
        record.region.clone()
    } else {
        format!("{} / {}", record.region, record.subregion)
    }
}

fn write_names<W: Write>(out: &mut W, heading: &str, names: &[&str]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} ({}):", heading, names.len())?;
    if names.is_empty() {
        return writeln!(out, "  (none)");
    }
    for chunk in names.chunks(4) {
        writeln!(out, "  {}", chunk.join(", "))?;
    }
    Ok(())
}

pub fn write_featured<W: Write>(out: &mut W, featured: &FeaturedCountry) -> io::Result<()> {
    let accent = featured.strength_tier.accent();
    writeln!(out, "{}", featured.heading())?;
    writeln!(
        out,
        "{} {}  #{}  {}",
        accent.emoji, featured.entry.country, featured.rank, featured.strength_tier
    )?;
    writeln!(
        out,
        "  Visa-free destinations: {}",
        featured.entry.can_travel_to
    )?;
    writeln!(
        out,
        "  Visa-free visitors:     {}",
        featured.entry.can_travel_from
    )?;
    if let passport_core::FeaturedOrigin::Fallback { note } = &featured.origin {
        writeln!(out, "  ({})", note)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use passport_core::{merge, select_featured, ReferenceEntry, ReferenceTable};

    fn table() -> ReferenceTable {
        ReferenceTable::new(vec![
            ReferenceEntry::new("United States", 172, 186),
            ReferenceEntry::new("United Kingdom", 187, 189),
            ReferenceEntry::new("Germany", 190, 192),
            ReferenceEntry::new("India", 62, 60),
        ])
        .unwrap()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_list_output() {
        let records = merge(&table(), &[]);
        let query = ListQuery {
            search: "united".to_string(),
            ..ListQuery::default()
        };
        let rows = query.apply(&records);
        let text = render(|out| write_list(out, &query, &rows));

        assert!(text.contains("United Kingdom"));
        assert!(text.contains("United States"));
        assert!(!text.contains("Germany"));
        assert!(text.ends_with("2 countries (All Regions)\n"));
    }

    #[test]
    fn test_detail_output_filters_lists() {
        let detail = CountryDetail::build(&table(), "India", None).unwrap();
        let text = render(|out| write_detail(out, &detail, Some("united")));

        assert!(text.starts_with("📘 India  #4  Low passport"));
        assert!(text.contains("Visa-free access to (2):"));
        assert!(text.contains("  United Kingdom, United States"));
        assert!(text.contains("  Status                   N/A"));
    }

    #[test]
    fn test_featured_fallback_note() {
        let featured = select_featured(&table(), None, "United States").unwrap();
        let text = render(|out| write_featured(out, &featured));
        assert!(text.starts_with("Featured Country\n"));
        assert!(text.contains("Could not detect your location"));
    }
}
