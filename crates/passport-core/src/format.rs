//! Display formatting for country fields

use std::collections::BTreeMap;

/// Placeholder for absent values
pub const NOT_AVAILABLE: &str = "N/A";

/// Group an integer with thousands separators: 1234567 -> "1,234,567"
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Group a decimal, keeping at most three fraction digits
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() || value < 0.0 {
        return NOT_AVAILABLE.to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    let whole = rounded.trunc() as u64;
    let fraction = format!("{:.3}", rounded - rounded.trunc());
    let fraction = fraction.trim_start_matches('0').trim_end_matches('0');

    if fraction == "." {
        format_number(whole)
    } else {
        format!("{}{}", format_number(whole), fraction)
    }
}

/// Compact population: 1.4B, 67.0M, 39.5K, or the raw number
pub fn format_population(population: u64) -> String {
    let n = population as f64;
    if population >= 1_000_000_000 {
        format!("{:.1}B", n / 1_000_000_000.0)
    } else if population >= 1_000_000 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if population >= 1_000 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        population.to_string()
    }
}

pub fn format_area(area: f64) -> String {
    format!("{} km²", format_decimal(area))
}

/// Dialing code from root and first suffix ("+4" + "1")
pub fn phone_code(root: &str, suffixes: &[String]) -> String {
    match suffixes.first() {
        Some(suffix) if !root.is_empty() => format!("{}{}", root, suffix),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// "UTC+01:00" -> "GMT+01:00", bare "UTC" -> "GMT"
pub fn format_timezones(timezones: &[String]) -> String {
    timezones
        .iter()
        .map(|tz| match tz.strip_prefix("UTC") {
            Some(offset) => format!("GMT{}", offset),
            None => tz.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn country_status(independent: bool, un_member: bool) -> String {
    let mut status = Vec::new();
    if independent {
        status.push("Independent State");
    }
    if un_member {
        status.push("UN Member");
    }
    if status.is_empty() {
        "Dependent Territory".to_string()
    } else {
        status.join(", ")
    }
}

/// Latest Gini coefficient as "value (year)"
pub fn gini_index(gini: &BTreeMap<String, f64>) -> String {
    gini.iter()
        .filter_map(|(year, value)| year.parse::<i32>().ok().map(|y| (y, *value)))
        .max_by_key(|(year, _)| *year)
        .map(|(year, value)| format!("{} ({})", value, year))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// "46.92°N, 7.47°E"
pub fn capital_coordinates(latlng: &[f64]) -> String {
    match latlng {
        [lat, lng, ..] => format!(
            "{:.2}°{}, {:.2}°{}",
            lat.abs(),
            if *lat >= 0.0 { 'N' } else { 'S' },
            lng.abs(),
            if *lng >= 0.0 { 'E' } else { 'W' }
        ),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Upper-case the first character: "monday" -> "Monday"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn driving_side(side: &str) -> String {
    if side.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{} side", capitalize(side))
}

/// "ISO 2: CH | ISO 3: CHE | FIFA: SUI"
pub fn country_codes(cca2: &str, cca3: &str, fifa: &str) -> String {
    let mut codes = vec![format!("ISO 2: {}", cca2), format!("ISO 3: {}", cca3)];
    if !fifa.is_empty() {
        codes.push(format!("FIFA: {}", fifa));
    }
    codes.join(" | ")
}

pub fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_area() {
        assert_eq!(format_area(41284.0), "41,284 km²");
        assert_eq!(format_area(0.44), "0.44 km²");
        assert_eq!(format_area(2.5), "2.5 km²");
        assert_eq!(format_area(f64::NAN), "N/A km²");
    }

    #[test]
    fn test_format_population() {
        assert_eq!(format_population(1_402_112_000), "1.4B");
        assert_eq!(format_population(67_215_293), "67.2M");
        assert_eq!(format_population(39_584), "39.6K");
        assert_eq!(format_population(825), "825");
    }

    #[test]
    fn test_phone_code() {
        assert_eq!(phone_code("+4", &["1".to_string()]), "+41");
        assert_eq!(phone_code("+1", &[]), "N/A");
        assert_eq!(phone_code("", &["1".to_string()]), "N/A");
    }

    #[test]
    fn test_timezones() {
        let tz = vec!["UTC".to_string(), "UTC-05:00".to_string(), "Europe/Oslo".to_string()];
        assert_eq!(format_timezones(&tz), "GMT, GMT-05:00, Europe/Oslo");
    }

    #[test]
    fn test_status_and_codes() {
        assert_eq!(country_status(true, true), "Independent State, UN Member");
        assert_eq!(country_status(false, false), "Dependent Territory");
        assert_eq!(country_codes("CH", "CHE", "SUI"), "ISO 2: CH | ISO 3: CHE | FIFA: SUI");
        assert_eq!(country_codes("AQ", "ATA", ""), "ISO 2: AQ | ISO 3: ATA");
    }

    #[test]
    fn test_gini_picks_latest_year() {
        let mut gini = BTreeMap::new();
        gini.insert("2014".to_string(), 32.5);
        gini.insert("2018".to_string(), 33.1);
        assert_eq!(gini_index(&gini), "33.1 (2018)");
        assert_eq!(gini_index(&BTreeMap::new()), "N/A");
    }

    #[test]
    fn test_capital_coordinates() {
        assert_eq!(capital_coordinates(&[46.92, 7.47]), "46.92°N, 7.47°E");
        assert_eq!(capital_coordinates(&[-34.58, -58.67]), "34.58°S, 58.67°W");
        assert_eq!(capital_coordinates(&[1.0]), "N/A");
    }

    #[test]
    fn test_text_helpers() {
        assert_eq!(capitalize("monday"), "Monday");
        assert_eq!(capitalize(""), "");
        assert_eq!(driving_side("left"), "Left side");
        assert_eq!(driving_side(""), "N/A");
        assert_eq!(join_or_na(&[]), "N/A");
        assert_eq!(join_or_na(&["CH".to_string(), "LI".to_string()]), "CH, LI");
    }
}
