//! Shared parsing utilities for the input CSV files.
//!
//! TrolleyGAR exports and CSO population files disagree on date formats
//! and number grouping, so the cell-level parsers live here and are
//! shared by both loaders.

use chrono::NaiveDate;
use trolley_watch_region_models::HealthRegion;

/// Parses a report date, accepting ISO (`2024-01-15`) and the
/// `DD/MM/YYYY` form printed in the daily publication (`15/01/2024`).
#[must_use]
pub fn parse_report_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(date);
    }
    None
}

/// Parses a non-negative count, tolerating thousands separators
/// (`"1,043"`, `"1 043"`). Returns `None` for anything else, negative
/// numbers included.
#[must_use]
pub fn parse_count(s: &str) -> Option<u32> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<u32>().ok()
}

/// Parses a health region from either its snake_case id
/// (`"mid_west"`) or its official HSE name (`"HSE Mid West"`),
/// case-insensitively.
#[must_use]
pub fn parse_region(s: &str) -> Option<HealthRegion> {
    let s = s.trim();
    if let Ok(region) = s.parse::<HealthRegion>() {
        return Some(region);
    }
    HealthRegion::all()
        .iter()
        .find(|region| s.eq_ignore_ascii_case(region.official_name()))
        .copied()
}

/// Finds a column by name in a trimmed header row, case-insensitively.
#[must_use]
pub fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_report_date() {
        let date = parse_report_date("2024-01-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn parses_irish_day_first_report_date() {
        let date = parse_report_date(" 15/01/2024 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn rejects_invalid_report_date() {
        assert!(parse_report_date("not-a-date").is_none());
        assert!(parse_report_date("2024-13-01").is_none());
        assert!(parse_report_date("32/01/2024").is_none());
        assert!(parse_report_date("").is_none());
    }

    #[test]
    fn parses_counts_with_separators() {
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count(" 17 "), Some(17));
        assert_eq!(parse_count("1,043"), Some(1043));
        assert_eq!(parse_count("1 064 322"), Some(1_064_322));
    }

    #[test]
    fn rejects_invalid_counts() {
        assert!(parse_count("").is_none());
        assert!(parse_count("-3").is_none());
        assert!(parse_count("12.5").is_none());
        assert!(parse_count("n/a").is_none());
    }

    #[test]
    fn parses_region_ids_and_official_names() {
        assert_eq!(parse_region("mid_west"), Some(HealthRegion::MidWest));
        assert_eq!(parse_region("HSE Mid West"), Some(HealthRegion::MidWest));
        assert_eq!(parse_region("hse mid west"), Some(HealthRegion::MidWest));
        assert_eq!(
            parse_region(" HSE West and North West "),
            Some(HealthRegion::WestNorthWest)
        );
    }

    #[test]
    fn rejects_unknown_regions() {
        assert!(parse_region("HSE North East").is_none());
        assert!(parse_region("").is_none());
    }

    #[test]
    fn finds_columns_case_insensitively() {
        let headers = vec![
            "Hospital".to_string(),
            "Total_Trolleys".to_string(),
            "report_date".to_string(),
        ];
        assert_eq!(find_column(&headers, "hospital"), Some(0));
        assert_eq!(find_column(&headers, "total_trolleys"), Some(1));
        assert_eq!(find_column(&headers, "Report_Date"), Some(2));
        assert_eq!(find_column(&headers, "ward_trolleys"), None);
    }
}
