//! Display helpers for table cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NOT_AVAILABLE: &str = "N/A";

/// `2025-01-05T10:00:00Z` → `Jan 5, 2025`. Empty → `N/A`; anything
/// unparseable is shown as-is.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match date {
        Ok(d) => d.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates() {
        assert_eq!(format_date(Some("2025-01-05T10:00:00.000Z")), "Jan 5, 2025");
        assert_eq!(format_date(Some("2024-12-31")), "Dec 31, 2024");
        assert_eq!(format_date(Some("2024-03-09 08:00:00")), "Mar 9, 2024");
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("  ")), "N/A");
        assert_eq!(format_date(Some("soon")), "soon");
    }

    #[test]
    fn missing_values() {
        assert_eq!(or_na(Some("x")), "x");
        assert_eq!(or_na(Some("")), "N/A");
        assert_eq!(or_na(None), "N/A");
    }
}
