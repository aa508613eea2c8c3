//! Date normalization for extracted invoice text.
//!
//! Extraction services return dates as free text in whatever format the
//! source document used. `normalize_date` maps the common formats to a
//! canonical `NaiveDate` and returns `None` for anything it cannot parse.

use chrono::{DateTime, NaiveDate};

/// Formats tried in order. Day-first formats come before month-first so that
/// unambiguous European invoices parse correctly; genuinely ambiguous inputs
/// (e.g. "03/04/2024") resolve day-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Normalize a free-form date string to a canonical date.
///
/// Returns `None` on failure rather than erroring; callers decide whether an
/// unparseable date is fatal.
pub fn normalize_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    // Timestamps occasionally come back from extraction; keep the date part.
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date() {
        assert_eq!(
            normalize_date("2024-03-15"),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_slash_formats() {
        assert_eq!(
            normalize_date("15/03/2024"),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        // Day-first wins for ambiguous input
        assert_eq!(
            normalize_date("03/04/2024"),
            Some(NaiveDate::from_ymd_opt(2024, 4, 3).unwrap())
        );
        // Month-first fallback when day-first is impossible
        assert_eq!(
            normalize_date("03/25/2024"),
            Some(NaiveDate::from_ymd_opt(2024, 3, 25).unwrap())
        );
    }

    #[test]
    fn test_dotted_and_dashed() {
        assert_eq!(
            normalize_date("15.03.2024"),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert_eq!(
            normalize_date("15-03-2024"),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_month_names() {
        assert_eq!(
            normalize_date("March 15, 2024"),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert_eq!(
            normalize_date("15 Mar 2024"),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_rfc3339_timestamp() {
        assert_eq!(
            normalize_date("2024-03-15T10:30:00Z"),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(
            normalize_date("  2024-03-15  "),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_unparseable_returns_none() {
        assert_eq!(normalize_date("not-a-date"), None);
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("   "), None);
        assert_eq!(normalize_date("2024-13-45"), None);
        assert_eq!(normalize_date("yesterday"), None);
    }
}
