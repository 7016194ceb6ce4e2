use chrono::{NaiveDate, Utc};

use crate::error::{Error, Result};

/// Parses a `YYYY-MM-DD` path segment into a calendar day.
///
/// Daily records are keyed by the UTC calendar day, so any time component is
/// rejected rather than normalized.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation("date", "Invalid date format provided. Expected YYYY-MM-DD."))
}

/// Current UTC calendar day.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date("2024-03-09").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("2024-03-09T10:00:00Z").is_err());
    }
}
