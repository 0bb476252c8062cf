//! Shared utility functions for EPI crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    /// Canonical calendar date format: "YYYY-MM-DD"
    pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

    /// Date-time layouts accepted in addition to a bare calendar date.
    const DATE_TIME_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(ISO_DATE_FORMAT).to_string()
    }

    /// Parse an ISO-8601 date or date-time string into a calendar date.
    ///
    /// Any time-of-day component is dropped, so "2021-01-02T18:30:00"
    /// and "2021-01-02" land on the same day.
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, ISO_DATE_FORMAT) {
            return Ok(date);
        }
        for format in DATE_TIME_FORMATS {
            if let Ok(date_time) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(date_time.date());
            }
        }
        let with_offset = DateTime::parse_from_rfc3339(s)
            .map_err(|e| anyhow::anyhow!("unparsable date '{}': {}", s, e))?;
        Ok(with_offset.date_naive())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_parse_drops_time_component() {
            let expected = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();
            assert_eq!(parse_date("2021-01-02T18:30:00").unwrap(), expected);
            assert_eq!(parse_date("2021-01-02 00:00:00").unwrap(), expected);
            assert_eq!(parse_date("2021-01-02T23:00:00+07:00").unwrap(), expected);
            assert_eq!(parse_date(" 2021-01-02 ").unwrap(), expected);
        }

        #[test]
        fn test_parse_rejects_garbage() {
            assert!(parse_date("").is_err());
            assert!(parse_date("02/01/2021").is_err());
            assert!(parse_date("2021-13-01").is_err());
        }
    }
}
