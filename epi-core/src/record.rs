use crate::error::{EpiError, Result};
use crate::metric::Metric;
use chrono::NaiveDate;
use epi_utils::dates::parse_date;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// One unparsed input row as handed over by the loading collaborator.
///
/// Counts are kept as text so that a malformed value surfaces as a
/// schema error at load time rather than in the reader.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub region: String,
    pub confirmed_cum: String,
    pub deceased_cum: String,
    pub active_cum: String,
}

/// A single day's cumulative counts for one region.
///
/// `recovered_cum` is never read from the source; it is always
/// `confirmed_cum - deceased_cum - active_cum`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub date: NaiveDate,
    pub region: String,
    pub confirmed_cum: i64,
    pub deceased_cum: i64,
    pub active_cum: i64,
    pub recovered_cum: i64,
}

impl Record {
    /// Build a record, deriving the recovered count from the other three.
    pub fn derive(
        date: NaiveDate,
        region: &str,
        confirmed_cum: i64,
        deceased_cum: i64,
        active_cum: i64,
    ) -> Record {
        Record {
            date,
            region: region.to_string(),
            confirmed_cum,
            deceased_cum,
            active_cum,
            recovered_cum: confirmed_cum - deceased_cum - active_cum,
        }
    }

    pub fn value(&self, metric: Metric) -> i64 {
        metric.value_of(self)
    }
}

fn parse_count(field: &str, value: &str, line: usize) -> Result<i64> {
    let trimmed = value.trim();
    trimmed
        .parse::<u64>()
        .ok()
        .and_then(|v| i64::try_from(v).ok())
        .ok_or_else(|| {
            EpiError::Schema(format!(
                "row {}: column '{}' is not a non-negative integer: '{}'",
                line, field, trimmed
            ))
        })
}

impl RawRow {
    /// Parse this row into a [`Record`]. `line` is only used in error messages.
    pub fn parse(&self, line: usize) -> Result<Record> {
        let date = parse_date(&self.date)
            .map_err(|e| EpiError::Schema(format!("row {}: {}", line, e)))?;
        let region = self.region.trim();
        if region.is_empty() {
            return Err(EpiError::Schema(format!("row {}: empty region", line)));
        }
        let confirmed = parse_count("confirmed_cum", &self.confirmed_cum, line)?;
        let deceased = parse_count("deceased_cum", &self.deceased_cum, line)?;
        let active = parse_count("active_cum", &self.active_cum, line)?;
        Ok(Record::derive(date, region, confirmed, deceased, active))
    }
}

/// Per-metric totals, used for snapshots and summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricTotals {
    pub confirmed: i64,
    pub deceased: i64,
    pub recovered: i64,
    pub active: i64,
}

impl MetricTotals {
    pub fn get(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Deceased => self.deceased,
            Metric::Recovered => self.recovered,
            Metric::Active => self.active,
        }
    }
}

impl AddAssign<&Record> for MetricTotals {
    fn add_assign(&mut self, record: &Record) {
        self.confirmed += record.confirmed_cum;
        self.deceased += record.deceased_cum;
        self.recovered += record.recovered_cum;
        self.active += record.active_cum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, region: &str, c: &str, d: &str, a: &str) -> RawRow {
        RawRow {
            date: date.to_string(),
            region: region.to_string(),
            confirmed_cum: c.to_string(),
            deceased_cum: d.to_string(),
            active_cum: a.to_string(),
        }
    }

    #[test]
    fn recovered_is_derived() {
        let r = raw("2021-01-01", "A", "10", "1", "5").parse(1).unwrap();
        assert_eq!(r.recovered_cum, 4);
        assert_eq!(
            r.confirmed_cum,
            r.recovered_cum + r.deceased_cum + r.active_cum
        );
    }

    #[test]
    fn inconsistent_source_keeps_negative_recovered() {
        let r = raw("2021-01-01", "A", "3", "2", "5").parse(1).unwrap();
        assert_eq!(r.recovered_cum, -4);
    }

    #[test]
    fn bad_date_is_schema_error() {
        let err = raw("not-a-date", "A", "1", "0", "1").parse(7).unwrap_err();
        match err {
            EpiError::Schema(msg) => assert!(msg.contains("row 7")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn negative_or_non_numeric_count_is_schema_error() {
        assert!(matches!(
            raw("2021-01-01", "A", "-1", "0", "0").parse(1),
            Err(EpiError::Schema(_))
        ));
        assert!(matches!(
            raw("2021-01-01", "A", "10", "n/a", "0").parse(1),
            Err(EpiError::Schema(_))
        ));
    }

    #[test]
    fn totals_accumulate_records() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let mut totals = MetricTotals::default();
        totals += &Record::derive(date, "A", 10, 1, 5);
        totals += &Record::derive(date, "A", 5, 1, 1);
        assert_eq!(totals.get(Metric::Confirmed), 15);
        assert_eq!(totals.get(Metric::Deceased), 2);
        assert_eq!(totals.get(Metric::Active), 6);
        assert_eq!(totals.get(Metric::Recovered), 7);
    }
}
