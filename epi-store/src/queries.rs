//! Aggregation queries over a [`RecordStore`].
//!
//! Every query is a single pass over the in-memory rows and returns a fresh
//! value; nothing is cached between calls. Queries over an empty store fail
//! with [`EpiError::EmptyStore`] so callers can tell "no data" apart from a
//! genuine zero.

use crate::models::{RegionScope, RegionTotals, Snapshot};
use crate::RecordStore;
use chrono::NaiveDate;
use epi_core::error::{EpiError, Result};
use epi_core::metric::Metric;
use epi_core::record::{MetricTotals, Record};
use epi_core::series::DailySeries;

/// Collapses the store across regions (per date) or across dates (per region).
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    store: &'a RecordStore,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    fn non_empty(&self) -> Result<NaiveDate> {
        self.store.max_date().ok_or(EpiError::EmptyStore)
    }

    /// Sum `metric` over every row of each date, national-key rows included.
    pub fn aggregate_national(&self, metric: Metric) -> Result<DailySeries> {
        self.non_empty()?;
        let series = DailySeries::summed_by_date(
            self.store
                .records()
                .iter()
                .map(|r| (r.date, r.value(metric))),
        );
        log::debug!(
            "[EPI] query: aggregate_national({}) returned {} points",
            metric,
            series.len()
        );
        Ok(series)
    }

    /// Sum `metric` per date over regional rows only, skipping national-key rows.
    pub fn regions_only_national(&self, metric: Metric) -> Result<DailySeries> {
        self.non_empty()?;
        let national_key = self.store.national_key();
        Ok(DailySeries::summed_by_date(
            self.store
                .records()
                .iter()
                .filter(|r| r.region != national_key)
                .map(|r| (r.date, r.value(metric))),
        ))
    }

    /// One region's `metric` over time; duplicate dates are summed.
    pub fn region_series(&self, region: &str, metric: Metric) -> Result<DailySeries> {
        self.non_empty()?;
        let rows = self.store.rows_for(&RegionScope::region(region))?;
        Ok(DailySeries::summed_by_date(
            rows.into_iter().map(|r| (r.date, r.value(metric))),
        ))
    }

    /// Per-region totals at the store's latest date.
    ///
    /// Regions without a row on that date are absent. National-key rows are
    /// left out so the snapshot ranks regions only.
    pub fn latest_snapshot(&self) -> Result<Snapshot> {
        self.snapshot_at_latest(false)
    }

    /// Like [`latest_snapshot`](Self::latest_snapshot), optionally keeping
    /// national-key rows as one more entry.
    pub fn snapshot_at_latest(&self, include_national_rows: bool) -> Result<Snapshot> {
        let latest = self.non_empty()?;
        let national_key = self.store.national_key();
        let mut entries: Vec<RegionTotals> = Vec::new();
        for record in self
            .store
            .records()
            .iter()
            .filter(|r| r.date == latest && (include_national_rows || r.region != national_key))
        {
            match entries.iter_mut().find(|e| e.region == record.region) {
                Some(entry) => entry.totals += record,
                None => {
                    let mut totals = MetricTotals::default();
                    totals += record;
                    entries.push(RegionTotals {
                        region: record.region.clone(),
                        totals,
                    });
                }
            }
        }
        log::debug!(
            "[EPI] query: snapshot at {} returned {} entries",
            latest,
            entries.len()
        );
        Ok(Snapshot {
            date: latest,
            entries,
        })
    }

    /// Totals for one region at that region's own latest date.
    pub fn latest_for_region(&self, region: &str) -> Result<MetricTotals> {
        self.non_empty()?;
        let rows = self.store.rows_for(&RegionScope::region(region))?;
        Ok(totals_at_last_date(&rows))
    }

    /// National totals at the latest date.
    ///
    /// With `include_national_rows` the sum matches
    /// [`aggregate_national`](Self::aggregate_national), otherwise it matches
    /// [`regions_only_national`](Self::regions_only_national).
    pub fn national_summary(&self, include_national_rows: bool) -> Result<MetricTotals> {
        self.non_empty()?;
        let national_key = self.store.national_key();
        let rows: Vec<&Record> = self
            .store
            .records()
            .iter()
            .filter(|r| include_national_rows || r.region != national_key)
            .collect();
        Ok(totals_at_last_date(&rows))
    }
}

/// Sum every row sharing the last date of date-ordered `rows`.
fn totals_at_last_date(rows: &[&Record]) -> MetricTotals {
    let mut totals = MetricTotals::default();
    if let Some(last) = rows.last().map(|r| r.date) {
        for record in rows.iter().rev().take_while(|r| r.date == last) {
            totals += *record;
        }
    }
    totals
}
