//! Immutable in-memory record store for daily per-region case counts.
//!
//! The store is built exactly once from raw rows (see [`RecordStore::load`]
//! and the CSV adapter in `loader`) and is read-only afterwards, so it can be
//! shared behind an `Arc` between any number of readers without locking.
//!
//! # Usage
//!
//! ```rust
//! use epi_core::columns::ColumnMap;
//! use epi_core::metric::Metric;
//! use epi_store::RecordStore;
//!
//! let csv = "date,region,confirmed_cum,deceased_cum,active_cum\n2021-01-01,A,10,1,5\n2021-01-02,A,15,2,6\n";
//! let store = RecordStore::from_csv_str(csv, &ColumnMap::default(), "ALL").unwrap();
//!
//! let national = store.aggregator().aggregate_national(Metric::Confirmed).unwrap();
//! assert_eq!(national.values(), vec![10, 15]);
//! ```
//!
//! National totals and snapshots are derived on demand by the
//! [`Aggregator`]; nothing is cached.

mod loader;
pub mod models;
mod queries;

pub use models::{RegionScope, RegionTotals, Snapshot};
pub use queries::Aggregator;

use chrono::NaiveDate;
use epi_core::error::{EpiError, Result};
use epi_core::metric::Metric;
use epi_core::record::Record;
use epi_core::series::DailySeries;
use std::collections::{BTreeSet, HashMap};

/// Ordered-by-date, grouped-by-region table of records.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Stable-sorted by date: rows sharing a date keep their source order.
    records: Vec<Record>,
    /// Region name -> indexes into `records`, ascending by date.
    by_region: HashMap<String, Vec<usize>>,
    dates: Vec<NaiveDate>,
    /// Sorted, without the national key.
    regions: Vec<String>,
    national_key: String,
}

impl RecordStore {
    fn from_records(mut records: Vec<Record>, national_key: &str) -> Self {
        records.sort_by_key(|r| r.date);

        let mut by_region: HashMap<String, Vec<usize>> = HashMap::new();
        let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
        let mut regions: BTreeSet<&str> = BTreeSet::new();
        for (idx, record) in records.iter().enumerate() {
            by_region.entry(record.region.clone()).or_default().push(idx);
            dates.insert(record.date);
            if record.region != national_key {
                regions.insert(record.region.as_str());
            }
        }
        let regions: Vec<String> = regions.into_iter().map(String::from).collect();

        Self {
            by_region,
            dates: dates.into_iter().collect(),
            regions,
            national_key: national_key.to_string(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn national_key(&self) -> &str {
        &self.national_key
    }

    /// Distinct dates, ascending.
    pub fn all_dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Selectable regions, sorted, never including the national key.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.regions.binary_search_by(|r| r.as_str().cmp(region)).is_ok()
    }

    /// Every record, ascending by date.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records for one region (or every record), ascending by date.
    pub fn rows_for(&self, scope: &RegionScope) -> Result<Vec<&Record>> {
        match scope {
            RegionScope::All => Ok(self.records.iter().collect()),
            RegionScope::Region(name) => {
                if !self.contains_region(name) {
                    return Err(EpiError::UnknownRegion(name.clone()));
                }
                Ok(self
                    .by_region
                    .get(name)
                    .map(|idxs| idxs.iter().map(|&i| &self.records[i]).collect())
                    .unwrap_or_default())
            }
        }
    }

    /// Records carrying the national key, ascending by date.
    pub fn national_rows(&self) -> Vec<&Record> {
        self.by_region
            .get(&self.national_key)
            .map(|idxs| idxs.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    /// Per-date sum of `metric` over the regional rows only.
    pub fn national_by_date(&self, metric: Metric) -> Result<DailySeries> {
        self.aggregator().regions_only_national(metric)
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(self)
    }
}
