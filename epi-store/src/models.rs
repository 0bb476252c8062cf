//! Query result types returned by the [`Aggregator`](crate::Aggregator).

use chrono::NaiveDate;
use epi_core::metric::Metric;
use epi_core::record::MetricTotals;
use serde::Serialize;

/// Which rows a query covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegionScope {
    /// Every row in the store, including national-total rows.
    All,
    /// One selectable region.
    Region(String),
}

impl RegionScope {
    pub fn region(name: &str) -> Self {
        RegionScope::Region(name.to_string())
    }
}

/// One region's totals inside a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTotals {
    pub region: String,
    pub totals: MetricTotals,
}

/// Per-region totals at the latest date in the store.
///
/// Entries keep the order in which each region first appears among the
/// source rows for that date; ranking relies on it to break ties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub entries: Vec<RegionTotals>,
}

impl Snapshot {
    pub fn get(&self, region: &str) -> Option<&MetricTotals> {
        self.entries
            .iter()
            .find(|e| e.region == region)
            .map(|e| &e.totals)
    }

    pub fn value(&self, region: &str, metric: Metric) -> Option<i64> {
        self.get(region).map(|t| t.get(metric))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RegionTotals> {
        self.entries.iter()
    }
}
