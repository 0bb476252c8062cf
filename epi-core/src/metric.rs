//! Metric and case-type definitions plus the per-metric style table.
//!
//! Every chart builder looks up labels, colors and field accessors here
//! instead of branching per metric.

use crate::error::EpiError;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cumulative metric carried by every record.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Confirmed,
    Deceased,
    Recovered,
    Active,
}

/// The three metrics plotted on every multi-line chart, in drawing order.
pub const CHART_METRICS: [Metric; 3] = [Metric::Confirmed, Metric::Deceased, Metric::Recovered];

/// The four metrics shown as summary cards, in card order.
pub const CARD_METRICS: [Metric; 4] = [
    Metric::Confirmed,
    Metric::Deceased,
    Metric::Recovered,
    Metric::Active,
];

/// Display label, chart color and record accessor for one metric.
#[derive(Clone, Copy)]
pub struct MetricStyle {
    pub metric: Metric,
    pub label: &'static str,
    pub color: &'static str,
    pub accessor: fn(&Record) -> i64,
}

fn confirmed_of(r: &Record) -> i64 {
    r.confirmed_cum
}

fn deceased_of(r: &Record) -> i64 {
    r.deceased_cum
}

fn recovered_of(r: &Record) -> i64 {
    r.recovered_cum
}

fn active_of(r: &Record) -> i64 {
    r.active_cum
}

static METRIC_STYLES: [MetricStyle; 4] = [
    MetricStyle {
        metric: Metric::Confirmed,
        label: "Confirmed",
        color: "#2B37B0",
        accessor: confirmed_of,
    },
    MetricStyle {
        metric: Metric::Deceased,
        label: "Deceased",
        color: "#FF2520",
        accessor: deceased_of,
    },
    MetricStyle {
        metric: Metric::Recovered,
        label: "Recovered",
        color: "#17B65C",
        accessor: recovered_of,
    },
    MetricStyle {
        metric: Metric::Active,
        label: "Active",
        color: "#00909E",
        accessor: active_of,
    },
];

impl Metric {
    pub fn style(self) -> &'static MetricStyle {
        let idx = match self {
            Metric::Confirmed => 0,
            Metric::Deceased => 1,
            Metric::Recovered => 2,
            Metric::Active => 3,
        };
        &METRIC_STYLES[idx]
    }

    pub fn label(self) -> &'static str {
        self.style().label
    }

    pub fn color(self) -> &'static str {
        self.style().color
    }

    /// Read this metric's cumulative value from a record.
    pub fn value_of(self, record: &Record) -> i64 {
        (self.style().accessor)(record)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The case-type filter offered by the national selector.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    #[default]
    All,
    Confirmed,
    Deceased,
    Recovered,
}

/// A (label, value) pair for selector dropdowns.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl CaseType {
    pub const OPTIONS: [CaseType; 4] = [
        CaseType::All,
        CaseType::Confirmed,
        CaseType::Deceased,
        CaseType::Recovered,
    ];

    /// The single metric selected, or `None` for `All`.
    pub fn metric(self) -> Option<Metric> {
        match self {
            CaseType::All => None,
            CaseType::Confirmed => Some(Metric::Confirmed),
            CaseType::Deceased => Some(Metric::Deceased),
            CaseType::Recovered => Some(Metric::Recovered),
        }
    }

    /// Metrics plotted for this filter, in drawing order.
    pub fn metrics(self) -> Vec<Metric> {
        match self.metric() {
            Some(metric) => vec![metric],
            None => CHART_METRICS.to_vec(),
        }
    }

    pub fn label(self) -> &'static str {
        match self.metric() {
            Some(metric) => metric.label(),
            None => "All",
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            CaseType::All => "all",
            CaseType::Confirmed => "confirmed",
            CaseType::Deceased => "deceased",
            CaseType::Recovered => "recovered",
        }
    }

    /// Selector options with display labels, in dropdown order.
    pub fn options() -> Vec<SelectOption> {
        CaseType::OPTIONS
            .iter()
            .map(|c| SelectOption {
                label: c.label().to_string(),
                value: c.value().to_string(),
            })
            .collect()
    }
}

impl FromStr for CaseType {
    type Err = EpiError;

    /// Accepts the English selector values as well as the Indonesian ones
    /// used by the source dashboard ("semua", "konfirmasi", "meninggal", "sembuh").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "semua" => Ok(CaseType::All),
            "confirmed" | "konfirmasi" => Ok(CaseType::Confirmed),
            "deceased" | "meninggal" => Ok(CaseType::Deceased),
            "recovered" | "sembuh" => Ok(CaseType::Recovered),
            other => Err(EpiError::UnknownCaseType(other.to_string())),
        }
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn style_table_matches_metric() {
        for metric in CARD_METRICS {
            assert_eq!(metric.style().metric, metric);
        }
        assert_eq!(Metric::Confirmed.color(), "#2B37B0");
        assert_eq!(Metric::Deceased.color(), "#FF2520");
        assert_eq!(Metric::Recovered.color(), "#17B65C");
    }

    #[test]
    fn accessor_reads_matching_field() {
        let record = Record::derive(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(), "A", 10, 1, 5);
        assert_eq!(Metric::Confirmed.value_of(&record), 10);
        assert_eq!(Metric::Deceased.value_of(&record), 1);
        assert_eq!(Metric::Active.value_of(&record), 5);
        assert_eq!(Metric::Recovered.value_of(&record), 4);
    }

    #[test]
    fn case_type_parses_english_and_source_values() {
        assert_eq!("all".parse::<CaseType>().unwrap(), CaseType::All);
        assert_eq!("Confirmed".parse::<CaseType>().unwrap(), CaseType::Confirmed);
        assert_eq!("meninggal".parse::<CaseType>().unwrap(), CaseType::Deceased);
        assert_eq!("sembuh".parse::<CaseType>().unwrap(), CaseType::Recovered);
        assert!(matches!(
            "active".parse::<CaseType>(),
            Err(EpiError::UnknownCaseType(_))
        ));
    }

    #[test]
    fn case_type_options_in_dropdown_order() {
        let options = CaseType::options();
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["all", "confirmed", "deceased", "recovered"]);
        assert_eq!(options[0].label, "All");
        assert_eq!(CaseType::All.metrics(), CHART_METRICS.to_vec());
        assert_eq!(CaseType::Deceased.metrics(), vec![Metric::Deceased]);
    }
}
