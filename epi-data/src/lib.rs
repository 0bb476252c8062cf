//! Derived series for case data.
//!
//! This crate turns cumulative series and snapshots coming out of the
//! record store into the forms the charts consume: daily deltas,
//! percentages of confirmed cases and top-N regional rankings.

/// First differences of cumulative series ("new cases per day").
pub mod diff {
    use epi_core::series::{DailySeries, SeriesPoint};

    /// Day-over-day change of a date-ascending cumulative series.
    ///
    /// The output has the same dates as the input. The first point is
    /// always 0 because there is no prior day. Negative deltas (upstream
    /// corrections) are kept as-is.
    pub fn diff(series: &DailySeries) -> DailySeries {
        debug_assert!(
            series.is_sorted_by_date(),
            "diff input must be ascending by date"
        );
        let points = series.points();
        let mut result = Vec::with_capacity(points.len());
        for (idx, point) in points.iter().enumerate() {
            let value = if idx == 0 {
                0
            } else {
                point.value - points[idx - 1].value
            };
            result.push(SeriesPoint {
                date: point.date,
                value,
            });
        }
        DailySeries::from_points(result)
    }

}

/// Percentage-of-confirmed series.
pub mod ratio {
    use epi_core::series::{DailySeries, SeriesPoint};

    /// `100 * numerator / denominator` per date.
    ///
    /// Both series must share one date axis. A zero denominator yields NaN;
    /// the renderer is expected to draw it as a gap.
    ///
    /// # Panics
    ///
    /// Panics if the series are not aligned.
    pub fn percentage(numerator: &DailySeries, denominator: &DailySeries) -> DailySeries<f64> {
        assert!(
            numerator.is_aligned_with(denominator),
            "percentage inputs must share a date axis ({} vs {} points)",
            numerator.len(),
            denominator.len()
        );
        let points = numerator
            .points()
            .iter()
            .zip(denominator.points())
            .map(|(n, d)| SeriesPoint {
                date: n.date,
                value: if d.value == 0 {
                    f64::NAN
                } else {
                    100.0 * n.value as f64 / d.value as f64
                },
            })
            .collect();
        DailySeries::from_points(points)
    }

}

/// Top-N regional rankings over a snapshot.
pub mod ranking {
    use epi_core::metric::Metric;
    use epi_core::record::MetricTotals;
    use epi_store::Snapshot;
    use serde::Serialize;

    /// One ranked region.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct RankEntry {
        pub region: String,
        /// Value of the ranking metric.
        pub value: i64,
        /// All metrics for the region, for charts that stack several bars.
        pub totals: MetricTotals,
    }

    /// The `n` regions with the highest `metric`, descending.
    ///
    /// Ties keep the snapshot's order (stable sort).
    pub fn top_n(snapshot: &Snapshot, metric: Metric, n: usize) -> Vec<RankEntry> {
        let mut ranked: Vec<RankEntry> = snapshot
            .iter()
            .map(|e| RankEntry {
                region: e.region.clone(),
                value: e.totals.get(metric),
                totals: e.totals,
            })
            .collect();
        ranked.sort_by(|a, b| b.value.cmp(&a.value));
        ranked.truncate(n);
        log::debug!(
            "[EPI] ranking: top {} by {} over {} regions",
            ranked.len(),
            metric,
            snapshot.len()
        );
        ranked
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;
        use epi_store::RegionTotals;

        fn snapshot(values: &[(&str, i64)]) -> Snapshot {
            Snapshot {
                date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
                entries: values
                    .iter()
                    .map(|(region, confirmed)| RegionTotals {
                        region: region.to_string(),
                        totals: MetricTotals {
                            confirmed: *confirmed,
                            deceased: confirmed / 10,
                            recovered: confirmed / 2,
                            active: confirmed - confirmed / 10 - confirmed / 2,
                        },
                    })
                    .collect(),
            }
        }

        #[test]
        fn test_top_n_sorted_descending() {
            let snap = snapshot(&[("A", 5), ("B", 50), ("C", 20)]);
            let ranked = top_n(&snap, Metric::Confirmed, 10);
            let regions: Vec<&str> = ranked.iter().map(|r| r.region.as_str()).collect();
            assert_eq!(regions, vec!["B", "C", "A"]);
        }

        #[test]
        fn test_top_n_truncates() {
            let entries: Vec<(String, i64)> =
                (0..15).map(|i| (format!("R{:02}", i), i * 3)).collect();
            let refs: Vec<(&str, i64)> = entries.iter().map(|(r, v)| (r.as_str(), *v)).collect();
            let ranked = top_n(&snapshot(&refs), Metric::Confirmed, 10);
            assert_eq!(ranked.len(), 10);
            assert_eq!(ranked[0].region, "R14");
            assert!(ranked.windows(2).all(|w| w[0].value >= w[1].value));
        }

        #[test]
        fn test_top_n_fewer_regions_than_n() {
            let ranked = top_n(&snapshot(&[("A", 1), ("B", 2)]), Metric::Confirmed, 10);
            assert_eq!(ranked.len(), 2);
        }

        #[test]
        fn test_top_n_ties_keep_snapshot_order() {
            let snap = snapshot(&[("Z", 7), ("A", 9), ("M", 7), ("B", 7)]);
            let ranked = top_n(&snap, Metric::Confirmed, 4);
            let regions: Vec<&str> = ranked.iter().map(|r| r.region.as_str()).collect();
            assert_eq!(regions, vec!["A", "Z", "M", "B"]);
        }

        #[test]
        fn test_top_n_by_other_metric() {
            let snap = snapshot(&[("A", 100), ("B", 40)]);
            let ranked = top_n(&snap, Metric::Deceased, 1);
            assert_eq!(ranked[0].region, "A");
            assert_eq!(ranked[0].value, 10);
            assert_eq!(ranked[0].totals.confirmed, 100);
        }
    }
}
