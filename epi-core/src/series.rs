use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// A single (date, value) point of a daily series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint<T> {
    pub date: NaiveDate,
    pub value: T,
}

/// One metric over time for one scope (national or a single region).
///
/// Points are ascending by date with at most one point per date.
/// Counts use `i64`; derived ratios use `f64`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries<T = i64> {
    points: Vec<SeriesPoint<T>>,
}

impl<T: Copy> DailySeries<T> {
    /// Wrap points that are already ascending by date.
    pub fn from_points(points: Vec<SeriesPoint<T>>) -> Self {
        Self { points }
    }

    /// Group (date, value) pairs by date, summing duplicates.
    pub fn summed_by_date<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, T)>,
        T: AddAssign + Default,
    {
        let mut by_date: BTreeMap<NaiveDate, T> = BTreeMap::new();
        for (date, value) in pairs {
            *by_date.entry(date).or_default() += value;
        }
        Self {
            points: by_date
                .into_iter()
                .map(|(date, value)| SeriesPoint { date, value })
                .collect(),
        }
    }

    pub fn points(&self) -> &[SeriesPoint<T>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<T> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first(&self) -> Option<&SeriesPoint<T>> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint<T>> {
        self.points.last()
    }

    /// True when dates are strictly ascending.
    pub fn is_sorted_by_date(&self) -> bool {
        self.points.windows(2).all(|w| w[0].date < w[1].date)
    }

    /// True when both series share the same date axis.
    pub fn is_aligned_with<U: Copy>(&self, other: &DailySeries<U>) -> bool {
        self.len() == other.len()
            && self
                .points
                .iter()
                .zip(other.points())
                .all(|(a, b)| a.date == b.date)
    }
}

impl<T> IntoIterator for DailySeries<T> {
    type Item = SeriesPoint<T>;
    type IntoIter = std::vec::IntoIter<SeriesPoint<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    #[test]
    fn summed_by_date_merges_duplicates_and_sorts() {
        let series = DailySeries::summed_by_date(vec![(d(3), 5i64), (d(1), 1), (d(3), 2), (d(2), 4)]);
        assert_eq!(series.dates(), vec![d(1), d(2), d(3)]);
        assert_eq!(series.values(), vec![1, 4, 7]);
        assert!(series.is_sorted_by_date());
    }

    #[test]
    fn alignment_checks_dates_and_length() {
        let a = DailySeries::summed_by_date(vec![(d(1), 1i64), (d(2), 2)]);
        let b = DailySeries::summed_by_date(vec![(d(1), 1.0f64), (d(2), 2.0)]);
        let c = DailySeries::summed_by_date(vec![(d(1), 1i64), (d(3), 2)]);
        assert!(a.is_aligned_with(&b));
        assert!(!a.is_aligned_with(&c));
        assert!(!a.is_aligned_with(&DailySeries::<i64>::from_points(Vec::new())));
    }

    #[test]
    fn unsorted_points_are_detected() {
        let series = DailySeries::from_points(vec![
            SeriesPoint { date: d(2), value: 1i64 },
            SeriesPoint { date: d(1), value: 2 },
        ]);
        assert!(!series.is_sorted_by_date());
    }
}
