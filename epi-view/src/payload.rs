//! Payload structs passed to the presentation layer.
//!
//! All structs derive `Serialize` so they can be rendered as JSON by any
//! charting frontend. Non-finite y-values serialize as `null`, which
//! renderers draw as a gap.

use chrono::NaiveDate;
use serde::Serialize;

/// A single chart point. `x` is a date for time series, a region for rankings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Point<X> {
    pub x: X,
    pub y: f64,
}

impl<X: PartialEq> Point<X> {
    /// Equality where two NaN y-values (two gaps) match.
    pub fn same_as(&self, other: &Point<X>) -> bool {
        self.x == other.x && (self.y == other.y || (self.y.is_nan() && other.y.is_nan()))
    }
}

/// One named, colored line or bar series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Series<X> {
    pub name: String,
    pub color: String,
    pub points: Vec<Point<X>>,
}

impl<X: PartialEq> Series<X> {
    pub fn same_as(&self, other: &Series<X>) -> bool {
        self.name == other.name
            && self.color == other.color
            && self.points.len() == other.points.len()
            && self.points.iter().zip(&other.points).all(|(a, b)| a.same_as(b))
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Group,
    Stack,
}

/// Chart payload shared by time series and rankings.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload<X> {
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
    pub series: Vec<Series<X>>,
}

impl<X: PartialEq> ChartPayload<X> {
    pub fn same_as(&self, other: &ChartPayload<X>) -> bool {
        self.title == other.title
            && self.x_axis_label == other.x_axis_label
            && self.y_axis_label == other.y_axis_label
            && self.bar_mode == other.bar_mode
            && self.series.len() == other.series.len()
            && self.series.iter().zip(&other.series).all(|(a, b)| a.same_as(b))
    }
}

/// Line chart over dates. Percentage charts use the same shape.
pub type TimeSeriesPayload = ChartPayload<NaiveDate>;

/// Bar chart over region names.
pub type RankingPayload = ChartPayload<String>;

/// One summary card.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScalarPayload {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    TimeSeries(TimeSeriesPayload),
    Ranking(RankingPayload),
    Scalar(ScalarPayload),
}

impl Payload {
    /// Structural equality that treats NaN gaps as equal, unlike `==`.
    pub fn same_as(&self, other: &Payload) -> bool {
        match (self, other) {
            (Payload::TimeSeries(a), Payload::TimeSeries(b)) => a.same_as(b),
            (Payload::Ranking(a), Payload::Ranking(b)) => a.same_as(b),
            (Payload::Scalar(a), Payload::Scalar(b)) => a == b,
            _ => false,
        }
    }

    pub fn as_time_series(&self) -> Option<&TimeSeriesPayload> {
        match self {
            Payload::TimeSeries(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_ranking(&self) -> Option<&RankingPayload> {
        match self {
            Payload::Ranking(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarPayload> {
        match self {
            Payload::Scalar(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_series_serializes_camel_case_with_iso_dates() {
        let payload = Payload::TimeSeries(ChartPayload {
            title: "t".to_string(),
            x_axis_label: "Date".to_string(),
            y_axis_label: "Cases".to_string(),
            bar_mode: None,
            series: vec![Series {
                name: "Confirmed".to_string(),
                color: "#2B37B0".to_string(),
                points: vec![Point {
                    x: NaiveDate::from_ymd_opt(2021, 1, 2).unwrap(),
                    y: 15.0,
                }],
            }],
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "time_series");
        assert_eq!(json["xAxisLabel"], "Date");
        assert!(json.get("barMode").is_none());
        assert_eq!(json["series"][0]["points"][0]["x"], "2021-01-02");
        assert_eq!(json["series"][0]["points"][0]["y"], 15.0);
    }

    fn gap_chart(y: f64) -> Payload {
        Payload::TimeSeries(ChartPayload {
            title: "Case Percentages in Jambi".to_string(),
            x_axis_label: "Date".to_string(),
            y_axis_label: "Percentage".to_string(),
            bar_mode: None,
            series: vec![Series {
                name: "Deceased Percentage".to_string(),
                color: "#FF2520".to_string(),
                points: vec![Point {
                    x: NaiveDate::from_ymd_opt(2021, 1, 3).unwrap(),
                    y,
                }],
            }],
        })
    }

    #[test]
    fn same_as_matches_nan_gaps() {
        let a = gap_chart(f64::NAN);
        assert_ne!(a, a.clone());
        assert!(a.same_as(&a.clone()));
        assert!(!a.same_as(&gap_chart(0.0)));
        assert!(!gap_chart(1.0).same_as(&gap_chart(2.0)));
        let card = Payload::Scalar(ScalarPayload {
            label: "Confirmed".to_string(),
            value: 0,
        });
        assert!(!a.same_as(&card));
        assert!(card.same_as(&card.clone()));
    }

    #[test]
    fn nan_serializes_as_null() {
        let point = Point { x: "A".to_string(), y: f64::NAN };
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"x":"A","y":null}"#);
    }
}
