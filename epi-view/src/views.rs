//! One builder per dashboard view.
//!
//! Builders are pure: they read the shared store, run the aggregator and the
//! derived-series computers, and return a payload. Labels and colors come
//! from the metric style table, so every line chart goes through
//! [`line_series`].

use crate::payload::{BarMode, ChartPayload, Payload, Point, RankingPayload, ScalarPayload, Series};
use crate::state::SelectionState;
use chrono::NaiveDate;
use epi_core::config::{CompatMode, EngineConfig};
use epi_core::error::Result;
use epi_core::metric::{CaseType, Metric, SelectOption, CARD_METRICS, CHART_METRICS};
use epi_core::series::DailySeries;
use epi_data::{diff::diff, ranking::top_n, ratio::percentage};
use epi_store::RecordStore;

const DATE_AXIS: &str = "Date";
const CASES_AXIS: &str = "Cases";
const NEW_CASES_AXIS: &str = "New Cases";
const PERCENT_AXIS: &str = "Percentage";
const REGION_AXIS: &str = "Region";

/// Everything a builder needs besides the selection.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub store: &'a RecordStore,
    pub config: &'a EngineConfig,
}

impl<'a> ViewContext<'a> {
    pub fn new(store: &'a RecordStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    fn national_series(&self, metric: Metric) -> Result<DailySeries> {
        let agg = self.store.aggregator();
        if self.config.include_national_rows {
            agg.aggregate_national(metric)
        } else {
            agg.regions_only_national(metric)
        }
    }

    fn national_label(&self) -> &str {
        &self.config.national_label
    }
}

/// Signature shared by every registered view builder.
pub type ViewBuilder = fn(&ViewContext<'_>, &SelectionState) -> Result<Payload>;

trait ChartValue: Copy {
    fn to_y(self) -> f64;
}

impl ChartValue for i64 {
    fn to_y(self) -> f64 {
        self as f64
    }
}

impl ChartValue for f64 {
    fn to_y(self) -> f64 {
        self
    }
}

fn line_series<T: ChartValue>(name: String, color: &str, series: &DailySeries<T>) -> Series<NaiveDate> {
    Series {
        name,
        color: color.to_string(),
        points: series
            .points()
            .iter()
            .map(|p| Point {
                x: p.date,
                y: p.value.to_y(),
            })
            .collect(),
    }
}

fn time_chart(title: String, y_axis_label: &str, series: Vec<Series<NaiveDate>>) -> Payload {
    Payload::TimeSeries(ChartPayload {
        title,
        x_axis_label: DATE_AXIS.to_string(),
        y_axis_label: y_axis_label.to_string(),
        bar_mode: None,
        series,
    })
}

fn new_label(metric: Metric) -> String {
    format!("New {}", metric.label())
}

/// Cumulative national lines: all three metrics, or just the selected one.
pub fn national_time_series(ctx: &ViewContext<'_>, selection: &SelectionState) -> Result<Payload> {
    let mut series = Vec::new();
    for metric in selection.case_type.metrics() {
        let values = ctx.national_series(metric)?;
        series.push(line_series(metric.label().to_string(), metric.color(), &values));
    }
    let title = match selection.case_type.metric() {
        None => format!("Covid-19 Cases in {}", ctx.national_label()),
        Some(metric) => format!("{} Cases in {}", metric.label(), ctx.national_label()),
    };
    Ok(time_chart(title, CASES_AXIS, series))
}

/// Daily new national cases.
///
/// In [`CompatMode::Reference`] a single "recovered" selection plots the
/// cumulative recovered series, labelled with the plain metric name.
pub fn national_diff(ctx: &ViewContext<'_>, selection: &SelectionState) -> Result<Payload> {
    let reference = ctx.config.compat == CompatMode::Reference;
    let mut series = Vec::new();
    for metric in selection.case_type.metrics() {
        let cumulative = ctx.national_series(metric)?;
        let (name, values) = if reference && selection.case_type == CaseType::Recovered {
            (metric.label().to_string(), cumulative)
        } else {
            (new_label(metric), diff(&cumulative))
        };
        series.push(line_series(name, metric.color(), &values));
    }
    let title = match selection.case_type.metric() {
        None => format!("Daily New Covid-19 Cases in {}", ctx.national_label()),
        Some(metric) => format!("Daily New {} Cases in {}", metric.label(), ctx.national_label()),
    };
    Ok(time_chart(title, NEW_CASES_AXIS, series))
}

/// Top regions at the latest date as bars.
///
/// For `All` the three metrics are stacked per region, ranked by confirmed.
/// In [`CompatMode::Reference`] the national-key row competes with the
/// regions, entries are always ranked by confirmed and the stacked `All`
/// bars all carry the confirmed value.
pub fn national_ranking(ctx: &ViewContext<'_>, selection: &SelectionState) -> Result<Payload> {
    let reference = ctx.config.compat == CompatMode::Reference;
    let snapshot = ctx.store.aggregator().snapshot_at_latest(reference)?;
    let rank_metric = match selection.case_type.metric() {
        Some(metric) if !reference => metric,
        _ => Metric::Confirmed,
    };
    let ranked = top_n(&snapshot, rank_metric, ctx.config.top_n);

    let series = selection
        .case_type
        .metrics()
        .into_iter()
        .map(|metric| {
            let value_metric = if reference && selection.case_type == CaseType::All {
                Metric::Confirmed
            } else {
                metric
            };
            Series {
                name: metric.label().to_string(),
                color: metric.color().to_string(),
                points: ranked
                    .iter()
                    .map(|entry| Point {
                        x: entry.region.clone(),
                        y: entry.totals.get(value_metric) as f64,
                    })
                    .collect(),
            }
        })
        .collect();

    let (title, bar_mode) = match selection.case_type.metric() {
        None => ("Covid-19 Cases per Region".to_string(), BarMode::Stack),
        Some(metric) => (format!("{} Cases per Region", metric.label()), BarMode::Group),
    };
    let payload: RankingPayload = ChartPayload {
        title,
        x_axis_label: REGION_AXIS.to_string(),
        y_axis_label: CASES_AXIS.to_string(),
        bar_mode: Some(bar_mode),
        series,
    };
    Ok(Payload::Ranking(payload))
}

pub fn region_time_series(ctx: &ViewContext<'_>, selection: &SelectionState) -> Result<Payload> {
    let agg = ctx.store.aggregator();
    let mut series = Vec::new();
    for metric in CHART_METRICS {
        let values = agg.region_series(&selection.region, metric)?;
        series.push(line_series(metric.label().to_string(), metric.color(), &values));
    }
    Ok(time_chart(
        format!("Covid-19 Cases in {}", selection.region),
        CASES_AXIS,
        series,
    ))
}

pub fn region_diff(ctx: &ViewContext<'_>, selection: &SelectionState) -> Result<Payload> {
    let agg = ctx.store.aggregator();
    let mut series = Vec::new();
    for metric in CHART_METRICS {
        let values = diff(&agg.region_series(&selection.region, metric)?);
        series.push(line_series(new_label(metric), metric.color(), &values));
    }
    Ok(time_chart(
        format!("Daily New Cases in {}", selection.region),
        NEW_CASES_AXIS,
        series,
    ))
}

/// Deceased and recovered as a percentage of confirmed for the region.
pub fn region_percentage(ctx: &ViewContext<'_>, selection: &SelectionState) -> Result<Payload> {
    let agg = ctx.store.aggregator();
    let confirmed = agg.region_series(&selection.region, Metric::Confirmed)?;
    let mut series = Vec::new();
    for metric in [Metric::Deceased, Metric::Recovered] {
        let values = percentage(&agg.region_series(&selection.region, metric)?, &confirmed);
        series.push(line_series(
            format!("{} Percentage", metric.label()),
            metric.color(),
            &values,
        ));
    }
    Ok(time_chart(
        format!("Case Percentages in {}", selection.region),
        PERCENT_AXIS,
        series,
    ))
}

fn region_card(ctx: &ViewContext<'_>, selection: &SelectionState, metric: Metric) -> Result<Payload> {
    let totals = ctx.store.aggregator().latest_for_region(&selection.region)?;
    Ok(Payload::Scalar(ScalarPayload {
        label: metric.label().to_string(),
        value: totals.get(metric),
    }))
}

pub fn region_confirmed_card(ctx: &ViewContext<'_>, selection: &SelectionState) -> Result<Payload> {
    region_card(ctx, selection, Metric::Confirmed)
}

pub fn region_deceased_card(ctx: &ViewContext<'_>, selection: &SelectionState) -> Result<Payload> {
    region_card(ctx, selection, Metric::Deceased)
}

pub fn region_recovered_card(ctx: &ViewContext<'_>, selection: &SelectionState) -> Result<Payload> {
    region_card(ctx, selection, Metric::Recovered)
}

pub fn region_active_card(ctx: &ViewContext<'_>, selection: &SelectionState) -> Result<Payload> {
    region_card(ctx, selection, Metric::Active)
}

/// The four national summary cards shown next to the case-type selector.
/// They do not depend on any selection and are computed once.
pub fn national_cards(ctx: &ViewContext<'_>) -> Result<Vec<ScalarPayload>> {
    let totals = ctx
        .store
        .aggregator()
        .national_summary(ctx.config.include_national_rows)?;
    Ok(CARD_METRICS
        .iter()
        .map(|&metric| ScalarPayload {
            label: metric.label().to_string(),
            value: totals.get(metric),
        })
        .collect())
}

/// Region dropdown options: sorted, without the national key.
pub fn region_options(store: &RecordStore) -> Vec<SelectOption> {
    store
        .regions()
        .iter()
        .map(|r| SelectOption {
            label: r.clone(),
            value: r.clone(),
        })
        .collect()
}

pub fn case_type_options() -> Vec<SelectOption> {
    CaseType::options()
}
