//! Chart specifications built from an exposure report.

use serde::Serialize;

use crate::config::ChartConfig;
use crate::exposure::{BILLION, ExposureReport};

/// Horizontal axis label.
pub const X_AXIS_LABEL: &str = "Strike";

/// Vertical axis label.
pub const Y_AXIS_LABEL: &str = "Spot Gamma Exposure ($ billions/1% move)";

const SPOT_LINE_COLOR: &str = "red";
const SPOT_LINE_WIDTH: f64 = 2.0;
const CALL_COLOR: &str = "blue";
const PUT_COLOR: &str = "orange";

/// Which breakdown a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartVariant {
    /// Net exposure per strike.
    Aggregate,
    /// Call and put exposure per strike, stacked.
    CallPut,
}

/// How multiple bar series share a strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    /// Bars side by side.
    Group,
    /// Bars stacked on one another.
    Stack,
}

/// One named bar series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    /// Legend name.
    pub name: String,
    /// Strikes, ascending.
    pub x: Vec<f64>,
    /// Exposure in billions per 1% move.
    pub y: Vec<f64>,
    /// Bar color, renderer default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Vertical marker line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    /// Position on the strike axis.
    pub x: f64,
    /// Line width.
    pub width: f64,
    /// Line color.
    pub color: String,
    /// Text shown at the top right of the line.
    pub annotation: String,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Breakdown shown.
    pub variant: ChartVariant,
    /// Chart title.
    pub title: String,
    /// Horizontal axis label.
    pub x_label: String,
    /// Vertical axis label.
    pub y_label: String,
    /// Visible strike range `[low, high]`.
    pub x_range: [f64; 2],
    /// Bar layout.
    pub bar_mode: BarMode,
    /// Spot marker.
    pub reference_line: ReferenceLine,
    /// Bar series.
    pub series: Vec<BarSeries>,
}

/// Build the aggregate and call/put charts for a report.
///
/// Series cover every strike; the visible range is the report's strike
/// window.
#[must_use]
pub fn build_charts(report: &ExposureReport, config: &ChartConfig) -> [ChartSpec; 2] {
    let label = config.underlying_label.as_str();
    let spot = report.metadata.spot_price;
    let title = format!(
        "Total Gamma: ${:.2} Bn per 1% {label} Move",
        report.total_gamma_bn
    );
    let strikes = report.series.strikes();

    let chart = |variant, bar_mode, series| ChartSpec {
        variant,
        title: title.clone(),
        x_label: X_AXIS_LABEL.to_string(),
        y_label: Y_AXIS_LABEL.to_string(),
        x_range: [report.strike_window.low, report.strike_window.high],
        bar_mode,
        reference_line: ReferenceLine {
            x: spot,
            width: SPOT_LINE_WIDTH,
            color: SPOT_LINE_COLOR.to_string(),
            annotation: format!("{label} Spot: {spot:.0}"),
        },
        series,
    };

    let aggregate = chart(
        ChartVariant::Aggregate,
        BarMode::Group,
        vec![BarSeries {
            name: "Gamma Exposure".to_string(),
            x: strikes.clone(),
            y: report.series.values().map(|e| e.total_gamma_bn).collect(),
            color: None,
        }],
    );

    let call_put = chart(
        ChartVariant::CallPut,
        BarMode::Stack,
        vec![
            BarSeries {
                name: "Call Gamma".to_string(),
                x: strikes.clone(),
                y: report.series.values().map(|e| e.call_gex / BILLION).collect(),
                color: Some(CALL_COLOR.to_string()),
            },
            BarSeries {
                name: "Put Gamma".to_string(),
                x: strikes,
                y: report.series.values().map(|e| e.put_gex / BILLION).collect(),
                color: Some(PUT_COLOR.to_string()),
            },
        ],
    );

    [aggregate, call_put]
}
