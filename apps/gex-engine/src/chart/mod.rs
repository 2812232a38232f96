//! Chart descriptions of the exposure profile.
//!
//! Drawing is left to an external renderer. This module only decides what
//! goes on each chart: bar series per strike, a title carrying the total,
//! the display window and a marker at spot.
//!
//! # Example
//!
//! ```ignore
//! use gex_engine::chart::{ChartRenderer, JsonChartRenderer, build_charts};
//!
//! let charts = build_charts(&report, &config.chart);
//! JsonChartRenderer::new("gex_charts.json").render(&charts)?;
//! ```

mod render;
mod spec;

pub use render::{ChartError, ChartRenderer, JsonChartRenderer};
pub use spec::{
    BarMode, BarSeries, ChartSpec, ChartVariant, ReferenceLine, X_AXIS_LABEL, Y_AXIS_LABEL,
    build_charts,
};
