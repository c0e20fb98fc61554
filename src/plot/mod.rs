//! Chart rendering.
//!
//! All series and bounds are prepared here, outside the renderers, so the
//! static (`svg`) and interactive (`html`) outputs draw exactly the same data
//! and the data prep can be tested without parsing chart output.

pub mod html;
pub mod svg;

use chrono::NaiveDate;

use crate::domain::{Summary, Tenor, YieldTable};
use crate::error::AppError;
use crate::io::export::Artifact;
use crate::metrics::spread_series;

pub const HTML_FILE: &str = "treasury_analysis.html";
pub const SVG_FILE: &str = "treasury_analysis.svg";

/// Default trend length, in table rows (about one trading year).
pub const DEFAULT_TREND_DAYS: usize = 252;

/// One point on the current yield curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePoint {
    pub tenor: Tenor,
    pub yield_pct: f64,
}

/// A dated series for one tenor.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub tenor: Tenor,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Current value against the trailing-window range for one tenor.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBar {
    pub tenor: Tenor,
    pub min: f64,
    pub max: f64,
    pub current: Option<f64>,
}

/// Everything the dashboard draws.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub curve: Vec<CurvePoint>,
    pub trends: Vec<TrendSeries>,
    pub spread: Vec<(NaiveDate, f64)>,
    pub ranges: Vec<RangeBar>,
    /// Requested window length, used in captions.
    pub window: usize,
    pub trend_days: usize,
}

impl ChartData {
    pub fn build(table: &YieldTable, summary: &Summary, trend_days: usize, run_date: NaiveDate) -> Self {
        let curve = summary
            .stats
            .iter()
            .filter_map(|s| {
                s.current.map(|yield_pct| CurvePoint {
                    tenor: s.tenor,
                    yield_pct,
                })
            })
            .collect();

        let recent = table.tail(trend_days);

        let trends = Tenor::KEY
            .iter()
            .filter_map(|&tenor| {
                let col = table.column_index(tenor)?;
                let points: Vec<(NaiveDate, f64)> = recent
                    .iter()
                    .filter_map(|row| row.values[col].map(|v| (row.date, v)))
                    .collect();
                (!points.is_empty()).then_some(TrendSeries { tenor, points })
            })
            .collect();

        let since = recent.first().map(|row| row.date);
        let spread = spread_series(table, Tenor::Y10, Tenor::Y2)
            .into_iter()
            .filter(|&(date, _)| since.is_some_and(|first| date >= first))
            .collect();

        let ranges = summary
            .stats
            .iter()
            .filter_map(|s| {
                Some(RangeBar {
                    tenor: s.tenor,
                    min: s.min?,
                    max: s.max?,
                    current: s.current,
                })
            })
            .collect();

        Self {
            title: format!("US Treasury Analysis - {}", run_date.format("%Y-%m-%d")),
            curve,
            trends,
            spread,
            ranges,
            window: summary.requested_window,
            trend_days,
        }
    }
}

/// Render both chart documents in memory.
pub fn render_charts(data: &ChartData, width: u32, height: u32) -> Result<Vec<Artifact>, AppError> {
    let html = html::render_html(data)?;
    let svg = svg::render_svg(data, width, height)?;
    Ok(vec![Artifact::new(HTML_FILE, html), Artifact::new(SVG_FILE, svg)])
}

/// `(min, max)` of `values`, padded so a flat series still gets a visible band.
pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span < 1e-9 {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = span * 0.08;
    (lo - pad, hi + pad)
}
