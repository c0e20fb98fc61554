//! Static 2x2 dashboard drawn with Plotters into an SVG string.
//!
//! Plotters is built without its font stack, so text is emitted as SVG
//! `<text>` elements and laid out by the viewer.

use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use super::{ChartData, padded_range};
use crate::error::AppError;

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

const ORANGE: RGBColor = RGBColor(255, 165, 0);
const TREND_COLORS: [RGBColor; 4] = [RED, GREEN, BLUE, ORANGE];
const RANGE_FILL: RGBColor = RGBColor(173, 216, 230);
const GRID: RGBColor = RGBColor(225, 225, 225);

pub fn render_svg(data: &ChartData, width: u32, height: u32) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_dashboard(&root, data).map_err(|e| AppError::Render(e.to_string()))?;
        root.present().map_err(|e| AppError::Render(e.to_string()))?;
    }
    Ok(svg)
}

fn draw_dashboard<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, data: &ChartData) -> DrawResult<DB> {
    root.fill(&WHITE)?;
    let body = root.titled(&data.title, ("sans-serif", 26))?;
    let panels = body.split_evenly((2, 2));

    draw_curve_panel(&panels[0], data)?;
    draw_trend_panel(&panels[1], data)?;
    draw_spread_panel(&panels[2], data)?;
    draw_range_panel(&panels[3], data)?;
    Ok(())
}

fn draw_curve_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, data: &ChartData) -> DrawResult<DB> {
    let caption = "Current Yield Curve";
    if data.curve.is_empty() {
        return draw_empty(area, caption);
    }

    let labels: Vec<&str> = data.curve.iter().map(|p| p.tenor.label()).collect();
    let points: Vec<(f64, f64)> = data
        .curve
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.yield_pct))
        .collect();
    let (y0, y1) = padded_range(points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(52)
        .build_cartesian_2d(-0.5..(labels.len() as f64 - 0.5), y0..y1)?;

    chart
        .configure_mesh()
        .x_labels(labels.len() * 2)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .x_desc("Maturity")
        .y_desc("Yield (%)")
        .light_line_style(&GRID)
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(3)))?;
    chart.draw_series(points.iter().map(|&(x, y)| {
        EmptyElement::at((x, y))
            + Circle::new((0, 0), 4, BLUE.filled())
            + Text::new(format!("{y:.2}%"), (-16, -20), ("sans-serif", 12).into_font())
    }))?;

    Ok(())
}

fn draw_trend_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, data: &ChartData) -> DrawResult<DB> {
    let caption = format!("{} Day Trends", data.trend_days);
    let Some(origin) = data.trends.iter().filter_map(|t| t.points.first().map(|p| p.0)).min() else {
        return draw_empty(area, &caption);
    };
    let end = data
        .trends
        .iter()
        .filter_map(|t| t.points.last().map(|p| p.0))
        .max()
        .unwrap_or(origin);

    let x1 = day_offset(origin, end).max(1.0);
    let (y0, y1) = padded_range(data.trends.iter().flat_map(|t| t.points.iter().map(|p| p.1)));

    let mut chart = ChartBuilder::on(area)
        .caption(caption.as_str(), ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(52)
        .build_cartesian_2d(0.0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_labels(6)
        .x_label_formatter(&|x| date_label(origin, *x))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .x_desc("Date")
        .y_desc("Yield (%)")
        .light_line_style(&GRID)
        .draw()?;

    for (series, color) in data.trends.iter().zip(TREND_COLORS) {
        let style = color.stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                series.points.iter().map(|&(d, y)| (day_offset(origin, d), y)),
                style,
            ))?
            .label(series.tenor.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], style));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_spread_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, data: &ChartData) -> DrawResult<DB> {
    let caption = "Yield Curve Spread (10Y-2Y)";
    let (Some(first), Some(last)) = (data.spread.first(), data.spread.last()) else {
        return draw_empty(area, caption);
    };
    let origin = first.0;
    let x1 = day_offset(origin, last.0).max(1.0);
    // Always keep the zero line in view.
    let (y0, y1) = padded_range(data.spread.iter().map(|p| p.1).chain([0.0]));

    let points: Vec<(f64, f64)> = data
        .spread
        .iter()
        .map(|&(d, s)| (day_offset(origin, d), s))
        .collect();

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(52)
        .build_cartesian_2d(0.0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_labels(6)
        .x_label_formatter(&|x| date_label(origin, *x))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .x_desc("Date")
        .y_desc("10Y-2Y Spread (%)")
        .light_line_style(&GRID)
        .draw()?;

    // Shade only the inverted stretches: the area between a negative spread and zero.
    chart.draw_series(AreaSeries::new(
        points.iter().map(|&(x, s)| (x, s.min(0.0))),
        0.0,
        RED.mix(0.3).filled(),
    ))?;
    chart.draw_series(LineSeries::new(points.iter().copied(), RED.stroke_width(2)))?;
    chart.draw_series(LineSeries::new([(0.0, 0.0), (x1, 0.0)], BLACK.mix(0.7).stroke_width(1)))?;

    Ok(())
}

fn draw_range_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, data: &ChartData) -> DrawResult<DB> {
    let caption = format!("Current vs {}D Range", data.window);
    if data.ranges.is_empty() {
        return draw_empty(area, &caption);
    }

    let labels: Vec<&str> = data.ranges.iter().map(|r| r.tenor.label()).collect();
    let (y0, y1) = padded_range(
        data.ranges
            .iter()
            .flat_map(|r| [Some(r.min), Some(r.max), r.current])
            .flatten(),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(caption.as_str(), ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(52)
        .build_cartesian_2d(-0.5..(labels.len() as f64 - 0.5), y0..y1)?;

    chart
        .configure_mesh()
        .x_labels(labels.len() * 2)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .x_desc("Maturity")
        .y_desc("Yield (%)")
        .light_line_style(&GRID)
        .draw()?;

    let bar_style = RANGE_FILL.filled();
    chart
        .draw_series(data.ranges.iter().enumerate().map(|(i, r)| {
            let x = i as f64;
            Rectangle::new([(x - 0.3, r.min), (x + 0.3, r.max)], bar_style)
        }))?
        .label(format!("{}D range", data.window))
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 18, y + 5)], bar_style));

    let current: Vec<(f64, f64)> = data
        .ranges
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.current.map(|c| (i as f64, c)))
        .collect();
    chart
        .draw_series(current.iter().map(|&(x, y)| Circle::new((x, y), 5, BLUE.filled())))?
        .label("Current")
        .legend(|(x, y)| Circle::new((x + 9, y), 5, BLUE.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_empty<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, caption: &str) -> DrawResult<DB> {
    let (w, h) = area.dim_in_pixel();
    area.draw(&Text::new(
        format!("{caption}: no data"),
        (w as i32 / 2 - 80, h as i32 / 2),
        ("sans-serif", 16).into_font(),
    ))?;
    Ok(())
}

/// Tick label for a categorical axis laid out on integer positions.
fn category_label(labels: &[&str], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).map(|s| s.to_string()).unwrap_or_default()
}

fn day_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

fn date_label(origin: NaiveDate, offset: f64) -> String {
    (origin + Duration::days(offset.round() as i64))
        .format("%Y-%m")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tenor;
    use crate::plot::{CurvePoint, RangeBar, TrendSeries};

    fn sample() -> ChartData {
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
        ChartData {
            title: "US Treasury Analysis - 2025-06-03".to_string(),
            curve: vec![
                CurvePoint { tenor: Tenor::Y2, yield_pct: 4.0 },
                CurvePoint { tenor: Tenor::Y10, yield_pct: 3.5 },
            ],
            trends: vec![TrendSeries {
                tenor: Tenor::Y2,
                points: vec![(d(5, 1), 3.9), (d(6, 3), 4.0)],
            }],
            spread: vec![(d(5, 1), 0.2), (d(5, 20), -0.1), (d(6, 3), -0.5)],
            ranges: vec![RangeBar { tenor: Tenor::Y2, min: 3.8, max: 4.1, current: Some(4.0) }],
            window: 90,
            trend_days: 252,
        }
    }

    #[test]
    fn svg_contains_title_and_panels() {
        let svg = render_svg(&sample(), 1200, 800).unwrap();
        assert!(svg.contains("<svg") && svg.contains("</svg>"));
        assert!(svg.contains("US Treasury Analysis - 2025-06-03"));
        assert!(svg.contains("Current Yield Curve"));
        assert!(svg.contains("Current vs 90D Range"));
        assert!(svg.contains("10Y-2Y Spread (%)"));
    }

    #[test]
    fn empty_panels_render_placeholder() {
        let mut data = sample();
        data.spread.clear();
        data.trends.clear();
        let svg = render_svg(&data, 1200, 800).unwrap();
        assert!(svg.contains("252 Day Trends: no data"));
        assert!(svg.contains("no data"));
    }

    #[test]
    fn svg_is_deterministic() {
        assert_eq!(render_svg(&sample(), 900, 600).unwrap(), render_svg(&sample(), 900, 600).unwrap());
    }

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let labels = ["2Y", "10Y"];
        assert_eq!(category_label(&labels, 0.0), "2Y");
        assert_eq!(category_label(&labels, 1.0000000001), "10Y");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn date_labels_count_days_from_origin() {
        let origin = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
        assert_eq!(date_label(origin, 3.0), "2025-02");
        assert_eq!(day_offset(origin, NaiveDate::from_ymd_opt(2025, 2, 2).unwrap()), 3.0);
    }
}
