//! Interactive dashboard: a standalone HTML page that hands a plotly.js
//! figure (traces + layout, built as JSON) to the browser.

use serde_json::{Value, json};

use super::ChartData;
use crate::error::AppError;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const TREND_COLORS: [&str; 4] = ["red", "green", "blue", "orange"];

pub fn render_html(data: &ChartData) -> Result<String, AppError> {
    let traces = script_json(&Value::Array(build_traces(data)))?;
    let layout = script_json(&build_layout(data))?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<div id="treasury-dashboard" style="width:100%;height:800px;"></div>
<script>
Plotly.newPlot("treasury-dashboard", {traces}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#,
        title = escape_html(&data.title),
    ))
}

fn build_traces(data: &ChartData) -> Vec<Value> {
    let mut traces = Vec::new();

    // 1. Current yield curve.
    let labels: Vec<&str> = data.curve.iter().map(|p| p.tenor.label()).collect();
    let yields: Vec<f64> = data.curve.iter().map(|p| p.yield_pct).collect();
    let text: Vec<String> = yields.iter().map(|y| format!("{y:.2}%")).collect();
    traces.push(json!({
        "type": "scatter",
        "mode": "lines+markers+text",
        "name": "Current Yield",
        "x": labels,
        "y": yields,
        "text": text,
        "textposition": "top center",
        "line": {"width": 3, "color": "blue"},
        "marker": {"size": 8},
        "showlegend": false,
        "xaxis": "x",
        "yaxis": "y",
    }));

    // 2. Trends for key tenors.
    for (series, color) in data.trends.iter().zip(TREND_COLORS) {
        traces.push(json!({
            "type": "scatter",
            "mode": "lines",
            "name": series.tenor.label(),
            "x": dates(series.points.iter().map(|p| p.0)),
            "y": series.points.iter().map(|p| p.1).collect::<Vec<_>>(),
            "line": {"width": 2, "color": color},
            "xaxis": "x2",
            "yaxis": "y2",
        }));
    }

    // 3. Spread with inversion shading underneath.
    let spread_x = dates(data.spread.iter().map(|p| p.0));
    traces.push(json!({
        "type": "scatter",
        "mode": "lines",
        "name": "Inverted",
        "x": spread_x,
        "y": data.spread.iter().map(|p| p.1.min(0.0)).collect::<Vec<_>>(),
        "fill": "tozeroy",
        "fillcolor": "rgba(255,0,0,0.3)",
        "line": {"width": 0},
        "hoverinfo": "skip",
        "showlegend": false,
        "xaxis": "x3",
        "yaxis": "y3",
    }));
    traces.push(json!({
        "type": "scatter",
        "mode": "lines",
        "name": "10Y-2Y Spread",
        "x": spread_x,
        "y": data.spread.iter().map(|p| p.1).collect::<Vec<_>>(),
        "line": {"width": 2, "color": "red"},
        "showlegend": false,
        "xaxis": "x3",
        "yaxis": "y3",
    }));

    // 4. Current vs window range.
    let range_labels: Vec<&str> = data.ranges.iter().map(|r| r.tenor.label()).collect();
    traces.push(json!({
        "type": "bar",
        "name": format!("{}D Range", data.window),
        "x": range_labels,
        "base": data.ranges.iter().map(|r| r.min).collect::<Vec<_>>(),
        "y": data.ranges.iter().map(|r| r.max - r.min).collect::<Vec<_>>(),
        "customdata": data.ranges.iter().map(|r| [r.min, r.max]).collect::<Vec<_>>(),
        "hovertemplate": "%{x}: %{customdata[0]:.3f} - %{customdata[1]:.3f}<extra></extra>",
        "marker": {"color": "lightblue", "opacity": 0.7},
        "xaxis": "x4",
        "yaxis": "y4",
    }));
    traces.push(json!({
        "type": "scatter",
        "mode": "markers",
        "name": "Current",
        "x": range_labels,
        "y": data.ranges.iter().map(|r| r.current).collect::<Vec<_>>(),
        "marker": {"size": 10, "color": "blue"},
        "xaxis": "x4",
        "yaxis": "y4",
    }));

    traces
}

fn build_layout(data: &ChartData) -> Value {
    let grid = json!({"showgrid": true, "gridcolor": "lightgray", "griddash": "dot"});
    let axis = |title: &str, category: bool| -> Value {
        let mut axis = grid.clone();
        axis["title"] = json!({"text": title});
        if category {
            axis["type"] = json!("category");
        }
        axis
    };
    let subplot_title = |text: String, xaxis: &str| -> Value {
        json!({
            "text": format!("<b>{}</b>", escape_html(&text)),
            "xref": format!("{xaxis} domain"),
            "yref": format!("{} domain", xaxis.replace('x', "y")),
            "x": 0.5,
            "y": 1.0,
            "xanchor": "center",
            "yanchor": "bottom",
            "showarrow": false,
        })
    };

    json!({
        "title": {"text": escape_html(&data.title), "x": 0.5, "font": {"size": 16}},
        "height": 800,
        "grid": {"rows": 2, "columns": 2, "pattern": "independent", "ygap": 0.3},
        "legend": {"orientation": "h", "y": -0.12},
        "xaxis": axis("Maturity", true),
        "yaxis": axis("Yield (%)", false),
        "xaxis2": axis("Date", false),
        "yaxis2": axis("Yield (%)", false),
        "xaxis3": axis("Date", false),
        "yaxis3": axis("10Y-2Y Spread (%)", false),
        "xaxis4": axis("Maturity", true),
        "yaxis4": axis("Yield (%)", false),
        "annotations": [
            subplot_title("Current Yield Curve".to_string(), "x"),
            subplot_title(format!("{} Day Trends", data.trend_days), "x2"),
            subplot_title("Yield Curve Spread".to_string(), "x3"),
            subplot_title(format!("Current vs {}D Range", data.window), "x4"),
        ],
        "shapes": [{
            "type": "line",
            "xref": "x3 domain",
            "yref": "y3",
            "x0": 0,
            "x1": 1,
            "y0": 0,
            "y1": 0,
            "line": {"color": "black", "dash": "dash", "width": 1},
            "opacity": 0.7,
        }],
    })
}

fn dates(iter: impl Iterator<Item = chrono::NaiveDate>) -> Vec<String> {
    iter.map(|d| d.format("%Y-%m-%d").to_string()).collect()
}

/// Serialize for embedding inside a `<script>` block.
fn script_json(value: &Value) -> Result<String, AppError> {
    let raw = serde_json::to_string(value).map_err(|e| AppError::Render(format!("figure JSON: {e}")))?;
    Ok(raw.replace("</", "<\\/"))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
