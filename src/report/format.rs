//! Formatted terminal output for a run summary.
//!
//! Formatting lives in one place so output changes stay local and the
//! golden test below catches accidental drift.

use crate::domain::Summary;

/// Full report: snapshot yields, key spreads, window statistics.
pub fn format_report(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== US Treasury Yield Snapshot ({}) ===\n", summary.date));
    for s in &summary.stats {
        match s.current {
            Some(v) => out.push_str(&format!("{:>3}: {v:6.3}%\n", s.tenor.label())),
            None => out.push_str(&format!("{:>3}:      -\n", s.tenor.label())),
        }
    }

    out.push_str("\nKey spreads:\n");
    match (summary.spread_2s10s, summary.status) {
        (Some(spread), Some(status)) => {
            out.push_str(&format!("2Y-10Y: {spread:+.3}% ({status})\n"));
        }
        _ => out.push_str("2Y-10Y: n/a (2Y or 10Y missing)\n"),
    }
    if let Some(spread) = summary.spread_3m10y {
        out.push_str(&format!("3M-10Y: {spread:+.3}%\n"));
    }
    if let Some(spread) = summary.spread_5s30s {
        out.push_str(&format!("5Y-30Y: {spread:+.3}%\n"));
    }

    out.push_str(&format!(
        "\n{}-day statistics ({} of {} rows):\n",
        summary.requested_window, summary.effective_window, summary.requested_window
    ));
    out.push_str(&format!(
        "{:>5} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
        "Tenor", "Current", "Min", "Max", "Median", "Mean"
    ));
    for s in &summary.stats {
        out.push_str(&format!(
            "{:>5} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
            s.tenor.label(),
            fmt_cell(s.current),
            fmt_cell(s.min),
            fmt_cell(s.max),
            fmt_cell(s.median),
            fmt_cell(s.mean),
        ));
    }

    out
}

fn fmt_cell(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{CurveStatus, Tenor, TenorStats};

    fn stats(tenor: Tenor, current: Option<f64>, min: f64, max: f64) -> TenorStats {
        TenorStats {
            tenor,
            current,
            min: Some(min),
            max: Some(max),
            median: Some((min + max) / 2.0),
            mean: Some((min + max) / 2.0),
            n_obs: 90,
        }
    }

    #[test]
    fn report_golden_snapshot() {
        let summary = Summary {
            date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            spread_2s10s: Some(-0.5),
            status: Some(CurveStatus::Inverted),
            spread_3m10y: None,
            spread_5s30s: Some(0.25),
            requested_window: 90,
            effective_window: 90,
            stats: vec![
                stats(Tenor::Y2, Some(4.0), 3.5, 4.5),
                stats(Tenor::Y10, Some(3.5), 3.25, 4.25),
                stats(Tenor::Y30, None, 4.0, 5.0),
            ],
        };

        let expected = concat!(
            "=== US Treasury Yield Snapshot (2025-06-03) ===\n",
            " 2Y:  4.000%\n",
            "10Y:  3.500%\n",
            "30Y:      -\n",
            "\n",
            "Key spreads:\n",
            "2Y-10Y: -0.500% (INVERTED)\n",
            "5Y-30Y: +0.250%\n",
            "\n",
            "90-day statistics (90 of 90 rows):\n",
            "Tenor  Current      Min      Max   Median     Mean\n",
            "   2Y    4.000    3.500    4.500    4.000    4.000\n",
            "  10Y    3.500    3.250    4.250    3.750    3.750\n",
            "  30Y        -    4.000    5.000    4.500    4.500\n",
        );
        assert_eq!(format_report(&summary), expected);
    }

    #[test]
    fn missing_key_tenor_is_reported_as_na() {
        let summary = Summary {
            date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            spread_2s10s: None,
            status: None,
            spread_3m10y: None,
            spread_5s30s: None,
            requested_window: 90,
            effective_window: 12,
            stats: vec![stats(Tenor::Y5, Some(4.0), 3.9, 4.1)],
        };
        let txt = format_report(&summary);
        assert!(txt.contains("2Y-10Y: n/a"));
        assert!(txt.contains("(12 of 90 rows)"));
    }
}
