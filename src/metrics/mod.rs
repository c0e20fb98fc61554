//! Metric calculator: spreads, curve status and trailing-window statistics.
//!
//! Everything here is a pure function of the yield table.

pub mod spread;
pub mod window;

use tracing::warn;

use crate::domain::{Summary, Tenor, YieldTable};
use crate::error::AppError;

pub use spread::{FLAT_THRESHOLD, classify, row_spread, spread_series};
pub use window::tenor_stats;

/// Default trailing window, in table rows (trading days).
pub const DEFAULT_WINDOW: usize = 90;

/// Derive the run summary from the latest row and the trailing `window` rows.
///
/// On a history shorter than `window` the window shrinks to what is there.
pub fn summarize(table: &YieldTable, window: usize) -> Result<Summary, AppError> {
    let latest = table
        .latest()
        .ok_or_else(|| AppError::Data("Yield table is empty; nothing to summarize.".to_string()))?;

    if window == 0 {
        return Err(AppError::Config("Window must be at least 1 row.".to_string()));
    }

    let rows = table.tail(window);
    if rows.len() < window {
        warn!(
            requested = window,
            available = rows.len(),
            "history shorter than window; using all available rows"
        );
    }

    let stats = table
        .tenors()
        .iter()
        .enumerate()
        .map(|(col, &tenor)| tenor_stats(rows, col, tenor))
        .collect();

    let spread_2s10s = row_spread(table, latest, Tenor::Y10, Tenor::Y2);

    Ok(Summary {
        date: latest.date,
        spread_2s10s,
        status: spread_2s10s.map(classify),
        spread_3m10y: row_spread(table, latest, Tenor::Y10, Tenor::M3),
        spread_5s30s: row_spread(table, latest, Tenor::Y30, Tenor::Y5),
        requested_window: window,
        effective_window: rows.len(),
        stats,
    })
}
