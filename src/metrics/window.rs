//! Trailing-window statistics per tenor.

use crate::domain::{Tenor, TenorStats, YieldRow};

/// Min/max/median/mean of the values present in `rows` for column `col`.
///
/// Missing cells are skipped; `current` is the column's value on the last row.
pub fn tenor_stats(rows: &[YieldRow], col: usize, tenor: Tenor) -> TenorStats {
    let current = rows.last().and_then(|r| r.values[col]);
    let mut values: Vec<f64> = rows.iter().filter_map(|r| r.values[col]).collect();

    if values.is_empty() {
        return TenorStats {
            tenor,
            current,
            min: None,
            max: None,
            median: None,
            mean: None,
            n_obs: 0,
        };
    }

    values.sort_by(f64::total_cmp);
    let n = values.len();
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };
    let mean = values.iter().sum::<f64>() / n as f64;

    TenorStats {
        tenor,
        current,
        min: Some(values[0]),
        max: Some(values[n - 1]),
        median: Some(median),
        mean: Some(mean),
        n_obs: n,
    }
}
