//! Spreads between tenors and curve-status classification.

use chrono::NaiveDate;

use crate::domain::{CurveStatus, Tenor, YieldRow, YieldTable};

/// Upper bound (inclusive) of the FLAT band, in percentage points.
pub const FLAT_THRESHOLD: f64 = 0.5;

/// Classify the curve from the 10Y-2Y spread.
///
/// `> 0.5` is normal, `[0, 0.5]` flat, `< 0` inverted. The spread is first
/// rounded to 1/100 bp, the precision of the summary CSV, so two-decimal quotes
/// such as `4.03 - 3.53` land on the boundary they print as.
pub fn classify(spread: f64) -> CurveStatus {
    let spread = (spread * 1e4).round() / 1e4;
    if spread < 0.0 {
        CurveStatus::Inverted
    } else if spread <= FLAT_THRESHOLD {
        CurveStatus::Flat
    } else {
        CurveStatus::Normal
    }
}

/// `long - short` on a single row, if both values are present.
pub fn row_spread(table: &YieldTable, row: &YieldRow, long: Tenor, short: Tenor) -> Option<f64> {
    let l = row.values[table.column_index(long)?]?;
    let s = row.values[table.column_index(short)?]?;
    Some(l - s)
}

/// `long - short` for every row where both tenors printed.
pub fn spread_series(table: &YieldTable, long: Tenor, short: Tenor) -> Vec<(NaiveDate, f64)> {
    table
        .rows()
        .iter()
        .filter_map(|row| row_spread(table, row, long, short).map(|s| (row.date, s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_thresholds() {
        assert_eq!(classify(0.6), CurveStatus::Normal);
        assert_eq!(classify(0.3), CurveStatus::Flat);
        assert_eq!(classify(-0.1), CurveStatus::Inverted);
        assert_eq!(classify(0.5), CurveStatus::Flat);
        assert_eq!(classify(0.0), CurveStatus::Flat);
        assert_eq!(classify(-0.0), CurveStatus::Flat);
        assert_eq!(classify(0.5001), CurveStatus::Normal);
        assert_eq!(classify(-0.0001), CurveStatus::Inverted);
    }

    #[test]
    fn two_decimal_quotes_on_the_boundary_are_flat() {
        // 4.03 - 3.53 is 0.5000000000000004 in f64.
        assert!(4.03 - 3.53 > FLAT_THRESHOLD);
        assert_eq!(classify(4.03 - 3.53), CurveStatus::Flat);
        assert_eq!(classify(3.53 - 3.53), CurveStatus::Flat);
        assert_eq!(classify(-(4.03 - 3.53)), CurveStatus::Inverted);
    }

    #[test]
    fn spread_is_plain_difference() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 2, day).unwrap();
        let table = YieldTable::from_series(vec![
            (Tenor::Y2, vec![(d(3), 4.27), (d(4), 4.21), (d(5), 4.19)]),
            (Tenor::Y10, vec![(d(3), 4.54), (d(5), 4.42)]),
        ])
        .unwrap();

        let series = spread_series(&table, Tenor::Y10, Tenor::Y2);
        assert_eq!(series, vec![(d(3), 4.54 - 4.27), (d(5), 4.42 - 4.19)]);

        let missing = spread_series(&table, Tenor::Y30, Tenor::Y2);
        assert!(missing.is_empty());
    }
}
