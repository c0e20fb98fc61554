//! Read an archived raw data CSV back into a `YieldTable`.
//!
//! The expected layout is what `export::render_data_csv` writes:
//! a `date` column followed by one column per tenor label, empty cells for
//! missing values. Any malformed row fails the load with its line number.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{Tenor, YieldRow, YieldTable};
use crate::error::AppError;

pub fn load_yield_csv(path: &Path) -> Result<YieldTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::Io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let table = read_yield_csv(file)?;
    info!(path = %path.display(), days = table.len(), tenors = table.tenors().len(), "loaded archived data");
    Ok(table)
}

pub fn read_yield_csv<R: Read>(reader: R) -> Result<YieldTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Parse(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let mut columns = headers.iter();
    match columns.next() {
        Some(first) if first.eq_ignore_ascii_case("date") => {}
        _ => return Err(AppError::Parse("First CSV column must be 'date'.".to_string())),
    }

    let mut tenors = Vec::new();
    for label in columns {
        let tenor = Tenor::from_label(label)
            .ok_or_else(|| AppError::Parse(format!("Unknown tenor column '{label}'.")))?;
        if tenors.contains(&tenor) {
            return Err(AppError::Parse(format!("Duplicate tenor column '{label}'.")));
        }
        tenors.push(tenor);
    }
    if tenors.is_empty() {
        return Err(AppError::Parse("CSV has no tenor columns.".to_string()));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Records start on line 2 (after the header).
        let line = idx + 2;
        let record = result.map_err(|e| AppError::Parse(format!("line {line}: {e}")))?;

        let date_raw = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
            .map_err(|e| AppError::Parse(format!("line {line}: invalid date '{date_raw}': {e}")))?;

        let values = record
            .iter()
            .skip(1)
            .map(|cell| parse_cell(cell).map_err(|msg| AppError::Parse(format!("line {line}: {msg}"))))
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(YieldRow { date, values });
    }

    YieldTable::from_rows(tenors, rows)
}

fn parse_cell(cell: &str) -> Result<Option<f64>, String> {
    if cell.is_empty() || cell == "." {
        return Ok(None);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("invalid yield '{cell}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::export::render_data_csv;

    #[test]
    fn reads_what_export_writes() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
        let table = YieldTable::from_series(vec![
            (Tenor::M3, vec![(d(1), 4.33), (d(2), 4.35)]),
            (Tenor::Y10, vec![(d(2), 4.31)]),
        ])
        .unwrap();

        let bytes = render_data_csv(&table).unwrap();
        let back = read_yield_csv(bytes.as_slice()).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn unknown_tenor_column_is_rejected() {
        let csv = "date,2Y,4Y\n2025-01-02,4.0,4.1\n";
        let err = read_yield_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("4Y"));
    }

    #[test]
    fn bad_cell_reports_line_number() {
        let csv = "date,2Y\n2025-01-02,4.0\n2025-01-03,abc\n";
        let err = read_yield_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn missing_date_header_is_rejected() {
        let csv = "day,2Y\n2025-01-02,4.0\n";
        assert!(matches!(read_yield_csv(csv.as_bytes()), Err(AppError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_yield_csv(Path::new("/nonexistent/treasury_data.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
