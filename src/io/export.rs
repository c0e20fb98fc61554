//! Dated CSV exports and the artifact writer.
//!
//! Exports are rendered to bytes first; nothing touches the output directory
//! until every artifact of the run has been built.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::{Summary, YieldTable};
use crate::error::AppError;

/// A fully rendered output file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }
}

pub fn data_file_name(stamp: &str) -> String {
    format!("treasury_data_{stamp}.csv")
}

pub fn summary_file_name(stamp: &str) -> String {
    format!("treasury_summary_{stamp}.csv")
}

/// Raw table as CSV: `date,<tenor>...`, empty cells for missing values.
pub fn render_data_csv(table: &YieldTable) -> Result<Vec<u8>, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["date".to_string()];
    header.extend(table.tenors().iter().map(|t| t.label().to_string()));
    wtr.write_record(&header).map_err(csv_err)?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.date.format("%Y-%m-%d").to_string());
        // Shortest round-trip form, so archived values equal fetched ones.
        record.extend(row.values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
        wtr.write_record(&record).map_err(csv_err)?;
    }

    finish(wtr)
}

/// One-row summary CSV.
pub fn render_summary_csv(summary: &Summary) -> Result<Vec<u8>, AppError> {
    let n = summary.requested_window;
    let mut header: Vec<String> = [
        "date",
        "inversion_status",
        "2Y_10Y_spread",
        "3M_10Y_spread",
        "5Y_30Y_spread",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let mut record = vec![
        summary.date.format("%Y-%m-%d").to_string(),
        summary
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        fmt4(summary.spread_2s10s),
        fmt4(summary.spread_3m10y),
        fmt4(summary.spread_5s30s),
    ];

    for s in &summary.stats {
        let t = s.tenor.label();
        header.push(format!("{t}_yield"));
        header.push(format!("{t}_{n}D_min"));
        header.push(format!("{t}_{n}D_max"));
        header.push(format!("{t}_{n}D_median"));
        header.push(format!("{t}_{n}D_mean"));

        record.push(fmt4(s.current));
        record.push(fmt4(s.min));
        record.push(fmt4(s.max));
        record.push(fmt4(s.median));
        record.push(fmt4(s.mean));
    }

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&header).map_err(csv_err)?;
    wtr.write_record(&record).map_err(csv_err)?;
    finish(wtr)
}

/// Write every artifact into `dir`, replacing files of the same name.
///
/// If a write fails, files already written by this call are removed again.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::Io(format!("Failed to create output dir '{}': {e}", dir.display())))?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        if let Err(e) = fs::write(&path, &artifact.contents) {
            for done in &written {
                if let Err(rm) = fs::remove_file(done) {
                    warn!(path = %done.display(), error = %rm, "failed to remove partial output");
                }
            }
            return Err(AppError::Io(format!("Failed to write '{}': {e}", path.display())));
        }
        info!(path = %path.display(), bytes = artifact.contents.len(), "wrote artifact");
        written.push(path);
    }

    Ok(written)
}

fn fmt4(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.4}")).unwrap_or_default()
}

fn csv_err(e: csv::Error) -> AppError {
    AppError::Io(format!("Failed to encode CSV: {e}"))
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, AppError> {
    wtr.into_inner()
        .map_err(|e| AppError::Io(format!("Failed to flush CSV: {e}")))
}
