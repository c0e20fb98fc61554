//! Shared "daily run" logic used by both the `run` and `rebuild` commands.
//!
//! The workflow is:
//! fetch (or load) -> summarize -> render every output in memory -> write
//!
//! Nothing touches the output directory until every artifact has been
//! produced, so a failed fetch or render leaves no partial files behind.

use std::path::PathBuf;

use tracing::info;

use crate::data::{YieldSource, fetch_table};
use crate::domain::{RunConfig, Summary, YieldTable};
use crate::error::AppError;
use crate::io::export::{self, Artifact};
use crate::plot::{ChartData, render_charts};

/// All computed outputs of a single run, before anything is written.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub table: YieldTable,
    pub summary: Summary,
    pub artifacts: Vec<Artifact>,
}

/// Fetch the configured tenors over the configured history.
pub fn fetch(source: &dyn YieldSource, config: &RunConfig) -> Result<YieldTable, AppError> {
    config.validate()?;
    let start = config.history_start()?;
    info!(%start, end = %config.asof, tenors = config.tenors.len(), "fetching yield history");
    fetch_table(source, &config.tenors, start, config.asof)
}

/// Summarize `table` and render every output file in memory.
///
/// `include_raw` controls the raw data CSV; a rebuild from an archived CSV
/// does not rewrite its own input.
pub fn prepare(table: YieldTable, config: &RunConfig, include_raw: bool) -> Result<PreparedRun, AppError> {
    config.validate()?;
    let summary = crate::metrics::summarize(&table, config.window)?;
    let stamp = config.date_stamp();

    let mut artifacts = Vec::new();
    if include_raw {
        artifacts.push(Artifact::new(
            export::data_file_name(&stamp),
            export::render_data_csv(&table)?,
        ));
    }
    artifacts.push(Artifact::new(
        export::summary_file_name(&stamp),
        export::render_summary_csv(&summary)?,
    ));

    if config.charts {
        let data = ChartData::build(&table, &summary, config.trend_days, config.asof);
        artifacts.extend(render_charts(&data, config.chart_width, config.chart_height)?);
    }

    Ok(PreparedRun {
        table,
        summary,
        artifacts,
    })
}

/// Write a prepared run into the configured output directory.
pub fn publish(run: &PreparedRun, config: &RunConfig) -> Result<Vec<PathBuf>, AppError> {
    export::write_artifacts(&config.out_dir, &run.artifacts)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::domain::{CurveStatus, Tenor};
    use crate::plot::{HTML_FILE, SVG_FILE};

    /// Flat synthetic history: one observation per calendar day per tenor.
    struct Synthetic {
        levels: HashMap<Tenor, f64>,
        calls: Cell<usize>,
    }

    impl Synthetic {
        fn new(levels: &[(Tenor, f64)]) -> Self {
            Self {
                levels: levels.iter().copied().collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl YieldSource for Synthetic {
        fn fetch_series(
            &self,
            tenor: Tenor,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<(NaiveDate, f64)>, AppError> {
            self.calls.set(self.calls.get() + 1);
            let level = self.levels.get(&tenor).copied().unwrap_or(3.0);
            let first = end.max(start + Duration::days(89)) - Duration::days(89);
            Ok((0..90).map(|i| (first + Duration::days(i), level)).collect())
        }
    }

    struct Offline;

    impl YieldSource for Offline {
        fn fetch_series(&self, tenor: Tenor, _: NaiveDate, _: NaiveDate) -> Result<Vec<(NaiveDate, f64)>, AppError> {
            Err(AppError::Fetch(format!("{} unreachable", tenor.series_id())))
        }
    }

    /// The `run` command's sequence, minus the report.
    fn run_daily(source: &dyn YieldSource, config: &RunConfig) -> Result<(PreparedRun, Vec<PathBuf>), AppError> {
        let table = fetch(source, config)?;
        let run = prepare(table, config, true)?;
        let written = publish(&run, config)?;
        Ok((run, written))
    }

    fn config(out_dir: PathBuf, tenors: Vec<Tenor>) -> RunConfig {
        RunConfig {
            out_dir,
            asof: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            history_years: 2,
            window: 90,
            trend_days: 252,
            tenors,
            charts: true,
            report: false,
            chart_width: 1200,
            chart_height: 800,
        }
    }

    #[test]
    fn daily_run_classifies_inversion_and_writes_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let source = Synthetic::new(&[(Tenor::Y2, 4.0), (Tenor::Y10, 3.5)]);
        let cfg = config(dir.path().to_path_buf(), vec![Tenor::M3, Tenor::Y2, Tenor::Y10]);

        let (run, written) = run_daily(&source, &cfg).unwrap();

        assert_eq!(source.calls.get(), 3);
        assert_eq!(run.table.len(), 90);
        assert_eq!(run.summary.spread_2s10s, Some(-0.5));
        assert_eq!(run.summary.status, Some(CurveStatus::Inverted));
        assert_eq!(run.summary.effective_window, 90);

        let y2 = run.summary.stats_for(Tenor::Y2).unwrap();
        assert_eq!((y2.min, y2.max), (Some(4.0), Some(4.0)));

        let mut names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                HTML_FILE.to_string(),
                SVG_FILE.to_string(),
                "treasury_data_20250603.csv".to_string(),
                "treasury_summary_20250603.csv".to_string(),
            ]
        );
        assert!(written.iter().all(|p| p.exists()));

        let summary_csv = std::fs::read_to_string(dir.path().join("treasury_summary_20250603.csv")).unwrap();
        assert!(summary_csv.contains("INVERTED"));
        assert!(summary_csv.contains("-0.5000"));
    }

    #[test]
    fn failed_fetch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let cfg = config(out.clone(), Tenor::ALL.to_vec());

        let err = run_daily(&Offline, &cfg).unwrap_err();

        assert!(matches!(err, AppError::Fetch(_)));
        assert_eq!(err.exit_code(), 4);
        assert!(!out.exists());
    }

    #[test]
    fn invalid_config_is_rejected_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let source = Synthetic::new(&[]);
        let mut cfg = config(dir.path().to_path_buf(), vec![Tenor::Y10]);
        cfg.window = 0;

        let err = run_daily(&source, &cfg).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn missing_two_year_still_produces_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let source = Synthetic::new(&[(Tenor::Y10, 4.2)]);
        let cfg = config(dir.path().to_path_buf(), vec![Tenor::Y5, Tenor::Y10]);

        let (run, written) = run_daily(&source, &cfg).unwrap();
        assert_eq!(run.summary.spread_2s10s, None);
        assert_eq!(run.summary.status, None);
        assert_eq!(written.len(), 4);
    }

    #[test]
    fn reruns_are_byte_identical() {
        let source = Synthetic::new(&[(Tenor::Y2, 4.1), (Tenor::Y10, 4.4)]);
        let cfg = config(PathBuf::from("unused"), vec![Tenor::Y2, Tenor::Y10, Tenor::Y30]);

        let a = prepare(fetch(&source, &cfg).unwrap(), &cfg, true).unwrap();
        let b = prepare(fetch(&source, &cfg).unwrap(), &cfg, true).unwrap();
        assert_eq!(a.artifacts, b.artifacts);
        assert_eq!(a.summary.status, Some(CurveStatus::Flat));
    }

    #[test]
    fn rebuild_from_archived_csv_skips_raw_data() {
        let dir = tempfile::tempdir().unwrap();
        let source = Synthetic::new(&[(Tenor::Y2, 3.9), (Tenor::Y10, 4.6)]);
        let mut cfg = config(dir.path().to_path_buf(), vec![Tenor::Y2, Tenor::Y10]);
        cfg.charts = false;

        let (first, _) = run_daily(&source, &cfg).unwrap();
        let archived = dir.path().join("treasury_data_20250603.csv");
        let table = crate::io::ingest::load_yield_csv(&archived).unwrap();
        assert_eq!(table, first.table);

        let rebuilt = prepare(table, &cfg, false).unwrap();
        let names: Vec<&str> = rebuilt.artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["treasury_summary_20250603.csv"]);
        assert_eq!(rebuilt.summary, first.summary);
        assert_eq!(rebuilt.summary.status, Some(CurveStatus::Normal));
    }
}
