//! Shared domain types.
//!
//! These types are kept small and plain so they can be:
//!
//! - filled by the FRED fetcher or by the archived-CSV reader
//! - consumed by the metric calculator and renderers
//! - exported to CSV/JSON without extra adapters

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;

use crate::error::AppError;

/// A maturity point on the Treasury constant-maturity curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Tenor {
    #[value(name = "1m")]
    M1,
    #[value(name = "3m")]
    M3,
    #[value(name = "6m")]
    M6,
    #[value(name = "1y")]
    Y1,
    #[value(name = "2y")]
    Y2,
    #[value(name = "3y")]
    Y3,
    #[value(name = "5y")]
    Y5,
    #[value(name = "7y")]
    Y7,
    #[value(name = "10y")]
    Y10,
    #[value(name = "20y")]
    Y20,
    #[value(name = "30y")]
    Y30,
}

impl Tenor {
    /// Every supported tenor, in maturity order.
    pub const ALL: [Tenor; 11] = [
        Tenor::M1,
        Tenor::M3,
        Tenor::M6,
        Tenor::Y1,
        Tenor::Y2,
        Tenor::Y3,
        Tenor::Y5,
        Tenor::Y7,
        Tenor::Y10,
        Tenor::Y20,
        Tenor::Y30,
    ];

    /// Tenors drawn on the trend panel.
    pub const KEY: [Tenor; 4] = [Tenor::Y2, Tenor::Y5, Tenor::Y10, Tenor::Y30];

    /// Label used in CSV headers, reports and charts.
    pub fn label(self) -> &'static str {
        match self {
            Tenor::M1 => "1M",
            Tenor::M3 => "3M",
            Tenor::M6 => "6M",
            Tenor::Y1 => "1Y",
            Tenor::Y2 => "2Y",
            Tenor::Y3 => "3Y",
            Tenor::Y5 => "5Y",
            Tenor::Y7 => "7Y",
            Tenor::Y10 => "10Y",
            Tenor::Y20 => "20Y",
            Tenor::Y30 => "30Y",
        }
    }

    /// FRED series id for the daily constant-maturity yield (percent).
    pub fn series_id(self) -> &'static str {
        match self {
            Tenor::M1 => "DGS1MO",
            Tenor::M3 => "DGS3MO",
            Tenor::M6 => "DGS6MO",
            Tenor::Y1 => "DGS1",
            Tenor::Y2 => "DGS2",
            Tenor::Y3 => "DGS3",
            Tenor::Y5 => "DGS5",
            Tenor::Y7 => "DGS7",
            Tenor::Y10 => "DGS10",
            Tenor::Y20 => "DGS20",
            Tenor::Y30 => "DGS30",
        }
    }

    /// Parse a CSV header label (`"10Y"`, case-insensitive).
    pub fn from_label(label: &str) -> Option<Tenor> {
        let label = label.trim();
        Tenor::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Tenor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single fetched yield: `(date, tenor, yield in percent)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub tenor: Tenor,
    pub yield_pct: f64,
}

/// One trading date of the yield table.
///
/// `values[i]` belongs to `YieldTable::tenors()[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Date-indexed table of yields, one column per tenor.
///
/// Rows are sorted ascending by date and every row has at least one value.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldTable {
    tenors: Vec<Tenor>,
    rows: Vec<YieldRow>,
}

impl YieldTable {
    /// Join per-tenor series into a table.
    ///
    /// Dates present in any series become rows; tenors without a value on a
    /// given date get `None`. Column order follows `series`.
    pub fn from_series(series: Vec<(Tenor, Vec<(NaiveDate, f64)>)>) -> Result<Self, AppError> {
        let tenors: Vec<Tenor> = series.iter().map(|(t, _)| *t).collect();
        for (i, t) in tenors.iter().enumerate() {
            if tenors[..i].contains(t) {
                return Err(AppError::Data(format!("Duplicate tenor {t} in yield table.")));
            }
        }

        let width = tenors.len();
        let mut by_date: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        for (col, (_, obs)) in series.into_iter().enumerate() {
            for (date, value) in obs {
                by_date.entry(date).or_insert_with(|| vec![None; width])[col] = Some(value);
            }
        }

        let rows = by_date
            .into_iter()
            .map(|(date, values)| YieldRow { date, values })
            .collect();

        Ok(Self { tenors, rows })
    }

    /// Build a table from already-aligned rows (e.g. an archived CSV).
    ///
    /// Rows are sorted by date; rows with no values are dropped.
    pub fn from_rows(tenors: Vec<Tenor>, mut rows: Vec<YieldRow>) -> Result<Self, AppError> {
        if let Some(bad) = rows.iter().find(|r| r.values.len() != tenors.len()) {
            return Err(AppError::Data(format!(
                "Row {} has {} values, expected {}.",
                bad.date,
                bad.values.len(),
                tenors.len()
            )));
        }
        rows.retain(|r| r.values.iter().any(Option::is_some));
        rows.sort_by_key(|r| r.date);
        if rows.windows(2).any(|w| w[0].date == w[1].date) {
            return Err(AppError::Data("Duplicate dates in yield table.".to_string()));
        }
        Ok(Self { tenors, rows })
    }

    pub fn tenors(&self) -> &[Tenor] {
        &self.tenors
    }

    pub fn rows(&self) -> &[YieldRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, tenor: Tenor) -> Option<usize> {
        self.tenors.iter().position(|&t| t == tenor)
    }

    /// The most recent row.
    pub fn latest(&self) -> Option<&YieldRow> {
        self.rows.last()
    }

    /// The trailing `n` rows (all rows if the table is shorter).
    pub fn tail(&self, n: usize) -> &[YieldRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }

    /// Flatten back into observations (date-major, tenor order within a date).
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        self.rows.iter().flat_map(move |row| {
            self.tenors
                .iter()
                .zip(row.values.iter())
                .filter_map(move |(&tenor, &v)| {
                    v.map(|yield_pct| Observation {
                        date: row.date,
                        tenor,
                        yield_pct,
                    })
                })
        })
    }
}

/// Shape of the curve as judged by the 10Y-2Y spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveStatus {
    Normal,
    Flat,
    Inverted,
}

impl CurveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CurveStatus::Normal => "NORMAL",
            CurveStatus::Flat => "FLAT",
            CurveStatus::Inverted => "INVERTED",
        }
    }
}

impl std::fmt::Display for CurveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trailing-window statistics for one tenor.
#[derive(Debug, Clone, PartialEq)]
pub struct TenorStats {
    pub tenor: Tenor,
    /// Value on the snapshot date (absent if that tenor did not print).
    pub current: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    pub mean: Option<f64>,
    /// Number of non-missing values inside the window.
    pub n_obs: usize,
}

/// Derived per-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub date: NaiveDate,
    /// 10Y - 2Y on the snapshot date, in percentage points.
    pub spread_2s10s: Option<f64>,
    pub status: Option<CurveStatus>,
    pub spread_3m10y: Option<f64>,
    pub spread_5s30s: Option<f64>,
    pub requested_window: usize,
    /// Rows actually used (smaller than requested on short histories).
    pub effective_window: usize,
    pub stats: Vec<TenorStats>,
}

impl Summary {
    pub fn stats_for(&self, tenor: Tenor) -> Option<&TenorStats> {
        self.stats.iter().find(|s| s.tenor == tenor)
    }
}

/// FRED's constant-maturity series start in 1962; anything longer is a typo.
pub const MAX_HISTORY_YEARS: u32 = 100;

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub out_dir: PathBuf,
    /// Run date: end of the fetch window and the stamp in file names.
    pub asof: NaiveDate,
    pub history_years: u32,
    pub window: usize,
    pub trend_days: usize,
    pub tenors: Vec<Tenor>,
    pub charts: bool,
    pub report: bool,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.window == 0 {
            return Err(AppError::Config("Window must be at least 1 row.".to_string()));
        }
        if self.trend_days < 2 {
            return Err(AppError::Config("Trend length must be at least 2 rows.".to_string()));
        }
        if self.history_years == 0 || self.history_years > MAX_HISTORY_YEARS {
            return Err(AppError::Config(format!(
                "History span must be between 1 and {MAX_HISTORY_YEARS} years."
            )));
        }
        if self.tenors.is_empty() {
            return Err(AppError::Config("At least one tenor is required.".to_string()));
        }
        if self.chart_width < 400 || self.chart_height < 300 {
            return Err(AppError::Config("Chart size must be at least 400x300.".to_string()));
        }
        Ok(())
    }

    /// First date requested from the data source.
    pub fn history_start(&self) -> Result<NaiveDate, AppError> {
        self.asof
            .checked_sub_signed(chrono::Duration::days(365 * i64::from(self.history_years)))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "History of {} years before {} is out of range.",
                    self.history_years, self.asof
                ))
            })
    }

    /// `YYYYMMDD` stamp used in dated file names.
    pub fn date_stamp(&self) -> String {
        self.asof.format("%Y%m%d").to_string()
    }
}
