//! Command-line parsing for the daily Treasury analysis.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fetch/metrics/render code; `app` turns these structs into a `RunConfig`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::Tenor;
use crate::metrics::DEFAULT_WINDOW;
use crate::plot::DEFAULT_TREND_DAYS;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "treasury", version, about = "Daily US Treasury yield curve analysis (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch yields from FRED, print the snapshot, write dated CSVs and charts.
    Run(RunArgs),
    /// Recompute the summary and charts from an archived raw data CSV (no network).
    Rebuild(RebuildArgs),
}

/// Options for the daily run.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// Years of history to request (calendar years ending at the run date).
    #[arg(long, default_value_t = 2)]
    pub years: u32,

    /// Tenors to fetch, comma separated (default: all of 1m..30y).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub tenors: Vec<Tenor>,

    /// FRED API key (falls back to FRED_API_KEY, `.env` supported).
    #[arg(long)]
    pub api_key: Option<String>,
}

/// Options for rebuilding outputs from an archived CSV.
#[derive(Debug, Args, Clone)]
pub struct RebuildArgs {
    /// Raw data CSV written by a previous run (`treasury_data_YYYYMMDD.csv`).
    #[arg(long, value_name = "CSV")]
    pub data: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Analysis and output options shared by both subcommands.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Directory for CSVs and charts (created if missing).
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Run date (YYYY-MM-DD). Defaults to today, local time.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Trailing window (rows) for min/max/median/mean statistics.
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    /// Rows shown on the trend and spread charts.
    #[arg(long, default_value_t = DEFAULT_TREND_DAYS)]
    pub trend_days: usize,

    /// Skip the HTML and SVG charts.
    #[arg(long)]
    pub no_charts: bool,

    /// Do not print the snapshot report to stdout.
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Static chart width (pixels).
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Static chart height (pixels).
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}
