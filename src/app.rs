//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches FRED data (or loads an archived CSV)
//! - prints the daily snapshot
//! - writes the dated CSVs and charts

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;

use crate::cli::{Command, OutputArgs, RebuildArgs, RunArgs};
use crate::data::FredClient;
use crate::domain::{RunConfig, Tenor};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `treasury` binary.
pub fn run() -> Result<(), AppError> {
    crate::logging::init();

    // A scheduled job just calls `treasury` (optionally with flags), so the
    // daily run is the default subcommand.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Rebuild(args) => handle_rebuild(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let asof = args.output.date.unwrap_or_else(|| Local::now().date_naive());
    let config = run_config_from_args(&args.output, asof, args.years, &args.tenors);
    config.validate()?;

    let client = FredClient::from_env(args.api_key.clone())?;
    let table = pipeline::fetch(&client, &config)?;
    let run = pipeline::prepare(table, &config, true)?;

    // The report goes out before any write so a failing disk still leaves
    // the numbers in the job log.
    if config.report {
        println!("{}", crate::report::format_report(&run.summary));
    }
    finish(&run, &config)
}

fn handle_rebuild(args: RebuildArgs) -> Result<(), AppError> {
    let table = crate::io::ingest::load_yield_csv(&args.data)?;
    let latest = table
        .latest()
        .map(|row| row.date)
        .ok_or_else(|| AppError::Data(format!("'{}' contains no rows.", args.data.display())))?;

    let asof = args.output.date.unwrap_or(latest);
    let tenors = table.tenors().to_vec();
    let config = run_config_from_args(&args.output, asof, 1, &tenors);
    info!(path = %args.data.display(), rows = table.len(), "rebuilding from archived data");

    let run = pipeline::prepare(table, &config, false)?;
    if config.report {
        println!("{}", crate::report::format_report(&run.summary));
    }
    finish(&run, &config)
}

fn finish(run: &pipeline::PreparedRun, config: &RunConfig) -> Result<(), AppError> {
    let written = pipeline::publish(run, config)?;
    info!(files = written.len(), out_dir = %config.out_dir.display(), "run complete");
    Ok(())
}

pub fn run_config_from_args(args: &OutputArgs, asof: NaiveDate, years: u32, tenors: &[Tenor]) -> RunConfig {
    RunConfig {
        out_dir: if args.out_dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            args.out_dir.clone()
        },
        asof,
        history_years: years,
        window: args.window,
        trend_days: args.trend_days,
        tenors: if tenors.is_empty() {
            Tenor::ALL.to_vec()
        } else {
            tenors.to_vec()
        },
        charts: !args.no_charts,
        report: !args.quiet,
        chart_width: args.width,
        chart_height: args.height,
    }
}

/// Rewrite argv so `treasury` defaults to `treasury run`.
///
/// Rules:
/// - `treasury`                      -> `treasury run`
/// - `treasury --out-dir data ...`   -> `treasury run --out-dir data ...`
/// - `treasury --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "rebuild");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}
