//! `treasury-daily` library crate.
//!
//! The binary (`treasury`) is a thin wrapper around this library so that:
//!
//! - the fetch/metrics/export workflow is testable without spawning processes
//! - data sources can be swapped (FRED in production, in-memory in tests)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod metrics;
pub mod plot;
pub mod report;
