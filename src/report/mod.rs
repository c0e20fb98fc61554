//! Reporting: human-readable terminal output for a run.

pub mod format;

pub use format::format_report;
