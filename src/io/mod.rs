//! Input/output helpers.
//!
//! - dated CSV exports + artifact writer (`export`)
//! - archived raw-data CSV reader (`ingest`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
