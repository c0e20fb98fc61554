//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the tenor enumeration and its FRED series mapping (`Tenor`)
//! - fetched data (`Observation`, `YieldTable`)
//! - derived outputs (`Summary`, `TenorStats`, `CurveStatus`)
//! - the resolved run configuration (`RunConfig`)

pub mod types;

pub use types::*;
