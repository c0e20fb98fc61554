//! Data acquisition: the FRED client and the source seam the pipeline fetches through.

pub mod fred;
pub mod source;

pub use fred::FredClient;
pub use source::{YieldSource, fetch_table};
