//! Input/output helpers.
//!
//! - CSV ingest into a `RecordTable` (`ingest`)
//! - resampled table exports (wide/long CSV, JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
