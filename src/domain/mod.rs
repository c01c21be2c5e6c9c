//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the raw input table (`RecordTable`, `Record`, `RowOrigin`)
//! - resampling configuration (`ResampleConfig`, `Interpolation`)
//! - resampled outputs (`DailyTable`, `DailyRow`, `LongRow`, `Fill`)

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
