//! `covid-daily` library crate.
//!
//! The binary (`covid-daily`) is a thin wrapper around this library so that:
//!
//! - the resampler is testable without spawning processes
//! - notebooks and charting code can call `resample::resample_daily` directly
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod categories;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod resample;

pub use categories::{CategoryOrder, OrderedCategorical, order_categories};
pub use domain::{DailyTable, Interpolation, RecordTable, ResampleConfig};
pub use error::{AppError, ResampleError};
pub use resample::resample_daily;
