//! Shared "resample pipeline" logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV load -> (long pivot) -> daily resample
//!
//! The subcommands can then focus on presentation (tables, rankings, plots).

use std::path::PathBuf;

use crate::domain::{DailyTable, RecordTable, ResampleConfig};
use crate::error::AppError;
use crate::report::RunStats;

/// Column names of a long (variable/value per row) input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongLayout {
    pub variable_field: String,
    pub value_field: String,
}

/// Where to read input from and how it is laid out.
#[derive(Debug, Clone)]
pub struct InputSpec {
    pub paths: Vec<PathBuf>,
    pub long: Option<LongLayout>,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: DailyTable,
    pub stats: RunStats,
}

/// Load every input file and resample it.
pub fn run_resample(input: &InputSpec, config: &ResampleConfig) -> Result<RunOutput, AppError> {
    // 1) Load and concatenate CSVs.
    let records = crate::io::ingest::load_tables(&input.paths)?;
    let stats = RunStats {
        files: input.paths.len(),
        rows_read: records.len(),
    };

    let table = resample_records(&records, input.long.as_ref(), config)?;
    Ok(RunOutput { table, stats })
}

/// Resample an already loaded table.
///
/// This is useful for callers that build the `RecordTable` themselves.
pub fn resample_records(
    records: &RecordTable,
    long: Option<&LongLayout>,
    config: &ResampleConfig,
) -> Result<DailyTable, AppError> {
    // 2) Spread long input into one column per variable.
    let pivoted;
    let wide = match long {
        Some(layout) => {
            pivoted = records.pivot_long(&layout.variable_field, &layout.value_field)?;
            &pivoted
        }
        None => records,
    };

    // 3) Resample onto the shared daily grid.
    let table = crate::resample::resample_daily(wide, config)?;
    tracing::info!(
        groups = table.groups.len(),
        days = table.n_days(),
        fields = table.fields.len(),
        "resample complete"
    );
    Ok(table)
}
