//! CSV ingest.
//!
//! This module is responsible for turning one or more observation CSVs into
//! a single `RecordTable` of raw trimmed cells.
//!
//! Design goals:
//! - **Headers are the schema**: column names are kept verbatim (apart from
//!   whitespace and a UTF-8 BOM), since data columns like `ncumul_ICU` are case-sensitive
//! - **Union on concat**: per-canton files with differing columns combine cleanly
//! - **No interpretation**: date/number parsing happens in the resampler

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::StringRecord;

use crate::domain::{Record, RecordTable, RowOrigin};
use crate::error::AppError;

/// Load and concatenate several CSV files.
pub fn load_tables(paths: &[impl AsRef<Path>]) -> Result<RecordTable, AppError> {
    let mut combined: Option<RecordTable> = None;
    for path in paths {
        let table = load_table(path.as_ref())?;
        match combined.as_mut() {
            Some(acc) => acc.concat(table),
            None => combined = Some(table),
        }
    }
    let table = combined.ok_or_else(|| AppError::new(2, "No input CSV files given."))?;
    tracing::info!(
        files = paths.len(),
        rows = table.len(),
        columns = table.columns.len(),
        "loaded input"
    );
    Ok(table)
}

/// Load a single CSV file.
pub fn load_table(path: &Path) -> Result<RecordTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let source: Arc<str> = Arc::from(path.display().to_string());
    read_table(file, Some(source))
}

/// Read CSV from any reader. `source` labels rows in error messages.
pub fn read_table<R: Read>(reader: R, source: Option<Arc<str>>) -> Result<RecordTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let mut table = RecordTable::new(build_columns(&headers));

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(idx as u64 + 2);
            AppError::new(2, format!("{}: CSV parse error: {e}", origin_for(&source, line as usize)))
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        // Blank lines are skipped by the reader, so take the line from the
        // record position rather than the enumeration index.
        let line = record.position().map(|p| p.line() as usize).unwrap_or(idx + 2);
        table.push(Record {
            origin: origin_for(&source, line),
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    tracing::debug!(
        source = source.as_deref().unwrap_or("<stream>"),
        rows = table.len(),
        "read csv"
    );
    Ok(table)
}

fn origin_for(source: &Option<Arc<str>>, line: usize) -> RowOrigin {
    match source {
        Some(src) => RowOrigin::in_source(src.clone(), line),
        None => RowOrigin::line(line),
    }
}

fn build_columns(headers: &StringRecord) -> Vec<String> {
    headers.iter().map(normalize_header_name).collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, the date column goes missing.
    name.trim().trim_start_matches('\u{feff}').to_string()
}
