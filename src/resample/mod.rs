//! Daily resampling of sparse grouped observations.
//!
//! `resample_daily` turns an irregular `(date, group, field...)` table into a
//! dense one: every group gets a row for every calendar day between the
//! earliest and latest date of the *whole* input.
//!
//! Per (group, field) series, gaps are resolved in this order:
//! 1) interpolate interior gaps (unless `Interpolation::None`)
//! 2) forward pad whatever is still unknown
//! 3) set remaining leading unknowns to 0
//!
//! Rows are bucketed straight into their grid slot (date offset + binary
//! searched group index), so the cost is linear in the output size.

pub mod fill;
pub mod grid;
mod parse;

use chrono::NaiveDate;

use crate::domain::{DailyRow, DailyTable, Record, RecordTable, ResampleConfig};
use crate::error::ResampleError;

pub use fill::{ResolvedSeries, resolve};
pub use grid::DayGrid;

struct ParsedRow<'a> {
    record: &'a Record,
    date: NaiveDate,
    group: &'a str,
    values: Vec<Option<f64>>,
}

/// Resample `table` onto a daily grid per group.
///
/// Returns `ResampleError::EmptyInput` for a table without rows.
pub fn resample_daily(table: &RecordTable, config: &ResampleConfig) -> Result<DailyTable, ResampleError> {
    let date_idx = table
        .column_index(&config.date_field)
        .ok_or_else(|| ResampleError::invalid_field(&config.date_field, &table.columns))?;
    let group_idx = table
        .column_index(&config.group_field)
        .ok_or_else(|| ResampleError::invalid_field(&config.group_field, &table.columns))?;

    let field_idx: Vec<Option<usize>> = config
        .value_fields
        .iter()
        .map(|f| table.column_index(f))
        .collect();
    for (field, idx) in config.value_fields.iter().zip(&field_idx) {
        if idx.is_none() {
            tracing::warn!(field = %field, "value field not in input columns; it will be zero-filled");
        }
    }

    if table.is_empty() {
        return Err(ResampleError::EmptyInput);
    }

    let parsed = parse_rows(table, config, date_idx, group_idx, &field_idx)?;

    // Non-empty, so both bounds exist.
    let (mut min_date, mut max_date) = (parsed[0].date, parsed[0].date);
    for row in &parsed {
        min_date = min_date.min(row.date);
        max_date = max_date.max(row.date);
    }
    let grid = DayGrid::spanning(min_date, max_date);

    let mut groups: Vec<&str> = parsed.iter().map(|r| r.group).collect();
    groups.sort_unstable();
    groups.dedup();

    let n_fields = config.value_fields.len();
    let n_days = grid.len();

    // raw[group][field][day]
    let mut raw: Vec<Vec<Vec<Option<f64>>>> = vec![vec![vec![None; n_days]; n_fields]; groups.len()];
    for row in &parsed {
        let (Ok(gi), Some(di)) = (groups.binary_search(&row.group), grid.index_of(row.date)) else {
            continue;
        };
        for (fi, value) in row.values.iter().enumerate() {
            let Some(v) = *value else { continue };
            let slot = &mut raw[gi][fi][di];
            match *slot {
                Some(prev) if prev != v => {
                    return Err(ResampleError::ConflictingObservation {
                        date: row.date,
                        group: row.group.to_string(),
                        field: config.value_fields[fi].clone(),
                        first: prev.min(v),
                        second: prev.max(v),
                    });
                }
                _ => *slot = Some(v),
            }
        }
        tracing::trace!(origin = %row.record.origin, "bucketed row");
    }

    let resolved: Vec<Vec<ResolvedSeries>> = raw
        .iter()
        .map(|per_field| {
            per_field
                .iter()
                .map(|series| resolve(series, config.interpolation))
                .collect()
        })
        .collect();

    let mut rows = Vec::with_capacity(n_days * groups.len());
    for (di, date) in grid.dates().enumerate() {
        for (gi, group) in groups.iter().enumerate() {
            let series = &resolved[gi];
            rows.push(DailyRow {
                date,
                group: (*group).to_string(),
                values: series.iter().map(|s| s.values[di]).collect(),
                fills: series.iter().map(|s| s.fills[di]).collect(),
            });
        }
    }

    tracing::debug!(
        rows_in = table.len(),
        rows_out = rows.len(),
        groups = groups.len(),
        days = n_days,
        start = %grid.start(),
        end = %grid.end(),
        interpolation = %config.interpolation,
        "resampled to daily grid"
    );

    Ok(DailyTable {
        date_field: config.date_field.clone(),
        group_field: config.group_field.clone(),
        fields: config.value_fields.clone(),
        interpolation: config.interpolation,
        start: grid.start(),
        end: grid.end(),
        groups: groups.into_iter().map(str::to_string).collect(),
        rows,
    })
}

fn parse_rows<'a>(
    table: &'a RecordTable,
    config: &ResampleConfig,
    date_idx: usize,
    group_idx: usize,
    field_idx: &[Option<usize>],
) -> Result<Vec<ParsedRow<'a>>, ResampleError> {
    let mut out = Vec::with_capacity(table.len());
    for record in &table.rows {
        let date_cell = record.cell(date_idx).unwrap_or("");
        let date = parse::parse_date(date_cell, &config.date_formats).ok_or_else(|| ResampleError::MalformedDate {
            origin: record.origin.clone(),
            value: date_cell.to_string(),
        })?;

        let group = record.cell(group_idx).ok_or_else(|| ResampleError::MissingGroup {
            origin: record.origin.clone(),
        })?;

        let mut values = Vec::with_capacity(field_idx.len());
        for (field, idx) in config.value_fields.iter().zip(field_idx) {
            let value = match idx.and_then(|i| record.cell(i)) {
                Some(cell) => parse::parse_value(cell).map_err(|()| ResampleError::MalformedValue {
                    origin: record.origin.clone(),
                    field: field.clone(),
                    value: cell.to_string(),
                })?,
                None => None,
            };
            values.push(value);
        }

        out.push(ParsedRow {
            record,
            date,
            group,
            values,
        });
    }
    Ok(out)
}
