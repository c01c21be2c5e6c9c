//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built by the resampler
//! - exported to CSV/JSON
//! - handed to charting and reporting code as plain rows

use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How interior gaps are filled before forward padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Straight line between the two nearest known values, weighted by elapsed days.
    #[default]
    Linear,
    /// Value of the closer known neighbour (midpoints take the earlier one).
    Nearest,
    /// No interpolation: gaps are forward padded.
    #[value(alias = "pad")]
    None,
}

impl Interpolation {
    pub fn name(self) -> &'static str {
        match self {
            Interpolation::Linear => "linear",
            Interpolation::Nearest => "nearest",
            Interpolation::None => "none",
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How an output cell got its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    Observed,
    Interpolated,
    /// Carried forward from an earlier day.
    Padded,
    /// Before the first observation of its (group, field).
    Zero,
}

impl Fill {
    pub const ALL: [Fill; 4] = [Fill::Observed, Fill::Interpolated, Fill::Padded, Fill::Zero];

    pub fn label(self) -> &'static str {
        match self {
            Fill::Observed => "observed",
            Fill::Interpolated => "interpolated",
            Fill::Padded => "padded",
            Fill::Zero => "zero",
        }
    }
}

/// Output layout for exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// One row per (date, group), one column per value field.
    #[default]
    Wide,
    /// One row per (date, group, variable).
    Long,
    /// Wide rows as a JSON document.
    Json,
}

/// Default date formats, tried in order.
///
/// ISO first; the openZH case files use day-first dates.
pub const DEFAULT_DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Everything the resampler needs to know about its input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleConfig {
    pub date_field: String,
    pub group_field: String,
    /// Ordered set of value columns to keep; duplicates are ignored.
    pub value_fields: Vec<String>,
    pub interpolation: Interpolation,
    pub date_formats: Vec<String>,
}

impl ResampleConfig {
    pub fn new<I, S>(date_field: impl Into<String>, group_field: impl Into<String>, value_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: Vec<String> = Vec::new();
        for f in value_fields {
            let f = f.into();
            if !fields.contains(&f) {
                fields.push(f);
            }
        }
        Self {
            date_field: date_field.into(),
            group_field: group_field.into(),
            value_fields: fields,
            interpolation: Interpolation::default(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = formats.into_iter().map(Into::into).collect();
        self
    }
}

/// One dense output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub group: String,
    /// Aligned with `DailyTable::fields`.
    pub values: Vec<f64>,
    #[serde(skip)]
    pub fills: Vec<Fill>,
}

/// A long ("melted") row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    pub date: NaiveDate,
    pub group: String,
    pub variable: String,
    pub value: f64,
}

/// Resampled output: every group has a row for every day in `[start, end]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTable {
    pub date_field: String,
    pub group_field: String,
    pub fields: Vec<String>,
    pub interpolation: Interpolation,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Group order used for `rows` within each date.
    pub groups: Vec<String>,
    /// Date-major, then by `groups` order.
    pub rows: Vec<DailyRow>,
}

impl DailyTable {
    pub fn n_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    pub fn value(&self, date: NaiveDate, group: &str, field: &str) -> Option<f64> {
        let fi = self.field_index(field)?;
        self.rows
            .iter()
            .find(|r| r.date == date && r.group == group)
            .map(|r| r.values[fi])
    }

    /// Date-ordered series of `field` for one group.
    pub fn series(&self, group: &str, field: &str) -> Option<Vec<(NaiveDate, f64)>> {
        let fi = self.field_index(field)?;
        let out: Vec<(NaiveDate, f64)> = self
            .rows
            .iter()
            .filter(|r| r.group == group)
            .map(|r| (r.date, r.values[fi]))
            .collect();
        if out.is_empty() { None } else { Some(out) }
    }

    pub fn to_long(&self) -> Vec<LongRow> {
        let mut out = Vec::with_capacity(self.rows.len() * self.fields.len());
        for row in &self.rows {
            for (field, &value) in self.fields.iter().zip(&row.values) {
                out.push(LongRow {
                    date: row.date,
                    group: row.group.clone(),
                    variable: field.clone(),
                    value,
                });
            }
        }
        out
    }

    /// Count of cells per fill kind, per field.
    pub fn fill_counts(&self) -> Vec<FillCounts> {
        let mut counts = vec![FillCounts::default(); self.fields.len()];
        for row in &self.rows {
            for (c, fill) in counts.iter_mut().zip(&row.fills) {
                c.add(*fill);
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillCounts {
    pub observed: usize,
    pub interpolated: usize,
    pub padded: usize,
    pub zero: usize,
}

impl FillCounts {
    fn add(&mut self, fill: Fill) {
        match fill {
            Fill::Observed => self.observed += 1,
            Fill::Interpolated => self.interpolated += 1,
            Fill::Padded => self.padded += 1,
            Fill::Zero => self.zero += 1,
        }
    }

    pub fn get(&self, fill: Fill) -> usize {
        match fill {
            Fill::Observed => self.observed,
            Fill::Interpolated => self.interpolated,
            Fill::Padded => self.padded,
            Fill::Zero => self.zero,
        }
    }

    pub fn total(&self) -> usize {
        self.observed + self.interpolated + self.padded + self.zero
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_parses_sentinels() {
        let parse = |s: &str| <Interpolation as ValueEnum>::from_str(s, true);
        assert_eq!(parse("linear"), Ok(Interpolation::Linear));
        assert_eq!(parse("None"), Ok(Interpolation::None));
        assert_eq!(parse("pad"), Ok(Interpolation::None));
        assert!(parse("cubic").is_err());
    }

    #[test]
    fn config_dedupes_value_fields_keeping_order() {
        let cfg = ResampleConfig::new("date", "canton", ["b", "a", "b", "c"]);
        assert_eq!(cfg.value_fields, vec!["b", "a", "c"]);
        assert_eq!(cfg.interpolation, Interpolation::Linear);
    }
}
