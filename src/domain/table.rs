//! Schema-agnostic input table.
//!
//! A `RecordTable` is what ingest produces and what the resampler reads:
//! a list of column names plus rows of raw (trimmed) string cells. Parsing
//! of dates and numbers is deferred to the resampler so that its error
//! taxonomy stays in one place.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ResampleError;

/// Where a row came from (for error messages).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOrigin {
    pub source: Option<Arc<str>>,
    /// 1-based line number (header is line 1 for CSV input).
    pub line: usize,
}

impl RowOrigin {
    pub fn line(line: usize) -> Self {
        Self { source: None, line }
    }

    pub fn in_source(source: Arc<str>, line: usize) -> Self {
        Self {
            source: Some(source),
            line,
        }
    }
}

impl fmt::Display for RowOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{src}:{}", self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}

/// One input row. `cells` is aligned with `RecordTable::columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub origin: RowOrigin,
    pub cells: Vec<String>,
}

impl Record {
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(String::as_str).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl RecordTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from in-memory string rows (line numbers start at 2,
    /// as if row 1 were a header).
    pub fn from_rows<C, R, S>(columns: C, rows: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new(columns.into_iter().map(Into::into).collect());
        for (idx, row) in rows.into_iter().enumerate() {
            let cells = row.into_iter().map(|s| s.as_ref().trim().to_string()).collect();
            table.push(Record {
                origin: RowOrigin::line(idx + 2),
                cells,
            });
        }
        table
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Append a row, padding or truncating its cells to the schema width.
    pub fn push(&mut self, mut record: Record) {
        record.cells.resize(self.columns.len(), String::new());
        self.rows.push(record);
    }

    /// Concatenate another table, taking the union of both schemas.
    ///
    /// Columns keep first-seen order; cells for columns a table does not
    /// have are left empty (absent).
    pub fn concat(&mut self, other: RecordTable) {
        let mut mapping = Vec::with_capacity(other.columns.len());
        for name in &other.columns {
            let idx = match self.column_index(name) {
                Some(idx) => idx,
                None => {
                    self.columns.push(name.clone());
                    self.columns.len() - 1
                }
            };
            mapping.push(idx);
        }

        let width = self.columns.len();
        for row in &mut self.rows {
            row.cells.resize(width, String::new());
        }

        for row in other.rows {
            let mut cells = vec![String::new(); width];
            for (src_idx, cell) in row.cells.into_iter().enumerate() {
                if let Some(&dst) = mapping.get(src_idx) {
                    cells[dst] = cell;
                }
            }
            self.rows.push(Record {
                origin: row.origin,
                cells,
            });
        }
    }

    /// Spread a long table (one variable/value pair per row) into the wide
    /// layout: one column per distinct variable.
    ///
    /// Every input row becomes one sparse wide row carrying only its own
    /// variable. Rows sharing a (date, group) are merged later by the
    /// resampler. Columns other than `variable_field`/`value_field` are kept.
    pub fn pivot_long(&self, variable_field: &str, value_field: &str) -> Result<RecordTable, ResampleError> {
        let var_idx = self
            .column_index(variable_field)
            .ok_or_else(|| ResampleError::invalid_field(variable_field, &self.columns))?;
        let val_idx = self
            .column_index(value_field)
            .ok_or_else(|| ResampleError::invalid_field(value_field, &self.columns))?;

        let kept: Vec<usize> = (0..self.columns.len())
            .filter(|&i| i != var_idx && i != val_idx)
            .collect();
        let mut columns: Vec<String> = kept.iter().map(|&i| self.columns[i].clone()).collect();
        let mut variable_cols: HashMap<&str, usize> = HashMap::new();

        for row in &self.rows {
            if let Some(var) = row.cell(var_idx) {
                if !variable_cols.contains_key(var) {
                    columns.push(var.to_string());
                    variable_cols.insert(var, columns.len() - 1);
                }
            }
        }

        let mut out = RecordTable::new(columns);
        for row in &self.rows {
            let mut cells: Vec<String> = kept
                .iter()
                .map(|&i| row.cells.get(i).cloned().unwrap_or_default())
                .collect();
            cells.resize(out.columns.len(), String::new());
            if let (Some(var), Some(value)) = (row.cell(var_idx), row.cell(val_idx)) {
                if let Some(&dst) = variable_cols.get(var) {
                    cells[dst] = value.to_string();
                }
            }
            out.rows.push(Record {
                origin: row.origin.clone(),
                cells,
            });
        }

        Ok(out)
    }
}
