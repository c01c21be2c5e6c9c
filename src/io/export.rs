//! Export resampled tables to CSV/JSON.
//!
//! The column layout is meant for charting tools and spreadsheets: the date
//! column first (ISO `YYYY-MM-DD`), then the group column, then one column per
//! value field (wide) or a `variable`/`value` pair (long).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{DailyTable, Interpolation, TableFormat};
use crate::error::AppError;

pub const LONG_VARIABLE_COLUMN: &str = "variable";
pub const LONG_VALUE_COLUMN: &str = "value";

/// Write `table` in `format` to `path`.
pub fn write_table_file(path: &Path, table: &DailyTable, format: TableFormat) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export file '{}': {e}", path.display())))?;
    write_table(file, table, format)?;
    tracing::info!(path = %path.display(), rows = table.rows.len(), ?format, "wrote export");
    Ok(())
}

/// Write `table` in `format` to any writer.
pub fn write_table<W: Write>(writer: W, table: &DailyTable, format: TableFormat) -> Result<(), AppError> {
    match format {
        TableFormat::Wide => write_wide_csv(writer, table),
        TableFormat::Long => write_long_csv(writer, table),
        TableFormat::Json => write_json(writer, table),
    }
}

fn write_wide_csv<W: Write>(writer: W, table: &DailyTable) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec![table.date_field.as_str(), table.group_field.as_str()];
    header.extend(table.fields.iter().map(String::as_str));
    out.write_record(&header).map_err(csv_err)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(2 + row.values.len());
        record.push(row.date.to_string());
        record.push(row.group.clone());
        record.extend(row.values.iter().map(|v| v.to_string()));
        out.write_record(&record).map_err(csv_err)?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

fn write_long_csv<W: Write>(writer: W, table: &DailyTable) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        table.date_field.as_str(),
        table.group_field.as_str(),
        LONG_VARIABLE_COLUMN,
        LONG_VALUE_COLUMN,
    ])
    .map_err(csv_err)?;

    for row in table.to_long() {
        out.write_record([row.date.to_string(), row.group, row.variable, row.value.to_string()])
            .map_err(csv_err)?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

#[derive(Serialize)]
struct JsonExport<'a> {
    start: NaiveDate,
    end: NaiveDate,
    interpolation: Interpolation,
    fields: &'a [String],
    groups: &'a [String],
    rows: Vec<Map<String, Value>>,
}

fn write_json<W: Write>(writer: W, table: &DailyTable) -> Result<(), AppError> {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert(table.date_field.clone(), Value::String(row.date.to_string()));
            obj.insert(table.group_field.clone(), Value::String(row.group.clone()));
            for (field, value) in table.fields.iter().zip(&row.values) {
                obj.insert(field.clone(), Value::from(*value));
            }
            obj
        })
        .collect();

    let doc = JsonExport {
        start: table.start,
        end: table.end,
        interpolation: table.interpolation,
        fields: &table.fields,
        groups: &table.groups,
        rows,
    };

    serde_json::to_writer_pretty(writer, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))
}

fn csv_err(e: csv::Error) -> AppError {
    AppError::new(2, format!("Failed to write export CSV: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Fill, RecordTable, ResampleConfig};
    use crate::resample::resample_daily;

    fn table() -> DailyTable {
        let input = RecordTable::from_rows(
            ["date", "canton", "ncumul_conf", "ncumul_deceased"],
            [["2020-03-01", "ZH", "10", ""], ["2020-03-03", "ZH", "20", "1"]],
        );
        resample_daily(&input, &ResampleConfig::new("date", "canton", ["ncumul_conf", "ncumul_deceased"])).unwrap()
    }

    fn render(format: TableFormat) -> String {
        let mut buf = Vec::new();
        write_table(&mut buf, &table(), format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn wide_csv_has_explicit_date_and_group_columns() {
        let expected = concat!(
            "date,canton,ncumul_conf,ncumul_deceased\n",
            "2020-03-01,ZH,10,0\n",
            "2020-03-02,ZH,15,0\n",
            "2020-03-03,ZH,20,1\n",
        );
        assert_eq!(render(TableFormat::Wide), expected);
    }

    #[test]
    fn wide_csv_reads_back_as_fully_observed_input() {
        let input = RecordTable::from_rows(
            ["date", "canton", "ncumul_conf"],
            [["2020-03-01", "ZH", "0"], ["2020-03-04", "ZH", "10"], ["2020-03-02", "BE", "5"]],
        );
        let config = ResampleConfig::new("date", "canton", ["ncumul_conf"]);
        let once = resample_daily(&input, &config).unwrap();

        let mut buf = Vec::new();
        write_table(&mut buf, &once, TableFormat::Wide).unwrap();
        let records = crate::io::ingest::read_table(buf.as_slice(), None).unwrap();
        let twice = resample_daily(&records, &config).unwrap();

        let cells = |t: &DailyTable| {
            t.rows
                .iter()
                .map(|r| (r.date, r.group.clone(), r.values.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(cells(&twice), cells(&once));
        assert_eq!(twice.value(NaiveDate::from_ymd_opt(2020, 3, 2).unwrap(), "ZH", "ncumul_conf"), Some(10.0 / 3.0));
        assert!(twice.rows.iter().all(|r| r.fills.iter().all(|f| *f == Fill::Observed)));
    }

    #[test]
    fn long_csv_melts_fields() {
        let txt = render(TableFormat::Long);
        let mut lines = txt.lines();
        assert_eq!(lines.next(), Some("date,canton,variable,value"));
        assert_eq!(lines.next(), Some("2020-03-01,ZH,ncumul_conf,10"));
        assert_eq!(lines.next(), Some("2020-03-01,ZH,ncumul_deceased,0"));
        assert_eq!(txt.lines().count(), 1 + 3 * 2);
    }

    #[test]
    fn json_rows_are_keyed_by_column_name() {
        let doc: Value = serde_json::from_str(&render(TableFormat::Json)).unwrap();
        assert_eq!(doc["start"], "2020-03-01");
        assert_eq!(doc["interpolation"], "linear");
        assert_eq!(doc["rows"][1]["date"], "2020-03-02");
        assert_eq!(doc["rows"][1]["ncumul_conf"], 15.0);
    }
}
