//! Cell parsing for dates and numeric values.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Date-time layouts whose time part is dropped.
const DATETIME_FMTS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// `%Y` also takes one to three digit years; those are never real report dates.
const MIN_YEAR: i32 = 1000;

/// Markers treated as "no value".
const MISSING_MARKERS: [&str; 5] = ["NA", "N/A", "NaN", "nan", "null"];

pub(crate) fn parse_date(s: &str, formats: &[String]) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let dates = formats.iter().filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok());
    let datetimes = DATETIME_FMTS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date());
    dates.chain(datetimes).find(|d| d.year() >= MIN_YEAR)
}

/// `Ok(None)` for absent/unknown values, `Err(())` for text that is not a number.
pub(crate) fn parse_value(s: &str) -> Result<Option<f64>, ()> {
    let s = s.trim();
    if s.is_empty() || MISSING_MARKERS.contains(&s) {
        return Ok(None);
    }
    let v = s.parse::<f64>().map_err(|_| ())?;
    Ok(v.is_finite().then_some(v))
}
