//! Formatted terminal output for resampling runs.
//!
//! We keep formatting code in one place so the resampler stays free of
//! presentation concerns and output changes are localized.

use crate::categories::GroupRank;
use crate::domain::{DailyTable, Fill};

use super::RunStats;

/// Format the run summary (input size, date range, groups, fill breakdown).
pub fn format_run_summary(stats: &RunStats, table: &DailyTable) -> String {
    let mut out = String::new();

    out.push_str("=== covid-daily - daily resampling ===\n");
    out.push_str(&format!(
        "Input: files={} | rows={}\n",
        stats.files, stats.rows_read
    ));
    out.push_str(&format!(
        "Range: {} .. {} ({} days)\n",
        table.start,
        table.end,
        table.n_days()
    ));
    out.push_str(&format!(
        "Groups: {} [{}]\n",
        table.groups.len(),
        table.groups.join(", ")
    ));
    out.push_str(&format!(
        "Interpolation: {} | rows out={}\n",
        table.interpolation,
        table.rows.len()
    ));

    out.push_str("\nFill breakdown:\n");
    out.push_str(&format!("{:<24}", "field"));
    for fill in Fill::ALL {
        out.push_str(&format!(" {:>12}", fill.label()));
    }
    out.push('\n');

    for (field, counts) in table.fields.iter().zip(table.fill_counts()) {
        out.push_str(&format!("{:<24}", truncate(field, 24)));
        for fill in Fill::ALL {
            out.push_str(&format!(" {:>12}", counts.get(fill)));
        }
        out.push('\n');
    }

    out
}

/// Format a group ranking table.
pub fn format_rankings(ranked: &[GroupRank], field: &str, descending: bool) -> String {
    let mut out = String::new();
    let direction = if descending { "descending" } else { "ascending" };
    out.push_str(&format!("Groups by mean {field} ({direction}):\n"));
    out.push_str(&format!("{:>4} {:<16} {:>14}\n", "#", "group", "mean"));
    for (idx, r) in ranked.iter().enumerate() {
        out.push_str(&format!("{:>4} {:<16} {:>14.3}\n", idx + 1, truncate(&r.group, 16), r.mean));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordTable, ResampleConfig};
    use crate::resample::resample_daily;

    #[test]
    fn summary_lists_fill_counts_per_field() {
        let input = RecordTable::from_rows(
            ["date", "canton", "ncumul_conf"],
            [["2020-03-02", "ZH", "10"], ["2020-03-04", "ZH", "20"], ["2020-03-01", "BE", "1"]],
        );
        let table = resample_daily(&input, &ResampleConfig::new("date", "canton", ["ncumul_conf"])).unwrap();
        let stats = RunStats { files: 1, rows_read: 3 };

        let txt = format_run_summary(&stats, &table);
        assert!(txt.contains("Range: 2020-03-01 .. 2020-03-04 (4 days)\n"));
        assert!(txt.contains("Groups: 2 [BE, ZH]\n"));
        // ZH: 2 observed, 1 interpolated, 1 zero; BE: 1 observed, 3 padded.
        let line = txt.lines().find(|l| l.starts_with("ncumul_conf")).unwrap();
        let counts: Vec<&str> = line.split_whitespace().skip(1).collect();
        assert_eq!(counts, vec!["3", "1", "3", "1"]);
    }

    #[test]
    fn rankings_are_numbered() {
        let ranked = vec![
            GroupRank { group: "TI".to_string(), mean: 7.0 },
            GroupRank { group: "ZH".to_string(), mean: 2.5 },
        ];
        let txt = format_rankings(&ranked, "ncumul_deceased", true);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Groups by mean ncumul_deceased (descending):");
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), vec!["1", "TI", "7.000"]);
        assert_eq!(lines[3].split_whitespace().collect::<Vec<_>>(), vec!["2", "ZH", "2.500"]);
    }
}
