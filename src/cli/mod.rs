//! Command-line parsing for the daily resampler.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the resampling code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Interpolation, TableFormat};

/// Column holding the canton abbreviation in the openZH case files.
pub const DEFAULT_GROUP_FIELD: &str = "abbreviation_canton_and_fl";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid-daily", version, about = "Resample grouped COVID-19 observations to a daily grid")]
pub struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resample to one row per day per group and write the table.
    Resample(ResampleArgs),
    /// Rank groups by the mean of a field over the resampled range.
    Rank(RankArgs),
    /// Plot one group's resampled series in the terminal.
    Plot(PlotArgs),
}

/// Options shared by every subcommand: where the data is and how to read it.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Input CSV files; several files are concatenated (union of columns).
    #[arg(required = true, value_name = "CSV")]
    pub inputs: Vec<PathBuf>,

    /// Column holding the observation date.
    #[arg(long, default_value = "date")]
    pub date_field: String,

    /// Column holding the group (canton/location) label.
    #[arg(long, default_value = DEFAULT_GROUP_FIELD)]
    pub group_field: String,

    /// Value columns to resample (comma-separated, order kept).
    ///
    /// `rank`, `plot` and `resample --order-by` add their target field if it is not listed.
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// How to fill interior gaps before padding.
    #[arg(long, value_enum, default_value_t = Interpolation::Linear)]
    pub interpolation: Interpolation,

    /// Input is long (one variable/value pair per row); names the variable column.
    #[arg(long, value_name = "COLUMN")]
    pub long_variable: Option<String>,

    /// Value column for long input.
    #[arg(long, value_name = "COLUMN", default_value = "value")]
    pub long_value: String,

    /// Date format(s) to try, chrono syntax (repeatable; replaces the defaults).
    #[arg(long = "date-format", value_name = "FMT")]
    pub date_formats: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ResampleArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output layout.
    #[arg(long, value_enum, default_value_t = TableFormat::Wide)]
    pub format: TableFormat,

    /// Write the table here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Order groups within each date by mean of this field (descending).
    #[arg(long, value_name = "FIELD")]
    pub order_by: Option<String>,

    /// Reverse the `--order-by` ranking.
    #[arg(long)]
    pub reverse: bool,

    /// Print a run summary to stderr.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Debug, Args, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Field to rank by.
    #[arg(long, value_name = "FIELD")]
    pub by: String,

    /// Rank smallest mean first.
    #[arg(long)]
    pub ascending: bool,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Group to plot.
    #[arg(long)]
    pub group: String,

    /// Field to plot.
    #[arg(long)]
    pub field: String,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_defaults_match_case_data() {
        let cli = Cli::parse_from(["covid-daily", "resample", "a.csv", "b.csv", "--fields", "ncumul_conf,ncumul_deceased"]);
        let Command::Resample(args) = cli.command else {
            panic!("expected resample");
        };
        assert_eq!(args.input.inputs.len(), 2);
        assert_eq!(args.input.date_field, "date");
        assert_eq!(args.input.group_field, DEFAULT_GROUP_FIELD);
        assert_eq!(args.input.fields, vec!["ncumul_conf", "ncumul_deceased"]);
        assert_eq!(args.input.interpolation, Interpolation::Linear);
        assert_eq!(args.format, TableFormat::Wide);
        assert!(args.input.long_variable.is_none());
    }

    #[test]
    fn long_input_and_no_interpolation() {
        let cli = Cli::parse_from([
            "covid-daily",
            "-v",
            "plot",
            "monitoring.csv",
            "--group-field",
            "location",
            "--fields",
            "tages_distanz_median",
            "--long-variable",
            "variable_short",
            "--interpolation",
            "none",
            "--group",
            "ZH",
            "--field",
            "tages_distanz_median",
        ]);
        assert!(cli.verbose);
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(args.input.long_variable.as_deref(), Some("variable_short"));
        assert_eq!(args.input.long_value, "value");
        assert_eq!(args.input.interpolation, Interpolation::None);
        assert_eq!(args.width, 100);
    }

    #[test]
    fn pad_is_an_alias_for_no_interpolation() {
        let cli = Cli::parse_from(["covid-daily", "rank", "a.csv", "--by", "ncumul_conf", "--interpolation", "pad"]);
        let Command::Rank(args) = cli.command else {
            panic!("expected rank");
        };
        assert_eq!(args.input.interpolation, Interpolation::None);
    }
}
