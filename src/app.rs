//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs logging
//! - parses CLI arguments
//! - runs the shared resample pipeline
//! - prints tables/reports/plots or writes exports

use std::io::Write;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, InputArgs, PlotArgs, RankArgs, ResampleArgs};
use crate::domain::{DEFAULT_DATE_FORMATS, ResampleConfig};
use crate::error::AppError;

pub mod pipeline;

use pipeline::{InputSpec, LongLayout};

/// Comma-separated chrono formats overriding the default date formats.
pub const DATE_FORMATS_ENV: &str = "COVID_DAILY_DATE_FORMATS";

/// Entry point for the `covid-daily` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Resample(args) => handle_resample(args),
        Command::Rank(args) => handle_rank(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn init_logging(verbose: bool) {
    // Logs go to stderr so stdout stays clean for table output.
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_resample(args: ResampleArgs) -> Result<(), AppError> {
    let input = resample_input(&args)?;
    let config = resample_config_from_args(&input, std::env::var(DATE_FORMATS_ENV).ok().as_deref());
    let run = pipeline::run_resample(&input_spec_from_args(&input), &config)?;
    let mut table = run.table;

    if let Some(field) = &args.order_by {
        let order = crate::categories::order_by_mean(&table, field, true)?;
        let order = if args.reverse { order.reversed() } else { order };
        table.reorder_groups(&order);
    }

    if args.summary {
        eprintln!("{}", crate::report::format_run_summary(&run.stats, &table));
    }

    match &args.output {
        Some(path) => crate::io::export::write_table_file(path, &table, args.format)?,
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            crate::io::export::write_table(&mut lock, &table, args.format)?;
            lock.flush()
                .map_err(|e| AppError::new(2, format!("Failed to write to stdout: {e}")))?;
        }
    }

    Ok(())
}

fn handle_rank(args: RankArgs) -> Result<(), AppError> {
    let mut input = args.input.clone();
    ensure_field(&mut input, &args.by);
    let config = resample_config_from_args(&input, std::env::var(DATE_FORMATS_ENV).ok().as_deref());
    let run = pipeline::run_resample(&input_spec_from_args(&input), &config)?;

    let descending = !args.ascending;
    let ranked = crate::categories::rank_groups_by_mean(&run.table, &args.by, descending)?;
    println!("{}", crate::report::format_rankings(&ranked, &args.by, descending));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let mut input = args.input.clone();
    ensure_field(&mut input, &args.field);
    let config = resample_config_from_args(&input, std::env::var(DATE_FORMATS_ENV).ok().as_deref());
    let run = pipeline::run_resample(&input_spec_from_args(&input), &config)?;

    let plot = crate::plot::render_series_plot(&run.table, &args.group, &args.field, args.width, args.height)
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("Group '{}' not found (available: {}).", args.group, run.table.groups.join(", ")),
            )
        })?;

    println!("{plot}");
    Ok(())
}

/// Input options for `resample`; an `--order-by` field is resampled too,
/// as `rank` and `plot` do with their target field.
fn resample_input(args: &ResampleArgs) -> Result<InputArgs, AppError> {
    if args.input.fields.is_empty() {
        return Err(AppError::new(2, "No value fields given (use --fields a,b,c)."));
    }
    let mut input = args.input.clone();
    if let Some(field) = &args.order_by {
        ensure_field(&mut input, field);
    }
    Ok(input)
}

fn ensure_field(input: &mut InputArgs, field: &str) {
    if !input.fields.iter().any(|f| f == field) {
        input.fields.push(field.to_string());
    }
}

/// Build the resampler configuration from CLI arguments.
///
/// Date formats come from `--date-format`, then `env_formats`
/// (comma-separated), then the built-in defaults.
pub fn resample_config_from_args(args: &InputArgs, env_formats: Option<&str>) -> ResampleConfig {
    let date_formats: Vec<String> = if !args.date_formats.is_empty() {
        args.date_formats.clone()
    } else if let Some(env) = env_formats.filter(|s| !s.trim().is_empty()) {
        env.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
    } else {
        DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect()
    };

    ResampleConfig::new(
        args.date_field.clone(),
        args.group_field.clone(),
        args.fields.iter().map(|f| f.trim().to_string()).filter(|f| !f.is_empty()),
    )
    .with_interpolation(args.interpolation)
    .with_date_formats(date_formats)
}

pub fn input_spec_from_args(args: &InputArgs) -> InputSpec {
    InputSpec {
        paths: args.inputs.clone(),
        long: args.long_variable.as_ref().map(|variable_field| LongLayout {
            variable_field: variable_field.clone(),
            value_field: args.long_value.clone(),
        }),
    }
}
