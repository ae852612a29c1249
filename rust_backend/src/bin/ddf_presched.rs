use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use ddf_presched::io::loaders::{ConfigLoader, GridLoader, RecordWriter};
use ddf_presched::preprocessing::{PipelineConfig, PreschedPipeline};
use ddf_presched::time::format_mjd;

#[derive(Parser)]
#[command(name = "ddf-presched", version)]
#[command(about = "Preschedule deep-drilling-field observation sequences")]
#[command(disable_help_subcommand = true)]
struct Args {
    /// Visibility grid (columnar JSON).
    grid: PathBuf,

    /// Scheduler configuration (TOML). Defaults to ddf_presched.toml in a
    /// standard location, else the standard fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Survey table (JSON) replacing the configured fields.
    #[arg(short, long)]
    survey_table: Option<PathBuf>,

    /// Where to write the scheduled observations (JSON).
    #[arg(short, long)]
    output: PathBuf,

    /// Schedule fields one after the other.
    #[arg(long)]
    sequential: bool,

    /// Skip configuration validation.
    #[arg(long)]
    no_validate: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbosity);

    let grid = GridLoader::load_from_file(&args.grid)?;
    let config = ConfigLoader::load_with_survey(args.config.as_deref(), args.survey_table.as_deref())?;
    info!(
        "Survey window: {} to {} ({} years), {} fields",
        format_mjd(config.run.mjd_start),
        format_mjd(config.run.mjd_end()),
        config.run.survey_length,
        config.fields.len()
    );

    let pipeline = PreschedPipeline::with_config(PipelineConfig {
        validate: !args.no_validate,
        parallel: !args.sequential,
    });
    let result = pipeline
        .run(&config, &grid)
        .context("Prescheduling failed")?;

    let checksum = RecordWriter::write_json(&args.output, &result.records)?;

    println!(
        "{:<10} {:>7} {:>7} {:>8} {:>7} {:>8}",
        "field", "nights", "usable", "desired", "chosen", "records"
    );
    for field in &result.summary.fields {
        println!(
            "{:<10} {:>7} {:>7} {:>8} {:>7} {:>8}",
            field.field,
            field.nights,
            field.usable_nights,
            field.desired_sequences,
            field.chosen_nights,
            field.records
        );
    }
    for skipped in &result.summary.skipped_fields {
        println!("{:<10} skipped", skipped);
    }
    println!(
        "{} records written to {}",
        result.summary.total_records,
        args.output.display()
    );
    println!("sha256 {}", checksum);
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stderr);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        _ => builder.filter_level(log::LevelFilter::Trace),
    };
    builder.init();
}
