//! The command line interface for the suitability engine.
use crate::dataset::{DEFAULT_DATASET, ReferenceData};
use crate::log::{self, LogOutput};
use crate::output::metadata::write_metadata;
use crate::output::{
    create_output_directory, dataset_name_from_path, get_output_dir, write_report_files,
};
use crate::report::generate_report;
use crate::settings::Settings;
use crate::suitability::portfolio::{
    analyze_all_regions, crop_summary, evaluate_at, locate, practices_for, rank_crops,
};
use crate::suitability::{SuitabilityResult, evaluate};
use ::log::{info, warn};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod dataset;
use dataset::DatasetSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the suitability engine.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Directory containing the reference dataset (defaults to the bundled West Java dataset)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the report command
#[derive(Args, Default)]
pub struct ReportOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Whether to write every sub-parameter score to an extra CSV file
    #[arg(long)]
    pub debug_scores: bool,
    /// Date to record in the report as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Evaluate how well a crop suits a region.
    Evaluate {
        /// The crop ID (e.g. corn).
        crop: String,
        /// The region name (e.g. Karawang).
        region: String,
    },
    /// Rank every region for a crop.
    Rank {
        /// The crop ID.
        crop: String,
    },
    /// Rank every crop for a region.
    Compare {
        /// The region name.
        region: String,
    },
    /// Summarise a crop's requirements.
    Summary {
        /// The crop ID.
        crop: String,
    },
    /// Find the region nearest a location.
    Locate {
        /// Latitude in decimal degrees.
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        /// Longitude in decimal degrees.
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        /// Also evaluate this crop in the nearest region.
        #[arg(long)]
        crop: Option<String>,
    },
    /// Show traditional practices and risks for a crop in a region.
    Practices {
        /// The crop ID.
        crop: String,
        /// The region name.
        region: String,
    },
    /// Write the full suitability report to files.
    Report {
        /// Report options
        #[command(flatten)]
        opts: ReportOpts,
    },
    /// Validate a dataset.
    Validate {
        /// The path to the dataset directory.
        dataset_dir: PathBuf,
    },
    /// Manage bundled datasets.
    Dataset {
        /// The available subcommands for managing bundled datasets.
        #[command(subcommand)]
        subcommand: DatasetSubcommands,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self, dataset_dir: Option<&Path>) -> Result<()> {
        match self {
            Self::Evaluate { crop, region } => {
                handle_evaluate_command(dataset_dir, &crop, &region, None)
            }
            Self::Rank { crop } => handle_rank_command(dataset_dir, &crop, None),
            Self::Compare { region } => handle_compare_command(dataset_dir, &region, None),
            Self::Summary { crop } => handle_summary_command(dataset_dir, &crop, None),
            Self::Locate {
                latitude,
                longitude,
                crop,
            } => handle_locate_command(dataset_dir, latitude, longitude, crop.as_deref(), None),
            Self::Practices { crop, region } => {
                handle_practices_command(dataset_dir, &crop, &region, None)
            }
            Self::Report { opts } => handle_report_command(dataset_dir, &opts, None),
            Self::Validate { dataset_dir } => handle_validate_command(&dataset_dir, None),
            Self::Dataset { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start agrisuit
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ agrisuit --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute(cli.dataset.as_deref())
}

/// Load program settings, if not provided
fn settings_or_load(settings: Option<Settings>) -> Result<Settings> {
    if let Some(settings) = settings {
        Ok(settings)
    } else {
        Settings::load().context("Failed to load settings.")
    }
}

/// Initialise the program logger, unless this has already been done
fn init_logger(settings: &Settings, output: LogOutput) -> Result<()> {
    log::init_once(Some(&settings.log_level), output).context("Failed to initialise logging.")
}

/// Load the dataset at `dataset_dir`, or the bundled dataset if no directory is given
fn load_reference_data(dataset_dir: Option<&Path>) -> Result<ReferenceData> {
    let data = if let Some(dataset_dir) = dataset_dir {
        ReferenceData::from_dir(dataset_dir)
    } else {
        ReferenceData::west_java()
    };

    data.context("Failed to load reference data.")
}

/// Set up logging and load reference data for a query command
fn prepare_query(dataset_dir: Option<&Path>, settings: Option<Settings>) -> Result<ReferenceData> {
    let settings = settings_or_load(settings)?;

    // Results go to stdout, so keep log messages out of it
    init_logger(&settings, LogOutput::Stderr)?;

    load_reference_data(dataset_dir)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print results as a ranked table
fn print_ranking(results: &[SuitabilityResult], show: impl Fn(&SuitabilityResult) -> String) {
    for (rank, result) in results.iter().enumerate() {
        println!(
            "{:>2}. {:<16} {:.3}  {}",
            rank + 1,
            show(result),
            result.overall_score,
            result.suitability_class
        );
    }
}

/// Handle the `evaluate` command.
pub fn handle_evaluate_command(
    dataset_dir: Option<&Path>,
    crop: &str,
    region: &str,
    settings: Option<Settings>,
) -> Result<()> {
    let data = prepare_query(dataset_dir, settings)?;
    let result = evaluate(&data, crop, region)?;
    print_json(&result)
}

/// Handle the `rank` command.
pub fn handle_rank_command(
    dataset_dir: Option<&Path>,
    crop: &str,
    settings: Option<Settings>,
) -> Result<()> {
    let data = prepare_query(dataset_dir, settings)?;
    let results = analyze_all_regions(&data, crop)?;
    print_ranking(&results, |result| result.region.to_string());

    Ok(())
}

/// Handle the `compare` command.
pub fn handle_compare_command(
    dataset_dir: Option<&Path>,
    region: &str,
    settings: Option<Settings>,
) -> Result<()> {
    let data = prepare_query(dataset_dir, settings)?;
    let results = rank_crops(&data, region)?;
    print_ranking(&results, |result| result.crop.to_string());

    Ok(())
}

/// Handle the `summary` command.
pub fn handle_summary_command(
    dataset_dir: Option<&Path>,
    crop: &str,
    settings: Option<Settings>,
) -> Result<()> {
    let data = prepare_query(dataset_dir, settings)?;
    print_json(&crop_summary(&data, crop)?)
}

/// Handle the `locate` command.
pub fn handle_locate_command(
    dataset_dir: Option<&Path>,
    latitude: f64,
    longitude: f64,
    crop: Option<&str>,
    settings: Option<Settings>,
) -> Result<()> {
    let data = prepare_query(dataset_dir, settings)?;
    if let Some(crop) = crop {
        return print_json(&evaluate_at(&data, crop, latitude, longitude)?);
    }

    let region = locate(&data, latitude, longitude)?;
    println!("{} {}", region.id, region.coordinates);

    Ok(())
}

/// Handle the `practices` command.
pub fn handle_practices_command(
    dataset_dir: Option<&Path>,
    crop: &str,
    region: &str,
    settings: Option<Settings>,
) -> Result<()> {
    let data = prepare_query(dataset_dir, settings)?;
    let zones = practices_for(&data, crop, region)?;
    if zones.is_empty() {
        println!("No traditional practices recorded for {crop} in {region}");
        return Ok(());
    }

    for zone in zones {
        println!("{} ({})", zone.zone, zone.regions.iter().join(", "));
        for (heading, items) in [
            ("Practices", &zone.practices),
            ("Pest risks", &zone.pest_risks),
            ("Climate threats", &zone.climate_threats),
        ] {
            println!("  {heading}:");
            for item in items {
                println!("    - {item}");
            }
        }
    }

    Ok(())
}

/// Handle the `report` command.
pub fn handle_report_command(
    dataset_dir: Option<&Path>,
    opts: &ReportOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = settings_or_load(settings)?;

    // These settings can be overridden by command-line arguments
    if opts.debug_scores {
        settings.debug_scores = true;
    }
    if opts.overwrite {
        settings.overwrite = true;
    }

    let dataset_name = if let Some(dataset_dir) = dataset_dir {
        dataset_name_from_path(dataset_dir)?
    } else {
        DEFAULT_DATASET.to_string()
    };

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(&dataset_name);
        &pathbuf
    };

    let overwrite =
        create_output_directory(output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    init_logger(&settings, LogOutput::Directory(output_path))?;

    let data = load_reference_data(dataset_dir)?;
    info!("Loaded dataset {dataset_name}");
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let analysis_date = opts.date.unwrap_or_else(|| Local::now().date_naive());
    let report = generate_report(&data, analysis_date)?;
    write_report_files(output_path, &data, &report, settings.debug_scores)
        .context("Failed to write report.")?;

    let dataset_description = dataset_dir.map_or_else(
        || DEFAULT_DATASET.to_string(),
        |dir| dir.display().to_string(),
    );
    write_metadata(output_path, &dataset_description).context("Failed to save metadata.")?;

    for crop_id in &report.crops_analyzed {
        if let Some(best) = report.regional_analysis[crop_id].first() {
            info!(
                "Best region for {crop_id}: {} ({:.3}, {})",
                best.region, best.overall_score, best.suitability_class
            );
        }
    }
    info!("Report complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(dataset_dir: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = settings_or_load(settings)?;

    // No log files for the validate command
    init_logger(&settings, LogOutput::Console)?;

    // Load/validate the dataset
    ReferenceData::from_dir(dataset_dir).context("Failed to validate dataset.")?;
    info!("Dataset validation successful!");

    Ok(())
}
