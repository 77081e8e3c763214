//! The module responsible for writing output data to disk.
use crate::dataset::ReferenceData;
use crate::report::{Report, practices_by_crop};
use crate::suitability::{SuitabilityClass, SuitabilityResult, round_score};
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which dataset-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "agrisuit_results";

/// The output file name for the full report
pub const REPORT_FILE_NAME: &str = "suitability_report.json";

/// The output file name for the score table used for mapping
pub const SCORES_FILE_NAME: &str = "suitability_scores.csv";

/// The output file name for the traditional practices
pub const PRACTICES_FILE_NAME: &str = "traditional_practices.json";

/// The output file name for every sub-parameter score
pub const DEBUG_SCORES_FILE_NAME: &str = "debug_detailed_scores.csv";

/// Get the default output directory for the named dataset
pub fn get_output_dir(dataset_name: &str) -> PathBuf {
    [OUTPUT_DIRECTORY_ROOT, dataset_name].iter().collect()
}

/// Get a dataset name from the path of its directory
pub fn dataset_name_from_path(dataset_dir: &Path) -> Result<String> {
    let dataset_dir = dataset_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to dataset")?;

    let name = dataset_dir
        .file_name()
        .context("Dataset cannot be in root folder")?
        .to_str()
        .context("Invalid chars in dataset dir name")?;

    Ok(name.to_string())
}

/// Create a new output directory, if it doesn't already exist.
///
/// An existing, non-empty directory is only reused if `allow_overwrite` is set, in which case its
/// contents are deleted.
///
/// # Returns
///
/// Whether an existing directory was overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let mut overwrite = false;
    if output_dir.is_dir() {
        if fs::read_dir(output_dir)?.next().is_none() {
            // Empty folder; nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        overwrite = true;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// A row of the suitability scores CSV file, one per region and crop
#[derive(Serialize, Debug, PartialEq)]
struct ScoreRow<'a> {
    region_name: &'a str,
    crop_type: &'a str,
    overall_score: f64,
    edaphic_score: f64,
    hydrologic_score: f64,
    atmospheric_score: f64,
    latitude: f64,
    longitude: f64,
    suitability_class: SuitabilityClass,
    map_colour: &'static str,
}

impl<'a> ScoreRow<'a> {
    fn new(result: &'a SuitabilityResult) -> Self {
        let coordinates = &result.region_characteristics.coordinates;
        Self {
            region_name: &result.region.0,
            crop_type: &result.crop.0,
            overall_score: round_score(result.overall_score),
            edaphic_score: round_score(result.category_scores.edaphic),
            hydrologic_score: round_score(result.category_scores.hydrologic),
            atmospheric_score: round_score(result.category_scores.atmospheric),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            suitability_class: result.suitability_class,
            map_colour: result.suitability_class.map_colour(),
        }
    }
}

/// A row of the debug scores CSV file, with every sub-parameter score at full precision
#[derive(Serialize, Debug, PartialEq)]
struct DebugScoreRow<'a> {
    region_name: &'a str,
    crop_type: &'a str,
    temperature_compatibility: f64,
    soil_type_compatibility: f64,
    altitude_compatibility: f64,
    rainfall_compatibility: f64,
    irrigation_access: f64,
    flood_risk_assessment: f64,
    temperature_optimal: f64,
    climate_zone_compatibility: f64,
    overall_score: f64,
}

impl<'a> DebugScoreRow<'a> {
    fn new(result: &'a SuitabilityResult) -> Self {
        let scores = &result.detailed_scores;
        Self {
            region_name: &result.region.0,
            crop_type: &result.crop.0,
            temperature_compatibility: scores.edaphic.temperature_compatibility,
            soil_type_compatibility: scores.edaphic.soil_type_compatibility,
            altitude_compatibility: scores.edaphic.altitude_compatibility,
            rainfall_compatibility: scores.hydrologic.rainfall_compatibility,
            irrigation_access: scores.hydrologic.irrigation_access,
            flood_risk_assessment: scores.hydrologic.flood_risk_assessment,
            temperature_optimal: scores.atmospheric.temperature_optimal,
            climate_zone_compatibility: scores.atmospheric.climate_zone_compatibility,
            overall_score: result.overall_score,
        }
    }
}

/// An object for writing suitability scores to CSV files
pub struct ScoresWriter {
    scores_writer: csv::Writer<File>,
    debug_writer: Option<csv::Writer<File>>,
}

impl ScoresWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `debug_scores` - Whether to also write every sub-parameter score
    pub fn create(output_path: &Path, debug_scores: bool) -> Result<Self> {
        let new_writer = |file_name: &str| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(&file_path)
                .with_context(|| format!("Could not create {}", file_path.display()))
        };

        let debug_writer = if debug_scores {
            Some(new_writer(DEBUG_SCORES_FILE_NAME)?)
        } else {
            None
        };

        Ok(Self {
            scores_writer: new_writer(SCORES_FILE_NAME)?,
            debug_writer,
        })
    }

    /// Write results to the CSV file(s)
    pub fn write_results<'a, I>(&mut self, results: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a SuitabilityResult>,
    {
        for result in results {
            self.scores_writer.serialize(ScoreRow::new(result))?;
            if let Some(writer) = self.debug_writer.as_mut() {
                writer.serialize(DebugScoreRow::new(result))?;
            }
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.scores_writer.flush()?;
        if let Some(writer) = self.debug_writer.as_mut() {
            writer.flush()?;
        }

        Ok(())
    }
}

/// Write a value to a file as pretty-printed JSON
fn write_json<T: Serialize + ?Sized>(file_path: &Path, value: &T) -> Result<()> {
    let file = File::create(file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Write the report and its accompanying files to the output folder
///
/// # Arguments
///
/// * `output_path` - Folder where files will be saved
/// * `data` - The reference data the report was generated from
/// * `report` - The report
/// * `debug_scores` - Whether to write every sub-parameter score to an extra file
pub fn write_report_files(
    output_path: &Path,
    data: &ReferenceData,
    report: &Report,
    debug_scores: bool,
) -> Result<()> {
    write_json(&output_path.join(REPORT_FILE_NAME), report)?;
    write_json(&output_path.join(PRACTICES_FILE_NAME), &practices_by_crop(data))?;

    let mut writer = ScoresWriter::create(output_path, debug_scores)?;
    for results in report.regional_analysis.values() {
        writer.write_results(results)?;
    }
    writer.flush()?;

    Ok(())
}
