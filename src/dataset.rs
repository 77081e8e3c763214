//! The reference data used by the suitability engine and the datasets bundled with the program.
use crate::crop::{Crop, CropMap};
use crate::error::{EngineResult, SuitabilityError};
use crate::input::{DataSource, read_tables};
use crate::practice::PracticeZone;
use crate::region::{RegionMap, RegionProfile, find_region};
use anyhow::{Context, Result};
use include_dir::{Dir, include_dir};
use log::debug;
use std::path::Path;
use unicase::UniCase;

/// Datasets compiled into the program, one per subdirectory
pub static BUILTIN_DATASETS: Dir = include_dir!("$CARGO_MANIFEST_DIR/data");

/// The name of the dataset used when none is specified
pub const DEFAULT_DATASET: &str = "west_java";

/// Get one of the bundled datasets by name
pub fn get_builtin_dataset(name: &str) -> Result<&'static Dir<'static>> {
    BUILTIN_DATASETS
        .get_dir(name)
        .with_context(|| format!("Dataset {name} not found"))
}

/// Names of the bundled datasets
pub fn builtin_dataset_names() -> impl Iterator<Item = String> {
    BUILTIN_DATASETS
        .dirs()
        .map(|dir| dir.path().display().to_string())
}

/// The validated reference tables.
///
/// Once loaded the tables are never modified, so a `ReferenceData` can be shared between threads
/// and evaluations need no locking.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    /// Crops with their requirements and compatibility tables
    pub crops: CropMap,
    /// Region profiles, in file order
    pub regions: RegionMap,
    /// Traditional practice zones
    pub practices: Vec<PracticeZone>,
}

impl ReferenceData {
    /// Load and validate a dataset from any [`DataSource`]
    pub fn load<S: DataSource + ?Sized>(source: &S) -> Result<Self> {
        let tables = read_tables(source)?;
        let data = Self {
            crops: tables.crops,
            regions: tables.regions,
            practices: tables.practices,
        };
        data.validate()?;

        debug!(
            "Loaded reference data: {} crops, {} regions, {} practice zones",
            data.crops.len(),
            data.regions.len(),
            data.practices.len()
        );

        Ok(data)
    }

    /// Load a dataset from a directory on disk
    pub fn from_dir(dataset_dir: &Path) -> Result<Self> {
        ensure_dir(dataset_dir)?;
        Self::load(dataset_dir)
            .with_context(|| format!("Failed to load dataset from {}", dataset_dir.display()))
    }

    /// Load one of the bundled datasets
    pub fn builtin(name: &str) -> Result<Self> {
        let dir = get_builtin_dataset(name)?;
        Self::load(dir).with_context(|| format!("Failed to load bundled dataset {name}"))
    }

    /// The bundled West Java dataset
    pub fn west_java() -> Result<Self> {
        Self::builtin(DEFAULT_DATASET)
    }

    /// Check consistency between tables.
    ///
    /// Per-row checks happen while reading; this covers what can only be checked once every
    /// table is loaded.
    pub fn validate(&self) -> EngineResult<()> {
        if self.crops.is_empty() {
            return Err(SuitabilityError::data_integrity("crops", "no crops defined"));
        }
        if self.regions.is_empty() {
            return Err(SuitabilityError::data_integrity(
                "regions",
                "no regions defined",
            ));
        }

        for crop in self.crops.values() {
            if crop.soil_compatibility.is_empty() {
                return Err(SuitabilityError::data_integrity(
                    "soil_compatibility",
                    format!("no entries for crop {}", crop.id),
                ));
            }
            if crop.climate_compatibility.is_empty() {
                return Err(SuitabilityError::data_integrity(
                    "climate_compatibility",
                    format!("no entries for crop {}", crop.id),
                ));
            }
        }

        for zone in &self.practices {
            if !self.crops.contains_key(&zone.crop) {
                return Err(SuitabilityError::data_integrity(
                    "practices",
                    format!("zone {}: unknown crop {}", zone.zone, zone.crop),
                ));
            }
            if let Some(region) = zone.regions.iter().find(|r| !self.regions.contains_key(*r)) {
                return Err(SuitabilityError::data_integrity(
                    "practices",
                    format!("zone {}: unknown region {region}", zone.zone),
                ));
            }
        }

        Ok(())
    }

    /// Look up a crop by ID, ignoring case if there is no exact match
    pub fn crop(&self, id: &str) -> EngineResult<&Crop> {
        if let Some(crop) = self.crops.get(id) {
            return Ok(crop);
        }

        let wanted = UniCase::new(id.trim());
        self.crops
            .values()
            .find(|crop| UniCase::new(&*crop.id.0) == wanted)
            .ok_or_else(|| SuitabilityError::crop_not_found(id))
    }

    /// Look up a region by name, ignoring case if there is no exact match
    pub fn region(&self, name: &str) -> EngineResult<&RegionProfile> {
        find_region(&self.regions, name)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    anyhow::ensure!(
        path.is_dir(),
        "{} is not a directory",
        path.display()
    );
    Ok(())
}
