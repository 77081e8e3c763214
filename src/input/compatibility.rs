//! Code for reading the per-crop soil and climate compatibility tables.
use super::*;
use crate::crop::{CompatibilityTable, CropID, CropMap};
use crate::error::SuitabilityError;
use crate::region::{ClimateZone, SoilType};
use serde::Deserialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry as HashEntry;
use std::fmt::Display;
use std::hash::Hash;

const SOIL_COMPATIBILITY_FILE_NAME: &str = "soil_compatibility.csv";
const CLIMATE_COMPATIBILITY_FILE_NAME: &str = "climate_compatibility.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct SoilCompatibilityRaw {
    crop_id: String,
    soil_type: SoilType,
    #[serde(deserialize_with = "deserialise_proportion")]
    value: f64,
}

#[derive(Debug, Deserialize, PartialEq)]
struct ClimateCompatibilityRaw {
    crop_id: String,
    climate_zone: ClimateZone,
    #[serde(deserialize_with = "deserialise_proportion")]
    value: f64,
}

/// Compatibility tables for each crop
pub type CompatibilityMap<K> = HashMap<CropID, CompatibilityTable<K>>;

/// Reads soil-type compatibility scores from a CSV file.
///
/// # Arguments
///
/// * `source` - Folder containing the dataset files
/// * `crops` - Crops already read, which every row must refer to
pub fn read_soil_compatibility<S: DataSource + ?Sized>(
    source: &S,
    crops: &CropMap,
) -> Result<CompatibilityMap<SoilType>> {
    let file_path = source.file_path(SOIL_COMPATIBILITY_FILE_NAME);
    let rows: Vec<SoilCompatibilityRaw> = read_csv(source, SOIL_COMPATIBILITY_FILE_NAME)?;
    read_compatibility_from_iter(
        "soil_compatibility",
        rows.into_iter()
            .map(|row| (row.crop_id, row.soil_type, row.value)),
        crops,
    )
    .with_context(|| input_err_msg(&file_path))
}

/// Reads climate-zone compatibility scores from a CSV file.
///
/// # Arguments
///
/// * `source` - Folder containing the dataset files
/// * `crops` - Crops already read, which every row must refer to
pub fn read_climate_compatibility<S: DataSource + ?Sized>(
    source: &S,
    crops: &CropMap,
) -> Result<CompatibilityMap<ClimateZone>> {
    let file_path = source.file_path(CLIMATE_COMPATIBILITY_FILE_NAME);
    let rows: Vec<ClimateCompatibilityRaw> = read_csv(source, CLIMATE_COMPATIBILITY_FILE_NAME)?;
    read_compatibility_from_iter(
        "climate_compatibility",
        rows.into_iter()
            .map(|row| (row.crop_id, row.climate_zone, row.value)),
        crops,
    )
    .with_context(|| input_err_msg(&file_path))
}

fn read_compatibility_from_iter<K, I>(
    table: &'static str,
    iter: I,
    crops: &CropMap,
) -> Result<CompatibilityMap<K>>
where
    K: Eq + Hash + Copy + Display,
    I: Iterator<Item = (String, K, f64)>,
{
    let mut scores: HashMap<CropID, HashMap<K, f64>> = HashMap::new();
    for (crop_id, key, value) in iter {
        let (crop_id, _) = crops.get_key_value(crop_id.as_str()).ok_or_else(|| {
            SuitabilityError::data_integrity(table, format!("unknown crop {crop_id}"))
        })?;

        match scores.entry(crop_id.clone()).or_default().entry(key) {
            HashEntry::Vacant(entry) => {
                entry.insert(value);
            }
            HashEntry::Occupied(_) => Err(SuitabilityError::data_integrity(
                table,
                format!("duplicate entry for crop {crop_id} and {key}"),
            ))?,
        }
    }

    Ok(scores
        .into_iter()
        .map(|(crop_id, map)| (crop_id, CompatibilityTable::new(map)))
        .collect())
}
