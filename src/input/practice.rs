//! Code for reading traditional practice zones from a TOML file.
use super::*;
use crate::crop::CropMap;
use crate::error::SuitabilityError;
use crate::practice::PracticeZone;
use crate::region::RegionMap;
use serde::Deserialize;

const PRACTICES_FILE_NAME: &str = "practices.toml";

#[derive(Debug, Deserialize)]
struct PracticesFile {
    #[serde(default)]
    zones: Vec<PracticeZoneRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PracticeZoneRaw {
    crop: String,
    zone: String,
    regions: Vec<String>,
    #[serde(default)]
    practices: Vec<String>,
    #[serde(default)]
    pest_risks: Vec<String>,
    #[serde(default)]
    climate_threats: Vec<String>,
}

/// Reads practice zones from a TOML file.
///
/// # Arguments
///
/// * `source` - Folder containing the dataset files
/// * `crops` - Known crops
/// * `regions` - Known regions
pub fn read_practices<S: DataSource + ?Sized>(
    source: &S,
    crops: &CropMap,
    regions: &RegionMap,
) -> Result<Vec<PracticeZone>> {
    let file_path = source.file_path(PRACTICES_FILE_NAME);
    let file: PracticesFile = read_toml_table(source, PRACTICES_FILE_NAME, "practices")?;
    read_practices_from_iter(file.zones.into_iter(), crops, regions)
        .with_context(|| input_err_msg(&file_path))
}

fn read_practices_from_iter<I>(
    iter: I,
    crops: &CropMap,
    regions: &RegionMap,
) -> Result<Vec<PracticeZone>>
where
    I: Iterator<Item = PracticeZoneRaw>,
{
    let mut zones: Vec<PracticeZone> = Vec::new();
    for raw in iter {
        let invalid =
            |reason: String| SuitabilityError::data_integrity("practices", format!("zone {}: {reason}", raw.zone));

        let (crop, _) = crops
            .get_key_value(raw.crop.as_str())
            .ok_or_else(|| invalid(format!("unknown crop {}", raw.crop)))?;
        ensure!(
            !zones.iter().any(|z| &z.crop == crop && z.zone == raw.zone),
            invalid(format!("duplicate zone for crop {crop}"))
        );

        let zone_regions = raw
            .regions
            .iter()
            .map(|name| {
                regions
                    .get_key_value(name.as_str())
                    .map(|(id, _)| id.clone())
                    .ok_or_else(|| invalid(format!("unknown region {name}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        zones.push(PracticeZone {
            crop: crop.clone(),
            zone: raw.zone,
            regions: zone_regions,
            practices: raw.practices,
            pest_risks: raw.pest_risks,
            climate_threats: raw.climate_threats,
        });
    }

    Ok(zones)
}
