//! Code for reading crop requirements from a TOML file.
use super::*;
use crate::crop::{
    AtmosphericRequirements, CompatibilityTable, Crop, CropID, CropMap, EdaphicRequirements,
    HydrologicRequirements,
};
use crate::error::SuitabilityError;
use serde::Deserialize;

const CROPS_FILE_NAME: &str = "crops.toml";

#[derive(Debug, Deserialize)]
struct CropsFile {
    crops: Vec<CropRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CropRaw {
    id: CropID,
    name: String,
    scientific_name: String,
    edaphic: EdaphicRequirements,
    hydrologic: HydrologicRequirements,
    atmospheric: AtmosphericRequirements,
}

/// Reads crop requirements from a TOML file.
///
/// Compatibility tables are read separately, so the crops returned have empty tables.
///
/// # Arguments
///
/// * `source` - Folder containing the dataset files
pub fn read_crops<S: DataSource + ?Sized>(source: &S) -> Result<CropMap> {
    let file_path = source.file_path(CROPS_FILE_NAME);
    let file: CropsFile = read_toml_table(source, CROPS_FILE_NAME, "crops")?;
    read_crops_from_iter(file.crops.into_iter()).with_context(|| input_err_msg(&file_path))
}

fn read_crops_from_iter<I>(iter: I) -> Result<CropMap>
where
    I: Iterator<Item = CropRaw>,
{
    let mut crops = CropMap::new();
    for raw in iter {
        check_requirements(&raw)?;
        ensure!(
            !crops.contains_key(&raw.id),
            SuitabilityError::data_integrity("crops", format!("duplicate crop ID {}", raw.id))
        );

        let crop = Crop {
            id: raw.id.clone(),
            name: raw.name,
            scientific_name: raw.scientific_name,
            edaphic: raw.edaphic,
            hydrologic: raw.hydrologic,
            atmospheric: raw.atmospheric,
            soil_compatibility: CompatibilityTable::default(),
            climate_compatibility: CompatibilityTable::default(),
        };
        crops.insert(raw.id, crop);
    }

    ensure!(
        !crops.is_empty(),
        SuitabilityError::data_integrity("crops", "no crops defined")
    );

    Ok(crops)
}

/// Checks on requirements which the range type alone cannot express
fn check_requirements(raw: &CropRaw) -> Result<(), SuitabilityError> {
    let atmospheric = &raw.atmospheric;
    if !atmospheric.optimal_temperature.is_within(&atmospheric.temperature) {
        return Err(SuitabilityError::data_integrity(
            "crops",
            format!(
                "crop {}: optimal temperature {} is outside temperature range {}",
                raw.id, atmospheric.optimal_temperature, atmospheric.temperature
            ),
        ));
    }
    if !raw.edaphic.min_soil_depth.is_finite() || raw.edaphic.min_soil_depth < 0.0 {
        return Err(SuitabilityError::data_integrity(
            "crops",
            format!(
                "crop {}: minimum soil depth must be a non-negative number",
                raw.id
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::{IrrigationNeed, ToleranceLevel};
    use std::fs;
    use tempfile::tempdir;

    const CORN: &str = r#"
[[crops]]
id = "corn"
name = "Corn"
scientific_name = "Zea mays"

[crops.edaphic]
soil_textures = ["sandy_loam", "loam"]
ph = [5.8, 7.0]
organic_matter = [2.5, 4.0]
drainage = "well_drained"
min_soil_depth = 60.0
cec = [15.0, 25.0]
nitrogen = [0.12, 0.20]
phosphorus = [0.10, 0.18]
potassium = [0.18, 0.28]

[crops.hydrologic]
annual_rainfall = [600.0, 1200.0]
growing_season_rainfall = [400.0, 800.0]
water_table_depth = [50.0, 150.0]
flood_tolerance = "low_to_moderate"
water_quality_ec = [0.25, 0.75]

[crops.atmospheric]
temperature = [20.0, 30.0]
optimal_temperature = [24.0, 28.0]
humidity = [60.0, 80.0]
solar_radiation = [18.0, 25.0]
photoperiod = [11.0, 14.0]
wind_tolerance = "moderate"
altitude = [0.0, 1500.0]
"#;

    fn write_crops(dir: &Path, contents: &str) {
        fs::write(dir.join(CROPS_FILE_NAME), contents).unwrap();
    }

    #[test]
    fn test_read_crops() {
        let dir = tempdir().unwrap();
        write_crops(dir.path(), CORN);
        let crops = read_crops(dir.path()).unwrap();
        assert_eq!(crops.len(), 1);

        let corn = &crops["corn"];
        assert_eq!(corn.scientific_name, "Zea mays");
        assert_eq!(corn.edaphic.ph.min(), 5.8);
        assert_eq!(corn.atmospheric.altitude.max(), 1500.0);
        assert!(corn.soil_compatibility.is_empty());

        // Omitted fields take their defaults
        assert_eq!(corn.hydrologic.irrigation_access, IrrigationNeed::Beneficial);
        assert_eq!(corn.hydrologic.drought_tolerance, ToleranceLevel::Moderate);
    }

    #[test]
    fn test_read_crops_duplicate() {
        let dir = tempdir().unwrap();
        write_crops(dir.path(), &format!("{CORN}\n{CORN}"));
        let err = read_crops(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SuitabilityError>(),
            Some(SuitabilityError::DataIntegrity { table: "crops", .. })
        ));
    }

    #[test]
    fn test_read_crops_inverted_range() {
        let dir = tempdir().unwrap();
        write_crops(dir.path(), &CORN.replace("ph = [5.8, 7.0]", "ph = [7.0, 5.8]"));
        assert!(read_crops(dir.path()).is_err());
    }

    #[test]
    fn test_read_crops_optimal_outside_range() {
        let dir = tempdir().unwrap();
        write_crops(
            dir.path(),
            &CORN.replace(
                "optimal_temperature = [24.0, 28.0]",
                "optimal_temperature = [24.0, 32.0]",
            ),
        );
        let err = read_crops(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SuitabilityError>(),
            Some(SuitabilityError::DataIntegrity { .. })
        ));
    }

    #[test]
    fn test_read_crops_missing_range() {
        let dir = tempdir().unwrap();
        write_crops(dir.path(), &CORN.replace("ph = [5.8, 7.0]\n", ""));
        let err = read_crops(dir.path()).unwrap_err();
        match err.downcast_ref::<SuitabilityError>() {
            Some(SuitabilityError::DataIntegrity { table, reason }) => {
                assert_eq!(*table, "crops");
                assert!(reason.contains("ph"), "{reason}");
            }
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_crops_empty() {
        let dir = tempdir().unwrap();
        write_crops(dir.path(), "crops = []");
        assert!(read_crops(dir.path()).is_err());
    }
}
