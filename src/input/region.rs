//! Code for reading region profiles from a CSV file.
use super::*;
use crate::error::SuitabilityError;
use crate::id::define_id_getter;
use crate::range::ValueRange;
use crate::region::{
    ClimateZone, Coordinates, FloodRisk, IrrigationQuality, RegionID, RegionMap, RegionProfile,
    SoilType,
};
use serde::Deserialize;

const REGIONS_FILE_NAME: &str = "regions.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct RegionRaw {
    id: RegionID,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    climate_zone: ClimateZone,
    annual_rainfall: f64,
    temperature_min: f64,
    temperature_max: f64,
    soil_type: SoilType,
    irrigation: IrrigationQuality,
    flood_risk: FloodRisk,
}
define_id_getter! {RegionRaw, RegionID}

impl RegionRaw {
    fn into_profile(self) -> Result<RegionProfile, SuitabilityError> {
        let invalid = |reason: String| {
            SuitabilityError::data_integrity("regions", format!("region {}: {reason}", self.id))
        };

        let coordinates = Coordinates::new(self.latitude, self.longitude)
            .map_err(|err| invalid(err.to_string()))?;
        let temperature_range = ValueRange::new(self.temperature_min, self.temperature_max)
            .map_err(|err| invalid(format!("bad temperature range: {err}")))?;
        if !self.altitude.is_finite() {
            return Err(invalid(format!("altitude must be finite (got {})", self.altitude)));
        }
        if !self.annual_rainfall.is_finite() || self.annual_rainfall < 0.0 {
            return Err(invalid(format!(
                "annual rainfall must be a non-negative number (got {})",
                self.annual_rainfall
            )));
        }

        Ok(RegionProfile {
            id: self.id,
            coordinates,
            altitude: self.altitude,
            climate_zone: self.climate_zone,
            annual_rainfall: self.annual_rainfall,
            temperature_range,
            soil_type: self.soil_type,
            irrigation: self.irrigation,
            flood_risk: self.flood_risk,
        })
    }
}

/// Reads region profiles from a CSV file.
///
/// # Arguments
///
/// * `source` - Folder containing the dataset files
///
/// # Returns
///
/// A [`RegionMap`] in file order, or an error
pub fn read_regions<S: DataSource + ?Sized>(source: &S) -> Result<RegionMap> {
    let file_path = source.file_path(REGIONS_FILE_NAME);
    let raw: IndexMap<RegionID, RegionRaw> = read_csv_id_file(source, REGIONS_FILE_NAME)?;
    read_regions_from_iter(raw.into_values()).with_context(|| input_err_msg(&file_path))
}

fn read_regions_from_iter<I>(iter: I) -> Result<RegionMap>
where
    I: Iterator<Item = RegionRaw>,
{
    let mut regions = RegionMap::new();
    for raw in iter {
        let region = raw.into_profile()?;
        regions.insert(region.id.clone(), region);
    }

    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    /// Create an example regions file in dir_path
    fn create_regions_file(dir_path: &Path, rows: &str) {
        let file_path = dir_path.join(REGIONS_FILE_NAME);
        let mut file = File::create(file_path).unwrap();
        writeln!(
            file,
            "id,latitude,longitude,altitude,climate_zone,annual_rainfall,temperature_min,temperature_max,soil_type,irrigation,flood_risk
{rows}"
        )
        .unwrap();
    }

    fn karawang_raw() -> RegionRaw {
        RegionRaw {
            id: "Karawang".into(),
            latitude: -6.3215,
            longitude: 107.302,
            altitude: 6.0,
            climate_zone: ClimateZone::TropicalLowland,
            annual_rainfall: 1600.0,
            temperature_min: 24.0,
            temperature_max: 33.0,
            soil_type: SoilType::Alluvial,
            irrigation: IrrigationQuality::Excellent,
            flood_risk: FloodRisk::Moderate,
        }
    }

    #[test]
    fn test_read_regions() {
        let dir = tempdir().unwrap();
        create_regions_file(
            dir.path(),
            "Karawang,-6.3215,107.3020,6,tropical_lowland,1600,24,33,alluvial,excellent,moderate
Bandung,-6.9175,107.6191,768,tropical_highland,2000,18,28,andosol,moderate,low",
        );
        let regions = read_regions(dir.path()).unwrap();
        assert_eq!(
            regions.keys().map(ToString::to_string).collect::<Vec<_>>(),
            ["Karawang", "Bandung"]
        );
        assert_eq!(
            regions["Karawang"],
            karawang_raw().into_profile().unwrap()
        );
        assert_eq!(regions["Bandung"].mean_temperature(), 23.0);
        assert_eq!(regions["Bandung"].irrigation, IrrigationQuality::Moderate);
    }

    #[test]
    fn test_read_regions_bad_enum() {
        let dir = tempdir().unwrap();
        create_regions_file(
            dir.path(),
            "Karawang,-6.3215,107.3020,6,tropical_lowland,1600,24,33,peat,excellent,moderate",
        );
        assert!(read_regions(dir.path()).is_err());
    }

    #[test]
    fn test_into_profile_invalid() {
        let mut raw = karawang_raw();
        raw.temperature_min = 35.0;
        assert!(matches!(
            raw.into_profile(),
            Err(SuitabilityError::DataIntegrity { table: "regions", .. })
        ));

        let mut raw = karawang_raw();
        raw.latitude = 95.0;
        assert!(raw.into_profile().is_err());

        let mut raw = karawang_raw();
        raw.annual_rainfall = -1.0;
        assert!(raw.into_profile().is_err());
    }

    #[test]
    fn test_read_regions_error_is_data_integrity() {
        let dir = tempdir().unwrap();
        create_regions_file(
            dir.path(),
            "Karawang,-6.3215,107.3020,6,tropical_lowland,1600,34,24,alluvial,excellent,moderate",
        );
        let err = read_regions(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SuitabilityError>(),
            Some(SuitabilityError::DataIntegrity { .. })
        ));
    }
}
