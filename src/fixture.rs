//! Fixtures for tests

use crate::crop::{
    AtmosphericRequirements, CompatibilityTable, Crop, Drainage, EdaphicRequirements,
    FloodTolerance, HydrologicRequirements, IrrigationNeed, SoilTexture, ToleranceLevel,
};
use crate::dataset::ReferenceData;
use crate::range::ValueRange;
use crate::region::{ClimateZone, RegionMap, SoilType};
use map_macro::hash_map;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Assert that an engine operation fails with the given [`crate::error::SuitabilityError`]
macro_rules! assert_engine_error {
    ($result:expr, $expected:expr) => {
        assert_eq!($result.unwrap_err(), $expected);
    };
}
pub(crate) use assert_engine_error;

fn range(min: f64, max: f64) -> ValueRange {
    ValueRange::new(min, max).unwrap()
}

/// Corn, as described in the bundled West Java dataset
#[fixture]
pub fn corn() -> Crop {
    Crop {
        id: "corn".into(),
        name: "Corn".into(),
        scientific_name: "Zea mays".into(),
        edaphic: EdaphicRequirements {
            soil_textures: vec![SoilTexture::SandyLoam, SoilTexture::Loam, SoilTexture::ClayLoam],
            ph: range(5.8, 7.0),
            organic_matter: range(2.5, 4.0),
            drainage: Drainage::WellDrained,
            min_soil_depth: 60.0,
            cec: range(15.0, 25.0),
            nitrogen: range(0.12, 0.20),
            phosphorus: range(0.10, 0.18),
            potassium: range(0.18, 0.28),
        },
        hydrologic: HydrologicRequirements {
            annual_rainfall: range(600.0, 1200.0),
            growing_season_rainfall: range(400.0, 800.0),
            water_table_depth: range(50.0, 150.0),
            flood_tolerance: FloodTolerance::LowToModerate,
            irrigation_access: IrrigationNeed::Beneficial,
            drought_tolerance: ToleranceLevel::Moderate,
            water_quality_ec: range(0.25, 0.75),
        },
        atmospheric: AtmosphericRequirements {
            temperature: range(20.0, 30.0),
            optimal_temperature: range(24.0, 28.0),
            humidity: range(60.0, 75.0),
            solar_radiation: range(18.0, 25.0),
            photoperiod: range(11.0, 13.0),
            wind_tolerance: ToleranceLevel::Moderate,
            altitude: range(0.0, 1500.0),
        },
        soil_compatibility: CompatibilityTable::new(hash_map! {
            SoilType::Alluvial => 0.9,
            SoilType::Andosol => 0.8,
            SoilType::Latosol => 0.7,
            SoilType::Regosol => 0.6,
        }),
        climate_compatibility: CompatibilityTable::new(hash_map! {
            ClimateZone::TropicalLowland => 0.8,
            ClimateZone::TropicalTransition => 0.9,
            ClimateZone::TropicalHighland => 0.7,
            ClimateZone::TropicalCoastal => 0.7,
        }),
    }
}

/// The bundled West Java dataset
#[fixture]
pub fn reference_data() -> ReferenceData {
    ReferenceData::west_java().unwrap()
}

/// The regions of the bundled West Java dataset
#[fixture]
pub fn regions(reference_data: ReferenceData) -> RegionMap {
    reference_data.regions
}
