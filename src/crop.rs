//! Crops and their growing requirements.
//!
//! Requirements are grouped into edaphic (soil), hydrologic (water) and atmospheric (climate)
//! categories. Only some of them feed into the suitability score; the rest are reported in crop
//! summaries.
use crate::id::{define_id_getter, define_id_type};
use crate::range::ValueRange;
use crate::region::{ClimateZone, SoilType};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::collections::HashMap;
use std::hash::Hash;

define_id_type! {CropID}

/// A map of [`Crop`]s, keyed by crop ID
pub type CropMap = IndexMap<CropID, Crop>;

/// The compatibility score used when a crop has no entry for a soil type or climate zone
pub const NEUTRAL_COMPATIBILITY: f64 = 0.5;

/// A crop with its growing requirements
#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    /// Unique identifier for the crop (e.g. "corn")
    pub id: CropID,
    /// Display name (e.g. "Corn")
    pub name: String,
    /// Scientific name (e.g. "Zea mays")
    pub scientific_name: String,
    /// Soil-related requirements
    pub edaphic: EdaphicRequirements,
    /// Water-related requirements
    pub hydrologic: HydrologicRequirements,
    /// Climate-related requirements
    pub atmospheric: AtmosphericRequirements,
    /// How well the crop grows on each soil type
    pub soil_compatibility: CompatibilityTable<SoilType>,
    /// How well the crop grows in each climate zone
    pub climate_compatibility: CompatibilityTable<ClimateZone>,
}
define_id_getter! {Crop, CropID}

/// Soil-related requirements
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EdaphicRequirements {
    /// Soil textures on which the crop grows well
    pub soil_textures: Vec<SoilTexture>,
    /// Optimal pH
    pub ph: ValueRange,
    /// Organic matter (% of soil mass)
    pub organic_matter: ValueRange,
    /// Drainage requirement
    pub drainage: Drainage,
    /// Minimum soil depth (cm)
    pub min_soil_depth: f64,
    /// Cation exchange capacity (cmol/kg)
    pub cec: ValueRange,
    /// Nitrogen content (% of soil mass)
    pub nitrogen: ValueRange,
    /// Phosphorus content (% of soil mass)
    pub phosphorus: ValueRange,
    /// Potassium content (% of soil mass)
    pub potassium: ValueRange,
}

/// Water-related requirements
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HydrologicRequirements {
    /// Annual rainfall (mm)
    pub annual_rainfall: ValueRange,
    /// Rainfall over the growing season (mm)
    pub growing_season_rainfall: ValueRange,
    /// Depth to the water table (cm)
    pub water_table_depth: ValueRange,
    /// How much flooding the crop tolerates
    pub flood_tolerance: FloodTolerance,
    /// How much the crop relies on irrigation
    #[serde(default)]
    pub irrigation_access: IrrigationNeed,
    /// How well the crop survives dry spells
    #[serde(default)]
    pub drought_tolerance: ToleranceLevel,
    /// Electrical conductivity of irrigation water (dS/m)
    pub water_quality_ec: ValueRange,
}

/// Climate-related requirements
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AtmosphericRequirements {
    /// Temperatures the crop tolerates (°C)
    pub temperature: ValueRange,
    /// Temperatures at which the crop grows best (°C)
    pub optimal_temperature: ValueRange,
    /// Relative humidity (%)
    pub humidity: ValueRange,
    /// Solar radiation (MJ/m²/day)
    pub solar_radiation: ValueRange,
    /// Day length (hours)
    pub photoperiod: ValueRange,
    /// How much wind the crop tolerates
    pub wind_tolerance: ToleranceLevel,
    /// Altitude (m above sea level)
    pub altitude: ValueRange,
}

/// Soil texture classes
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
)]
pub enum SoilTexture {
    #[string = "sandy"]
    Sandy,
    #[string = "loamy_sand"]
    LoamySand,
    #[string = "sandy_loam"]
    SandyLoam,
    #[string = "loam"]
    Loam,
    #[string = "silt_loam"]
    SiltLoam,
    #[string = "clay_loam"]
    ClayLoam,
    #[string = "clay"]
    Clay,
}

/// Soil drainage classes
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
)]
pub enum Drainage {
    #[string = "poorly_drained"]
    PoorlyDrained,
    #[string = "moderately_well_drained"]
    ModeratelyWellDrained,
    #[string = "well_drained"]
    WellDrained,
    #[string = "well_drained_to_excessive"]
    WellDrainedToExcessive,
    #[string = "excessive"]
    Excessive,
}

/// How much flooding a crop tolerates
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
)]
pub enum FloodTolerance {
    #[string = "low"]
    Low,
    #[string = "low_to_moderate"]
    LowToModerate,
    #[string = "moderate"]
    Moderate,
    #[string = "high"]
    High,
}

/// How much a crop relies on irrigation
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
)]
pub enum IrrigationNeed {
    #[string = "required"]
    Required,
    #[default]
    #[string = "beneficial"]
    Beneficial,
    #[string = "not_required"]
    NotRequired,
}

/// A generic low/moderate/high tolerance level (e.g. for drought or wind)
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
)]
pub enum ToleranceLevel {
    #[string = "low"]
    Low,
    #[default]
    #[string = "moderate"]
    Moderate,
    #[string = "high"]
    High,
}

/// A per-crop lookup from a categorical region attribute to a compatibility score in [0, 1].
///
/// Keys missing from the table score [`NEUTRAL_COMPATIBILITY`] rather than failing, as regional
/// data is often incomplete.
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityTable<K: Eq + Hash>(HashMap<K, f64>);

impl<K: Eq + Hash> Default for CompatibilityTable<K> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<K> CompatibilityTable<K>
where
    K: Eq + Hash + Copy + std::fmt::Display,
{
    /// Create a table from a map of scores
    pub fn new(scores: HashMap<K, f64>) -> Self {
        Self(scores)
    }

    /// The compatibility score for `key`, falling back to [`NEUTRAL_COMPATIBILITY`]
    pub fn score(&self, key: K) -> f64 {
        if let Some(score) = self.0.get(&key) {
            *score
        } else {
            debug!("No compatibility entry for {key}; using {NEUTRAL_COMPATIBILITY}");
            NEUTRAL_COMPATIBILITY
        }
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the entries in the table
    pub fn iter(&self) -> impl Iterator<Item = (&K, &f64)> {
        self.0.iter()
    }
}

/// A human-readable summary of a crop's requirements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropSummary {
    /// Display name
    pub crop_name: String,
    /// Scientific name
    pub scientific_name: String,
    /// Requirements grouped by category
    pub requirements_summary: RequirementsSummary,
}

/// Requirement summaries grouped by category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct RequirementsSummary {
    pub edaphic: EdaphicSummary,
    pub hydrologic: HydrologicSummary,
    pub atmospheric: AtmosphericSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct EdaphicSummary {
    pub soil_types: Vec<SoilTexture>,
    pub ph_range: String,
    pub organic_matter: String,
    pub drainage: Drainage,
    pub nutrients: NutrientSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct NutrientSummary {
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct HydrologicSummary {
    pub annual_rainfall: String,
    pub water_table: String,
    pub irrigation: IrrigationNeed,
    pub drought_tolerance: ToleranceLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct AtmosphericSummary {
    pub temperature: String,
    pub optimal_temperature: String,
    pub humidity: String,
    pub altitude: String,
    pub solar_radiation: String,
}

/// Format a range with a unit after each bound (e.g. "20°C - 30°C")
fn format_bounds(range: &ValueRange, unit: &str) -> String {
    format!("{}{unit} - {}{unit}", range.min(), range.max())
}

/// Format a range with a trailing unit (e.g. "600 - 1200 mm")
fn format_span(range: &ValueRange, unit: &str) -> String {
    format!("{range} {unit}")
}

impl Crop {
    /// Summarise the crop's requirements for display
    pub fn summary(&self) -> CropSummary {
        let (edaphic, hydrologic, atmospheric) = (&self.edaphic, &self.hydrologic, &self.atmospheric);

        CropSummary {
            crop_name: self.name.clone(),
            scientific_name: self.scientific_name.clone(),
            requirements_summary: RequirementsSummary {
                edaphic: EdaphicSummary {
                    soil_types: edaphic.soil_textures.clone(),
                    ph_range: edaphic.ph.to_string(),
                    organic_matter: format_bounds(&edaphic.organic_matter, "%"),
                    drainage: edaphic.drainage,
                    nutrients: NutrientSummary {
                        nitrogen: format_bounds(&edaphic.nitrogen, "%"),
                        phosphorus: format_bounds(&edaphic.phosphorus, "%"),
                        potassium: format_bounds(&edaphic.potassium, "%"),
                    },
                },
                hydrologic: HydrologicSummary {
                    annual_rainfall: format_span(&hydrologic.annual_rainfall, "mm"),
                    water_table: format_span(&hydrologic.water_table_depth, "cm depth"),
                    irrigation: hydrologic.irrigation_access,
                    drought_tolerance: hydrologic.drought_tolerance,
                },
                atmospheric: AtmosphericSummary {
                    temperature: format_bounds(&atmospheric.temperature, "°C"),
                    optimal_temperature: format_bounds(&atmospheric.optimal_temperature, "°C"),
                    humidity: format_bounds(&atmospheric.humidity, "%"),
                    altitude: format_span(&atmospheric.altitude, "meters"),
                    solar_radiation: format_span(&atmospheric.solar_radiation, "MJ/m²/day"),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::corn;
    use map_macro::hash_map;
    use rstest::rstest;

    #[test]
    fn test_compatibility_table_score() {
        let table = CompatibilityTable::new(hash_map! {
            SoilType::Alluvial => 0.9,
            SoilType::Regosol => 0.6,
        });
        assert_eq!(table.score(SoilType::Alluvial), 0.9);
        assert_eq!(table.score(SoilType::Regosol), 0.6);
        assert_eq!(table.score(SoilType::Grumusol), NEUTRAL_COMPATIBILITY);
    }

    #[rstest]
    fn test_crop_summary(corn: Crop) {
        let summary = corn.summary();
        assert_eq!(summary.crop_name, "Corn");
        assert_eq!(summary.scientific_name, "Zea mays");

        let requirements = &summary.requirements_summary;
        assert_eq!(requirements.edaphic.ph_range, "5.8 - 7");
        assert_eq!(requirements.edaphic.organic_matter, "2.5% - 4%");
        assert_eq!(requirements.edaphic.nutrients.nitrogen, "0.12% - 0.2%");
        assert_eq!(requirements.hydrologic.annual_rainfall, "600 - 1200 mm");
        assert_eq!(requirements.hydrologic.water_table, "50 - 150 cm depth");
        assert_eq!(requirements.hydrologic.drought_tolerance, ToleranceLevel::Moderate);
        assert_eq!(requirements.atmospheric.temperature, "20°C - 30°C");
        assert_eq!(requirements.atmospheric.altitude, "0 - 1500 meters");
    }

    #[rstest]
    fn test_crop_summary_serialise(corn: Crop) {
        let json = serde_json::to_value(corn.summary()).unwrap();
        assert_eq!(
            json["requirements_summary"]["edaphic"]["soil_types"],
            serde_json::json!(["sandy_loam", "loam", "clay_loam"])
        );
        assert_eq!(
            json["requirements_summary"]["hydrologic"]["irrigation"],
            "beneficial"
        );
    }
}
