//! Category scores: edaphic, hydrologic and atmospheric.
//!
//! Each category combines a few sub-scores with fixed weights. The sub-scores are kept so that
//! results can show what drove a category score.
//!
//! Note that the edaphic score is built from the region's mean temperature and altitude scored
//! against the crop's climate requirements, plus soil-type compatibility. The crop's pH,
//! organic-matter and nutrient requirements appear only in crop summaries, as regions carry no
//! soil chemistry data.
use crate::crop::Crop;
use crate::error::EngineResult;
use crate::range::{DEFAULT_TOLERANCE, parameter_score};
use crate::region::RegionProfile;
use serde::Serialize;

const EDAPHIC_TEMPERATURE_WEIGHT: f64 = 0.3;
const EDAPHIC_SOIL_WEIGHT: f64 = 0.4;
const EDAPHIC_ALTITUDE_WEIGHT: f64 = 0.3;

const HYDROLOGIC_RAINFALL_WEIGHT: f64 = 0.5;
const HYDROLOGIC_IRRIGATION_WEIGHT: f64 = 0.3;
const HYDROLOGIC_FLOOD_WEIGHT: f64 = 0.2;

const ATMOSPHERIC_TEMPERATURE_WEIGHT: f64 = 0.6;
const ATMOSPHERIC_CLIMATE_WEIGHT: f64 = 0.4;

/// Sub-scores making up the edaphic (soil) score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdaphicScores {
    /// Region mean temperature against the crop's temperature range
    pub temperature_compatibility: f64,
    /// Crop's compatibility with the region's soil type
    pub soil_type_compatibility: f64,
    /// Region altitude against the crop's altitude range
    pub altitude_compatibility: f64,
}

impl EdaphicScores {
    /// Score the edaphic sub-parameters of `crop` in `region`
    pub fn evaluate(crop: &Crop, region: &RegionProfile) -> EngineResult<Self> {
        let atmospheric = &crop.atmospheric;
        Ok(Self {
            temperature_compatibility: parameter_score(
                region.mean_temperature(),
                &atmospheric.temperature,
                DEFAULT_TOLERANCE,
            )?,
            soil_type_compatibility: crop.soil_compatibility.score(region.soil_type),
            altitude_compatibility: parameter_score(
                region.altitude,
                &atmospheric.altitude,
                DEFAULT_TOLERANCE,
            )?,
        })
    }

    /// The weighted edaphic score
    pub fn score(&self) -> f64 {
        self.temperature_compatibility * EDAPHIC_TEMPERATURE_WEIGHT
            + self.soil_type_compatibility * EDAPHIC_SOIL_WEIGHT
            + self.altitude_compatibility * EDAPHIC_ALTITUDE_WEIGHT
    }
}

/// Sub-scores making up the hydrologic (water) score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HydrologicScores {
    /// Region annual rainfall against the crop's rainfall range
    pub rainfall_compatibility: f64,
    /// Quality of the region's irrigation access
    pub irrigation_access: f64,
    /// Inverse of the region's flood risk
    pub flood_risk_assessment: f64,
}

impl HydrologicScores {
    /// Score the hydrologic sub-parameters of `crop` in `region`
    pub fn evaluate(crop: &Crop, region: &RegionProfile) -> EngineResult<Self> {
        Ok(Self {
            rainfall_compatibility: parameter_score(
                region.annual_rainfall,
                &crop.hydrologic.annual_rainfall,
                DEFAULT_TOLERANCE,
            )?,
            irrigation_access: region.irrigation.score(),
            flood_risk_assessment: region.flood_risk.score(),
        })
    }

    /// The weighted hydrologic score
    pub fn score(&self) -> f64 {
        self.rainfall_compatibility * HYDROLOGIC_RAINFALL_WEIGHT
            + self.irrigation_access * HYDROLOGIC_IRRIGATION_WEIGHT
            + self.flood_risk_assessment * HYDROLOGIC_FLOOD_WEIGHT
    }
}

/// Sub-scores making up the atmospheric (climate) score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtmosphericScores {
    /// Region mean temperature against the crop's optimal temperature range
    pub temperature_optimal: f64,
    /// Crop's compatibility with the region's climate zone
    pub climate_zone_compatibility: f64,
}

impl AtmosphericScores {
    /// Score the atmospheric sub-parameters of `crop` in `region`
    pub fn evaluate(crop: &Crop, region: &RegionProfile) -> EngineResult<Self> {
        Ok(Self {
            temperature_optimal: parameter_score(
                region.mean_temperature(),
                &crop.atmospheric.optimal_temperature,
                DEFAULT_TOLERANCE,
            )?,
            climate_zone_compatibility: crop.climate_compatibility.score(region.climate_zone),
        })
    }

    /// The weighted atmospheric score
    pub fn score(&self) -> f64 {
        self.temperature_optimal * ATMOSPHERIC_TEMPERATURE_WEIGHT
            + self.climate_zone_compatibility * ATMOSPHERIC_CLIMATE_WEIGHT
    }
}

/// Sub-scores for all three categories
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct DetailedScores {
    pub edaphic: EdaphicScores,
    pub hydrologic: HydrologicScores,
    pub atmospheric: AtmosphericScores,
}

impl DetailedScores {
    /// Score every sub-parameter of `crop` in `region`
    pub fn evaluate(crop: &Crop, region: &RegionProfile) -> EngineResult<Self> {
        Ok(Self {
            edaphic: EdaphicScores::evaluate(crop, region)?,
            hydrologic: HydrologicScores::evaluate(crop, region)?,
            atmospheric: AtmosphericScores::evaluate(crop, region)?,
        })
    }
}
