//! Regions represent the regencies for which crop suitability is evaluated.
use crate::error::{EngineResult, SuitabilityError};
use crate::id::{define_id_getter, define_id_type};
use crate::range::ValueRange;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use unicase::UniCase;

define_id_type! {RegionID}

/// A map of [`RegionProfile`]s, keyed by region ID.
///
/// Iteration follows the order of the input file, which is also the tie-break order when
/// ranking regions.
pub type RegionMap = IndexMap<RegionID, RegionProfile>;

/// The physical and agronomic characteristics of a region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionProfile {
    /// The regency name (e.g. "Bandung")
    #[serde(skip)]
    pub id: RegionID,
    /// Location of the regency seat
    pub coordinates: Coordinates,
    /// Altitude (m above sea level)
    pub altitude: f64,
    /// Climate zone classification
    pub climate_zone: ClimateZone,
    /// Annual rainfall (mm)
    pub annual_rainfall: f64,
    /// Typical daily temperature range (°C)
    pub temperature_range: ValueRange,
    /// Dominant soil type
    pub soil_type: SoilType,
    /// Quality of access to irrigation
    pub irrigation: IrrigationQuality,
    /// Risk of flooding
    pub flood_risk: FloodRisk,
}
define_id_getter! {RegionProfile, RegionID}

impl RegionProfile {
    /// The mean of the region's temperature range
    pub fn mean_temperature(&self) -> f64 {
        self.temperature_range.mean()
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display)]
#[display("({latitude}, {longitude})")]
pub struct Coordinates {
    /// Latitude (degrees, positive north)
    pub latitude: f64,
    /// Longitude (degrees, positive east)
    pub longitude: f64,
}

impl Coordinates {
    /// Create new coordinates, checking they lie on the globe
    pub fn new(latitude: f64, longitude: f64) -> EngineResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SuitabilityError::InvalidInput(format!(
                "Latitude must be between -90 and 90 (got {latitude})"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SuitabilityError::InvalidInput(format!(
                "Longitude must be between -180 and 180 (got {longitude})"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Straight-line distance to `other`, in degrees
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        (self.latitude - other.latitude).hypot(self.longitude - other.longitude)
    }
}

impl Serialize for Coordinates {
    fn serialize<S>(&self, serialiser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.latitude, self.longitude).serialize(serialiser)
    }
}

/// Climate zone classification
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
pub enum ClimateZone {
    #[string = "tropical_lowland"]
    TropicalLowland,
    #[string = "tropical_highland"]
    TropicalHighland,
    #[string = "tropical_transition"]
    TropicalTransition,
    #[string = "tropical_coastal"]
    TropicalCoastal,
}

/// Dominant soil type
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
pub enum SoilType {
    #[string = "alluvial"]
    Alluvial,
    #[string = "andosol"]
    Andosol,
    #[string = "latosol"]
    Latosol,
    #[string = "regosol"]
    Regosol,
    #[string = "grumusol"]
    Grumusol,
    #[string = "podzolic"]
    Podzolic,
}

/// Quality of a region's access to irrigation
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
)]
pub enum IrrigationQuality {
    #[string = "excellent"]
    Excellent,
    #[string = "good"]
    Good,
    #[string = "moderate"]
    Moderate,
    #[string = "poor"]
    Poor,
}

impl IrrigationQuality {
    /// Contribution of irrigation access to the hydrologic score
    pub fn score(self) -> f64 {
        match self {
            Self::Excellent => 1.0,
            Self::Good => 0.8,
            Self::Moderate => 0.6,
            Self::Poor => 0.3,
        }
    }
}

/// Risk of flooding in a region
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
)]
pub enum FloodRisk {
    #[string = "low"]
    Low,
    #[string = "moderate"]
    Moderate,
    #[string = "high"]
    High,
}

impl FloodRisk {
    /// Contribution of flood risk to the hydrologic score (lower risk scores higher)
    pub fn score(self) -> f64 {
        match self {
            Self::Low => 0.9,
            Self::Moderate => 0.7,
            Self::High => 0.4,
        }
    }
}

/// Look up a region by name.
///
/// An exact match is preferred; otherwise names are compared case-insensitively.
pub fn find_region<'a>(regions: &'a RegionMap, name: &str) -> EngineResult<&'a RegionProfile> {
    if let Some(region) = regions.get(name) {
        return Ok(region);
    }

    let wanted = UniCase::new(name.trim());
    regions
        .values()
        .find(|region| UniCase::new(&*region.id.0) == wanted)
        .ok_or_else(|| SuitabilityError::region_not_found(name))
}

/// Find the region closest to the given coordinates.
///
/// If two regions are equally close, the one listed first wins. Returns `None` if there are no
/// regions.
pub fn nearest_region<'a>(
    regions: &'a RegionMap,
    location: &Coordinates,
) -> Option<&'a RegionProfile> {
    regions.values().min_by(|a, b| {
        let dist_a = a.coordinates.distance_to(location);
        let dist_b = b.coordinates.distance_to(location);
        dist_a.total_cmp(&dist_b)
    })
}
