//! Traditional planting practices and known risks, grouped into zones of regencies.
use crate::crop::CropID;
use crate::region::RegionID;
use serde::Serialize;

/// Local knowledge about growing a crop in a group of regions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeZone {
    /// The crop this zone applies to
    pub crop: CropID,
    /// Name of the zone (e.g. "northern_coast")
    pub zone: String,
    /// Regions belonging to the zone
    pub regions: Vec<RegionID>,
    /// Traditional planting practices
    pub practices: Vec<String>,
    /// Common pests and diseases
    pub pest_risks: Vec<String>,
    /// Climate-related threats
    pub climate_threats: Vec<String>,
}

impl PracticeZone {
    /// Whether the zone applies to the given crop and region
    pub fn covers(&self, crop_id: &CropID, region_id: &RegionID) -> bool {
        &self.crop == crop_id && self.regions.contains(region_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers() {
        let zone = PracticeZone {
            crop: "corn".into(),
            zone: "highlands".into(),
            regions: vec!["Bandung".into(), "Garut".into()],
            practices: vec![],
            pest_risks: vec![],
            climate_threats: vec![],
        };

        assert!(zone.covers(&"corn".into(), &"Garut".into()));
        assert!(!zone.covers(&"cassava".into(), &"Garut".into()));
        assert!(!zone.covers(&"corn".into(), &"Bogor".into()));
    }
}
