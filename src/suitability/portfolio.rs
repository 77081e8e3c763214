//! Analyses over many evaluations: ranking regions for a crop, ranking crops for a region and
//! finding the region nearest a location.
use super::{SuitabilityResult, evaluate_crop_in_region};
use crate::crop::CropSummary;
use crate::dataset::ReferenceData;
use crate::error::{EngineResult, SuitabilityError};
use crate::practice::PracticeZone;
use crate::region::{Coordinates, RegionProfile, nearest_region};

/// Sort results by overall score, best first.
///
/// The sort is stable, so results with equal scores keep their input order.
pub fn sort_by_score(results: &mut [SuitabilityResult]) {
    results.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
}

/// Evaluate a crop in every region, best first.
///
/// Regions with equal scores are listed in dataset order.
pub fn analyze_all_regions(
    data: &ReferenceData,
    crop_id: &str,
) -> EngineResult<Vec<SuitabilityResult>> {
    let crop = data.crop(crop_id)?;
    let mut results = data
        .regions
        .values()
        .map(|region| evaluate_crop_in_region(crop, region))
        .collect::<EngineResult<Vec<_>>>()?;
    sort_by_score(&mut results);

    Ok(results)
}

/// Evaluate every crop in a region, best first
pub fn rank_crops(data: &ReferenceData, region_name: &str) -> EngineResult<Vec<SuitabilityResult>> {
    let region = data.region(region_name)?;
    let mut results = data
        .crops
        .values()
        .map(|crop| evaluate_crop_in_region(crop, region))
        .collect::<EngineResult<Vec<_>>>()?;
    sort_by_score(&mut results);

    Ok(results)
}

/// A human-readable summary of a crop's requirements
pub fn crop_summary(data: &ReferenceData, crop_id: &str) -> EngineResult<CropSummary> {
    Ok(data.crop(crop_id)?.summary())
}

/// The practice zones for a crop which include the given region
pub fn practices_for<'a>(
    data: &'a ReferenceData,
    crop_id: &str,
    region_name: &str,
) -> EngineResult<Vec<&'a PracticeZone>> {
    let crop = data.crop(crop_id)?;
    let region = data.region(region_name)?;

    Ok(data
        .practices
        .iter()
        .filter(|zone| zone.covers(&crop.id, &region.id))
        .collect())
}

/// The region closest to the given latitude and longitude
pub fn locate(data: &ReferenceData, latitude: f64, longitude: f64) -> EngineResult<&RegionProfile> {
    let location = Coordinates::new(latitude, longitude)?;
    nearest_region(&data.regions, &location).ok_or_else(|| {
        SuitabilityError::data_integrity("regions", "no regions to search")
    })
}

/// Evaluate a crop in the region closest to the given location
pub fn evaluate_at(
    data: &ReferenceData,
    crop_id: &str,
    latitude: f64,
    longitude: f64,
) -> EngineResult<SuitabilityResult> {
    let crop = data.crop(crop_id)?;
    let region = locate(data, latitude, longitude)?;
    evaluate_crop_in_region(crop, region)
}
