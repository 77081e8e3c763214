//! End-to-end checks of suitability results against the bundled West Java dataset.
use agrisuit::dataset::ReferenceData;
use agrisuit::error::SuitabilityError;
use agrisuit::suitability::portfolio::{analyze_all_regions, rank_crops};
use agrisuit::suitability::{SuitabilityClass, evaluate};
use float_cmp::assert_approx_eq;

/// Corn in Karawang: mild temperatures on alluvial soil with excellent irrigation
#[test]
fn test_corn_in_karawang() {
    let data = ReferenceData::west_java().unwrap();
    let result = evaluate(&data, "corn", "Karawang").unwrap();

    assert_approx_eq!(f64, result.category_scores.edaphic, 0.96, epsilon = 1e-9);
    assert_approx_eq!(f64, result.category_scores.hydrologic, 0.662222, epsilon = 1e-6);
    assert_approx_eq!(f64, result.category_scores.atmospheric, 0.893214, epsilon = 1e-6);
    assert_approx_eq!(f64, result.overall_score, 0.839081, epsilon = 1e-6);
    assert_eq!(result.suitability_class, SuitabilityClass::HighlySuitable);
}

/// Cassava in Pangandaran: too wet, but well matched on soil and climate
#[test]
fn test_cassava_in_pangandaran() {
    let data = ReferenceData::west_java().unwrap();
    let result = evaluate(&data, "cassava", "Pangandaran").unwrap();

    assert_approx_eq!(f64, result.category_scores.edaphic, 0.96, epsilon = 1e-9);
    assert_approx_eq!(f64, result.category_scores.hydrologic, 0.410556, epsilon = 1e-6);
    assert_approx_eq!(f64, result.overall_score, 0.757694, epsilon = 1e-6);
    assert_eq!(result.suitability_class, SuitabilityClass::ModeratelySuitable);
}

/// Lookups are case-insensitive and unknown names are reported as not found
#[test]
fn test_lookups() {
    let data = ReferenceData::west_java().unwrap();
    assert_eq!(
        evaluate(&data, "Corn", "karawang").unwrap(),
        evaluate(&data, "corn", "Karawang").unwrap()
    );

    let err = evaluate(&data, "wheat", "Karawang").unwrap_err();
    assert_eq!(err, SuitabilityError::crop_not_found("wheat"));
    let err = evaluate(&data, "corn", "Jakarta").unwrap_err();
    assert_eq!(err, SuitabilityError::region_not_found("Jakarta"));
}

/// Karawang is the best region for corn, though cassava suits it better still
#[test]
fn test_rankings() {
    let data = ReferenceData::west_java().unwrap();
    let regions = analyze_all_regions(&data, "corn").unwrap();
    assert_eq!(regions.len(), 18);
    assert_eq!(&*regions[0].region.0, "Karawang");

    let crops = rank_crops(&data, "Karawang").unwrap();
    assert_eq!(crops.len(), 2);
    assert_eq!(&*crops[0].crop.0, "cassava");
    assert_eq!(&*crops[1].crop.0, "corn");
}
