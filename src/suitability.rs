//! Evaluating how well a crop suits a region.
//!
//! The overall score is a weighted sum of the edaphic, hydrologic and atmospheric category
//! scores, which is then mapped onto a [`SuitabilityClass`].
use crate::crop::{Crop, CropID};
use crate::dataset::ReferenceData;
use crate::error::EngineResult;
use crate::region::{RegionID, RegionProfile};
use log::debug;
use serde::{Serialize, Serializer};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

pub mod category;
use category::DetailedScores;
pub mod portfolio;

/// Weights given to each category when computing the overall score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct CategoryWeights {
    pub edaphic: f64,
    pub hydrologic: f64,
    pub atmospheric: f64,
}

/// The category weights used for every evaluation
pub const CATEGORY_WEIGHTS: CategoryWeights = CategoryWeights {
    edaphic: 0.4,
    hydrologic: 0.35,
    atmospheric: 0.25,
};

/// Number of decimal places kept when scores are written out
pub const SCORE_DECIMAL_PLACES: usize = 3;

/// Round a score for output.
///
/// Rounds the exact binary value, so 0.5475 (stored as 0.54749999...) becomes 0.547. This agrees
/// with `{:.3}` formatting.
pub fn round_score(score: f64) -> f64 {
    format!("{score:.places$}", places = SCORE_DECIMAL_PLACES)
        .parse()
        .unwrap_or(score)
}

fn serialise_rounded<S>(score: &f64, serialiser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serialiser.serialize_f64(round_score(*score))
}

/// Suitability classes, from best to worst
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
    strum::EnumIter,
)]
pub enum SuitabilityClass {
    #[string = "Highly Suitable"]
    HighlySuitable,
    #[string = "Moderately Suitable"]
    ModeratelySuitable,
    #[string = "Marginally Suitable"]
    MarginallySuitable,
    #[string = "Not Suitable"]
    NotSuitable,
}

impl SuitabilityClass {
    /// The lowest overall score which falls into this class
    pub fn min_score(self) -> f64 {
        match self {
            Self::HighlySuitable => 0.8,
            Self::ModeratelySuitable => 0.6,
            Self::MarginallySuitable => 0.4,
            Self::NotSuitable => 0.0,
        }
    }

    /// Classify an overall score. Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::HighlySuitable.min_score() {
            Self::HighlySuitable
        } else if score >= Self::ModeratelySuitable.min_score() {
            Self::ModeratelySuitable
        } else if score >= Self::MarginallySuitable.min_score() {
            Self::MarginallySuitable
        } else {
            Self::NotSuitable
        }
    }

    /// Fill colour for choropleth maps
    pub fn map_colour(self) -> &'static str {
        match self {
            Self::HighlySuitable => "#006837",
            Self::ModeratelySuitable => "#31a354",
            Self::MarginallySuitable => "#78c679",
            Self::NotSuitable => "#c2e699",
        }
    }
}

/// The score for each category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct CategoryScores {
    #[serde(serialize_with = "serialise_rounded")]
    pub edaphic: f64,
    #[serde(serialize_with = "serialise_rounded")]
    pub hydrologic: f64,
    #[serde(serialize_with = "serialise_rounded")]
    pub atmospheric: f64,
}

impl CategoryScores {
    /// The weighted overall score
    pub fn overall(&self, weights: &CategoryWeights) -> f64 {
        self.edaphic * weights.edaphic
            + self.hydrologic * weights.hydrologic
            + self.atmospheric * weights.atmospheric
    }
}

/// The suitability of one crop in one region.
///
/// Scores are held at full precision; they are rounded only when serialised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuitabilityResult {
    /// The region evaluated
    pub region: RegionID,
    /// The crop evaluated
    pub crop: CropID,
    /// Weighted sum of the category scores
    #[serde(serialize_with = "serialise_rounded")]
    pub overall_score: f64,
    /// Class of the overall score
    pub suitability_class: SuitabilityClass,
    /// Score for each category
    pub category_scores: CategoryScores,
    /// The sub-scores behind each category score
    pub detailed_scores: DetailedScores,
    /// The region profile the scores were computed from
    pub region_characteristics: RegionProfile,
}

/// Evaluate how well `crop` suits `region`
pub fn evaluate_crop_in_region(
    crop: &Crop,
    region: &RegionProfile,
) -> EngineResult<SuitabilityResult> {
    let detailed_scores = DetailedScores::evaluate(crop, region)?;
    let category_scores = CategoryScores {
        edaphic: detailed_scores.edaphic.score(),
        hydrologic: detailed_scores.hydrologic.score(),
        atmospheric: detailed_scores.atmospheric.score(),
    };
    let overall_score = category_scores.overall(&CATEGORY_WEIGHTS);
    let suitability_class = SuitabilityClass::from_score(overall_score);
    debug!(
        "{} in {}: overall {overall_score:.3} ({suitability_class})",
        crop.id, region.id
    );

    Ok(SuitabilityResult {
        region: region.id.clone(),
        crop: crop.id.clone(),
        overall_score,
        suitability_class,
        category_scores,
        detailed_scores,
        region_characteristics: region.clone(),
    })
}

/// Evaluate a crop in a region, looking both up by name.
///
/// # Arguments
///
/// * `data` - Reference data
/// * `crop_id` - ID of the crop (e.g. "corn")
/// * `region_name` - Name of the region (e.g. "Karawang")
///
/// # Returns
///
/// The result, or a [`crate::error::SuitabilityError::NotFound`] naming whichever lookup failed
pub fn evaluate(
    data: &ReferenceData,
    crop_id: &str,
    region_name: &str,
) -> EngineResult<SuitabilityResult> {
    let crop = data.crop(crop_id)?;
    let region = data.region(region_name)?;
    evaluate_crop_in_region(crop, region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SuitabilityError;
    use crate::fixture::{assert_engine_error, reference_data};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(1.0, SuitabilityClass::HighlySuitable)]
    #[case(0.8, SuitabilityClass::HighlySuitable)]
    #[case(0.79999, SuitabilityClass::ModeratelySuitable)]
    #[case(0.6, SuitabilityClass::ModeratelySuitable)]
    #[case(0.4, SuitabilityClass::MarginallySuitable)]
    #[case(0.39999, SuitabilityClass::NotSuitable)]
    #[case(0.0, SuitabilityClass::NotSuitable)]
    fn test_from_score(#[case] score: f64, #[case] expected: SuitabilityClass) {
        assert_eq!(SuitabilityClass::from_score(score), expected);
    }

    #[test]
    fn test_class_labels() {
        let labels: Vec<_> = SuitabilityClass::iter().map(|c| c.to_string()).collect();
        assert_eq!(
            labels,
            [
                "Highly Suitable",
                "Moderately Suitable",
                "Marginally Suitable",
                "Not Suitable"
            ]
        );
        assert_eq!(
            serde_json::to_value(SuitabilityClass::NotSuitable).unwrap(),
            "Not Suitable"
        );
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.839_082), 0.839);
        assert_eq!(round_score(0.757_694), 0.758);
        assert_eq!(round_score(1.0), 1.0);

        // Values just below a half are not rounded up
        assert_eq!(round_score(0.5475), 0.547);
        assert_eq!(round_score(0.7915), 0.791);
        assert_eq!(format!("{:.3}", 0.5475), round_score(0.5475).to_string());
    }

    #[rstest]
    fn test_result_serialise_rounds_like_display(reference_data: ReferenceData) {
        let result = evaluate(&reference_data, "corn", "Kuningan").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["category_scores"]["hydrologic"], 0.547);

        let result = evaluate(&reference_data, "cassava", "Bekasi").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["overall_score"], 0.791);
        assert_eq!(format!("{:.3}", result.overall_score), "0.791");
    }

    #[rstest]
    fn test_evaluate_corn_karawang(reference_data: ReferenceData) {
        let result = evaluate(&reference_data, "corn", "Karawang").unwrap();
        assert_eq!(&*result.region.0, "Karawang");
        assert_eq!(&*result.crop.0, "corn");
        assert_approx_eq!(f64, result.category_scores.edaphic, 0.96, epsilon = 1e-9);
        assert_approx_eq!(f64, result.category_scores.hydrologic, 0.662222, epsilon = 1e-6);
        assert_approx_eq!(f64, result.category_scores.atmospheric, 0.893214, epsilon = 1e-6);
        assert_approx_eq!(f64, result.overall_score, 0.839081, epsilon = 1e-6);
        assert_eq!(result.suitability_class, SuitabilityClass::HighlySuitable);
    }

    #[rstest]
    fn test_evaluate_cassava_pangandaran(reference_data: ReferenceData) {
        let result = evaluate(&reference_data, "cassava", "Pangandaran").unwrap();
        assert_approx_eq!(f64, result.category_scores.edaphic, 0.96, epsilon = 1e-9);
        assert_eq!(result.detailed_scores.hydrologic.irrigation_access, 0.3);
        assert!(result.category_scores.hydrologic < 0.5);
        assert_approx_eq!(f64, result.category_scores.atmospheric, 0.92, epsilon = 1e-9);
        assert_approx_eq!(f64, result.overall_score, 0.757694, epsilon = 1e-6);
        assert_eq!(result.suitability_class, SuitabilityClass::ModeratelySuitable);
    }

    #[rstest]
    fn test_evaluate_corn_bandung(reference_data: ReferenceData) {
        let result = evaluate(&reference_data, "corn", "bandung").unwrap();
        assert_eq!(&*result.region.0, "Bandung");
        assert_approx_eq!(f64, result.category_scores.edaphic, 0.92, epsilon = 1e-9);
        assert_approx_eq!(f64, result.category_scores.hydrologic, 0.512778, epsilon = 1e-6);
        assert_approx_eq!(f64, result.category_scores.atmospheric, 0.8175, epsilon = 1e-9);
        assert_approx_eq!(f64, result.overall_score, 0.751847, epsilon = 1e-6);
    }

    #[rstest]
    fn test_evaluate_unknown(reference_data: ReferenceData) {
        assert_engine_error!(
            evaluate(&reference_data, "wheat", "Bandung"),
            SuitabilityError::crop_not_found("wheat")
        );
        assert_engine_error!(
            evaluate(&reference_data, "corn", "Jakarta"),
            SuitabilityError::region_not_found("Jakarta")
        );
    }

    #[rstest]
    fn test_overall_is_weighted_sum(reference_data: ReferenceData) {
        for crop in reference_data.crops.values() {
            for region in reference_data.regions.values() {
                let result = evaluate_crop_in_region(crop, region).unwrap();
                let scores = &result.category_scores;
                let expected =
                    0.4 * scores.edaphic + 0.35 * scores.hydrologic + 0.25 * scores.atmospheric;
                assert_approx_eq!(f64, result.overall_score, expected, epsilon = 1e-9);
                assert!((0.0..=1.0).contains(&result.overall_score));
                assert_eq!(
                    result.suitability_class,
                    SuitabilityClass::from_score(result.overall_score)
                );
            }
        }
    }

    #[rstest]
    fn test_evaluate_is_deterministic(reference_data: ReferenceData) {
        let first = evaluate(&reference_data, "cassava", "Garut").unwrap();
        let second = evaluate(&reference_data, "cassava", "Garut").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.overall_score.to_bits(), second.overall_score.to_bits());
    }

    #[rstest]
    fn test_result_serialise(reference_data: ReferenceData) {
        let result = evaluate(&reference_data, "corn", "Karawang").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["region"], "Karawang");
        assert_eq!(json["crop"], "corn");
        assert_eq!(json["overall_score"], 0.839);
        assert_eq!(json["suitability_class"], "Highly Suitable");
        assert_eq!(json["category_scores"]["hydrologic"], 0.662);
        assert_eq!(json["detailed_scores"]["edaphic"]["soil_type_compatibility"], 0.9);
        assert_eq!(json["region_characteristics"]["soil_type"], "alluvial");
    }
}
