//! The comprehensive suitability report: crop summaries and regional rankings for every crop.
use crate::crop::{CropID, CropSummary};
use crate::dataset::ReferenceData;
use crate::error::EngineResult;
use crate::practice::PracticeZone;
use crate::region::RegionID;
use crate::suitability::portfolio::analyze_all_regions;
use crate::suitability::{CATEGORY_WEIGHTS, CategoryWeights, SuitabilityResult};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

/// The area covered by the report
pub const REPORT_REGION: &str = "West Java, Indonesia";

/// A report on the suitability of every crop in every region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// The date of the analysis, as `YYYY-MM-DD`
    pub analysis_date: String,
    /// The area covered
    pub region: &'static str,
    /// IDs of the crops analysed, in dataset order
    pub crops_analyzed: Vec<CropID>,
    /// Requirement summaries for each crop
    pub crop_summaries: IndexMap<CropID, CropSummary>,
    /// Results for each crop, best region first
    pub regional_analysis: IndexMap<CropID, Vec<SuitabilityResult>>,
    /// How the scores were computed
    pub methodology: Methodology,
}

/// A description of the scoring method
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct Methodology {
    pub parameters: [&'static str; 3],
    pub scoring_system: &'static str,
    pub weights: CategoryWeights,
}

impl Default for Methodology {
    fn default() -> Self {
        Self {
            parameters: ["edaphic", "hydrologic", "atmospheric"],
            scoring_system: "0-1 scale with weighted categories",
            weights: CATEGORY_WEIGHTS,
        }
    }
}

/// Generate the report for every crop in the reference data
pub fn generate_report(data: &ReferenceData, analysis_date: NaiveDate) -> EngineResult<Report> {
    let mut crop_summaries = IndexMap::new();
    let mut regional_analysis = IndexMap::new();
    for (id, crop) in &data.crops {
        crop_summaries.insert(id.clone(), crop.summary());
        regional_analysis.insert(id.clone(), analyze_all_regions(data, &id.0)?);
    }

    Ok(Report {
        analysis_date: analysis_date.format("%Y-%m-%d").to_string(),
        region: REPORT_REGION,
        crops_analyzed: data.crops.keys().cloned().collect(),
        crop_summaries,
        regional_analysis,
        methodology: Methodology::default(),
    })
}

/// The traditional practices recorded for one crop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropPractices<'a> {
    /// Practice zones keyed by zone name, in dataset order
    pub traditional_practices: IndexMap<&'a str, ZonePractices<'a>>,
}

/// The practices and risks for one zone, without the crop and zone name used as keys
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct ZonePractices<'a> {
    pub regions: &'a [RegionID],
    pub practices: &'a [String],
    pub pest_risks: &'a [String],
    pub climate_threats: &'a [String],
}

impl<'a> From<&'a PracticeZone> for ZonePractices<'a> {
    fn from(zone: &'a PracticeZone) -> Self {
        Self {
            regions: &zone.regions,
            practices: &zone.practices,
            pest_risks: &zone.pest_risks,
            climate_threats: &zone.climate_threats,
        }
    }
}

/// Practice zones grouped by crop, in dataset order.
///
/// Every crop gets an entry, with no zones if none are recorded for it.
pub fn practices_by_crop(data: &ReferenceData) -> IndexMap<CropID, CropPractices<'_>> {
    data.crops
        .keys()
        .map(|id| {
            let traditional_practices = data
                .practices
                .iter()
                .filter(|zone| &zone.crop == id)
                .map(|zone| (zone.zone.as_str(), zone.into()))
                .collect();
            (id.clone(), CropPractices { traditional_practices })
        })
        .collect()
}
