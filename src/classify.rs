//
// classify.rs
// Crop-Health-rs
//
// Turns validated color statistics into a demo-grade disease verdict with confidence and affected-area estimates.
//
// Thales Matheus Mendonça Santos - November 2025

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use crate::catalog::{CropType, DiseaseCatalog};
use crate::config::ClassifierConfig;
use crate::errors::{AnalysisError, AnalysisResult};
use crate::models::{ClassificationResult, ColorStatistics};
use crate::validate::ValidatedSample;

pub const DISEASE_KEYWORDS: &[&str] = &[
    "disease", "blight", "rust", "mildew", "rot", "fungus", "pest", "lesion", "wilt", "spot",
    "mold", "sick", "infect", "damage",
];

const BROWNING_WEIGHT: f32 = 120.0;
const YELLOWING_WEIGHT: f32 = 90.0;
const DARK_SPOT_WEIGHT: f32 = 60.0;
const VARIANCE_WEIGHT: f32 = 0.15;

const CONFIDENCE_BASE: f32 = 70.0;
const KEYWORD_BONUS: f32 = 10.0;
const DISEASE_CONFIDENCE_RANGE: (f32, f32) = (75.0, 98.0);
const AFFECTED_AREA_RANGE: (f32, f32) = (10.0, 85.0);
const HEALTHY_CONFIDENCE_SLOPE: f32 = 0.28;
const HEALTHY_CONFIDENCE_CAP: f32 = 99.0;

pub fn has_disease_keyword(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    DISEASE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Combine band ratios and discoloration variance into a 0-100 score.
pub fn disease_score(statistics: &ColorStatistics) -> f32 {
    let score = BROWNING_WEIGHT * statistics.browning_ratio
        + YELLOWING_WEIGHT * statistics.yellowing_ratio
        + DARK_SPOT_WEIGHT * statistics.dark_spot_ratio
        + VARIANCE_WEIGHT * statistics.discoloration_variance_score();
    score.clamp(0.0, 100.0)
}

pub fn diseased_confidence(score: f32, keyword_match: bool) -> f32 {
    let bonus = if keyword_match { KEYWORD_BONUS } else { 0.0 };
    (CONFIDENCE_BASE + score / 2.0 + bonus).clamp(DISEASE_CONFIDENCE_RANGE.0, DISEASE_CONFIDENCE_RANGE.1)
}

pub fn healthy_confidence(score: f32) -> f32 {
    (CONFIDENCE_BASE + HEALTHY_CONFIDENCE_SLOPE * (100.0 - score)).min(HEALTHY_CONFIDENCE_CAP)
}

pub fn affected_area(score: f32) -> f32 {
    score.clamp(AFFECTED_AREA_RANGE.0, AFFECTED_AREA_RANGE.1)
}

/// Estimates disease likelihood for validated samples of a given crop.
#[derive(Debug, Clone)]
pub struct DiseaseEstimator {
    config: ClassifierConfig,
    catalog: DiseaseCatalog,
}

impl DiseaseEstimator {
    pub fn new(config: ClassifierConfig, catalog: DiseaseCatalog) -> Self {
        Self { config, catalog }
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    pub fn classify_disease<R: Rng>(
        &self,
        sample: &ValidatedSample,
        crop: CropType,
        filename: &str,
        rng: &mut R,
    ) -> AnalysisResult<ClassificationResult> {
        self.classify_statistics(sample.statistics(), crop, filename, rng)
    }

    pub fn classify_statistics<R: Rng>(
        &self,
        statistics: &ColorStatistics,
        crop: CropType,
        filename: &str,
        rng: &mut R,
    ) -> AnalysisResult<ClassificationResult> {
        // Fail before any decision so a missing table entry never defaults silently.
        let entry = self.catalog.entry(crop)?;

        let score = disease_score(statistics);
        let keyword_match = has_disease_keyword(filename);
        let over_threshold = score > self.config.disease_threshold;
        let draw: f64 = rng.random();
        let chance = draw < self.config.random_disease_probability;
        let is_diseased = keyword_match || over_threshold || chance;

        debug!(
            score,
            keyword_match, over_threshold, chance, is_diseased, "disease decision"
        );

        if !is_diseased {
            return Ok(ClassificationResult {
                is_diseased: false,
                disease_name: None,
                confidence_percent: healthy_confidence(score),
                affected_area_percent: 0.0,
                symptom_description: None,
                disease_score: score,
            });
        }

        let disease = entry.diseases.choose(rng).ok_or_else(|| {
            AnalysisError::Catalog(format!("no diseases listed for {crop}"))
        })?;
        let symptom = entry.symptoms.choose(rng).ok_or_else(|| {
            AnalysisError::Catalog(format!("no symptoms listed for {crop}"))
        })?;

        Ok(ClassificationResult {
            is_diseased: true,
            disease_name: Some(disease.clone()),
            confidence_percent: diseased_confidence(score, keyword_match),
            affected_area_percent: affected_area(score),
            symptom_description: Some(symptom.clone()),
            disease_score: score,
        })
    }
}
