//
// models.rs
// Crop-Health-rs
//
// Defines serializable data structures for color statistics, validation verdicts, classifications, and reports.
//
// Thales Matheus Mendonça Santos - November 2025

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CropType;

/// Aggregate measurements over one pixel sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStatistics {
    pub sample_count: usize,
    pub green_ratio: f32,
    pub yellowing_ratio: f32,
    pub browning_ratio: f32,
    pub dark_spot_ratio: f32,
    pub hue_variance: f32,
    pub saturation_variance: f32,
    pub lightness_variance: f32,
}

/// Why an image was refused before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Rejection {
    NonCropFilename,
    InsufficientVegetation,
    DecodeFailure(String),
}

impl Rejection {
    pub fn reason(&self) -> String {
        match self {
            Rejection::NonCropFilename => "filename suggests non-crop image".to_string(),
            Rejection::InsufficientVegetation => {
                "image doesn't appear to contain crops or plants".to_string()
            }
            Rejection::DecodeFailure(detail) => format!("please upload a valid image: {detail}"),
        }
    }
}

/// Outcome of the crop-plausibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub reason: Option<String>,
    pub rejection: Option<Rejection>,
}

impl ValidationVerdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
            rejection: None,
        }
    }

    pub fn invalid(rejection: Rejection) -> Self {
        Self {
            is_valid: false,
            reason: Some(rejection.reason()),
            rejection: Some(rejection),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_diseased: bool,
    pub disease_name: Option<String>,
    pub confidence_percent: f32,
    pub affected_area_percent: f32,
    pub symptom_description: Option<String>,
    pub disease_score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progression {
    Early,
    Moderate,
    Advanced,
}

/// Everything a front end needs to render one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub filename: String,
    pub crop: CropType,
    pub verdict: ValidationVerdict,
    pub statistics: Option<ColorStatistics>,
    pub classification: Option<ClassificationResult>,
    pub progression: Option<Progression>,
    pub potential_yield_impact: Option<String>,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}
