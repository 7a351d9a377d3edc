//
// validate.rs
// Crop-Health-rs
//
// Decides whether an uploaded image plausibly shows crops, using filename keywords and the green-pixel ratio.
//
// Thales Matheus Mendonça Santos - November 2025

use tracing::{debug, info};

use crate::catalog::CropType;
use crate::config::ClassifierConfig;
use crate::errors::AnalysisError;
use crate::image::{self as sampling, PixelSample};
use crate::models::{ColorStatistics, Rejection, ValidationVerdict};

pub const NON_CROP_KEYWORDS: &[&str] = &[
    "person",
    "car",
    "building",
    "indoor",
    "face",
    "city",
    "street",
    "computer",
    "phone",
    "furniture",
    "animal",
    "pet",
    "food",
    "drink",
];

pub const CROP_KEYWORDS: &[&str] = &[
    "crop", "plant", "leaf", "leaves", "field", "farm", "paddy", "harvest",
];

/// Verdict plus whatever sample was produced while reaching it.
#[derive(Debug, Clone)]
pub struct ImageAssessment {
    pub verdict: ValidationVerdict,
    analyzed: Option<AnalyzedSample>,
}

#[derive(Debug, Clone)]
struct AnalyzedSample {
    sample: PixelSample,
    statistics: ColorStatistics,
}

/// A sample that passed validation; the only input classification accepts.
#[derive(Debug, Clone)]
pub struct ValidatedSample {
    sample: PixelSample,
    statistics: ColorStatistics,
}

impl ValidatedSample {
    pub fn sample(&self) -> &PixelSample {
        &self.sample
    }

    pub fn statistics(&self) -> &ColorStatistics {
        &self.statistics
    }
}

impl ImageAssessment {
    pub fn statistics(&self) -> Option<&ColorStatistics> {
        self.analyzed.as_ref().map(|a| &a.statistics)
    }

    pub fn is_valid(&self) -> bool {
        self.verdict.is_valid
    }

    /// Unlock classification; invalid assessments hand back their rejection.
    pub fn into_validated(self) -> Result<ValidatedSample, Rejection> {
        match (self.verdict.is_valid, self.analyzed) {
            (true, Some(analyzed)) => Ok(ValidatedSample {
                sample: analyzed.sample,
                statistics: analyzed.statistics,
            }),
            _ => Err(self
                .verdict
                .rejection
                .unwrap_or(Rejection::InsufficientVegetation)),
        }
    }

    /// Like `into_validated`, but as a crate error for `?` callers.
    pub fn require_valid(self) -> Result<ValidatedSample, AnalysisError> {
        self.into_validated().map_err(|rejection| match rejection {
            Rejection::DecodeFailure(detail) => AnalysisError::DecodeFailure(detail),
            other => AnalysisError::InvalidSubject(other.reason()),
        })
    }

    fn rejected(rejection: Rejection) -> Self {
        Self {
            verdict: ValidationVerdict::invalid(rejection),
            analyzed: None,
        }
    }
}

pub fn has_non_crop_keyword(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    NON_CROP_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub fn has_crop_keyword(filename: &str, crop: CropType) -> bool {
    let lower = filename.to_lowercase();
    CROP_KEYWORDS.iter().any(|k| lower.contains(k))
        || CropType::ALL.iter().any(|c| lower.contains(c.as_str()))
        || lower.contains(crop.as_str())
}

/// Verdict for an already-sampled image. The filename short-circuit is the caller's job.
pub fn judge_statistics(
    statistics: &ColorStatistics,
    filename: &str,
    crop: CropType,
    config: &ClassifierConfig,
) -> ValidationVerdict {
    let green_enough = statistics.green_ratio > config.min_green_ratio;
    if green_enough || has_crop_keyword(filename, crop) {
        ValidationVerdict::valid()
    } else {
        ValidationVerdict::invalid(Rejection::InsufficientVegetation)
    }
}

fn assess_sample(
    sample: PixelSample,
    filename: &str,
    crop: CropType,
    config: &ClassifierConfig,
) -> ImageAssessment {
    let statistics = ColorStatistics::from_sample(&sample);
    let verdict = judge_statistics(&statistics, filename, crop, config);
    info!(
        filename,
        %crop,
        green_ratio = statistics.green_ratio,
        valid = verdict.is_valid,
        "image validated"
    );
    ImageAssessment {
        verdict,
        analyzed: Some(AnalyzedSample { sample, statistics }),
    }
}

fn decode_rejection(err: AnalysisError) -> ImageAssessment {
    let detail = match err {
        AnalysisError::DecodeFailure(detail) => detail,
        other => other.to_string(),
    };
    debug!(%detail, "decode failed");
    ImageAssessment::rejected(Rejection::DecodeFailure(detail))
}

/// Validate on the calling thread with no decode deadline.
pub fn assess_bytes(
    bytes: &[u8],
    filename: &str,
    crop: CropType,
    config: &ClassifierConfig,
) -> ImageAssessment {
    if has_non_crop_keyword(filename) {
        debug!(filename, "non-crop keyword in filename");
        return ImageAssessment::rejected(Rejection::NonCropFilename);
    }

    match sampling::decode_sample(bytes, config.sample_stride) {
        Ok(sample) => assess_sample(sample, filename, crop, config),
        Err(err) => decode_rejection(err),
    }
}

/// Validate an upload, decoding on the blocking pool under the configured deadline.
pub async fn validate_image(
    bytes: Vec<u8>,
    filename: &str,
    crop: CropType,
    config: &ClassifierConfig,
) -> ImageAssessment {
    if has_non_crop_keyword(filename) {
        debug!(filename, "non-crop keyword in filename");
        return ImageAssessment::rejected(Rejection::NonCropFilename);
    }

    match sampling::decode_sample_with_timeout(bytes, config.sample_stride, config.decode_timeout())
        .await
    {
        Ok(sample) => assess_sample(sample, filename, crop, config),
        Err(err) => decode_rejection(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with_green(green_ratio: f32) -> ColorStatistics {
        ColorStatistics {
            sample_count: 100,
            green_ratio,
            yellowing_ratio: 0.0,
            browning_ratio: 0.0,
            dark_spot_ratio: 0.0,
            hue_variance: 0.0,
            saturation_variance: 0.0,
            lightness_variance: 0.0,
        }
    }

    #[test]
    fn non_crop_keywords_match_case_insensitively() {
        assert!(has_non_crop_keyword("My_CAR_photo.png"));
        assert!(has_non_crop_keyword("street-view.jpg"));
        assert!(!has_non_crop_keyword("photo1.jpg"));
    }

    #[test]
    fn crop_keywords_include_crop_names() {
        assert!(has_crop_keyword("sick_wheat_field.jpg", CropType::Rice));
        assert!(has_crop_keyword("IMG_potato.jpg", CropType::Potato));
        assert!(has_crop_keyword("leaf.png", CropType::Corn));
        assert!(!has_crop_keyword("photo1.jpg", CropType::Rice));
    }

    #[test]
    fn green_ratio_threshold_is_strict() {
        let config = ClassifierConfig::default();
        let at = judge_statistics(&stats_with_green(0.20), "x.jpg", CropType::Rice, &config);
        assert!(!at.is_valid);
        assert_eq!(at.rejection, Some(Rejection::InsufficientVegetation));

        let above = judge_statistics(&stats_with_green(0.21), "x.jpg", CropType::Rice, &config);
        assert!(above.is_valid);
        assert!(above.reason.is_none());
    }

    #[test]
    fn crop_keyword_rescues_low_green_images() {
        let config = ClassifierConfig::default();
        let verdict =
            judge_statistics(&stats_with_green(0.0), "dry_field.jpg", CropType::Corn, &config);
        assert!(verdict.is_valid);
    }

    #[test]
    fn filename_short_circuit_skips_decoding() {
        // The bytes are not an image; a short-circuit must not report a decode failure.
        let assessment = assess_bytes(
            b"junk",
            "person_in_field.jpg",
            CropType::Rice,
            &ClassifierConfig::default(),
        );
        assert!(!assessment.is_valid());
        assert_eq!(
            assessment.verdict.rejection,
            Some(Rejection::NonCropFilename)
        );
        assert!(assessment.statistics().is_none());
    }

    #[test]
    fn undecodable_bytes_give_decode_rejection() {
        let assessment = assess_bytes(
            b"junk",
            "leaf.jpg",
            CropType::Rice,
            &ClassifierConfig::default(),
        );
        assert!(matches!(
            assessment.verdict.rejection,
            Some(Rejection::DecodeFailure(_))
        ));
        let reason = assessment.verdict.reason.clone().expect("reason");
        assert!(reason.starts_with("please upload a valid image: "));
        assert_eq!(reason.matches("please upload").count(), 1);
        assert!(matches!(
            assessment.require_valid(),
            Err(AnalysisError::DecodeFailure(_))
        ));
    }

    #[test]
    fn rejected_subject_maps_to_invalid_subject_error() {
        let assessment = assess_bytes(
            b"junk",
            "phone_case.jpg",
            CropType::Rice,
            &ClassifierConfig::default(),
        );
        match assessment.require_valid() {
            Err(AnalysisError::InvalidSubject(reason)) => {
                assert_eq!(reason, "filename suggests non-crop image")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
