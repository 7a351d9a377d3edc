//
// pipeline.rs
// Crop-Health-rs
//
// Validation-then-classification pipeline: one immutable request in, one report out, no state kept between calls.
//
// Thales Matheus Mendonça Santos - November 2025

use rand::Rng;
use tracing::info;

use crate::catalog::{CropType, DiseaseCatalog};
use crate::classify::DiseaseEstimator;
use crate::config::ClassifierConfig;
use crate::errors::AnalysisResult;
use crate::models::AnalysisReport;
use crate::report;
use crate::validate::{self, ImageAssessment};

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub crop: CropType,
}

impl AnalysisRequest {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, crop: CropType) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            crop,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    config: ClassifierConfig,
    estimator: DiseaseEstimator,
}

impl Analyzer {
    pub fn new(config: ClassifierConfig, catalog: DiseaseCatalog) -> Self {
        let estimator = DiseaseEstimator::new(config.clone(), catalog);
        Self { config, estimator }
    }

    /// Build from config, loading the catalog it points at (or the bundled one).
    pub fn from_config(config: ClassifierConfig) -> AnalysisResult<Self> {
        let catalog = DiseaseCatalog::load(config.catalog_path.as_deref())?;
        Ok(Self::new(config, catalog))
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        self.estimator.catalog()
    }

    pub async fn validate(&self, request: &AnalysisRequest) -> ImageAssessment {
        validate::validate_image(
            request.bytes.clone(),
            &request.filename,
            request.crop,
            &self.config,
        )
        .await
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> AnalysisResult<AnalysisReport> {
        let AnalysisRequest {
            bytes,
            filename,
            crop,
        } = request;
        let assessment = validate::validate_image(bytes, &filename, crop, &self.config).await;
        self.finish_with_thread_rng(assessment, &filename, crop)
    }

    /// Synchronous variant for callers that are not on a runtime (batch mode).
    pub fn analyze_blocking(&self, request: &AnalysisRequest) -> AnalysisResult<AnalysisReport> {
        let assessment =
            validate::assess_bytes(&request.bytes, &request.filename, request.crop, &self.config);
        self.finish_with_thread_rng(assessment, &request.filename, request.crop)
    }

    pub fn analyze_blocking_with_rng<R: Rng>(
        &self,
        request: &AnalysisRequest,
        rng: &mut R,
    ) -> AnalysisResult<AnalysisReport> {
        let assessment =
            validate::assess_bytes(&request.bytes, &request.filename, request.crop, &self.config);
        self.finish(assessment, &request.filename, request.crop, rng)
    }

    // ThreadRng is !Send, so it must never live inside an async body.
    fn finish_with_thread_rng(
        &self,
        assessment: ImageAssessment,
        filename: &str,
        crop: CropType,
    ) -> AnalysisResult<AnalysisReport> {
        self.finish(assessment, filename, crop, &mut rand::rng())
    }

    fn finish<R: Rng>(
        &self,
        assessment: ImageAssessment,
        filename: &str,
        crop: CropType,
        rng: &mut R,
    ) -> AnalysisResult<AnalysisReport> {
        // Surface a bad crop type even when the image itself is rejected.
        self.catalog().entry(crop)?;

        let verdict = assessment.verdict.clone();
        let statistics = assessment.statistics().cloned();

        let classification = match assessment.into_validated() {
            Ok(validated) => Some(
                self.estimator
                    .classify_disease(&validated, crop, filename, rng)?,
            ),
            Err(rejection) => {
                info!(filename, reason = %rejection.reason(), "classification blocked");
                None
            }
        };

        Ok(report::build_report(
            filename,
            crop,
            verdict,
            statistics,
            classification,
        ))
    }
}
