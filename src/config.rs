//
// config.rs
// Crop-Health-rs
//
// Tunable classifier thresholds, loaded from an optional config file and CROP_HEALTH_* environment variables.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, AnalysisResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Sample every Nth pixel.
    pub sample_stride: usize,
    /// Green-band fraction above which an image counts as vegetation.
    pub min_green_ratio: f32,
    /// Disease score above which disease is declared outright.
    pub disease_threshold: f32,
    /// Probability of declaring disease when neither keyword nor score triggers.
    pub random_disease_probability: f64,
    pub decode_timeout_ms: u64,
    /// Replacement disease catalog; the bundled one is used when unset.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sample_stride: 10,
            min_green_ratio: 0.20,
            disease_threshold: 35.0,
            random_disease_probability: 0.25,
            decode_timeout_ms: 10_000,
            catalog_path: None,
        }
    }
}

impl ClassifierConfig {
    /// Layer an optional file and the environment over the defaults.
    pub fn load(path: Option<&Path>) -> AnalysisResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder
            .add_source(Environment::with_prefix("CROP_HEALTH").try_parsing(true))
            .build()?;

        let config: ClassifierConfig = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    pub fn decode_timeout(&self) -> Duration {
        Duration::from_millis(self.decode_timeout_ms)
    }

    pub fn check(&self) -> AnalysisResult<()> {
        if self.sample_stride == 0 {
            return Err(AnalysisError::Config(
                "sample_stride must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_green_ratio) {
            return Err(AnalysisError::Config(
                "min_green_ratio must be within [0, 1]".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.disease_threshold) {
            return Err(AnalysisError::Config(
                "disease_threshold must be within [0, 100]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.random_disease_probability) {
            return Err(AnalysisError::Config(
                "random_disease_probability must be within [0, 1]".into(),
            ));
        }
        if self.decode_timeout_ms == 0 {
            return Err(AnalysisError::Config(
                "decode_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
