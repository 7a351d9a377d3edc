//
// errors.rs
// Crop-Health-rs
//
// Error kinds raised by the classifier core. Application layers wrap these with anyhow context.
//
// Thales Matheus Mendonça Santos - November 2025

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    #[error("Invalid subject: {0}")]
    InvalidSubject(String),

    #[error("Unsupported crop type: {0}")]
    UnsupportedCropType(String),

    #[error("Disease catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for AnalysisError {
    fn from(err: config::ConfigError) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
