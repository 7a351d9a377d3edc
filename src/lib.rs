//
// lib.rs
// Crop-Health-rs
//
// Exposes the crate's modules and re-exports the CLI entry point and classifier API for binary and library consumers.
//
// Thales Matheus Mendonça Santos - November 2025

// Public surface of the library: the classifier core, its front ends, and shared utilities.
pub mod batch;
pub mod catalog;
pub mod classify;
pub mod cli;
pub mod color;
pub mod config;
pub mod errors;
pub mod image;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod stats;
pub mod validate;
pub mod web;

pub use catalog::{CropType, DiseaseCatalog};
pub use classify::DiseaseEstimator;
pub use cli::{run as run_cli, Cli, Commands};
pub use crate::config::ClassifierConfig;
pub use errors::AnalysisError;
pub use pipeline::{AnalysisRequest, Analyzer};
pub use validate::{validate_image, ImageAssessment, ValidatedSample};
