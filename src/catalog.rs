//
// catalog.rs
// Crop-Health-rs
//
// Crop types and the versioned disease/symptom lookup table, loaded from bundled or user-supplied JSON.
//
// Thales Matheus Mendonça Santos - November 2025

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, AnalysisResult};

const BUNDLED_CATALOG: &str = include_str!("../data/diseases.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropType {
    Rice,
    Wheat,
    Corn,
    Potato,
}

impl CropType {
    pub const ALL: [CropType; 4] = [
        CropType::Rice,
        CropType::Wheat,
        CropType::Corn,
        CropType::Potato,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Rice => "rice",
            CropType::Wheat => "wheat",
            CropType::Corn => "corn",
            CropType::Potato => "potato",
        }
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CropType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CropType::ALL
            .into_iter()
            .find(|crop| crop.as_str() == wanted)
            .ok_or_else(|| AnalysisError::UnsupportedCropType(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropEntry {
    pub diseases: Vec<String>,
    pub symptoms: Vec<String>,
}

/// Disease names and symptom phrases indexed by crop name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseCatalog {
    pub version: u32,
    pub crops: BTreeMap<String, CropEntry>,
}

impl DiseaseCatalog {
    /// The catalog compiled into the binary.
    pub fn bundled() -> AnalysisResult<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn from_json(text: &str) -> AnalysisResult<Self> {
        let catalog: DiseaseCatalog = serde_json::from_str(text)
            .map_err(|e| AnalysisError::Catalog(format!("malformed catalog: {e}")))?;
        catalog.check()?;
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> AnalysisResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Catalog(format!("cannot read {:?}: {e}", path)))?;
        Self::from_json(&text)
    }

    /// Load from `path` when given, otherwise fall back to the bundled table.
    pub fn load(path: Option<&Path>) -> AnalysisResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        }
    }

    pub fn entry(&self, crop: CropType) -> AnalysisResult<&CropEntry> {
        self.crops
            .get(crop.as_str())
            .ok_or_else(|| AnalysisError::UnsupportedCropType(crop.to_string()))
    }

    fn check(&self) -> AnalysisResult<()> {
        for (crop, entry) in &self.crops {
            if entry.diseases.is_empty() || entry.symptoms.is_empty() {
                return Err(AnalysisError::Catalog(format!(
                    "crop '{crop}' needs at least one disease and one symptom"
                )));
            }
        }
        Ok(())
    }
}
