use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::catalog::CropType;
use crate::models::AnalysisReport;
use crate::pipeline::{AnalysisRequest, Analyzer};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub outcome: Result<AnalysisReport>,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        })
}

/// Analyze every image under `dir` in parallel; each file is an isolated analysis.
pub fn analyze_directory(dir: &Path, crop: CropType, analyzer: &Analyzer) -> Vec<BatchEntry> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_image(e.path()))
        .map(|e| e.into_path())
        .collect();

    info!(directory = ?dir, count = files.len(), %crop, "batch analysis started");

    let mut entries: Vec<BatchEntry> = files
        .into_par_iter()
        .map(|path| {
            let outcome = analyze_file(&path, crop, analyzer);
            if let Err(e) = &outcome {
                warn!(path = ?path, error = %e, "analysis failed");
            }
            BatchEntry { path, outcome }
        })
        .collect();

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries
}

fn analyze_file(path: &Path, crop: CropType, analyzer: &Analyzer) -> Result<AnalysisReport> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let request = AnalysisRequest::new(bytes, filename, crop);
    Ok(analyzer.analyze_blocking(&request)?)
}

pub fn process_directory(dir: &Path, crop: CropType, analyzer: &Analyzer) -> Result<()> {
    println!("Analisando diretório: {:?} | Cultura: {}", dir, crop);

    let entries = analyze_directory(dir, crop, analyzer);
    println!("Encontrados {} arquivos.", entries.len());

    for entry in &entries {
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match &entry.outcome {
            Ok(report) => println!("{name}: {}", report.summary),
            Err(e) => eprintln!("Erro em {:?}: {}", entry.path, e),
        }
    }

    Ok(())
}
