//
// cli.rs
// Crop-Health-rs
//
// Defines the CLI surface with Clap and dispatches user-selected commands to the corresponding modules.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;

use crate::catalog::CropType;
use crate::config::ClassifierConfig;
use crate::models::AnalysisReport;
use crate::pipeline::{AnalysisRequest, Analyzer};
use crate::{batch, validate, web};

/// Command-line interface glue code: defines the available verbs and dispatches to modules.
#[derive(Parser)]
#[command(name = "crop-health")]
#[command(about = "Heuristic crop health analysis for field images", long_about = None)]
pub struct Cli {
    /// Classifier configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log debug-level decisions
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate and classify a single image
    Analyze {
        file: PathBuf,
        #[arg(long)]
        crop: CropType,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Only check whether an image plausibly shows crops
    Validate {
        file: PathBuf,
        #[arg(long)]
        crop: CropType,
    },
    /// Analyze every image in a directory
    Batch {
        #[arg(short, long)]
        directory: PathBuf,
        #[arg(long)]
        crop: CropType,
    },
    /// List known diseases and symptoms for a crop
    Diseases { crop: CropType },
    /// Start the web server
    Web {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}

pub async fn run() -> anyhow::Result<()> {
    // Parse the raw CLI arguments once and dispatch to a subcommand handler.
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ClassifierConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let analyzer = Analyzer::from_config(config).context("Failed to load disease catalog")?;

    match cli.command {
        Commands::Analyze { file, crop, json } => {
            let report = analyze_file(&analyzer, &file, crop).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Validate { file, crop } => {
            let (bytes, filename) = read_image(&file)?;
            let assessment =
                validate::validate_image(bytes, &filename, crop, analyzer.config()).await;
            match &assessment.verdict.reason {
                None => println!("Imagem válida: {}", file.display()),
                Some(reason) => println!("Imagem inválida: {} ({})", file.display(), reason),
            }
            if let Some(stats) = assessment.statistics() {
                println!("  Green ratio: {:.2}", stats.green_ratio);
                println!("  Sampled:     {}", stats.sample_count);
            }
            // Non-zero exit for rejected images.
            assessment.require_valid()?;
        }
        Commands::Batch { directory, crop } => {
            batch::process_directory(&directory, crop, &analyzer)?
        }
        Commands::Diseases { crop } => {
            let entry = analyzer.catalog().entry(crop)?;
            println!("Diseases for {} (catalog v{}):", crop, analyzer.catalog().version);
            for name in &entry.diseases {
                println!("  - {name}");
            }
            println!("Symptoms:");
            for symptom in &entry.symptoms {
                println!("  - {symptom}");
            }
        }
        Commands::Web { host, port } => web::start_server(&host, port, analyzer).await?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_image(path: &Path) -> anyhow::Result<(Vec<u8>, String)> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((bytes, filename))
}

async fn analyze_file(
    analyzer: &Analyzer,
    path: &Path,
    crop: CropType,
) -> anyhow::Result<AnalysisReport> {
    let (bytes, filename) = read_image(path)?;
    let report = analyzer
        .analyze(AnalysisRequest::new(bytes, filename, crop))
        .await?;
    Ok(report)
}

fn print_report(report: &AnalysisReport) {
    println!("Analysis for {} | crop: {}", report.filename, report.crop);
    println!("  {}", report.summary);

    if let Some(result) = &report.classification {
        println!("  Disease score: {:.1}", result.disease_score);
        if let Some(name) = &result.disease_name {
            println!("  Disease:       {} ({:.0}% confidence)", name, result.confidence_percent);
            println!("  Affected area: {:.0}% of crop", result.affected_area_percent);
        }
        if let Some(symptom) = &result.symptom_description {
            println!("  Symptoms:      {symptom}");
        }
        if let Some(impact) = &report.potential_yield_impact {
            println!("  Yield impact:  {impact}");
        }
    }

    if !report.recommendations.is_empty() {
        println!("  Recommendations:");
        for item in &report.recommendations {
            println!("    • {item}");
        }
    }
}
