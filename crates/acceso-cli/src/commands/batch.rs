//! Batch command - classify many photos in one run.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use acceso_core::{
    classifier_from_store, AccessoryClassifier, AssetStore, Classification, Rotation,
    TractBackend,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: super::classify::OutputFormat,

    /// Asset directory holding the model and labels
    #[arg(short, long)]
    asset_dir: Option<PathBuf>,

    /// Rotate each photo by a fixed angle (degrees, quarter turns only)
    #[arg(long)]
    rotate: Option<i32>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of classifying a single file.
#[derive(Serialize)]
struct BatchRecord {
    file: PathBuf,
    #[serde(flatten)]
    classification: Classification,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if let Some(ref dir) = args.asset_dir {
        config.assets.asset_dir = dir.clone();
    }

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "png" | "jpg" | "jpeg" | "bmp" | "tiff" | "webp"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} photos to classify",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // The model and labels load once; the classifier is reused for the run.
    let store = AssetStore::new(&config.assets.asset_dir);
    let classifier = classifier_from_store(&store, &config)?;

    let rotation = args.rotate.map(Rotation::from_degrees).unwrap_or_default();
    let max_dim = config.classifier.max_capture_dimension;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} photos")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut records = Vec::with_capacity(files.len());
    let mut failures: Vec<(PathBuf, String)> = Vec::new();

    for path in files {
        let file_start = Instant::now();

        match classify_file(&path, &classifier, rotation, max_dim) {
            Ok(classification) => {
                records.push(BatchRecord {
                    file: path.clone(),
                    classification,
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                });
            }
            Err(e) => {
                let message = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to classify {}: {}", path.display(), message);
                    failures.push((path.clone(), message));
                } else {
                    error!("Failed to classify {}: {}", path.display(), message);
                    anyhow::bail!("Batch failed: {}", message);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    // Write per-file outputs
    if let Some(ref output_dir) = args.output_dir {
        for record in &records {
            let stem = record
                .file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("photo");

            let (extension, content) = match args.format {
                super::classify::OutputFormat::Json => {
                    ("json", serde_json::to_string_pretty(record)?)
                }
                super::classify::OutputFormat::Text => (
                    "txt",
                    super::classify::format_text(&record.classification, false),
                ),
            };

            let output_path = output_dir.join(format!("{}.{}", stem, extension));
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    } else {
        for record in &records {
            println!(
                "{}: {}",
                record.file.display(),
                super::classify::format_text(&record.classification, false)
            );
        }
    }

    // Print summary
    println!();
    println!(
        "{} Classified {} photos in {:?}",
        style("✓").green(),
        records.len() + failures.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(records.len()).green(),
        style(failures.len()).red()
    );

    if !failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, message) in &failures {
            println!("  - {}: {}", path.display(), message);
        }
    }

    Ok(())
}

fn classify_file(
    path: &PathBuf,
    classifier: &AccessoryClassifier<TractBackend>,
    rotation: Rotation,
    max_dim: u32,
) -> anyhow::Result<Classification> {
    let image = acceso_core::load_from_path(path)?;
    let image = acceso_core::scale_to_max(&image, max_dim);
    let image = acceso_core::rotate(&image, rotation);
    Ok(classifier.classify(&image)?)
}
