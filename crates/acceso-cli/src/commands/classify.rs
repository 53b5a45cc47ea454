//! Classify command - classify a single accessory photo.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use acceso_core::{
    classifier_from_store, AssetStore, Classification, Rotation, UNKNOWN_LABEL,
};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input photo (PNG, JPEG, BMP, TIFF, WebP)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (json always carries the raw confidence)
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Asset directory holding the model and labels
    #[arg(short, long)]
    asset_dir: Option<PathBuf>,

    /// Rotate the photo by a fixed angle (degrees, quarter turns only)
    /// before classification
    #[arg(long)]
    rotate: Option<i32>,

    /// Show the raw label and confidence without display thresholds
    #[arg(long)]
    raw: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary
    Text,
    /// JSON output
    Json,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if let Some(ref dir) = args.asset_dir {
        config.assets.asset_dir = dir.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Classifying {}", args.input.display());

    let input = args.input.clone();
    let rotation = args.rotate.map(Rotation::from_degrees).unwrap_or_default();
    let max_dim = config.classifier.max_capture_dimension;

    // Decoding and inference are blocking; keep them off the async runtime.
    // One classification is in flight at a time.
    let result = tokio::task::spawn_blocking(move || -> anyhow::Result<Classification> {
        let image = acceso_core::load_from_path(&input)?;
        let image = acceso_core::scale_to_max(&image, max_dim);
        let image = acceso_core::rotate(&image, rotation);

        let store = AssetStore::new(&config.assets.asset_dir);
        let classifier = classifier_from_store(&store, &config)?;
        Ok(classifier.classify(&image)?)
    })
    .await??;

    debug!("Classification took {:?}", start.elapsed());

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => format_text(&result, args.raw),
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, &rendered)?;
            println!(
                "{} Result written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Apply the display policy: below 0.5 confidence the label is suppressed,
/// below 0.8 the numeric confidence is shown as 0%.
pub(crate) fn apply_display_policy(result: &Classification) -> Classification {
    let label = if result.confidence < 0.5 {
        UNKNOWN_LABEL.to_string()
    } else {
        result.label.clone()
    };
    let confidence = if result.confidence < 0.8 {
        0.0
    } else {
        result.confidence
    };
    Classification { label, confidence }
}

/// Render a result for terminal display.
pub(crate) fn format_text(result: &Classification, raw: bool) -> String {
    let shown = if raw {
        result.clone()
    } else {
        apply_display_policy(result)
    };
    format!("{} ({:.0}%)", shown.label, shown.confidence * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(label: &str, confidence: f32) -> Classification {
        Classification {
            label: label.to_string(),
            confidence,
        }
    }

    #[test]
    fn low_confidence_suppresses_label_and_percent() {
        let shown = apply_display_policy(&result("Bolsos", 0.3));
        assert_eq!(shown.label, UNKNOWN_LABEL);
        assert_eq!(shown.confidence, 0.0);
    }

    #[test]
    fn mid_confidence_shows_label_but_zero_percent() {
        let shown = apply_display_policy(&result("Bolsos", 0.6));
        assert_eq!(shown.label, "Bolsos");
        assert_eq!(shown.confidence, 0.0);
    }

    #[test]
    fn high_confidence_passes_through() {
        let shown = apply_display_policy(&result("Bolsos", 0.92));
        assert_eq!(shown.label, "Bolsos");
        assert_eq!(shown.confidence, 0.92);
    }

    #[test]
    fn raw_flag_bypasses_policy() {
        assert_eq!(format_text(&result("Relojes", 0.42), true), "Relojes (42%)");
        assert_eq!(format_text(&result("Relojes", 0.42), false), "Unknown (0%)");
    }
}
