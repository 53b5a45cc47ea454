//! Configuration structures for the classification pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::preprocess::Normalization;

/// Main configuration for the acceso pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccesoConfig {
    /// Classifier configuration.
    pub classifier: ClassifierConfig,

    /// Asset locations.
    pub assets: AssetConfig,
}

/// Classifier and preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Model input width in pixels.
    pub input_width: u32,

    /// Model input height in pixels.
    pub input_height: u32,

    /// Channel normalization the bundled model expects.
    pub normalization: Normalization,

    /// Maximum dimension images are pre-scaled to before classification.
    pub max_capture_dimension: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_width: 500,
            input_height: 500,
            normalization: Normalization::SignedUnit,
            max_capture_dimension: 128,
        }
    }
}

/// Asset file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory containing the bundled assets.
    pub asset_dir: PathBuf,

    /// Serialized model file name.
    pub model_file: String,

    /// Label table file name, one label per line in model output order.
    pub labels_file: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            model_file: "accesonet.onnx".to_string(),
            labels_file: "labels.txt".to_string(),
        }
    }
}

impl AccesoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Full path to the model asset.
    pub fn model_path(&self) -> PathBuf {
        self.assets.asset_dir.join(&self.assets.model_file)
    }

    /// Full path to the labels asset.
    pub fn labels_path(&self) -> PathBuf {
        self.assets.asset_dir.join(&self.assets.labels_file)
    }

    /// The model input shape implied by the classifier configuration (NHWC).
    pub fn input_shape(&self) -> [usize; 4] {
        [
            1,
            self.classifier.input_height as usize,
            self.classifier.input_width as usize,
            3,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_bundled_model() {
        let config = AccesoConfig::default();
        assert_eq!(config.classifier.input_width, 500);
        assert_eq!(config.classifier.input_height, 500);
        assert_eq!(config.classifier.normalization, Normalization::SignedUnit);
        assert_eq!(config.classifier.max_capture_dimension, 128);
        assert_eq!(config.assets.model_file, "accesonet.onnx");
        assert_eq!(config.assets.labels_file, "labels.txt");
        assert_eq!(config.input_shape(), [1, 500, 500, 3]);
    }

    #[test]
    fn normalization_serializes_as_snake_case() {
        let json = serde_json::to_string(&Normalization::SignedUnit).unwrap();
        assert_eq!(json, "\"signed_unit\"");
        let back: Normalization = serde_json::from_str("\"raw\"").unwrap();
        assert_eq!(back, Normalization::Raw);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: AccesoConfig =
            serde_json::from_str(r#"{"classifier": {"input_width": 128}}"#).unwrap();
        assert_eq!(config.classifier.input_width, 128);
        assert_eq!(config.classifier.input_height, 500);
        assert_eq!(config.assets.model_file, "accesonet.onnx");
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AccesoConfig::default();
        config.classifier.normalization = Normalization::Raw;
        config.save(&path).unwrap();

        let loaded = AccesoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.classifier.normalization, Normalization::Raw);
        assert_eq!(loaded.classifier.input_width, 500);
    }

    #[test]
    fn asset_paths_join_dir_and_name() {
        let config = AccesoConfig::default();
        assert_eq!(config.model_path(), PathBuf::from("assets/accesonet.onnx"));
        assert_eq!(config.labels_path(), PathBuf::from("assets/labels.txt"));
    }
}
