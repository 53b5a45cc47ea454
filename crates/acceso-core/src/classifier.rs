//! Accessory classification: preprocessing, inference, and argmax readout.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use acceso_inference::{InferenceBackend, InputTensor, OutputTensor};

use crate::error::ClassifyError;
use crate::preprocess::TensorPreprocessor;

/// Label reported when the model output cannot be mapped to the label table.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A single classification outcome.
///
/// `confidence` is the raw model score in [0, 1]; display thresholds are the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Predicted category.
    pub label: String,

    /// Raw, unthresholded confidence.
    pub confidence: f32,
}

impl Classification {
    /// The sentinel returned when the output vector cannot be interpreted.
    pub fn unknown() -> Self {
        Self {
            label: UNKNOWN_LABEL.to_string(),
            confidence: 0.0,
        }
    }
}

/// Classifier over a loaded model, its label table, and a preprocessor.
///
/// The backend and label table are loaded once and reused across calls;
/// both are read-only after construction, so a classifier is safe to share
/// across threads when its backend is.
pub struct AccessoryClassifier<B: InferenceBackend> {
    backend: B,
    preprocessor: TensorPreprocessor,
    labels: Vec<String>,
}

impl<B: InferenceBackend> AccessoryClassifier<B> {
    /// Create a classifier from its parts.
    pub fn new(backend: B, labels: Vec<String>, preprocessor: TensorPreprocessor) -> Self {
        Self {
            backend,
            preprocessor,
            labels,
        }
    }

    /// The label table, in model output order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The preprocessor in use.
    pub fn preprocessor(&self) -> &TensorPreprocessor {
        &self.preprocessor
    }

    /// Classify one image.
    ///
    /// Never panics on malformed model output: an argmax index outside the
    /// label table (or an empty output) yields the `Unknown`/0.0 sentinel,
    /// and every other failure is a `ClassifyError`.
    pub fn classify(&self, image: &DynamicImage) -> Result<Classification, ClassifyError> {
        let tensor = self.preprocessor.to_input_tensor(image)?;
        let input = InputTensor::Float32(tensor.into_dyn());

        let output = self.backend.run(input)?;
        let scores = match &output {
            OutputTensor::Float32(arr) => arr,
            other => {
                return Err(ClassifyError::OutputMismatch(format!(
                    "expected float scores, got {:?}",
                    other.dtype()
                )));
            }
        };

        if scores.len() != self.labels.len() {
            warn!(
                "Model produced {} scores for {} labels",
                scores.len(),
                self.labels.len()
            );
        }

        // Argmax; on ties the first index encountered wins.
        let mut best_index: Option<usize> = None;
        let mut best_score = f32::NEG_INFINITY;
        for (index, &score) in scores.iter().enumerate() {
            if score > best_score {
                best_index = Some(index);
                best_score = score;
            }
        }

        let result = match best_index {
            Some(index) if index < self.labels.len() => Classification {
                label: self.labels[index].clone(),
                confidence: best_score,
            },
            _ => Classification::unknown(),
        };

        debug!(
            "Classified as '{}' (confidence {:.3})",
            result.label, result.confidence
        );

        Ok(result)
    }

    /// Classify multiple images in order.
    pub fn classify_batch(
        &self,
        images: &[DynamicImage],
    ) -> Result<Vec<Classification>, ClassifyError> {
        images.iter().map(|img| self.classify(img)).collect()
    }
}

/// Build a classifier from an asset store and pipeline configuration.
#[cfg(feature = "tract")]
pub fn classifier_from_store(
    store: &crate::assets::AssetStore,
    config: &crate::config::AccesoConfig,
) -> crate::error::Result<AccessoryClassifier<acceso_inference::TractBackend>> {
    let labels = store.load_labels(&config.assets.labels_file)?;
    let shape = config.input_shape();
    let backend = store.load_model(&config.assets.model_file, &shape)?;

    let preprocessor = TensorPreprocessor::new(
        config.classifier.input_width,
        config.classifier.input_height,
    )
    .with_normalization(config.classifier.normalization);

    debug!(
        "Classifier ready: {} labels, input {:?}",
        labels.len(),
        shape
    );

    Ok(AccessoryClassifier::new(backend, labels, preprocessor))
}
