//! Inference backend implementations.

#[cfg(feature = "tract")]
pub mod tract;

#[cfg(feature = "ort")]
pub mod ort;

use crate::{InputTensor, OutputTensor, Result};

/// Trait for ONNX inference backends.
///
/// Classification models here take one image tensor and produce one score
/// vector, so the contract is single-input, single-output. The trait
/// abstracts over runtime implementations so the same pipeline code runs
/// against tract or ONNX Runtime.
pub trait InferenceBackend: Send + Sync {
    /// Run the model on one input tensor and return its first output.
    fn run(&self, input: InputTensor) -> Result<OutputTensor>;

    /// The input shape the loaded model was pinned to, e.g. `[1, 500, 500, 3]`.
    fn input_shape(&self) -> &[usize];
}
