//! Error types for the inference layer.

use thiserror::Error;

/// Errors that can occur while loading or running an ONNX model.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The model file could not be parsed or loaded.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// A session could not be created from the loaded model.
    #[error("failed to create session: {0}")]
    SessionCreate(String),

    /// The input tensor has a shape or type the model does not accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The model ran but execution failed.
    #[error("inference failed: {0}")]
    InferenceFailed(String),

    /// The model produced an output that could not be read back.
    #[error("failed to extract output: {0}")]
    OutputExtraction(String),

    /// I/O error while reading model files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
