//! ONNX inference abstraction layer for acceso.
//!
//! This crate provides a unified interface for running a single-input,
//! single-output classification model across different backends:
//! - `tract` for pure-Rust inference on any platform (default)
//! - `ort` with the XNNPACK execution provider where ONNX Runtime is available

mod backend;
mod error;
mod tensor;

pub use backend::InferenceBackend;
pub use error::InferenceError;
pub use tensor::{InputTensor, OutputTensor, TensorType};

#[cfg(feature = "tract")]
pub use backend::tract::TractBackend;

#[cfg(feature = "ort")]
pub use backend::ort::OrtBackend;

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
