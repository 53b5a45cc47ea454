//! Core library for on-device accessory photo classification.
//!
//! This crate provides:
//! - Orientation-aware image loading (EXIF rotation correction)
//! - Raster geometry (quarter-turn rotation, aspect-preserving scaling)
//! - Image-to-tensor preprocessing with configurable normalization
//! - Asset loading (serialized model + label table)
//! - Classification orchestration with argmax readout

pub mod assets;
pub mod classifier;
pub mod config;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod preprocess;

pub use assets::AssetStore;
pub use classifier::{AccessoryClassifier, Classification, UNKNOWN_LABEL};
pub use config::{AccesoConfig, AssetConfig, ClassifierConfig};
pub use error::{AccesoError, AssetError, ClassifyError, DecodeError, PreprocessError, Result};
pub use geometry::{rotate, scale_to_max, Rotation};
pub use loader::{load_from_bytes, load_from_path, Orientation};
pub use preprocess::{Normalization, TensorPreprocessor};

#[cfg(feature = "tract")]
pub use classifier::classifier_from_store;

/// Re-export inference types.
pub use acceso_inference::{InferenceBackend, InputTensor, OutputTensor};

#[cfg(feature = "tract")]
pub use acceso_inference::TractBackend;

#[cfg(feature = "ort")]
pub use acceso_inference::OrtBackend;
