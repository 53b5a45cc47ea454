//! Error types for the acceso-core library.

use thiserror::Error;

/// Main error type for the acceso library.
#[derive(Error, Debug)]
pub enum AccesoError {
    /// Image decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Asset loading error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    /// Tensor preprocessing error.
    #[error("preprocessing error: {0}")]
    Preprocess(#[from] PreprocessError),

    /// Classification error.
    #[error("classification error: {0}")]
    Classify(#[from] ClassifyError),

    /// Inference error from the inference layer.
    #[error("inference error: {0}")]
    Inference(#[from] acceso_inference::InferenceError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning an image source into pixels.
///
/// Metadata problems (an unreadable or absent EXIF block) are deliberately
/// not represented here: the loader downgrades them to the Normal
/// orientation instead of failing the load.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The source could not be opened or read.
    #[error("failed to read image source: {0}")]
    SourceUnreachable(#[from] std::io::Error),

    /// The bytes were read but do not decode to an image.
    #[error("failed to decode image: {0}")]
    Undecodable(#[from] image::ImageError),
}

/// Errors raised while loading bundled assets (model and label table).
#[derive(Error, Debug)]
pub enum AssetError {
    /// The named asset file does not exist.
    #[error("asset not found: {name}")]
    Missing { name: String },

    /// The asset exists but its contents are unusable.
    #[error("asset corrupt: {name}: {reason}")]
    Corrupt { name: String, reason: String },

    /// I/O error while reading an asset.
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while converting a raster image to a model input tensor.
#[derive(Error, Debug)]
pub enum PreprocessError {
    /// The produced buffer does not match the configured tensor shape.
    #[error("tensor shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The configured input dimensions are unusable.
    #[error("invalid input dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Errors raised during classification.
///
/// Every failure between receiving an image and producing a
/// (label, confidence) pair is funneled here so callers see a single
/// result-or-failure boundary.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Preprocessing the image failed.
    #[error("preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),

    /// The inference engine failed.
    #[error("inference failed: {0}")]
    Inference(#[from] acceso_inference::InferenceError),

    /// The model output does not line up with the label table.
    #[error("output mismatch: {0}")]
    OutputMismatch(String),
}

/// Result type for the acceso library.
pub type Result<T> = std::result::Result<T, AccesoError>;
