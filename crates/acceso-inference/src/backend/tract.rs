//! Tract backend: pure-Rust ONNX inference, runs anywhere.

use std::path::Path;

use ndarray::ArrayD;
use tract_onnx::prelude::*;
use tracing::debug;

use crate::error::InferenceError;
use crate::tensor::{InputTensor, OutputTensor};
use crate::{InferenceBackend, Result};

/// Backend using Tract for pure-Rust ONNX inference.
#[derive(Debug)]
pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>,
    input_shape: Vec<usize>,
}

impl TractBackend {
    /// Load a model from a file path, pinning the input to `input_shape`.
    ///
    /// The file is read whole in one pass; the bytes go to the session
    /// builder without further copies.
    pub fn from_file<P: AsRef<Path>>(path: P, input_shape: &[usize]) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading ONNX model with Tract from: {}", path.display());

        let bytes = std::fs::read(path).map_err(InferenceError::Io)?;
        Self::from_bytes(&bytes, input_shape)
    }

    /// Load a model from an in-memory byte buffer, pinning the input shape.
    ///
    /// Classifier exports often carry a dynamic batch dimension; pinning a
    /// concrete shape lets tract type and optimize the whole graph up front.
    pub fn from_bytes(bytes: &[u8], input_shape: &[usize]) -> Result<Self> {
        debug!("Loading ONNX model with Tract from {} bytes", bytes.len());

        let mut model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(bytes))
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to load model: {}", e)))?;

        model
            .set_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), input_shape))
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to set input shape: {}", e)))?;

        let model = model
            .into_typed()
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to type model: {}", e)))?
            .into_optimized()
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to optimize: {}", e)))?
            .into_runnable()
            .map_err(|e| InferenceError::SessionCreate(e.to_string()))?;

        Ok(Self {
            model,
            input_shape: input_shape.to_vec(),
        })
    }

    fn convert_input(&self, tensor: &InputTensor) -> Result<TValue> {
        match tensor {
            InputTensor::Float32(arr) => {
                let shape: Vec<usize> = arr.shape().to_vec();
                let data: Vec<f32> = arr.iter().cloned().collect();
                let tract_tensor =
                    tract_ndarray::ArrayD::from_shape_vec(tract_ndarray::IxDyn(&shape), data)
                        .map_err(|e| InferenceError::InvalidInput(e.to_string()))?;
                Ok(tract_tensor.into_tvalue())
            }
            InputTensor::Uint8(arr) => {
                let shape: Vec<usize> = arr.shape().to_vec();
                let data: Vec<u8> = arr.iter().cloned().collect();
                let tract_tensor =
                    tract_ndarray::ArrayD::from_shape_vec(tract_ndarray::IxDyn(&shape), data)
                        .map_err(|e| InferenceError::InvalidInput(e.to_string()))?;
                Ok(tract_tensor.into_tvalue())
            }
        }
    }
}

impl InferenceBackend for TractBackend {
    fn run(&self, input: InputTensor) -> Result<OutputTensor> {
        let tract_input = self.convert_input(&input)?;

        let outputs = self
            .model
            .run(tvec![tract_input])
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::OutputExtraction("model produced no output".into()))?;

        if let Ok(arr) = output.to_array_view::<f32>() {
            let shape: Vec<usize> = arr.shape().to_vec();
            let data: Vec<f32> = arr.iter().cloned().collect();
            let arr = ArrayD::from_shape_vec(ndarray::IxDyn(&shape), data)
                .map_err(|e| InferenceError::OutputExtraction(e.to_string()))?;
            Ok(OutputTensor::Float32(arr))
        } else if let Ok(arr) = output.to_array_view::<u8>() {
            let shape: Vec<usize> = arr.shape().to_vec();
            let data: Vec<u8> = arr.iter().cloned().collect();
            let arr = ArrayD::from_shape_vec(ndarray::IxDyn(&shape), data)
                .map_err(|e| InferenceError::OutputExtraction(e.to_string()))?;
            Ok(OutputTensor::Uint8(arr))
        } else {
            Err(InferenceError::OutputExtraction(
                "unsupported output element type".into(),
            ))
        }
    }

    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }
}
