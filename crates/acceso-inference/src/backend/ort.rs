//! ONNX Runtime (ort) backend with the XNNPACK execution provider.

use std::path::Path;
use std::sync::Mutex;

use ndarray::ArrayD;
use ort::ep::XNNPACK;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use crate::error::InferenceError;
use crate::tensor::{InputTensor, OutputTensor};
use crate::{InferenceBackend, Result};

/// Backend using ONNX Runtime for native inference.
pub struct OrtBackend {
    session: Mutex<Session>,
    input_name: String,
    input_shape: Vec<usize>,
}

impl OrtBackend {
    /// Load a model from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P, input_shape: &[usize]) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading ONNX model from: {}", path.display());

        let bytes = std::fs::read(path).map_err(InferenceError::Io)?;

        Self::from_bytes(&bytes, input_shape)
    }

    /// Load a model from an in-memory byte buffer.
    pub fn from_bytes(bytes: &[u8], input_shape: &[usize]) -> Result<Self> {
        debug!("Loading ONNX model from {} bytes", bytes.len());

        let session = Session::builder()
            .map_err(|e| InferenceError::SessionCreate(e.to_string()))?
            .with_execution_providers([XNNPACK::default().build()])
            .map_err(|e| InferenceError::SessionCreate(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::SessionCreate(e.to_string()))?
            .with_intra_threads(4)
            .map_err(|e| InferenceError::SessionCreate(e.to_string()))?
            .commit_from_memory(bytes)
            .map_err(|e| InferenceError::ModelLoad(e.to_string()))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .ok_or_else(|| InferenceError::ModelLoad("model declares no inputs".into()))?;

        debug!("Model input: {:?}", input_name);

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            input_shape: input_shape.to_vec(),
        })
    }

    fn convert_input(&self, tensor: &InputTensor) -> Result<ort::session::SessionInputValue<'static>> {
        match tensor {
            InputTensor::Float32(arr) => {
                let shape: Vec<i64> = arr.shape().iter().map(|&s| s as i64).collect();
                let data: Vec<f32> = arr.iter().cloned().collect();
                Tensor::from_array((shape, data))
                    .map(Into::into)
                    .map_err(|e| InferenceError::InvalidInput(e.to_string()))
            }
            InputTensor::Uint8(arr) => {
                let shape: Vec<i64> = arr.shape().iter().map(|&s| s as i64).collect();
                let data: Vec<u8> = arr.iter().cloned().collect();
                Tensor::from_array((shape, data))
                    .map(Into::into)
                    .map_err(|e| InferenceError::InvalidInput(e.to_string()))
            }
        }
    }
}

impl InferenceBackend for OrtBackend {
    fn run(&self, input: InputTensor) -> Result<OutputTensor> {
        let value = self.convert_input(&input)?;
        let ort_inputs: Vec<(&str, ort::session::SessionInputValue<'static>)> =
            vec![(self.input_name.as_str(), value)];

        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::InferenceFailed(format!("Failed to lock session: {}", e)))?;

        let outputs = session
            .run(ort_inputs)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let (out_name, value) = outputs
            .iter()
            .next()
            .ok_or_else(|| InferenceError::OutputExtraction("model produced no output".into()))?;

        if let Ok((shape_ref, data)) = value.try_extract_tensor::<f32>() {
            let shape: Vec<usize> = shape_ref.iter().map(|&s| s as usize).collect();
            let arr = ArrayD::from_shape_vec(ndarray::IxDyn(&shape), data.to_vec())
                .map_err(|e| InferenceError::OutputExtraction(e.to_string()))?;
            Ok(OutputTensor::Float32(arr))
        } else if let Ok((shape_ref, data)) = value.try_extract_tensor::<u8>() {
            let shape: Vec<usize> = shape_ref.iter().map(|&s| s as usize).collect();
            let arr = ArrayD::from_shape_vec(ndarray::IxDyn(&shape), data.to_vec())
                .map_err(|e| InferenceError::OutputExtraction(e.to_string()))?;
            Ok(OutputTensor::Uint8(arr))
        } else {
            Err(InferenceError::OutputExtraction(format!(
                "unsupported output type for '{}'",
                out_name
            )))
        }
    }

    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }
}
