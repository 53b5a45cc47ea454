//! Tensor types for inference input/output.
//!
//! Image classifiers only ever exchange float and byte tensors, so only
//! those two element types are represented.

use ndarray::{ArrayD, IxDyn};

/// Supported tensor element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorType {
    Float32,
    Uint8,
}

/// Input tensor handed to a model.
#[derive(Debug, Clone)]
pub enum InputTensor {
    Float32(ArrayD<f32>),
    Uint8(ArrayD<u8>),
}

impl InputTensor {
    /// Get the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        match self {
            InputTensor::Float32(arr) => arr.shape(),
            InputTensor::Uint8(arr) => arr.shape(),
        }
    }

    /// Get the element type of the tensor.
    pub fn dtype(&self) -> TensorType {
        match self {
            InputTensor::Float32(_) => TensorType::Float32,
            InputTensor::Uint8(_) => TensorType::Uint8,
        }
    }

    /// Number of elements in the tensor.
    pub fn len(&self) -> usize {
        match self {
            InputTensor::Float32(arr) => arr.len(),
            InputTensor::Uint8(arr) => arr.len(),
        }
    }

    /// True if the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a Float32 tensor from raw data and shape.
    pub fn from_f32(data: Vec<f32>, shape: Vec<usize>) -> Self {
        let arr = ArrayD::from_shape_vec(IxDyn(&shape), data)
            .expect("shape mismatch");
        InputTensor::Float32(arr)
    }

    /// Create a Uint8 tensor from raw data and shape.
    pub fn from_u8(data: Vec<u8>, shape: Vec<usize>) -> Self {
        let arr = ArrayD::from_shape_vec(IxDyn(&shape), data)
            .expect("shape mismatch");
        InputTensor::Uint8(arr)
    }
}

/// Output tensor read back from a model.
#[derive(Debug, Clone)]
pub enum OutputTensor {
    Float32(ArrayD<f32>),
    Uint8(ArrayD<u8>),
}

impl OutputTensor {
    /// Get the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        match self {
            OutputTensor::Float32(arr) => arr.shape(),
            OutputTensor::Uint8(arr) => arr.shape(),
        }
    }

    /// Get the element type of the tensor.
    pub fn dtype(&self) -> TensorType {
        match self {
            OutputTensor::Float32(_) => TensorType::Float32,
            OutputTensor::Uint8(_) => TensorType::Uint8,
        }
    }

    /// Number of elements in the tensor.
    pub fn len(&self) -> usize {
        match self {
            OutputTensor::Float32(arr) => arr.len(),
            OutputTensor::Uint8(arr) => arr.len(),
        }
    }

    /// True if the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Try to get the inner Float32 array.
    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            OutputTensor::Float32(arr) => Some(arr),
            _ => None,
        }
    }

    /// Create a Float32 tensor from raw data and shape.
    pub fn from_f32(data: Vec<f32>, shape: Vec<usize>) -> Self {
        let arr = ArrayD::from_shape_vec(IxDyn(&shape), data)
            .expect("shape mismatch");
        OutputTensor::Float32(arr)
    }
}
