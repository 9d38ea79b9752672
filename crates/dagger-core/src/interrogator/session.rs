//! ONNX Runtime session management for WD14 taggers.
//!
//! Loads a WD14 model exported to ONNX and runs inference to produce one
//! probability per label. The exported models apply their own sigmoid, so
//! outputs are already in [0, 1].

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::InterrogateError;

/// Wraps an ONNX Runtime session for a WD14 tagger.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
#[derive(Debug)]
pub struct TaggerSession {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
}

impl TaggerSession {
    /// Load a WD14 tagger from an ONNX file.
    ///
    /// When the `cuda` feature is enabled and `cpu_only` is false, the CUDA
    /// execution provider is registered; otherwise inference runs on CPU.
    pub fn load(model_path: &Path, cpu_only: bool) -> Result<Self, InterrogateError> {
        let mut builder = Session::builder().map_err(|e| InterrogateError::Model {
            message: format!("Failed to create ONNX session builder: {e}"),
        })?;

        #[cfg(feature = "cuda")]
        let mut builder = if cpu_only {
            builder
        } else {
            builder
                .with_execution_providers([
                    ort::execution_providers::CUDAExecutionProvider::default().build(),
                ])
                .map_err(|e| InterrogateError::Model {
                    message: format!("Failed to register CUDA execution provider: {e}"),
                })?
        };
        #[cfg(not(feature = "cuda"))]
        let _ = cpu_only;

        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| InterrogateError::Model {
                message: format!("Failed to load ONNX model from {model_path:?}: {e}"),
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "input".to_string());

        tracing::debug!(
            "Loaded tagger model from {:?} (input: {:?}, outputs: {:?})",
            model_path,
            input_name,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// Run inference on a preprocessed image tensor.
    ///
    /// Input shape: \[1, input_size, input_size, 3\] (NHWC, BGR, 0-255).
    /// Output: one probability per label row, in label-file order.
    pub fn run(&self, preprocessed: &Array4<f32>, path: &Path) -> Result<Vec<f32>, InterrogateError> {
        let shape: Vec<i64> = preprocessed.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = preprocessed.iter().copied().collect();

        let input_value =
            Value::from_array((shape, flat_data)).map_err(|e| InterrogateError::Inference {
                path: path.to_path_buf(),
                message: format!("Failed to create input tensor: {e}"),
            })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self.session.lock().map_err(|e| InterrogateError::Inference {
            path: path.to_path_buf(),
            message: format!("Session lock poisoned: {e}"),
        })?;

        let outputs = session.run(inputs).map_err(|e| InterrogateError::Inference {
            path: path.to_path_buf(),
            message: format!("ONNX inference failed: {e}"),
        })?;

        // Single output: [1, n_labels] probabilities.
        let (name, value) =
            outputs
                .iter()
                .next()
                .ok_or_else(|| InterrogateError::Inference {
                    path: path.to_path_buf(),
                    message: "Model produced no outputs".to_string(),
                })?;

        let (shape, data) =
            value
                .try_extract_tensor::<f32>()
                .map_err(|e| InterrogateError::Inference {
                    path: path.to_path_buf(),
                    message: format!("Failed to extract output tensor {name:?}: {e}"),
                })?;

        match shape.len() {
            1 => Ok(data.to_vec()),
            2 => {
                let n = shape[1] as usize;
                Ok(data[..n].to_vec())
            }
            _ => Err(InterrogateError::Inference {
                path: path.to_path_buf(),
                message: format!("Unexpected output shape: {shape:?}"),
            }),
        }
    }
}
