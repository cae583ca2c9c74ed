use crate::{Backend, Device, ModelSource, Session, StylizeError};
use deli_base::{log, Tensor};
use ndarray::ArrayD;
use ort::{inputs, session::Session as OrtSession, value::TensorRef};
use std::collections::HashMap;
use std::sync::OnceLock;

static ORT_INIT: OnceLock<()> = OnceLock::new();

fn ensure_ort_init() {
    ORT_INIT.get_or_init(|| {
        let _ = ort::init().commit();
    });
}

/// Loads `.onnx` stylization generators through ONNX Runtime.
pub struct OnnxBackend;

impl Backend for OnnxBackend {
    fn name(&self) -> &str {
        "onnx"
    }

    fn load_model(
        &self,
        model: ModelSource,
        device: &Device,
    ) -> Result<Box<dyn Session>, StylizeError> {
        if let ModelSource::File(path) = &model {
            if !path.is_file() {
                return Err(StylizeError::ModelLoad(format!(
                    "weights file not found: {}",
                    path.display()
                )));
            }
        }
        if device.is_accelerated() && !cfg!(feature = "cuda") {
            return Err(StylizeError::UnsupportedDevice(device.clone()));
        }

        ensure_ort_init();
        let builder = OrtSession::builder().map_err(|e| {
            StylizeError::Backend(format!("failed to create session builder: {e}"))
        })?;

        let builder = match device {
            Device::Cpu => {
                log::debug!("[onnx] using CPU execution provider");
                builder
            }
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => {
                use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
                let ep = CUDAExecutionProvider::default().with_device_id(*device_id);
                if !ep.is_available().unwrap_or(false) {
                    return Err(StylizeError::UnsupportedDevice(device.clone()));
                }
                log::debug!("[onnx] using CUDA execution provider (device_id={device_id})");
                builder
                    .with_execution_providers([ep.build()])
                    .map_err(|_| StylizeError::UnsupportedDevice(device.clone()))?
            }
            #[cfg(not(feature = "cuda"))]
            Device::Cuda { .. } => {
                return Err(StylizeError::UnsupportedDevice(device.clone()));
            }
        };

        let session = match &model {
            ModelSource::File(path) => builder.commit_from_file(path),
            ModelSource::Memory(bytes) => builder.commit_from_memory(bytes),
        }
        .map_err(|e| StylizeError::ModelLoad(format!("failed to load {model}: {e}")))?;

        let input_names = session.inputs.iter().map(|i| i.name.clone()).collect();
        let output_names = session.outputs.iter().map(|o| o.name.clone()).collect();

        Ok(Box::new(OnnxSession {
            session,
            input_names,
            output_names,
        }))
    }
}

pub struct OnnxSession {
    session: OrtSession,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl Session for OnnxSession {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, StylizeError> {
        // generators take a single image tensor
        let [(name, tensor)] = inputs else {
            return Err(StylizeError::Backend(format!(
                "expected exactly one input, got {}",
                inputs.len()
            )));
        };
        if !self.input_names.iter().any(|n| n.as_str() == *name) {
            return Err(StylizeError::Backend(format!(
                "unknown input '{name}', model expects {:?}",
                self.input_names
            )));
        }

        let array = tensor_to_ndarray(tensor.clone())?;
        let tensor_ref = TensorRef::from_array_view(array.view())
            .map_err(|e| StylizeError::Backend(format!("failed to create tensor ref: {e}")))?;
        let outputs = self
            .session
            .run(inputs![*name => tensor_ref])
            .map_err(|e| StylizeError::Backend(format!("inference failed: {e}")))?;

        let mut result = HashMap::new();
        for output_name in &self.output_names {
            let array = outputs[output_name.as_str()]
                .try_extract_array::<f32>()
                .map_err(|e| {
                    StylizeError::Backend(format!("output '{output_name}' is not f32: {e}"))
                })?;
            result.insert(output_name.clone(), ndarray_to_tensor(array)?);
        }

        Ok(result)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

pub fn tensor_to_ndarray(tensor: Tensor<f32>) -> Result<ArrayD<f32>, StylizeError> {
    ArrayD::from_shape_vec(tensor.shape, tensor.data)
        .map_err(|e| StylizeError::Shape(format!("failed to create ndarray from tensor: {e}")))
}

pub fn ndarray_to_tensor(
    array: ndarray::ArrayView<'_, f32, ndarray::IxDyn>,
) -> Result<Tensor<f32>, StylizeError> {
    let shape = array.shape().to_vec();
    // iter() walks in logical order, so strided views come out row-major
    let data = array.iter().copied().collect();
    Ok(Tensor::new(shape, data)?)
}
