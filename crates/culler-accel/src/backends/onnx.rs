use crate::{Accelerator, AccelError, Device, ModelSource, Session};
use culler_base::Tensor;
use ndarray::ArrayD;
use ort::{inputs, session::Session as OrtSession, value::TensorRef};
use std::collections::HashMap;

/// ONNX Runtime backend.
pub struct OnnxAccelerator {
    device: Device,
}

impl OnnxAccelerator {
    pub fn new(device: Device) -> Self {
        Self { device }
    }
}

impl Accelerator for OnnxAccelerator {
    fn name(&self) -> &str {
        "onnx"
    }

    fn load_model(&self, model: ModelSource) -> Result<Box<dyn Session>, AccelError> {
        let mut builder = OrtSession::builder()
            .map_err(|e| AccelError::Runtime(format!("session builder failed: {e}")))?;

        builder = match &self.device {
            Device::Cpu => {
                log::info!("onnx: CPU execution provider");
                builder
            }
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => {
                use ort::ep::ExecutionProvider;
                use ort::execution_providers::CUDAExecutionProvider;
                let ep = CUDAExecutionProvider::default().with_device_id(*device_id);
                log::info!(
                    "onnx: CUDA execution provider (device {}), available: {}",
                    device_id,
                    ep.is_available().unwrap_or(false)
                );
                builder
                    .with_execution_providers([ep.build()])
                    .map_err(|_| AccelError::UnsupportedDevice(self.device.clone()))?
            }
            #[cfg(not(feature = "cuda"))]
            Device::Cuda { .. } => {
                return Err(AccelError::UnsupportedDevice(self.device.clone()));
            }
        };

        let session = match model {
            ModelSource::File(path) => builder
                .commit_from_file(&path)
                .map_err(|e| AccelError::ModelLoad(format!("{}: {e}", path.display())))?,
            ModelSource::Memory(bytes) => builder
                .commit_from_memory(&bytes)
                .map_err(|e| AccelError::ModelLoad(format!("in-memory model: {e}")))?,
        };

        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|input| input.name().to_string())
            .collect();
        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();

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
    ) -> Result<HashMap<String, Tensor<f32>>, AccelError> {
        for (name, _) in inputs {
            if !self.input_names.iter().any(|n| n == name) {
                return Err(AccelError::InvalidInput {
                    name: name.to_string(),
                    expected_names: self.input_names.clone(),
                });
            }
        }

        // The classifier feeds exactly one image tensor per run.
        let outputs = match inputs {
            [(name, tensor)] => {
                let array = tensor_to_ndarray(tensor.clone())?;
                let tensor_ref = TensorRef::from_array_view(array.view())
                    .map_err(|e| AccelError::Runtime(format!("tensor ref failed: {e}")))?;
                self.session
                    .run(inputs![*name => tensor_ref])
                    .map_err(|e| AccelError::Runtime(format!("inference failed: {e}")))?
            }
            _ => {
                return Err(AccelError::Runtime(format!(
                    "expected exactly one input, got {}",
                    inputs.len()
                )));
            }
        };

        let mut result = HashMap::new();
        for output_name in &self.output_names {
            let value = &outputs[output_name.as_str()];
            let array = value.try_extract_array::<f32>().map_err(|e| {
                AccelError::Runtime(format!("output '{output_name}' is not f32: {e}"))
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

fn tensor_to_ndarray(tensor: Tensor<f32>) -> Result<ArrayD<f32>, AccelError> {
    ArrayD::from_shape_vec(tensor.shape, tensor.data)
        .map_err(|e| AccelError::Shape(format!("tensor to ndarray: {e}")))
}

fn ndarray_to_tensor(
    array: ndarray::ArrayView<'_, f32, ndarray::IxDyn>,
) -> Result<Tensor<f32>, AccelError> {
    let shape = array.shape().to_vec();
    let data = array.iter().copied().collect();
    Tensor::new(shape, data).map_err(|e| AccelError::Shape(format!("ndarray to tensor: {e}")))
}
