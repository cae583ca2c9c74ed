#![allow(dead_code)]

use deli_base::Tensor;
use deli_stylize::{Backend, Device, ModelSource, Session, StylizeError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns its input unchanged and records every input shape it sees.
pub struct EchoSession {
    pub input_names: Vec<String>,
    pub output_names: Vec<String>,
    pub seen_shapes: Arc<Mutex<Vec<Vec<usize>>>>,
}

impl EchoSession {
    pub fn new(seen_shapes: Arc<Mutex<Vec<Vec<usize>>>>) -> Self {
        Self {
            input_names: vec!["input".to_string()],
            output_names: vec!["output".to_string()],
            seen_shapes,
        }
    }
}

impl Session for EchoSession {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, StylizeError> {
        let (name, tensor) = &inputs[0];
        assert_eq!(*name, "input");
        self.seen_shapes.lock().unwrap().push(tensor.shape.clone());
        let mut outputs = HashMap::new();
        outputs.insert("output".to_string(), tensor.clone());
        Ok(outputs)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

/// Always produces a fixed tensor, whatever the input.
pub struct ConstSession {
    pub output: Tensor<f32>,
    pub names: Vec<String>,
}

impl ConstSession {
    pub fn new(output: Tensor<f32>) -> Self {
        Self {
            output,
            names: vec!["x".to_string()],
        }
    }
}

impl Session for ConstSession {
    fn run(
        &mut self,
        _inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, StylizeError> {
        Ok(HashMap::from([("x".to_string(), self.output.clone())]))
    }

    fn input_names(&self) -> &[String] {
        &self.names
    }

    fn output_names(&self) -> &[String] {
        &self.names
    }
}

/// Hands out echo sessions and counts how often weights were "loaded".
#[derive(Default)]
pub struct FakeBackend {
    pub loads: AtomicUsize,
    pub loaded_paths: Mutex<Vec<PathBuf>>,
    pub loaded_devices: Mutex<Vec<Device>>,
    pub seen_shapes: Arc<Mutex<Vec<Vec<usize>>>>,
    /// Number of upcoming loads that fail with a missing-weights error.
    pub failures_left: AtomicUsize,
}

impl FakeBackend {
    pub fn failing(times: usize) -> Self {
        let backend = Self::default();
        backend.failures_left.store(times, Ordering::SeqCst);
        backend
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn shapes(&self) -> Vec<Vec<usize>> {
        self.seen_shapes.lock().unwrap().clone()
    }
}

impl Backend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn load_model(
        &self,
        model: ModelSource,
        device: &Device,
    ) -> Result<Box<dyn Session>, StylizeError> {
        let path = match model {
            ModelSource::File(path) => path,
            ModelSource::Memory(_) => PathBuf::from("<memory>"),
        };
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StylizeError::ModelLoad(format!(
                "weights file not found: {}",
                path.display()
            )));
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.loaded_paths.lock().unwrap().push(path);
        self.loaded_devices.lock().unwrap().push(device.clone());
        Ok(Box::new(EchoSession::new(Arc::clone(&self.seen_shapes))))
    }
}

pub fn uniform_frame(height: usize, width: usize, value: u8) -> Tensor<u8> {
    Tensor::new(vec![height, width, 3], vec![value; height * width * 3]).unwrap()
}

pub fn pattern_frame(height: usize, width: usize, seed: usize) -> Tensor<u8> {
    let data = (0..height * width * 3)
        .map(|i| ((i * 31 + seed * 17) % 256) as u8)
        .collect();
    Tensor::new(vec![height, width, 3], data).unwrap()
}
