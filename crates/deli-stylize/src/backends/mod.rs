mod onnx;

pub use onnx::{ndarray_to_tensor, tensor_to_ndarray, OnnxBackend, OnnxSession};
