use crate::Device;
use std::fmt;

#[derive(Debug)]
pub enum StylizeError {
    /// Unknown style name, unknown style mode, or an invalid config value.
    Config(String),
    /// Weights missing or unreadable.
    ModelLoad(String),
    UnsupportedDevice(Device),
    /// Malformed frame or unexpected model output shape.
    Shape(String),
    Backend(String),
    Candle(String),
    Io(String),
    Image(deli_image::ImageError),
}

impl StylizeError {
    /// Configuration errors are never worth retrying.
    pub fn is_config(&self) -> bool {
        matches!(self, StylizeError::Config(_))
    }

    /// Load failures leave no cache entry behind, so a later call may retry.
    pub fn is_model_load(&self) -> bool {
        matches!(
            self,
            StylizeError::ModelLoad(_) | StylizeError::UnsupportedDevice(_)
        )
    }
}

impl fmt::Display for StylizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StylizeError::Config(msg) => write!(f, "configuration error: {msg}"),
            StylizeError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            StylizeError::UnsupportedDevice(device) => write!(f, "unsupported device: {device}"),
            StylizeError::Shape(msg) => write!(f, "shape error: {msg}"),
            StylizeError::Backend(msg) => write!(f, "backend error: {msg}"),
            StylizeError::Candle(msg) => write!(f, "candle error: {msg}"),
            StylizeError::Io(msg) => write!(f, "io error: {msg}"),
            StylizeError::Image(err) => write!(f, "image error: {err}"),
        }
    }
}

impl std::error::Error for StylizeError {}

impl From<candle_core::Error> for StylizeError {
    fn from(err: candle_core::Error) -> Self {
        StylizeError::Candle(err.to_string())
    }
}

impl From<std::io::Error> for StylizeError {
    fn from(err: std::io::Error) -> Self {
        StylizeError::Io(err.to_string())
    }
}

impl From<deli_base::TensorError> for StylizeError {
    fn from(err: deli_base::TensorError) -> Self {
        StylizeError::Shape(err.to_string())
    }
}

impl From<deli_image::ImageError> for StylizeError {
    fn from(err: deli_image::ImageError) -> Self {
        match err {
            deli_image::ImageError::Shape(msg) => StylizeError::Shape(msg),
            other => StylizeError::Image(other),
        }
    }
}

impl From<serde_json::Error> for StylizeError {
    fn from(err: serde_json::Error) -> Self {
        StylizeError::Config(err.to_string())
    }
}
