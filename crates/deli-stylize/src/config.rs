use crate::{Device, StylizeError};
use deli_base::log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime settings for the stylization pipeline, read from JSON.
///
/// Every field is optional in the file; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylizeConfig {
    /// Ceiling for the comix backend; larger batches are resized down to it.
    pub max_frame_size: usize,
    /// Default device flag when the caller does not pass one.
    pub gpu: bool,
    pub comix_model: PathBuf,
    /// Directory holding `<Style>_net_G_float.onnx` files.
    pub cartoon_weights_dir: PathBuf,
    pub log_level: String,
    /// Write daily log files here instead of stdout.
    pub log_dir: Option<PathBuf>,
}

impl Default for StylizeConfig {
    fn default() -> Self {
        Self {
            max_frame_size: 384,
            gpu: false,
            comix_model: PathBuf::from("ComixGAN/model.onnx"),
            cartoon_weights_dir: PathBuf::from("CartoonGAN/pretrained_model"),
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl StylizeConfig {
    pub fn from_json(json: &str) -> Result<Self, StylizeError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StylizeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| StylizeError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), StylizeError> {
        if self.max_frame_size == 0 {
            return Err(StylizeError::Config(
                "max_frame_size must be greater than zero".to_string(),
            ));
        }
        self.log_level_filter()?;
        Ok(())
    }

    pub fn device(&self) -> Device {
        Device::from_gpu_flag(self.gpu)
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, StylizeError> {
        deli_base::level_from_name(&self.log_level)
            .ok_or_else(|| StylizeError::Config(format!("unknown log level '{}'", self.log_level)))
    }
}
