use crate::StylizeError;
use std::fmt;

/// Where a model handle runs. Fixed when the handle is created.
#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    Cpu,
    Cuda { device_id: i32 },
}

impl Device {
    /// `true` selects the first CUDA device, `false` plain CPU execution.
    pub fn from_gpu_flag(gpu: bool) -> Self {
        if gpu {
            Device::Cuda { device_id: 0 }
        } else {
            Device::Cpu
        }
    }

    pub fn is_accelerated(&self) -> bool {
        !matches!(self, Device::Cpu)
    }

    pub(crate) fn to_candle(&self) -> Result<candle_core::Device, StylizeError> {
        match self {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => candle_core::Device::new_cuda(*device_id as usize)
                .map_err(|_| StylizeError::UnsupportedDevice(self.clone())),
            #[cfg(not(feature = "cuda"))]
            Device::Cuda { .. } => Err(StylizeError::UnsupportedDevice(self.clone())),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "CPU"),
            Device::Cuda { device_id } => write!(f, "CUDA(device_id={device_id})"),
        }
    }
}
