use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Compute devices for the recurrent model
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// CPU through the NdArray backend
    #[default]
    Cpu,

    /// The first CUDA device through the LibTorch backend
    Cuda,
}

impl Device {
    /// Whether this build can run on the device
    pub fn is_available(&self) -> bool {
        match self {
            Device::Cpu => true,
            Device::Cuda => cfg!(feature = "tch"),
        }
    }
}

impl TryFrom<&str> for Device {
    type Error = DeviceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" | "gpu" => Ok(Device::Cuda),
            _ => Err(DeviceError::Unknown(value.to_string())),
        }
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
        };

        write!(f, "{}", name)
    }
}

/// Device Error
#[derive(thiserror::Error, Debug)]
pub enum DeviceError {
    /// No device found for the given string
    #[error("no device found for {0}")]
    Unknown(String),

    /// The device needs a backend that was not compiled in
    #[error("device {0} requires building with the `tch` feature")]
    Unavailable(Device),
}
