//! Serializable device specification.
use serde::{Deserialize, Serialize};

/// Device on which networks are allocated.
///
/// A serializable mirror of [`tch::Device`] for use in configurations.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub enum Device {
    /// The CPU.
    Cpu,

    /// The n-th CUDA device.
    Cuda(usize),
}

impl From<Device> for tch::Device {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => tch::Device::Cpu,
            Device::Cuda(n) => tch::Device::Cuda(n),
        }
    }
}

impl From<tch::Device> for Device {
    fn from(device: tch::Device) -> Self {
        match device {
            tch::Device::Cpu => Device::Cpu,
            tch::Device::Cuda(n) => Device::Cuda(n),
            _ => unimplemented!("unsupported device"),
        }
    }
}
