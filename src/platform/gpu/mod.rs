//! GPU-specific platform code.
//!
//! Provides the device query backend. NVIDIA GPUs are supported via NVML.

#[cfg(feature = "nvml")]
mod nvidia;

#[cfg(feature = "nvml")]
pub use nvidia::NvmlDeviceQuery;

use crate::core::gpu_monitor::DeviceQuery;
use crate::error::Result;

/// Initialize the GPU query backend
///
/// Returns `GpuNotAvailable` if no supported driver could be loaded.
pub fn get_device_query() -> Result<Box<dyn DeviceQuery>> {
    #[cfg(feature = "nvml")]
    {
        Ok(Box::new(NvmlDeviceQuery::new()?))
    }
    #[cfg(not(feature = "nvml"))]
    {
        Err(crate::error::GtopError::gpu_not_available(
            "NVIDIA GPU support not enabled",
        ))
    }
}
