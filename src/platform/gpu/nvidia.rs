use nvml_wrapper::{
    enum_wrappers::device::{PcieUtilCounter, TemperatureSensor},
    enums::device::UsedGpuMemory,
    error::NvmlError,
    Device, Nvml,
};

use crate::core::gpu_monitor::{DeviceHandle, DeviceQuery, MemoryUsage, PcieThroughput, RawProcess};
use crate::error::{GtopError, Result};

const MILLIWATTS_PER_WATT: f64 = 1000.0;
const KB_PER_MB: f64 = 1024.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// NVIDIA GPU query backend using NVML
///
/// Handles are device indices. NVML is shut down by [`DeviceQuery::close_all`].
pub struct NvmlDeviceQuery {
    nvml: Option<Nvml>,
}

impl NvmlDeviceQuery {
    /// Initialize NVML
    pub fn new() -> Result<Self> {
        let nvml = Nvml::init()
            .map_err(|e| GtopError::gpu_not_available(format!("Failed to init NVML: {}", e)))?;

        Ok(Self { nvml: Some(nvml) })
    }

    fn nvml(&self) -> Result<&Nvml> {
        self.nvml
            .as_ref()
            .ok_or_else(|| GtopError::metric_collection("NVML has been shut down"))
    }

    fn device(&self, handle: DeviceHandle) -> Result<Device<'_>> {
        self.nvml()?.device_by_index(handle.token()).map_err(|e| {
            GtopError::metric_collection(format!("Failed to get GPU {}: {}", handle.token(), e))
        })
    }
}

fn query_failed(what: &str, handle: DeviceHandle, error: NvmlError) -> GtopError {
    GtopError::metric_collection(format!(
        "Failed to read {} of GPU {}: {}",
        what,
        handle.token(),
        error
    ))
}

impl DeviceQuery for NvmlDeviceQuery {
    fn open_all(&mut self) -> Result<Vec<DeviceHandle>> {
        let count = self
            .nvml()?
            .device_count()
            .map_err(|e| GtopError::gpu_not_available(format!("Failed to count GPUs: {}", e)))?;

        if count == 0 {
            return Err(GtopError::gpu_not_available("NVML reports no devices"));
        }

        (0..count)
            .map(|index| {
                let handle = DeviceHandle::new(index);
                self.device(handle)
                    .map(|_| handle)
                    .map_err(|e| GtopError::gpu_not_available(e.to_string()))
            })
            .collect()
    }

    fn close_all(&mut self) {
        if let Some(nvml) = self.nvml.take() {
            if let Err(e) = nvml.shutdown() {
                log::warn!("NVML shutdown failed: {}", e);
            }
        }
    }

    fn name(&self, handle: DeviceHandle) -> Result<String> {
        self.device(handle)?
            .name()
            .map_err(|e| query_failed("name", handle, e))
    }

    fn utilization(&self, handle: DeviceHandle) -> Result<f64> {
        self.device(handle)?
            .utilization_rates()
            .map(|u| u.gpu as f64)
            .map_err(|e| query_failed("utilization", handle, e))
    }

    fn memory(&self, handle: DeviceHandle) -> Result<MemoryUsage> {
        let info = self
            .device(handle)?
            .memory_info()
            .map_err(|e| query_failed("memory info", handle, e))?;

        Ok(MemoryUsage {
            used: info.used as f64 / BYTES_PER_MB,
            total: info.total as f64 / BYTES_PER_MB,
        })
    }

    fn temperature(&self, handle: DeviceHandle) -> Result<f64> {
        self.device(handle)?
            .temperature(TemperatureSensor::Gpu)
            .map(|t| t as f64)
            .map_err(|e| query_failed("temperature", handle, e))
    }

    fn pcie_throughput(&self, handle: DeviceHandle) -> Result<PcieThroughput> {
        let device = self.device(handle)?;

        // NVML reports KB/s
        let tx = device
            .pcie_throughput(PcieUtilCounter::Send)
            .map_err(|e| query_failed("PCIe TX", handle, e))?;
        let rx = device
            .pcie_throughput(PcieUtilCounter::Receive)
            .map_err(|e| query_failed("PCIe RX", handle, e))?;

        Ok(PcieThroughput {
            tx: tx as f64 / KB_PER_MB,
            rx: rx as f64 / KB_PER_MB,
        })
    }

    fn power_usage(&self, handle: DeviceHandle) -> Result<f64> {
        match self.device(handle)?.power_usage() {
            Ok(milliwatts) => Ok(milliwatts as f64 / MILLIWATTS_PER_WATT),
            Err(NvmlError::NotSupported) => Err(GtopError::unsupported(format!(
                "power usage on GPU {}",
                handle.token()
            ))),
            Err(e) => Err(query_failed("power usage", handle, e)),
        }
    }

    fn running_compute_processes(&self, handle: DeviceHandle) -> Result<Vec<RawProcess>> {
        let processes = self
            .device(handle)?
            .running_compute_processes()
            .map_err(|e| query_failed("compute processes", handle, e))?;

        Ok(processes
            .into_iter()
            .map(|p| RawProcess {
                pid: p.pid,
                used_memory_bytes: match p.used_gpu_memory {
                    UsedGpuMemory::Used(bytes) => bytes,
                    UsedGpuMemory::Unavailable => 0,
                },
            })
            .collect())
    }
}
