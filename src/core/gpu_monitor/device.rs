use crate::error::Result;

/// Opaque token for an opened GPU
///
/// Only the [`DeviceQuery`] that issued a handle knows what it refers to;
/// the rest of the crate just passes it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceHandle(u32);

impl DeviceHandle {
    pub fn new(token: u32) -> Self {
        Self(token)
    }

    pub fn token(&self) -> u32 {
        self.0
    }
}

/// Memory figures in MB
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryUsage {
    pub used: f64,
    pub total: f64,
}

/// PCIe throughput in MB/s
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PcieThroughput {
    pub tx: f64,
    pub rx: f64,
}

/// A compute process as reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawProcess {
    pub pid: u32,
    pub used_memory_bytes: u64,
}

/// Trait for GPU query backends
///
/// Implementations are provided in the platform layer. Queries are
/// synchronous and may block on the driver.
pub trait DeviceQuery: Send {
    /// Open every device, in enumeration order.
    ///
    /// Fails with `GpuNotAvailable` when no device is present.
    fn open_all(&mut self) -> Result<Vec<DeviceHandle>>;

    /// Release all handles and shut the backend down
    fn close_all(&mut self);

    fn name(&self, handle: DeviceHandle) -> Result<String>;

    /// GPU utilization in percent
    fn utilization(&self, handle: DeviceHandle) -> Result<f64>;

    fn memory(&self, handle: DeviceHandle) -> Result<MemoryUsage>;

    /// Core temperature in °C
    fn temperature(&self, handle: DeviceHandle) -> Result<f64>;

    fn pcie_throughput(&self, handle: DeviceHandle) -> Result<PcieThroughput>;

    /// Power draw in Watts. Hardware without power sensing fails with `Unsupported`.
    fn power_usage(&self, handle: DeviceHandle) -> Result<f64>;

    fn running_compute_processes(&self, handle: DeviceHandle) -> Result<Vec<RawProcess>>;
}
