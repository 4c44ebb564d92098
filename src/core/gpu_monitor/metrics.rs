use std::fmt;

use serde::{Deserialize, Serialize};

/// Power reading reported when the device cannot measure power draw
pub const POWER_UNSUPPORTED: f64 = -1.0;

/// One snapshot across all monitored devices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since monitoring started, never below the configured floor
    pub timestamp: f64,
    /// One reading per device, in enumeration order
    pub devices: Vec<DeviceReading>,
}

impl Sample {
    pub fn new(timestamp: f64, devices: Vec<DeviceReading>) -> Self {
        Self { timestamp, devices }
    }

    pub fn device(&self, index: usize) -> Option<&DeviceReading> {
        self.devices.get(index)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceReading {
    pub device_index: usize,
    pub name: String,
    pub timestamp: f64,
    pub utilization_percent: f64,
    /// MB
    pub memory_used: f64,
    /// MB
    pub memory_total: f64,
    /// MB/s
    pub pci_tx: f64,
    /// MB/s
    pub pci_rx: f64,
    pub temperature: f64,
    /// Watts, or [`POWER_UNSUPPORTED`]
    pub power_usage: f64,
    pub processes: Vec<ProcessUsage>,
}

impl DeviceReading {
    pub fn memory_percent(&self) -> f64 {
        if self.memory_total > 0.0 {
            self.memory_used / self.memory_total * 100.0
        } else {
            0.0
        }
    }

    pub fn power_supported(&self) -> bool {
        self.power_usage >= 0.0
    }
}

impl fmt::Display for DeviceReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time={:.2} [s], UTL={:.2} [%], MEM={:.2} [%], PCI-RX={:.2} [MB/s], PCI-TX={:.2} [MB/s]",
            self.timestamp,
            self.utilization_percent,
            self.memory_percent(),
            self.pci_rx,
            self.pci_tx
        )
    }
}

/// A compute process running on a device, joined with its host-side details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessUsage {
    pub pid: u32,
    pub device_index: usize,
    pub user: String,
    /// MB
    pub gpu_memory_used: f64,
    pub cpu_percent: f32,
    /// Resident set size in bytes
    pub host_memory_used: u64,
    pub command: String,
}

impl ProcessUsage {
    /// Share of the device memory held by this process
    pub fn gpu_memory_percent(&self, memory_total: f64) -> f64 {
        if memory_total > 0.0 {
            self.gpu_memory_used / memory_total * 100.0
        } else {
            0.0
        }
    }
}
