use std::time::Instant;

use super::device::{DeviceHandle, DeviceQuery, RawProcess};
use super::metrics::*;
use super::process::ProcessIntrospector;
use crate::error::{GtopError, Result};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Anything the poll loop can pull samples from
pub trait SampleSource {
    fn next_sample(&mut self) -> Result<Sample>;
}

/// Collects one [`Sample`] per tick across every opened device
pub struct MetricsCollector {
    query: Box<dyn DeviceQuery>,
    introspector: Box<dyn ProcessIntrospector>,
    handles: Vec<DeviceHandle>,
    started: Instant,
    min_time_interval: f64,
    closed: bool,
}

impl MetricsCollector {
    /// Open every device and start the elapsed-time clock
    pub fn open(
        mut query: Box<dyn DeviceQuery>,
        introspector: Box<dyn ProcessIntrospector>,
        min_time_interval: f64,
    ) -> Result<Self> {
        let handles = query.open_all()?;
        if handles.is_empty() {
            return Err(GtopError::gpu_not_available("No GPU device detected"));
        }

        log::info!("Opened {} GPU device(s)", handles.len());

        Ok(Self {
            query,
            introspector,
            handles,
            started: Instant::now(),
            min_time_interval,
            closed: false,
        })
    }

    pub fn device_count(&self) -> usize {
        self.handles.len()
    }

    /// Collect a sample stamped with the time elapsed since [`MetricsCollector::open`]
    pub fn collect(&mut self) -> Result<Sample> {
        let elapsed = self.started.elapsed().as_secs_f64();
        self.collect_at(elapsed)
    }

    /// Collect a sample stamped with an explicit elapsed time
    ///
    /// Host process details are refreshed once per tick for the pids of all
    /// devices together, so a process shared by two GPUs reads the same
    /// host figures on both.
    pub fn collect_at(&mut self, elapsed: f64) -> Result<Sample> {
        let timestamp = elapsed.max(self.min_time_interval);

        let mut readings = Vec::with_capacity(self.handles.len());
        for (device_index, &handle) in self.handles.iter().enumerate() {
            readings.push(read_device(&*self.query, device_index, handle, timestamp)?);
        }

        let mut pids: Vec<u32> = readings
            .iter()
            .flat_map(|(_, raw)| raw.iter().map(|p| p.pid))
            .collect();
        pids.sort_unstable();
        pids.dedup();
        self.introspector.refresh(&pids);

        let mut devices = Vec::with_capacity(readings.len());
        for (mut reading, raw_processes) in readings {
            reading.processes =
                resolve_processes(&*self.introspector, reading.device_index, &raw_processes)?;
            devices.push(reading);
        }

        Ok(Sample::new(timestamp, devices))
    }

    /// Release every device handle
    pub fn close(&mut self) {
        if !self.closed {
            self.query.close_all();
            self.closed = true;
            log::debug!("Released {} GPU device(s)", self.handles.len());
        }
    }
}

/// Query one device. Processes are returned raw and resolved by the caller.
fn read_device(
    query: &dyn DeviceQuery,
    device_index: usize,
    handle: DeviceHandle,
    timestamp: f64,
) -> Result<(DeviceReading, Vec<RawProcess>)> {
    let name = query.name(handle)?;
    let pcie = query.pcie_throughput(handle)?;
    let utilization = query.utilization(handle)?;
    let memory = query.memory(handle)?;
    let temperature = query.temperature(handle)?;

    let power_usage = match query.power_usage(handle) {
        Ok(watts) => watts,
        Err(GtopError::Unsupported(reason)) => {
            log::debug!("GPU {}: power usage unavailable ({})", device_index, reason);
            POWER_UNSUPPORTED
        }
        Err(e) => return Err(e),
    };

    let raw_processes = query.running_compute_processes(handle)?;

    let reading = DeviceReading {
        device_index,
        name,
        timestamp,
        utilization_percent: utilization,
        memory_used: memory.used,
        memory_total: memory.total,
        pci_tx: pcie.tx,
        pci_rx: pcie.rx,
        temperature,
        power_usage,
        processes: Vec::new(),
    };

    Ok((reading, raw_processes))
}

fn resolve_processes(
    introspector: &dyn ProcessIntrospector,
    device_index: usize,
    raw_processes: &[RawProcess],
) -> Result<Vec<ProcessUsage>> {
    let mut processes = Vec::with_capacity(raw_processes.len());
    for raw in raw_processes {
        match introspector.inspect(raw.pid) {
            Ok(host) => processes.push(ProcessUsage {
                pid: raw.pid,
                device_index,
                user: host.user,
                gpu_memory_used: raw.used_memory_bytes as f64 / BYTES_PER_MB,
                cpu_percent: host.cpu_percent,
                host_memory_used: host.resident_memory,
                command: host.command,
            }),
            Err(GtopError::NoSuchProcess(pid)) => {
                log::debug!("Process {} exited before it could be inspected", pid);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(processes)
}

impl SampleSource for MetricsCollector {
    fn next_sample(&mut self) -> Result<Sample> {
        self.collect()
    }
}

impl Drop for MetricsCollector {
    fn drop(&mut self) {
        self.close();
    }
}
