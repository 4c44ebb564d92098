//! GPU monitoring core functionality.
//!
//! This module provides the sampling pipeline: device and process
//! capabilities, the per-tick collector, the bounded sample history, the
//! plot time window and the polling loop that ties them together.

mod collector;
mod device;
mod history;
mod metrics;
pub mod poll_loop;
mod process;
pub mod time_window;

pub use collector::{MetricsCollector, SampleSource};
pub use device::{DeviceHandle, DeviceQuery, MemoryUsage, PcieThroughput, RawProcess};
pub use history::HistoryBuffer;
pub use metrics::{DeviceReading, ProcessUsage, Sample, POWER_UNSUPPORTED};
pub use poll_loop::{LoopState, LoopStatus, PollLoop, StopSignal};
pub use process::{HostProcess, ProcessIntrospector};
pub use time_window::TimeWindow;
