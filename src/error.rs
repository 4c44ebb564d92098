use std::io;
use thiserror::Error;

/// Custom error type for gtop
#[derive(Error, Debug)]
pub enum GtopError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("GPU not available: {0}")]
    GpuNotAvailable(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    /// The device does not support the requested query
    #[error("Not supported: {0}")]
    Unsupported(String),

    /// The process exited before its host-side details could be read
    #[error("No such process: {0}")]
    NoSuchProcess(u32),

    #[error("History buffer is empty")]
    EmptyBuffer,

    #[error("Device index {index} out of range ({count} device(s) detected)")]
    InvalidDeviceIndex { index: usize, count: usize },

    #[error("TUI error: {0}")]
    Tui(String),
}

/// Result type alias for gtop
pub type Result<T> = std::result::Result<T, GtopError>;

impl GtopError {
    pub fn gpu_not_available<S: Into<String>>(msg: S) -> Self {
        GtopError::GpuNotAvailable(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        GtopError::MetricCollection(msg.into())
    }

    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        GtopError::Unsupported(msg.into())
    }

    pub fn tui<S: Into<String>>(msg: S) -> Self {
        GtopError::Tui(msg.into())
    }

    /// Whether this error means no GPU could be found or initialized
    pub fn is_gpu_not_available(&self) -> bool {
        matches!(self, GtopError::GpuNotAvailable(_))
    }
}
