//! Render dispatcher.
//!
//! Turns the sample history into either a one-line text summary or a
//! [`DashboardView`] and hands it to a [`RenderSurface`].

use crate::core::config::{Config, PlotMarker, Theme};
use crate::core::gpu_monitor::{DeviceReading, HistoryBuffer, ProcessUsage, Sample, TimeWindow};
use crate::error::{GtopError, Result};

use super::surface::RenderSurface;

/// Headroom above the largest throughput value
const THROUGHPUT_HEADROOM: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotStyle {
    pub theme: Theme,
    pub marker: Option<PlotMarker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub device_index: usize,
    pub text_mode: bool,
    pub bar_mode: bool,
    pub style: PlotStyle,
}

impl DashboardConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            device_index: config.device_index,
            text_mode: config.text_mode,
            bar_mode: config.dashboard_plot_bar,
            style: PlotStyle {
                theme: config.dashboard_theme,
                marker: config.dashboard_plot_marker,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    /// (relative time, value)
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePanel {
    pub y_label: &'static str,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarPanel {
    pub y_label: &'static str,
    /// Value of a full-length bar
    pub max: f64,
    pub unit: &'static str,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Lines(LinePanel),
    Bars(BarPanel),
}

/// Everything one plot frame shows
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub banner: String,
    pub utilization: Panel,
    pub throughput: Panel,
    pub processes: Vec<ProcessUsage>,
    /// MB, used to express per-process GPU memory as a share
    pub memory_total: f64,
}

pub struct Dashboard {
    config: DashboardConfig,
    window: TimeWindow,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, window: TimeWindow) -> Self {
        Self { config, window }
    }

    /// Draw the current history. Does nothing until two samples exist.
    pub fn show(&self, history: &HistoryBuffer, surface: &mut dyn RenderSurface) -> Result<()> {
        if history.len() < 2 {
            return Ok(());
        }

        if self.config.text_mode {
            let latest = self.selected(history.last()?)?;
            return surface.write_line(&format!("[{}] {}", self.config.device_index, latest));
        }

        let view = self.build_view(history)?;
        surface.render(&view, &self.config.style)
    }

    pub fn build_view(&self, history: &HistoryBuffer) -> Result<DashboardView> {
        let latest = self.selected(history.last()?)?;

        let (utilization, throughput) = if self.config.bar_mode {
            (utilization_bars(latest), throughput_bars(latest))
        } else {
            let readings = history
                .iter()
                .map(|sample| self.selected(sample))
                .collect::<Result<Vec<_>>>()?;
            let axis = self.window.normalize(&history.timestamps());
            (
                self.utilization_lines(&axis, &readings),
                self.throughput_lines(&axis, &readings),
            )
        };

        Ok(DashboardView {
            banner: banner(self.config.device_index, latest),
            utilization,
            throughput,
            processes: latest.processes.clone(),
            memory_total: latest.memory_total,
        })
    }

    fn selected<'a>(&self, sample: &'a Sample) -> Result<&'a DeviceReading> {
        sample
            .device(self.config.device_index)
            .ok_or(GtopError::InvalidDeviceIndex {
                index: self.config.device_index,
                count: sample.devices.len(),
            })
    }

    fn utilization_lines(&self, axis: &[f64], readings: &[&DeviceReading]) -> Panel {
        Panel::Lines(LinePanel {
            y_label: "Utilization (%)",
            x_bounds: self.window.x_bounds(),
            y_bounds: [0.0, 100.0],
            series: vec![
                series("UTL", axis, readings, |r| r.utilization_percent),
                series("MEM", axis, readings, |r| r.memory_percent()),
            ],
        })
    }

    fn throughput_lines(&self, axis: &[f64], readings: &[&DeviceReading]) -> Panel {
        let peak = readings
            .iter()
            .flat_map(|r| [r.pci_rx, r.pci_tx])
            .fold(0.0, f64::max);

        Panel::Lines(LinePanel {
            y_label: "PCI Throughput (MB/s)",
            x_bounds: self.window.x_bounds(),
            y_bounds: [0.0, throughput_limit(peak)],
            series: vec![
                series("RX", axis, readings, |r| r.pci_rx),
                series("TX", axis, readings, |r| r.pci_tx),
            ],
        })
    }
}

fn series<F>(label: &'static str, axis: &[f64], readings: &[&DeviceReading], value: F) -> Series
where
    F: Fn(&DeviceReading) -> f64,
{
    Series {
        label,
        points: axis
            .iter()
            .zip(readings)
            .map(|(&x, reading)| (x, value(reading)))
            .collect(),
    }
}

fn throughput_limit(peak: f64) -> f64 {
    (peak * THROUGHPUT_HEADROOM).max(1.0)
}

fn utilization_bars(latest: &DeviceReading) -> Panel {
    Panel::Bars(BarPanel {
        y_label: "GPU Utilization (%)",
        max: 100.0,
        unit: "%",
        bars: vec![
            Bar {
                label: "MEM",
                value: latest.memory_percent(),
            },
            Bar {
                label: "UTL",
                value: latest.utilization_percent,
            },
        ],
    })
}

fn throughput_bars(latest: &DeviceReading) -> Panel {
    Panel::Bars(BarPanel {
        y_label: "PCI Throughput (MB/s)",
        max: throughput_limit(latest.pci_tx.max(latest.pci_rx)),
        unit: "MB/s",
        bars: vec![
            Bar {
                label: "TX",
                value: latest.pci_tx,
            },
            Bar {
                label: "RX",
                value: latest.pci_rx,
            },
        ],
    })
}

/// One-line device summary shown above the plots
pub fn banner(device_index: usize, reading: &DeviceReading) -> String {
    let mut line = format!(
        "[{}] {} | MEM: {:.0} [MB]",
        device_index, reading.name, reading.memory_total
    );
    if reading.power_supported() {
        line.push_str(&format!(" | PWR: {:.1} [W]", reading.power_usage));
    }
    line.push_str(&format!(" | T: {:.1} [°C]", reading.temperature));
    line
}
