//! GPU monitor command handler.
//!
//! Opens the devices on the calling thread, then hands the collector to a
//! background polling thread that samples and renders until Ctrl+C.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;

use crate::core::gpu_monitor::{
    DeviceQuery, HistoryBuffer, MetricsCollector, PollLoop, ProcessIntrospector, StopSignal,
    TimeWindow,
};
use crate::core::Config;
use crate::error::GtopError;
use crate::platform::{get_device_query, SysinfoIntrospector};
use crate::ui::{Dashboard, DashboardConfig, TerminalSurface};

/// Exit status when no GPU can be opened
pub const EXIT_NO_GPU: i32 = 1;

/// Execute the monitor command
pub fn execute(config: Config) -> Result<()> {
    let opened = open_collector(
        get_device_query(),
        Box::new(SysinfoIntrospector::new()),
        config.min_time_interval,
    );

    let collector = match opened {
        Ok(collector) => collector,
        Err(e) if e.is_gpu_not_available() => {
            report_missing_gpu(&mut io::stderr(), &e)?;
            std::process::exit(EXIT_NO_GPU);
        }
        Err(e) => return Err(e.into()),
    };

    if config.device_index >= collector.device_count() {
        return Err(GtopError::InvalidDeviceIndex {
            index: config.device_index,
            count: collector.device_count(),
        }
        .into());
    }

    let interval = Duration::try_from_secs_f64(config.update_time_interval)
        .with_context(|| format!("Invalid update interval: {}", config.update_time_interval))?;
    let buffer_size = config.buffer_size();
    let dashboard = Dashboard::new(
        DashboardConfig::from_config(&config),
        TimeWindow::new(config.dashboard_plot_time_interval, buffer_size),
    );

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.raise()).context("Failed to set Ctrl+C handler")?;

    log::info!(
        "Monitoring GPU {} every {:.2}s ({} samples per window)",
        config.device_index,
        config.update_time_interval,
        buffer_size
    );

    let poller = thread::Builder::new()
        .name("gtop-poll".to_string())
        .spawn(move || {
            let mut collector = collector;
            let mut surface = TerminalSurface::new();
            let mut poll_loop = PollLoop::new(interval, HistoryBuffer::new(buffer_size));

            let outcome = poll_loop.run(
                &mut collector,
                |history| dashboard.show(history, &mut surface),
                &stop,
            );

            collector.close();
            outcome
        })
        .context("Failed to spawn polling thread")?;

    poller
        .join()
        .map_err(|_| anyhow!("Polling thread panicked"))?
        .context("GPU monitoring stopped")
}

fn open_collector(
    query: crate::error::Result<Box<dyn DeviceQuery>>,
    introspector: Box<dyn ProcessIntrospector>,
    min_time_interval: f64,
) -> crate::error::Result<MetricsCollector> {
    MetricsCollector::open(query?, introspector, min_time_interval)
}

fn report_missing_gpu<W: Write>(out: &mut W, error: &GtopError) -> io::Result<()> {
    writeln!(out, "{}", "GPU Not Detected!".red().bold())?;
    writeln!(out, "{}", error.to_string().dimmed())?;
    writeln!(
        out,
        "{}",
        "Make sure an NVIDIA GPU is present and its driver is installed.".yellow()
    )
}
