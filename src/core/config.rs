use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted configuration, relative to the home directory
pub const CONFIG_FILE_NAME: &str = ".gputoprc";

/// Smallest history the dashboard can plot
const MIN_BUFFER_SIZE: usize = 2;

/// Largest history one plot window may hold
pub const MAX_BUFFER_SIZE: usize = 100_000;

/// Color theme of the plot dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Pro,
    Dark,
    Clear,
    Matrix,
}

/// Marker used to draw line plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotMarker {
    Braille,
    Dot,
    Block,
    Bar,
    HalfBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device_index: usize,
    pub text_mode: bool,
    /// Seconds between samples
    pub update_time_interval: f64,
    /// Floor for sample timestamps, in seconds
    pub min_time_interval: f64,
    pub dashboard_theme: Theme,
    /// Width of the plotted window, in seconds
    pub dashboard_plot_time_interval: f64,
    /// None draws with the terminal's finest marker
    pub dashboard_plot_marker: Option<PlotMarker>,
    pub dashboard_plot_bar: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_index: 0,
            text_mode: false,
            update_time_interval: 1.0,
            min_time_interval: 0.1,
            dashboard_theme: Theme::Pro,
            dashboard_plot_time_interval: 30.0,
            dashboard_plot_marker: None,
            dashboard_plot_bar: false,
        }
    }
}

/// Values given explicitly on the command line
///
/// `None` means the flag was absent and the file or built-in default applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub device_index: Option<usize>,
    pub update_time_interval: Option<f64>,
    pub text_mode: Option<bool>,
}

impl Config {
    /// Load the configuration from `~/.gputoprc`, falling back to defaults if it does not exist
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_or_default(&config_path)
    }

    /// Load from `path`, or return the defaults when the file is missing.
    ///
    /// An unreadable or malformed file is an error, never a silent fallback.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No configuration at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = serde_json::from_str(&data)
            .with_context(|| format!("Malformed config file: {:?}", path))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write the built-in defaults to `~/.gputoprc`
    pub fn dump_defaults() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;
        Config::default().save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().with_context(|| "Could not determine home directory")?;

        Ok(home_dir.join(CONFIG_FILE_NAME))
    }

    /// Layer explicit command-line values over this configuration
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(device_index) = overrides.device_index {
            self.device_index = device_index;
        }
        if let Some(interval) = overrides.update_time_interval {
            self.update_time_interval = interval;
        }
        if let Some(text_mode) = overrides.text_mode {
            self.text_mode = text_mode;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.update_time_interval.is_finite() && self.update_time_interval > 0.0) {
            bail!(
                "update_time_interval must be a positive number of seconds (got {})",
                self.update_time_interval
            );
        }
        if !(self.dashboard_plot_time_interval.is_finite() && self.dashboard_plot_time_interval > 0.0) {
            bail!(
                "dashboard_plot_time_interval must be a positive number of seconds (got {})",
                self.dashboard_plot_time_interval
            );
        }
        let samples_per_window = self.dashboard_plot_time_interval / self.update_time_interval;
        if samples_per_window > MAX_BUFFER_SIZE as f64 {
            bail!(
                "dashboard_plot_time_interval / update_time_interval must not exceed {} samples (got {:.0})",
                MAX_BUFFER_SIZE,
                samples_per_window
            );
        }
        if !(self.min_time_interval.is_finite() && self.min_time_interval >= 0.0) {
            bail!(
                "min_time_interval must not be negative (got {})",
                self.min_time_interval
            );
        }
        Ok(())
    }

    /// Number of samples that fill one plot window
    pub fn buffer_size(&self) -> usize {
        let size = (self.dashboard_plot_time_interval / self.update_time_interval) as usize;
        size.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE)
    }
}
