//! Relative time axis for the sliding plot window.
//!
//! Sample timestamps are absolute (seconds since monitoring started). Plots
//! show the most recent sample at x = 0 and reach back to
//! `-plot_time_interval`.

/// Width and sample capacity of the visible window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    plot_time_interval: f64,
    capacity: usize,
}

impl TimeWindow {
    /// `capacity` must match the history buffer feeding this window
    pub fn new(plot_time_interval: f64, capacity: usize) -> Self {
        Self {
            plot_time_interval,
            capacity,
        }
    }

    pub fn plot_time_interval(&self) -> f64 {
        self.plot_time_interval
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// X-axis limits of the plot
    pub fn x_bounds(&self) -> [f64; 2] {
        [-self.plot_time_interval, 0.0]
    }

    /// Map absolute timestamps (oldest first) onto the plot's x axis.
    ///
    /// While the buffer is filling, the newest point is pinned to 0. Once
    /// full, points are anchored on the oldest sample at
    /// `-plot_time_interval`, which keeps the window width fixed without a
    /// jump at the moment the buffer fills.
    ///
    /// A single sample always maps to 0.
    pub fn normalize(&self, timestamps: &[f64]) -> Vec<f64> {
        let (first, last) = match (timestamps.first(), timestamps.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Vec::new(),
        };

        if timestamps.len() == 1 {
            return vec![0.0];
        }

        let shift = |t: f64| t - first - self.plot_time_interval;

        if timestamps.len() < self.capacity {
            let newest = shift(last);
            timestamps.iter().map(|&t| shift(t) - newest).collect()
        } else {
            timestamps.iter().map(|&t| shift(t)).collect()
        }
    }
}
