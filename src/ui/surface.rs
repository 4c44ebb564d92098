use crate::error::Result;

use super::dashboard::{DashboardView, PlotStyle};

/// Terminal output used by the dashboard
///
/// `render` draws one complete plot frame: it clears the previous frame,
/// lays out the panels for the current terminal size and flushes.
pub trait RenderSurface {
    /// Print one line of plain text
    fn write_line(&mut self, line: &str) -> Result<()>;

    fn render(&mut self, view: &DashboardView, style: &PlotStyle) -> Result<()>;
}
