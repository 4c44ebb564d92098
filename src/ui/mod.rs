// Dashboard rendering module

pub mod dashboard;
pub mod surface;
pub mod terminal;
pub mod theme;

// Re-export commonly used items for cleaner imports
pub use dashboard::{Dashboard, DashboardConfig, DashboardView, PlotStyle};
pub use surface::RenderSurface;
pub use terminal::TerminalSurface;
