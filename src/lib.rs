// gtop Library - Public API

// Re-export error types
pub mod error;
pub use error::{GtopError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::Config;

// Initialize logging
//
// The dashboard owns the terminal, so only warnings and errors are shown
// unless RUST_LOG asks for more.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}
