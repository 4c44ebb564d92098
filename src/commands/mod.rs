// Command handlers module
pub mod config;
pub mod monitor;

// Re-exports for cleaner imports
pub use config::generate as generate_config;
pub use monitor::execute as monitor;
