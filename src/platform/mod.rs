// Platform-specific code module

pub mod gpu;
pub mod process;

// Re-exports
pub use gpu::get_device_query;
pub use process::SysinfoIntrospector;
