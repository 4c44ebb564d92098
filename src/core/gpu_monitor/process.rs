use crate::error::Result;

/// Host-side details of a process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostProcess {
    pub user: String,
    pub command: String,
    pub cpu_percent: f32,
    /// Resident set size in bytes
    pub resident_memory: u64,
}

/// Looks up host process metadata by pid
pub trait ProcessIntrospector: Send {
    /// Refresh cached state for the given pids before they are inspected
    fn refresh(&mut self, _pids: &[u32]) {}

    /// Fails with `NoSuchProcess` when the pid no longer exists
    fn inspect(&self, pid: u32) -> Result<HostProcess>;
}
