use std::collections::HashSet;
use std::ffi::OsString;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};

use crate::core::gpu_monitor::{HostProcess, ProcessIntrospector};
use crate::error::{GtopError, Result};

/// Host process lookup backed by sysinfo
///
/// Only the pids handed to [`ProcessIntrospector::refresh`] are refreshed,
/// so a tick costs one `/proc` read per GPU process rather than a full scan.
/// CPU usage is measured between refreshes, so a process reads 0% the first
/// time it is seen.
///
/// sysinfo only prunes pids that are part of a refresh, so when a process
/// stops being reported the process table is rebuilt from the current pids.
/// The surviving processes read 0% CPU for that one tick.
pub struct SysinfoIntrospector {
    system: System,
    users: Users,
    tracked: HashSet<Pid>,
}

impl SysinfoIntrospector {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            users: Users::new_with_refreshed_list(),
            tracked: HashSet::new(),
        }
    }
}

impl Default for SysinfoIntrospector {
    fn default() -> Self {
        Self::new()
    }
}

fn join_command_line(cmd: &[OsString]) -> String {
    cmd.iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

impl ProcessIntrospector for SysinfoIntrospector {
    fn refresh(&mut self, pids: &[u32]) {
        let pids: Vec<Pid> = pids.iter().map(|&pid| Pid::from_u32(pid)).collect();
        let current: HashSet<Pid> = pids.iter().copied().collect();

        let departed = self.tracked.difference(&current).count();
        if departed > 0 {
            log::debug!("Forgetting {} process(es) no longer on any GPU", departed);
            self.system = System::new();
        }
        self.tracked = current;

        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&pids),
            true,
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .with_user(UpdateKind::OnlyIfNotSet)
                .with_cmd(UpdateKind::OnlyIfNotSet),
        );
    }

    fn inspect(&self, pid: u32) -> Result<HostProcess> {
        let process = self
            .system
            .process(Pid::from_u32(pid))
            .ok_or(GtopError::NoSuchProcess(pid))?;

        let user = process
            .user_id()
            .and_then(|uid| self.users.get_user_by_id(uid))
            .map(|user| user.name().to_string())
            .unwrap_or_else(|| "?".to_string());

        let command = match join_command_line(process.cmd()) {
            cmd if cmd.is_empty() => process.name().to_string_lossy().to_string(),
            cmd => cmd,
        };

        Ok(HostProcess {
            user,
            command,
            cpu_percent: process.cpu_usage(),
            resident_memory: process.memory(),
        })
    }
}
