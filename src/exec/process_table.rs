// src/exec/process_table.rs

//! OS process query/termination capability.
//!
//! The watchers and the cleanup executor talk to a `ProcessTable` instead of
//! the OS directly. `SystemProcessTable` is the production implementation
//! built on `sysinfo`; tests swap in a scriptable fake.

use std::fmt::Debug;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use sysinfo::{Process, ProcessesToUpdate, System};
use tracing::debug;

/// Query and terminate processes by name.
///
/// Names are treated as data and compared case-insensitively; they are
/// never handed to a shell.
pub trait ProcessTable: Send + Sync + Debug {
    /// True if at least one process with this name is currently running.
    ///
    /// Enumeration failures must be reported as `false`.
    fn is_running(&self, name: &str) -> bool;

    /// Forcibly terminate every process with this name.
    ///
    /// Returns the number of processes the OS accepted a kill for, or an
    /// error when matching processes existed but none could be killed.
    fn force_kill(&self, name: &str) -> Result<usize>;
}

/// `ProcessTable` backed by the live OS process list.
#[derive(Debug)]
pub struct SystemProcessTable {
    sys: Mutex<System>,
}

impl SystemProcessTable {
    pub fn new() -> Self {
        Self {
            sys: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Match on the reported process name or the executable's file name. On
/// Linux the former is truncated to 15 bytes, so the latter catches long
/// names.
fn process_matches(process: &Process, target: &str) -> bool {
    if process.name().to_string_lossy().to_lowercase() == target {
        return true;
    }
    process
        .exe()
        .and_then(|exe| exe.file_name())
        .map(|n| n.to_string_lossy().to_lowercase() == target)
        .unwrap_or(false)
}

impl ProcessTable for SystemProcessTable {
    fn is_running(&self, name: &str) -> bool {
        let target = name.to_lowercase();
        let Ok(mut sys) = self.sys.lock() else {
            debug!(program = %name, "process table lock poisoned; assuming absent");
            return false;
        };

        sys.refresh_processes(ProcessesToUpdate::All, true);
        sys.processes()
            .values()
            .any(|p| process_matches(p, &target))
    }

    fn force_kill(&self, name: &str) -> Result<usize> {
        let target = name.to_lowercase();
        let mut sys = self
            .sys
            .lock()
            .map_err(|_| anyhow!("process table lock poisoned"))?;

        sys.refresh_processes(ProcessesToUpdate::All, true);

        let mut matched = 0usize;
        let mut killed = 0usize;
        for process in sys.processes().values() {
            if !process_matches(process, &target) {
                continue;
            }
            matched += 1;
            if process.kill() {
                killed += 1;
            } else {
                debug!(program = %name, pid = %process.pid(), "kill request rejected");
            }
        }

        if matched > 0 && killed == 0 {
            return Err(anyhow!(
                "none of the {matched} process(es) named '{name}' could be terminated"
            ));
        }
        Ok(killed)
    }
}
