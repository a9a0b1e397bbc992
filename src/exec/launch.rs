// src/exec/launch.rs

//! Launching the `initial_run` program.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::info;

use crate::errors::{HandoffError, Result};

/// Spawn `path` once, detached from the supervisor.
///
/// The child is not awaited and is not killed when its handle is dropped;
/// the configured `close` actions are the only way the supervisor stops it.
pub fn spawn_initial(path: &Path) -> Result<()> {
    info!(program = %path.display(), "launching initial program");

    let child = Command::new(path)
        .stdin(Stdio::null())
        .kill_on_drop(false)
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => HandoffError::LaunchError(format!(
                "Executable not found at {}",
                path.display()
            )),
            _ => HandoffError::LaunchError(format!(
                "failed to launch {}: {e}",
                path.display()
            )),
        })?;

    info!(program = %path.display(), pid = ?child.id(), "initial program started");
    Ok(())
}
