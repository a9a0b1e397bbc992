// src/watch/probe.rs

//! Condition probers: one point-in-time check per call.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::{Condition, ConditionSpec};
use crate::exec::ProcessTable;
use crate::types::TextEncoding;
use crate::watch::log_tail::LogTail;

/// Fatal prober errors. Each one ends its watcher unit with `Failed`.
///
/// Absence (a process not running, no new matching line) is not an error;
/// it is a `false` probe result.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("could not open '{}' with encoding '{encoding}': {source}", .path.display())]
    Open {
        path: PathBuf,
        encoding: TextEncoding,
        #[source]
        source: io::Error,
    },

    #[error("unsupported encoding '{encoding}'")]
    UnsupportedEncoding { encoding: String },

    #[error("line read failed; check if the specified encoding '{encoding}' is correct")]
    Decode { encoding: TextEncoding },

    #[error("read failed: {0}")]
    Read(#[source] io::Error),
}

/// Test a condition's current truth value.
pub trait Probe: Send {
    fn probe(&mut self) -> Result<bool, ProbeError>;
}

/// True while a process with the given name is running.
#[derive(Debug)]
pub struct ProcessProbe {
    name: String,
    processes: Arc<dyn ProcessTable>,
}

impl ProcessProbe {
    pub fn new(name: impl Into<String>, processes: Arc<dyn ProcessTable>) -> Self {
        Self {
            name: name.into(),
            processes,
        }
    }
}

impl Probe for ProcessProbe {
    fn probe(&mut self) -> Result<bool, ProbeError> {
        Ok(self.processes.is_running(&self.name))
    }
}

/// True once a newly appended line contains `pattern`.
///
/// Each probe consumes every complete line available, stopping at the first
/// match.
#[derive(Debug)]
pub struct LogProbe {
    tail: LogTail,
    pattern: String,
}

impl LogProbe {
    pub fn new(tail: LogTail, pattern: impl Into<String>) -> Self {
        Self {
            tail,
            pattern: pattern.into(),
        }
    }
}

impl Probe for LogProbe {
    fn probe(&mut self) -> Result<bool, ProbeError> {
        while let Some(line) = self.tail.read_next_line()? {
            if line.contains(&self.pattern) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Build the prober for a condition. For `log` conditions this opens the
/// file and seeks to its end, so it must run when the watcher starts.
pub fn build_probe(
    condition: &Condition,
    processes: &Arc<dyn ProcessTable>,
) -> Result<Box<dyn Probe>, ProbeError> {
    match &condition.spec {
        ConditionSpec::Process => Ok(Box::new(ProcessProbe::new(
            condition.name.clone(),
            Arc::clone(processes),
        ))),
        ConditionSpec::Log { pattern, encoding } => {
            let tail = LogTail::open_at_end(Path::new(&condition.name), encoding)?;
            Ok(Box::new(LogProbe::new(tail, pattern.clone())))
        }
    }
}
