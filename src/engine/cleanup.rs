// src/engine/cleanup.rs

//! Idempotent cleanup executor.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Action;
use crate::engine::flags::{CleanupGuard, StopFlag};
use crate::exec::ProcessTable;
use crate::types::ActionKind;

/// What happened to one configured action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    /// The program was running and `killed` processes were terminated.
    Closed { killed: usize },
    /// The program was not running.
    AlreadyClosed,
    /// Termination failed; the sequence carried on.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub target: String,
    pub status: ActionStatus,
}

/// Record of the single cleanup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub reason: String,
    pub actions: Vec<ActionReport>,
}

/// Runs the configured action sequence exactly once per process.
///
/// Shared between the coordinator and anything else that may end the run;
/// the guard makes every call after the first a no-op.
#[derive(Debug)]
pub struct CleanupExecutor {
    actions: Vec<Action>,
    processes: Arc<dyn ProcessTable>,
    stop: StopFlag,
    guard: CleanupGuard,
}

impl CleanupExecutor {
    pub fn new(actions: Vec<Action>, processes: Arc<dyn ProcessTable>, stop: StopFlag) -> Self {
        Self {
            actions,
            processes,
            stop,
            guard: CleanupGuard::new(),
        }
    }

    /// True once some caller has claimed the cleanup.
    pub fn has_started(&self) -> bool {
        self.guard.is_claimed()
    }

    /// Raise the stop flag and run every action in declared order.
    ///
    /// Returns `None` without doing anything if cleanup was already claimed.
    /// Individual action failures are logged and recorded, never returned.
    pub fn run(&self, reason: &str) -> Option<CleanupReport> {
        if !self.guard.try_claim() {
            info!(%reason, "cleanup already in progress; ignoring request");
            return None;
        }

        self.stop.raise();

        info!(%reason, actions = self.actions.len(), "cleanup sequence activated");

        let actions = self.actions.iter().map(|a| self.execute(a)).collect();

        info!("cleanup complete");
        Some(CleanupReport {
            reason: reason.to_string(),
            actions,
        })
    }

    fn execute(&self, action: &Action) -> ActionReport {
        let status = match action.kind {
            ActionKind::Close => self.close(&action.target),
        };
        ActionReport {
            target: action.target.clone(),
            status,
        }
    }

    fn close(&self, program: &str) -> ActionStatus {
        if !self.processes.is_running(program) {
            info!(%program, "program is already closed or was never found");
            return ActionStatus::AlreadyClosed;
        }

        info!(%program, "executing close action");
        match self.processes.force_kill(program) {
            Ok(killed) => ActionStatus::Closed { killed },
            Err(err) => {
                warn!(%program, error = %err, "error during termination");
                ActionStatus::Failed(err.to_string())
            }
        }
    }
}
