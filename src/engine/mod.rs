// src/engine/mod.rs

//! Coordination engine for handoff.
//!
//! This module ties together:
//! - the trigger channel every watcher unit reports through
//! - the shared stop flag and cleanup guard
//! - the pure condition-state core that decides when to stop
//! - the cleanup executor that runs the configured action sequence
//! - the coordinator, the async shell that drains the trigger channel
//!
//! The pure state machine lives in [`state`]; the async shell is
//! implemented in [`coordinator`].

use tokio::sync::mpsc;

/// Canonical condition identity (the watch item's `name`).
pub type ConditionId = String;

/// Terminal event posted to the coordinator.
///
/// Each watcher unit sends at most one `Satisfied` or `Failed`. The
/// interrupt listener sends `Interrupted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// The condition became true before its deadline.
    Satisfied { id: ConditionId },
    /// The condition timed out or its watcher hit a fatal error.
    Failed { id: ConditionId, reason: String },
    /// The operator asked the supervisor to stop.
    Interrupted,
}

pub type TriggerSender = mpsc::UnboundedSender<TriggerEvent>;
pub type TriggerReceiver = mpsc::UnboundedReceiver<TriggerEvent>;

/// Create the ordered, unbounded, multi-producer trigger channel.
pub fn trigger_channel() -> (TriggerSender, TriggerReceiver) {
    mpsc::unbounded_channel()
}

/// Why the coordinator stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every condition was satisfied.
    AllSatisfied,
    /// The first failure reported by a watcher.
    Failed { id: ConditionId, reason: String },
    /// Ctrl+C / SIGTERM.
    Interrupted,
    /// Every sender was dropped without a decision.
    ChannelClosed,
}

impl Outcome {
    /// Operator-facing reason string, also handed to the cleanup executor.
    pub fn reason(&self) -> String {
        match self {
            Outcome::AllSatisfied => "All monitoring conditions met".to_string(),
            Outcome::Failed { reason, .. } => format!("Watch job timeout/failure: {reason}"),
            Outcome::Interrupted => "Termination Signal (Ctrl+C) received".to_string(),
            Outcome::ChannelClosed => "Trigger channel closed unexpectedly".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::AllSatisfied)
    }

    /// Process exit status. Every outcome ends in a completed cleanup, so
    /// all of them exit 0 unless `strict` asks for failures to be visible.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && !self.is_success() { 2 } else { 0 }
    }
}

pub mod cleanup;
pub mod coordinator;
pub mod flags;
pub mod state;

pub use cleanup::{ActionReport, ActionStatus, CleanupExecutor, CleanupReport};
pub use coordinator::{Coordinator, Finished, WatcherSet};
pub use flags::{CleanupGuard, StopFlag};
pub use state::{ConditionState, Decision};
