// src/engine/state.rs

//! Pure condition-state core.
//!
//! `ConditionState` consumes [`TriggerEvent`]s and answers one question:
//! keep waiting, or stop with an [`Outcome`]. It owns no channels and does
//! no IO, so the conjunction and first-failure rules can be tested without
//! Tokio.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::engine::{ConditionId, Outcome, TriggerEvent};

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Finish(Outcome),
}

/// Per-condition "satisfied" flags. A flag never goes back to `false`.
#[derive(Debug, Clone, Default)]
pub struct ConditionState {
    satisfied: BTreeMap<ConditionId, bool>,
}

impl ConditionState {
    /// One `false` entry per condition id.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ConditionId>,
    {
        let satisfied = ids.into_iter().map(|id| (id.into(), false)).collect();
        Self { satisfied }
    }

    pub fn is_satisfied(&self, id: &str) -> Option<bool> {
        self.satisfied.get(id).copied()
    }

    /// True when every condition is satisfied (vacuously true when empty).
    pub fn all_satisfied(&self) -> bool {
        self.satisfied.values().all(|&v| v)
    }

    /// Ids still waiting, in id order.
    pub fn pending(&self) -> Vec<&str> {
        self.satisfied
            .iter()
            .filter(|(_, v)| !**v)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.satisfied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satisfied.is_empty()
    }

    /// Apply one trigger event.
    ///
    /// - `Satisfied` marks the condition and finishes once all are met.
    /// - `Failed` finishes immediately; the first failure wins.
    /// - `Interrupted` finishes immediately.
    pub fn apply(&mut self, event: TriggerEvent) -> Decision {
        match event {
            TriggerEvent::Satisfied { id } => {
                match self.satisfied.get_mut(&id) {
                    Some(flag) => {
                        *flag = true;
                        info!(condition = %id, "condition met");
                    }
                    None => {
                        warn!(condition = %id, "ignoring trigger for unknown condition");
                    }
                }

                if self.all_satisfied() {
                    Decision::Finish(Outcome::AllSatisfied)
                } else {
                    Decision::Continue
                }
            }
            TriggerEvent::Failed { id, reason } => {
                warn!(condition = %id, %reason, "watch job failed");
                Decision::Finish(Outcome::Failed { id, reason })
            }
            TriggerEvent::Interrupted => {
                warn!("termination signal received");
                Decision::Finish(Outcome::Interrupted)
            }
        }
    }
}
