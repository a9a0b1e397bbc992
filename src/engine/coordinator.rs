// src/engine/coordinator.rs

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::task::{self, JoinSet};
use tracing::{debug, error, info, warn};

use super::cleanup::{CleanupExecutor, CleanupReport};
use super::state::{ConditionState, Decision};
use super::{ConditionId, Outcome, TriggerEvent, TriggerReceiver};

/// How the run ended, plus the cleanup record if this coordinator was the
/// one that performed it.
#[derive(Debug, Clone)]
pub struct Finished {
    pub outcome: Outcome,
    pub cleanup: Option<CleanupReport>,
}

/// Single consumer of the trigger channel.
///
/// This is the async shell around [`ConditionState`]: it waits for the next
/// event, feeds it to the core, and on the first `Finish` decision hands
/// the reason to the cleanup executor. It also reaps the watcher tasks, so
/// a watcher that panics becomes a `Failed` event instead of a silent gap.
pub struct Coordinator {
    state: ConditionState,
    triggers: TriggerReceiver,
    units: WatcherSet,
    cleanup: Arc<CleanupExecutor>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("state", &self.state)
            .field("watchers", &self.units.len())
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub fn new(
        state: ConditionState,
        triggers: TriggerReceiver,
        units: WatcherSet,
        cleanup: Arc<CleanupExecutor>,
    ) -> Self {
        Self {
            state,
            triggers,
            units,
            cleanup,
        }
    }

    /// Main loop. Returns after cleanup has run and every watcher has been
    /// shut down.
    pub async fn run(mut self) -> Finished {
        info!(conditions = self.state.len(), "coordinator waiting for conditions");

        let outcome = if self.state.all_satisfied() {
            Outcome::AllSatisfied
        } else {
            self.wait_for_decision().await
        };

        info!(reason = %outcome.reason(), "coordinator finished");

        let executor = Arc::clone(&self.cleanup);
        let reason = outcome.reason();
        let cleanup = match task::spawn_blocking(move || executor.run(&reason)).await {
            Ok(report) => report,
            Err(err) => {
                error!(error = %err, "cleanup task did not complete");
                None
            }
        };

        self.units.shutdown().await;

        Finished { outcome, cleanup }
    }

    async fn wait_for_decision(&mut self) -> Outcome {
        loop {
            let Some(event) = self.next_event().await else {
                warn!("no watcher left to report and no decision reached");
                return Outcome::ChannelClosed;
            };

            debug!(?event, "coordinator received event");

            match self.state.apply(event) {
                Decision::Continue => {
                    debug!(pending = ?self.state.pending(), "still waiting");
                }
                Decision::Finish(outcome) => return outcome,
            }
        }
    }

    /// Next queued event, or a `Failed` synthesised for a crashed watcher.
    ///
    /// Queued events win over task exits, so a watcher's own event is always
    /// seen before its completion. Once every watcher is gone only what is
    /// already queued can arrive.
    async fn next_event(&mut self) -> Option<TriggerEvent> {
        loop {
            if self.units.is_empty() {
                return self.triggers.try_recv().ok();
            }

            tokio::select! {
                biased;
                received = self.triggers.recv() => return received,
                crashed = self.units.next_crash() => {
                    if crashed.is_some() {
                        return crashed;
                    }
                }
            }
        }
    }
}

/// The running watcher tasks, keyed by the condition each reports for.
#[derive(Debug, Default)]
pub struct WatcherSet {
    tasks: JoinSet<()>,
    ids: HashMap<task::Id, ConditionId>,
}

impl WatcherSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&mut self, id: ConditionId, unit: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = self.tasks.spawn(unit);
        self.ids.insert(handle.id(), id);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Reap finished watchers until one is found to have panicked.
    ///
    /// Returns `None` once every watcher has exited normally.
    async fn next_crash(&mut self) -> Option<TriggerEvent> {
        while let Some(joined) = self.tasks.join_next_with_id().await {
            match joined {
                Ok((task_id, ())) => {
                    self.ids.remove(&task_id);
                }
                Err(err) => {
                    let id = self
                        .ids
                        .remove(&err.id())
                        .unwrap_or_else(|| "<unknown>".to_string());
                    if !err.is_panic() {
                        debug!(condition = %id, "watcher cancelled");
                        continue;
                    }
                    let reason = format!(
                        "Watcher for '{id}' crashed: {}",
                        panic_message(err.into_panic())
                    );
                    error!(condition = %id, %reason, "watcher crashed");
                    return Some(TriggerEvent::Failed { id, reason });
                }
            }
        }
        None
    }

    async fn shutdown(&mut self) {
        self.tasks.shutdown().await;
        self.ids.clear();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
