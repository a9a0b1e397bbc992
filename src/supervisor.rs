// src/supervisor.rs

//! Wires one run together: initial launch, watcher units, interrupt
//! listener, coordinator, cleanup.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::RunConfig;
use crate::engine::{
    trigger_channel, CleanupExecutor, ConditionState, Coordinator, Finished, StopFlag,
    TriggerEvent, WatcherSet,
};
use crate::errors::Result;
use crate::exec::{spawn_initial, ProcessTable};
use crate::watch::WatcherUnit;

/// Delay between launching `initial_run` and starting the watchers.
pub const INITIAL_RUN_SETTLE: Duration = Duration::from_secs(1);

/// Runs a validated config to completion.
#[derive(Debug)]
pub struct Supervisor {
    config: Arc<RunConfig>,
    processes: Arc<dyn ProcessTable>,
}

impl Supervisor {
    pub fn new(config: RunConfig, processes: Arc<dyn ProcessTable>) -> Self {
        Self {
            config: Arc::new(config),
            processes,
        }
    }

    /// Run until a decision is reached or `interrupt` resolves.
    ///
    /// An interrupt is delivered through the trigger channel, so it goes
    /// through the same single cleanup as any other outcome. Returns an
    /// error only if the initial program cannot be launched, which happens
    /// before any watcher exists.
    pub async fn run_until<F>(self, interrupt: F) -> Result<Finished>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let stop = StopFlag::new();
        let cleanup = Arc::new(CleanupExecutor::new(
            self.config.actions().to_vec(),
            Arc::clone(&self.processes),
            stop.clone(),
        ));

        let (tx, rx) = trigger_channel();

        let interrupt_listener = {
            let tx = tx.clone();
            tokio::spawn(async move {
                interrupt.await;
                let _ = tx.send(TriggerEvent::Interrupted);
            })
        };

        if let Some(path) = self.config.initial_run() {
            if let Err(err) = spawn_initial(path) {
                interrupt_listener.abort();
                return Err(err);
            }
            tokio::time::sleep(INITIAL_RUN_SETTLE).await;
        }

        let mut units = WatcherSet::new();
        for condition in self.config.conditions() {
            let unit = WatcherUnit::new(
                condition.clone(),
                Arc::clone(&self.processes),
                stop.clone(),
                tx.clone(),
            );
            units.spawn(condition.name.clone(), unit.run());
        }
        drop(tx);

        info!(watchers = units.len(), "started monitoring; waiting for conditions");

        let state = ConditionState::new(self.config.conditions().iter().map(|c| c.name.clone()));
        let finished = Coordinator::new(state, rx, units, cleanup).run().await;

        stop.raise();
        interrupt_listener.abort();

        Ok(finished)
    }
}
