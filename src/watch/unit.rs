// src/watch/unit.rs

//! Watcher unit: polls one condition until it holds or its deadline passes.

use std::panic;
use std::sync::Arc;

use tokio::task;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::Condition;
use crate::engine::{StopFlag, TriggerEvent, TriggerSender};
use crate::exec::ProcessTable;
use crate::types::ConditionKind;
use crate::watch::probe::{build_probe, ProbeError};

/// One concurrent task per condition.
///
/// Emits exactly one terminal event (`Satisfied` or `Failed`) unless the
/// stop flag is raised first, in which case it emits nothing. Each probe runs
/// on the blocking pool; a probe that panics takes the unit down with it and
/// the coordinator reports the crash.
#[derive(Debug)]
pub struct WatcherUnit {
    condition: Condition,
    processes: Arc<dyn ProcessTable>,
    stop: StopFlag,
    triggers: TriggerSender,
}

impl WatcherUnit {
    pub fn new(
        condition: Condition,
        processes: Arc<dyn ProcessTable>,
        stop: StopFlag,
        triggers: TriggerSender,
    ) -> Self {
        Self {
            condition,
            processes,
            stop,
            triggers,
        }
    }

    /// Poll loop. Consumes the unit so it cannot emit twice.
    pub async fn run(self) {
        let started = Instant::now();
        let label = self.condition.display_name();
        let kind = self.condition.kind();
        let deadline = self.condition.deadline();
        let interval = kind.poll_interval();

        info!(
            condition = %label,
            %kind,
            timeout_secs = self.condition.timeout_secs,
            "monitoring started"
        );

        let mut probe = match build_probe(&self.condition, &self.processes) {
            Ok(p) => p,
            Err(err) => {
                self.fail(self.probe_error_reason(&err));
                return;
            }
        };

        loop {
            if self.stop.is_raised() {
                debug!(condition = %label, "stop flag raised; watcher exiting");
                return;
            }

            if started.elapsed() > deadline {
                self.fail(self.timeout_reason());
                return;
            }

            let (returned, result) = match task::spawn_blocking(move || {
                let result = probe.probe();
                (probe, result)
            })
            .await
            {
                Ok(done) => done,
                Err(err) if err.is_panic() => panic::resume_unwind(err.into_panic()),
                Err(_) => {
                    debug!(condition = %label, "probe cancelled; watcher exiting");
                    return;
                }
            };
            probe = returned;

            match result {
                Ok(true) => {
                    info!(condition = %label, elapsed = ?started.elapsed(), "trigger found");
                    self.emit(TriggerEvent::Satisfied {
                        id: self.condition.name.clone(),
                    });
                    return;
                }
                Ok(false) => {}
                Err(err) => {
                    self.fail(self.probe_error_reason(&err));
                    return;
                }
            }

            sleep(interval).await;
        }
    }

    fn timeout_reason(&self) -> String {
        let label = self.condition.display_name();
        let secs = self.condition.timeout_secs;
        match self.condition.kind() {
            ConditionKind::Process => format!("Program '{label}' timed out after {secs}s."),
            ConditionKind::Log => format!("Log pattern in '{label}' timed out after {secs}s."),
        }
    }

    fn probe_error_reason(&self, err: &ProbeError) -> String {
        format!("Log file error in '{}': {err}.", self.condition.display_name())
    }

    fn fail(&self, reason: String) {
        warn!(condition = %self.condition.display_name(), %reason, "watcher failed");
        self.emit(TriggerEvent::Failed {
            id: self.condition.name.clone(),
            reason,
        });
    }

    /// Send a terminal event unless another path already started cleanup.
    fn emit(&self, event: TriggerEvent) {
        if self.stop.is_raised() {
            debug!(condition = %self.condition.name, ?event, "stop flag raised; suppressing trigger");
            return;
        }
        if self.triggers.send(event).is_err() {
            debug!(condition = %self.condition.name, "coordinator gone; trigger dropped");
        }
    }
}
