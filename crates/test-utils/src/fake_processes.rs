use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use handoff::exec::ProcessTable;

#[derive(Debug, Default)]
struct FakeState {
    running: HashSet<String>,
    failing_kills: HashSet<String>,
    kill_calls: Vec<String>,
}

/// A scriptable process table that:
/// - reports a process as running once `start` has been called for it
/// - records every `force_kill` call in order
/// - can be told to fail kills for specific names.
///
/// Names are compared case-insensitively, like the real table.
#[derive(Debug, Clone, Default)]
pub struct FakeProcessTable {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, name: &str) {
        self.inner.lock().unwrap().running.insert(name.to_lowercase());
    }

    pub fn stop(&self, name: &str) {
        self.inner.lock().unwrap().running.remove(&name.to_lowercase());
    }

    pub fn fail_kills_for(&self, name: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_kills
            .insert(name.to_lowercase());
    }

    /// Names passed to `force_kill`, in call order.
    pub fn kill_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().kill_calls.clone()
    }
}

impl ProcessTable for FakeProcessTable {
    fn is_running(&self, name: &str) -> bool {
        self.inner.lock().unwrap().running.contains(&name.to_lowercase())
    }

    fn force_kill(&self, name: &str) -> Result<usize> {
        let mut state = self.inner.lock().unwrap();
        let key = name.to_lowercase();
        state.kill_calls.push(name.to_string());

        if state.failing_kills.contains(&key) {
            return Err(anyhow!("access denied while terminating '{name}'"));
        }
        Ok(usize::from(state.running.remove(&key)))
    }
}
