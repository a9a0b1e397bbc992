// src/engine/flags.rs

//! The two process-wide flags shared by every task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative stop signal for watcher units.
///
/// Raised once by the cleanup executor; watchers check it at the top of
/// every poll iteration and before every emission.
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    raised: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

/// One-shot guard around the cleanup sequence. No reset.
#[derive(Debug, Clone, Default)]
pub struct CleanupGuard {
    claimed: Arc<AtomicBool>,
}

impl CleanupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim the guard. Only the first caller gets `true`.
    pub fn try_claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::SeqCst)
    }
}
