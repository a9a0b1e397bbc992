// src/watch/mod.rs

//! Condition watching.
//!
//! This module is responsible for:
//! - Probing one condition at a time: process presence or a new log line
//!   containing a pattern ([`probe`], [`log_tail`]).
//! - Running one watcher unit per condition with its own deadline and poll
//!   interval ([`unit`]).
//!
//! It does **not** decide when the run is over; it only turns probe results
//! into trigger events for the coordinator.

pub mod log_tail;
pub mod probe;
pub mod unit;

pub use log_tail::LogTail;
pub use probe::{build_probe, LogProbe, Probe, ProbeError, ProcessProbe};
pub use unit::WatcherUnit;
