// src/exec/mod.rs

//! OS process layer.
//!
//! - [`process_table`] provides the `ProcessTable` trait (is-running and
//!   force-kill by name) and the `sysinfo`-backed `SystemProcessTable`.
//! - [`launch`] starts the optional `initial_run` program.

pub mod launch;
pub mod process_table;

pub use launch::spawn_initial;
pub use process_table::{ProcessTable, SystemProcessTable};
