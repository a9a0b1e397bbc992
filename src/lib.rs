// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod signals;
pub mod supervisor;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::{ConditionSpec, RunConfig};
use crate::errors::Result;
use crate::exec::SystemProcessTable;
use crate::supervisor::Supervisor;

/// High-level entry point used by `main.rs`. Returns the process exit
/// status.
///
/// This wires together:
/// - config loading and validation
/// - the OS process table
/// - the supervisor (initial launch, watchers, coordinator, cleanup)
/// - Ctrl-C / SIGTERM handling
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_and_validate(&args.config)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(0);
    }

    let processes = Arc::new(SystemProcessTable::new());
    let supervisor = Supervisor::new(cfg, processes);
    let finished = supervisor.run_until(signals::shutdown_requested()).await?;

    println!("handoff: {}", finished.outcome.reason());
    Ok(finished.outcome.exit_code(args.strict_exit))
}

/// Simple dry-run output: print the initial program, conditions and actions.
fn print_dry_run(cfg: &RunConfig) {
    println!("handoff dry-run");
    match cfg.initial_run() {
        Some(path) => println!("  initial_run = {}", path.display()),
        None => println!("  initial_run = (none)"),
    }
    println!();

    println!("watch ({}):", cfg.conditions().len());
    for condition in cfg.conditions() {
        println!("  - {} [{}]", condition.name, condition.kind());
        println!("      timeout_seconds: {}", condition.timeout_secs);
        if let ConditionSpec::Log { pattern, encoding } = &condition.spec {
            println!("      pattern: {pattern:?}");
            println!("      encoding: {encoding}");
        }
    }
    println!();

    println!("action ({}):", cfg.actions().len());
    for action in cfg.actions() {
        println!("  - close program {}", action.target);
    }

    debug!("dry-run complete (nothing launched)");
}
