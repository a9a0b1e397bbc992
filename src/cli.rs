// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `handoff`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "handoff",
    version,
    about = "Launch a program, wait until every watched condition holds, then run the cleanup actions.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (JSON, or TOML with a `.toml` extension).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HANDOFF_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the watch plan, but don't launch or watch
    /// anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 2 when the run ends in a failure or an interrupt
    /// (cleanup still runs). Default: every completed cleanup exits 0.
    #[arg(long)]
    pub strict_exit: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
