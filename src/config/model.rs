// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::{ActionKind, ConditionKind};

/// Default encoding for `log` watch items.
pub const DEFAULT_LOG_ENCODING: &str = "utf-8";

/// Configuration document as read from disk, before validation.
///
/// ```json
/// {
///   "initial_run": "C:/Games/launcher.exe",
///   "watch": [
///     { "name": "game.exe", "type": "program", "timeout_seconds": 60 },
///     { "name": "logs/game.log", "type": "log", "pattern": "READY",
///       "encoding": "utf-8", "timeout_seconds": 30 }
///   ],
///   "action": [
///     { "action": "close", "type": "program", "name": "launcher.exe" }
///   ]
/// }
/// ```
///
/// Fields are deliberately loose (`Option`, plain strings) so that
/// [`RunConfig::try_from`] can report item-level problems instead of a
/// generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Executable launched once before watching starts.
    #[serde(default)]
    pub initial_run: Option<String>,

    /// Ordered condition descriptors.
    #[serde(default)]
    pub watch: Vec<RawWatchItem>,

    /// Ordered cleanup steps.
    #[serde(default)]
    pub action: Vec<RawActionItem>,
}

/// One entry of the `watch` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWatchItem {
    /// Program name for `program` items, log file path for `log` items.
    #[serde(default)]
    pub name: Option<String>,

    /// `"program"` or `"log"`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Per-condition deadline. Required, must be positive.
    #[serde(default)]
    pub timeout_seconds: Option<f64>,

    /// Substring to look for in new log lines (`log` only).
    #[serde(default)]
    pub pattern: Option<String>,

    /// Text encoding of the log file (`log` only).
    #[serde(default)]
    pub encoding: Option<String>,
}

/// One entry of the `action` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawActionItem {
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// Kind-specific parameters of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionSpec {
    /// Satisfied once a process with the condition's name is running.
    Process,
    /// Satisfied once a line containing `pattern` is appended to the file.
    Log { pattern: String, encoding: String },
}

/// A validated, immutable condition. Its `name` is its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub name: String,
    pub timeout_secs: f64,
    pub spec: ConditionSpec,
}

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        match self.spec {
            ConditionSpec::Process => ConditionKind::Process,
            ConditionSpec::Log { .. } => ConditionKind::Log,
        }
    }

    pub fn deadline(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::MAX)
    }

    /// Short name for messages: the program name, or the log file's
    /// basename.
    pub fn display_name(&self) -> String {
        match self.spec {
            ConditionSpec::Process => self.name.clone(),
            ConditionSpec::Log { .. } => Path::new(&self.name)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.name.clone()),
        }
    }
}

/// A validated cleanup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub target: String,
}

/// Validated configuration shared read-only by every watcher and the
/// cleanup executor.
#[derive(Debug, Clone)]
pub struct RunConfig {
    initial_run: Option<PathBuf>,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
}

impl RunConfig {
    /// Build without validation. Callers go through `RunConfig::try_from`.
    pub(crate) fn new_unchecked(
        initial_run: Option<PathBuf>,
        conditions: Vec<Condition>,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            initial_run,
            conditions,
            actions,
        }
    }

    pub fn initial_run(&self) -> Option<&Path> {
        self.initial_run.as_deref()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}
