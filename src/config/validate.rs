// src/config/validate.rs

use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::config::model::{
    Action, Condition, ConditionSpec, RawActionItem, RawConfigFile, RawWatchItem, RunConfig,
    DEFAULT_LOG_ENCODING,
};
use crate::errors::{HandoffError, Result};
use crate::types::{ActionKind, ConditionKind};

impl TryFrom<RawConfigFile> for RunConfig {
    type Error = crate::errors::HandoffError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let initial_run = validate_initial_run(&raw)?;
        let conditions = validate_watch_items(&raw.watch)?;
        let actions = validate_actions(&raw.action)?;
        Ok(RunConfig::new_unchecked(initial_run, conditions, actions))
    }
}

fn validate_initial_run(cfg: &RawConfigFile) -> Result<Option<PathBuf>> {
    match cfg.initial_run.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(path) => Ok(Some(PathBuf::from(path))),
    }
}

fn validate_watch_items(items: &[RawWatchItem]) -> Result<Vec<Condition>> {
    let mut conditions = Vec::with_capacity(items.len());
    let mut seen: HashSet<String> = HashSet::new();

    for (i, item) in items.iter().enumerate() {
        let position = i + 1;
        let Some(condition) = validate_watch_item(position, item)? else {
            continue;
        };

        if !seen.insert(condition.name.clone()) {
            return Err(HandoffError::ConfigError(format!(
                "Watch item {position} ('{}') duplicates the name of an earlier watch item.",
                condition.name
            )));
        }
        conditions.push(condition);
    }

    if conditions.is_empty() {
        return Err(HandoffError::ConfigError(
            "config must contain at least one 'program' or 'log' watch item".to_string(),
        ));
    }

    Ok(conditions)
}

/// Returns `Ok(None)` for items of an unrecognised type, which are skipped.
fn validate_watch_item(position: usize, item: &RawWatchItem) -> Result<Option<Condition>> {
    let name = item.name.as_deref().map(str::trim).unwrap_or_default();

    let timeout_secs = match item.timeout_seconds {
        Some(t) if t.is_finite() && t > 0.0 && std::time::Duration::try_from_secs_f64(t).is_ok() => t,
        _ => {
            return Err(HandoffError::ConfigError(format!(
                "Watch item {position} ('{name}') must contain a valid positive 'timeout_seconds' field."
            )));
        }
    };

    let kind = match item.kind.as_deref().and_then(ConditionKind::from_config_type) {
        Some(kind) => kind,
        None => {
            warn!(
                item = position,
                name = %name,
                kind = ?item.kind,
                "skipping unrecognized watch type in config"
            );
            return Ok(None);
        }
    };

    if name.is_empty() {
        return Err(HandoffError::ConfigError(format!(
            "Watch item {position} is missing a 'name' field."
        )));
    }

    let spec = match kind {
        ConditionKind::Process => ConditionSpec::Process,
        ConditionKind::Log => {
            let pattern = item.pattern.clone().unwrap_or_default();
            if pattern.is_empty() {
                return Err(HandoffError::ConfigError(format!(
                    "Log watch item '{name}' is missing a 'pattern' field."
                )));
            }
            let encoding = item
                .encoding
                .clone()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_ENCODING.to_string());
            ConditionSpec::Log { pattern, encoding }
        }
    };

    Ok(Some(Condition {
        name: name.to_string(),
        timeout_secs,
        spec,
    }))
}

fn validate_actions(items: &[RawActionItem]) -> Result<Vec<Action>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| validate_action(i + 1, item))
        .collect()
}

fn validate_action(position: usize, item: &RawActionItem) -> Result<Action> {
    let kind = ActionKind::from_str(item.action.as_deref().unwrap_or_default()).map_err(|e| {
        HandoffError::ConfigError(format!("Action {position}: {e}"))
    })?;

    let target_type = item.kind.as_deref().map(str::trim).unwrap_or_default();
    if !target_type.eq_ignore_ascii_case("program") {
        return Err(HandoffError::ConfigError(format!(
            "Action {position}: unsupported target type '{target_type}' (expected \"program\")"
        )));
    }

    let target = item.name.as_deref().map(str::trim).unwrap_or_default();
    if target.is_empty() {
        return Err(HandoffError::ConfigError(format!(
            "Action {position} is missing a 'name' field."
        )));
    }

    Ok(Action {
        kind,
        target: target.to_string(),
    })
}
