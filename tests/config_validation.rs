// tests/config_validation.rs

mod common;
use crate::common::builders::{RunConfigBuilder, WatchItemBuilder};
use crate::common::config_file;

use std::process::Command;

use handoff::config::{load_and_validate, ConditionSpec, RunConfig};
use handoff::errors::HandoffError;
use handoff::types::ActionKind;

fn expect_config_error(result: Result<RunConfig, HandoffError>) -> String {
    match result {
        Err(HandoffError::ConfigError(msg)) => msg,
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_full_json_config_loads() {
    let file = config_file(
        r#"{
            "initial_run": "launcher.exe",
            "watch": [
                { "name": "game.exe", "type": "program", "timeout_seconds": 60 },
                { "name": "logs/game.log", "type": "log", "pattern": "READY",
                  "encoding": "latin-1", "timeout_seconds": 2.5 }
            ],
            "action": [
                { "action": "close", "type": "program", "name": "launcher.exe" },
                { "action": "close", "type": "program", "name": "game.exe" }
            ]
        }"#,
        ".json",
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.initial_run().unwrap().to_str(), Some("launcher.exe"));
    assert_eq!(cfg.conditions().len(), 2);
    assert_eq!(cfg.conditions()[0].name, "game.exe");
    assert_eq!(cfg.conditions()[0].spec, ConditionSpec::Process);
    assert_eq!(cfg.conditions()[1].timeout_secs, 2.5);
    assert_eq!(cfg.conditions()[1].display_name(), "game.log");
    assert_eq!(
        cfg.conditions()[1].spec,
        ConditionSpec::Log {
            pattern: "READY".to_string(),
            encoding: "latin-1".to_string(),
        }
    );

    let targets: Vec<_> = cfg.actions().iter().map(|a| a.target.as_str()).collect();
    assert_eq!(targets, vec!["launcher.exe", "game.exe"]);
    assert!(cfg.actions().iter().all(|a| a.kind == ActionKind::Close));
}

#[test]
fn test_toml_config_is_selected_by_extension() {
    let file = config_file(
        r#"
[[watch]]
name = "app.exe"
type = "program"
timeout_seconds = 5

[[action]]
action = "close"
type = "program"
name = "app.exe"
"#,
        ".toml",
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.conditions()[0].timeout_secs, 5.0);
    assert!(cfg.initial_run().is_none());
    assert_eq!(cfg.actions().len(), 1);
}

#[test]
fn test_missing_timeout_is_rejected() {
    let raw = RunConfigBuilder::new()
        .watch(WatchItemBuilder::program("app.exe", 5.0).build())
        .watch(WatchItemBuilder::program("other.exe", 5.0).no_timeout().build())
        .raw();

    let msg = expect_config_error(RunConfig::try_from(raw));
    assert!(msg.contains("Watch item 2"));
    assert!(msg.contains("other.exe"));
    assert!(msg.contains("timeout_seconds"));
}

#[test]
fn test_non_positive_timeout_is_rejected() {
    for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
        let raw = RunConfigBuilder::new()
            .watch(WatchItemBuilder::program("app.exe", bad).build())
            .raw();
        let msg = expect_config_error(RunConfig::try_from(raw));
        assert!(msg.contains("timeout_seconds"), "timeout {bad}: {msg}");
    }
}

#[test]
fn test_log_item_without_pattern_is_rejected() {
    let raw = RunConfigBuilder::new()
        .watch(WatchItemBuilder::log("app.log", "", 5.0).build())
        .raw();

    let msg = expect_config_error(RunConfig::try_from(raw));
    assert!(msg.contains("missing a 'pattern'"));
}

#[test]
fn test_log_encoding_defaults_to_utf8() {
    let cfg = RunConfigBuilder::new()
        .watch(WatchItemBuilder::log("app.log", "READY", 5.0).build())
        .build();

    match &cfg.conditions()[0].spec {
        ConditionSpec::Log { encoding, .. } => assert_eq!(encoding, "utf-8"),
        other => panic!("expected log spec, got {other:?}"),
    }
}

#[test]
fn test_unknown_watch_type_is_skipped() {
    let mut unknown = WatchItemBuilder::program("svc", 5.0).build();
    unknown.kind = Some("service".to_string());

    let cfg = RunConfigBuilder::new()
        .watch(unknown)
        .watch(WatchItemBuilder::program("app.exe", 5.0).build())
        .build();

    assert_eq!(cfg.conditions().len(), 1);
    assert_eq!(cfg.conditions()[0].name, "app.exe");
}

#[test]
fn test_config_without_conditions_is_rejected() {
    let raw = RunConfigBuilder::new().close_program("app.exe").raw();
    let msg = expect_config_error(RunConfig::try_from(raw));
    assert!(msg.contains("at least one"));
}

#[test]
fn test_duplicate_condition_names_are_rejected() {
    let raw = RunConfigBuilder::new()
        .watch(WatchItemBuilder::program("app.exe", 5.0).build())
        .watch(WatchItemBuilder::program("app.exe", 9.0).build())
        .raw();

    let msg = expect_config_error(RunConfig::try_from(raw));
    assert!(msg.contains("duplicates"));
}

#[test]
fn test_unknown_action_is_rejected() {
    let file = config_file(
        r#"{
            "watch": [{ "name": "app.exe", "type": "program", "timeout_seconds": 1 }],
            "action": [{ "action": "restart", "type": "program", "name": "app.exe" }]
        }"#,
        ".json",
    );

    let msg = expect_config_error(load_and_validate(file.path()));
    assert!(msg.contains("Action 1"));
    assert!(msg.contains("restart"));
}

#[test]
fn test_invalid_json_returns_parse_error() {
    let file = config_file("{ \"watch\": [ ", ".json");
    match load_and_validate(file.path()) {
        Err(HandoffError::JsonError(_)) => {}
        other => panic!("Expected JsonError, got: {:?}", other),
    }
}

#[test]
fn test_missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");

    let msg = expect_config_error(load_and_validate(&path));
    assert!(msg.contains("not found"));
}

#[test]
fn test_binary_exits_1_on_validation_failure_before_watching() {
    let file = config_file(
        r#"{
            "watch": [{ "name": "app.exe", "type": "program" }],
            "action": [{ "action": "close", "type": "program", "name": "app.exe" }]
        }"#,
        ".json",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_handoff"))
        .arg(file.path())
        .env("HANDOFF_LOG", "debug")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("timeout_seconds"), "stderr: {stderr}");
    assert!(!stderr.contains("monitoring started"), "stderr: {stderr}");
    assert!(!stderr.contains("cleanup sequence activated"), "stderr: {stderr}");
}

#[test]
fn test_binary_dry_run_prints_plan() {
    let file = config_file(
        r#"{
            "watch": [{ "name": "app.exe", "type": "program", "timeout_seconds": 5 }],
            "action": [{ "action": "close", "type": "program", "name": "app.exe" }]
        }"#,
        ".json",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_handoff"))
        .arg(file.path())
        .arg("--dry-run")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("app.exe [program]"));
    assert!(stdout.contains("close program app.exe"));
}
