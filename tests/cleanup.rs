// tests/cleanup.rs

mod common;
use crate::common::{init_tracing, FakeProcessTable};

use std::sync::Arc;

use tokio::sync::Barrier;

use handoff::config::Action;
use handoff::engine::{ActionReport, ActionStatus, CleanupExecutor, StopFlag};
use handoff::types::ActionKind;

fn close(target: &str) -> Action {
    Action {
        kind: ActionKind::Close,
        target: target.to_string(),
    }
}

fn executor(table: &FakeProcessTable, stop: StopFlag, targets: &[&str]) -> CleanupExecutor {
    CleanupExecutor::new(
        targets.iter().map(|t| close(t)).collect(),
        Arc::new(table.clone()),
        stop,
    )
}

#[test]
fn test_actions_run_in_declared_order_and_raise_stop() {
    init_tracing();
    let table = FakeProcessTable::new();
    table.start("b.exe");
    table.start("a.exe");
    let stop = StopFlag::new();

    let report = executor(&table, stop.clone(), &["a.exe", "ghost.exe", "b.exe"])
        .run("All monitoring conditions met")
        .expect("first call runs the sequence");

    assert!(stop.is_raised());
    assert_eq!(report.reason, "All monitoring conditions met");
    assert_eq!(
        report.actions,
        vec![
            ActionReport {
                target: "a.exe".to_string(),
                status: ActionStatus::Closed { killed: 1 },
            },
            ActionReport {
                target: "ghost.exe".to_string(),
                status: ActionStatus::AlreadyClosed,
            },
            ActionReport {
                target: "b.exe".to_string(),
                status: ActionStatus::Closed { killed: 1 },
            },
        ]
    );
    assert_eq!(table.kill_calls(), vec!["a.exe", "b.exe"]);
}

#[test]
fn test_failed_termination_does_not_abort_sequence() {
    init_tracing();
    let table = FakeProcessTable::new();
    table.start("stubborn.exe");
    table.start("next.exe");
    table.fail_kills_for("stubborn.exe");

    let report = executor(&table, StopFlag::new(), &["stubborn.exe", "next.exe"])
        .run("Watch job timeout/failure: x")
        .unwrap();

    assert!(matches!(report.actions[0].status, ActionStatus::Failed(ref msg) if msg.contains("access denied")));
    assert_eq!(report.actions[1].status, ActionStatus::Closed { killed: 1 });
    assert_eq!(table.kill_calls(), vec!["stubborn.exe", "next.exe"]);
}

#[test]
fn test_second_call_is_a_no_op() {
    init_tracing();
    let table = FakeProcessTable::new();
    table.start("app.exe");
    let exec = executor(&table, StopFlag::new(), &["app.exe"]);

    assert!(!exec.has_started());
    assert!(exec.run("first").is_some());
    assert!(exec.has_started());

    table.start("app.exe");
    assert!(exec.run("second").is_none());
    assert_eq!(table.kill_calls(), vec!["app.exe"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_execute_sequence_once() {
    init_tracing();
    let table = FakeProcessTable::new();
    table.start("a.exe");
    table.start("b.exe");
    let exec = Arc::new(executor(&table, StopFlag::new(), &["a.exe", "b.exe"]));

    let callers = 8;
    let barrier = Arc::new(Barrier::new(callers));
    let mut handles = Vec::new();
    for i in 0..callers {
        let exec = Arc::clone(&exec);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            exec.run(&format!("caller {i}"))
        }));
    }

    let mut reports = Vec::new();
    for h in handles {
        if let Some(report) = h.await.unwrap() {
            reports.push(report);
        }
    }

    assert_eq!(reports.len(), 1);
    assert_eq!(table.kill_calls(), vec!["a.exe", "b.exe"]);
}
