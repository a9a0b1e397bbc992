// tests/condition_state.rs

use proptest::prelude::*;

use handoff::engine::{ConditionState, Decision, Outcome, TriggerEvent};

fn satisfied(id: &str) -> TriggerEvent {
    TriggerEvent::Satisfied { id: id.to_string() }
}

fn failed(id: &str, reason: &str) -> TriggerEvent {
    TriggerEvent::Failed {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

#[test]
fn test_finishes_only_when_all_conditions_met() {
    let mut state = ConditionState::new(["A", "B", "C"]);

    assert_eq!(state.apply(satisfied("A")), Decision::Continue);
    assert_eq!(state.apply(satisfied("C")), Decision::Continue);
    assert_eq!(state.pending(), vec!["B"]);
    assert_eq!(state.apply(satisfied("B")), Decision::Finish(Outcome::AllSatisfied));
    assert!(state.all_satisfied());
}

#[test]
fn test_empty_state_is_vacuously_satisfied() {
    let state = ConditionState::new(Vec::<String>::new());

    assert!(state.is_empty());
    assert_eq!(state.len(), 0);
    assert!(state.all_satisfied());
    assert!(state.pending().is_empty());
}

#[test]
fn test_failure_finishes_immediately_with_its_reason() {
    let mut state = ConditionState::new(["A", "B"]);

    assert_eq!(state.apply(satisfied("A")), Decision::Continue);
    let decision = state.apply(failed("B", "Program 'B' timed out after 3s."));

    match decision {
        Decision::Finish(outcome) => {
            assert_eq!(
                outcome,
                Outcome::Failed {
                    id: "B".to_string(),
                    reason: "Program 'B' timed out after 3s.".to_string(),
                }
            );
            assert_eq!(
                outcome.reason(),
                "Watch job timeout/failure: Program 'B' timed out after 3s."
            );
        }
        Decision::Continue => panic!("failure must finish the run"),
    }
}

#[test]
fn test_interrupt_finishes_immediately() {
    let mut state = ConditionState::new(["A"]);
    assert_eq!(
        state.apply(TriggerEvent::Interrupted),
        Decision::Finish(Outcome::Interrupted)
    );
    assert_eq!(state.is_satisfied("A"), Some(false));
}

#[test]
fn test_unknown_condition_is_ignored() {
    let mut state = ConditionState::new(["A", "B"]);

    assert_eq!(state.apply(satisfied("Z")), Decision::Continue);
    assert_eq!(state.is_satisfied("Z"), None);
    assert_eq!(state.pending(), vec!["A", "B"]);
}

#[test]
fn test_satisfied_flag_never_reverts() {
    let mut state = ConditionState::new(["A", "B"]);

    state.apply(satisfied("A"));
    state.apply(satisfied("A"));
    assert_eq!(state.is_satisfied("A"), Some(true));
    assert_eq!(state.is_satisfied("B"), Some(false));
}

#[test]
fn test_exit_codes() {
    assert_eq!(Outcome::AllSatisfied.exit_code(false), 0);
    assert_eq!(Outcome::Interrupted.exit_code(false), 0);
    assert_eq!(Outcome::AllSatisfied.exit_code(true), 0);
    assert_eq!(Outcome::Interrupted.exit_code(true), 2);
    assert_eq!(Outcome::ChannelClosed.exit_code(true), 2);
}

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("cond_{i}")).collect()
}

proptest! {
    #[test]
    fn prop_conjunction_is_order_independent(
        order in (1..8usize).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let names = ids(order.len());
        let mut state = ConditionState::new(names.clone());

        for (step, &i) in order.iter().enumerate() {
            let decision = state.apply(satisfied(&names[i]));
            if step + 1 == order.len() {
                prop_assert_eq!(decision, Decision::Finish(Outcome::AllSatisfied));
            } else {
                prop_assert_eq!(decision, Decision::Continue);
            }
        }
    }

    #[test]
    fn prop_first_failure_wins(
        (order, first_fail, second_fail) in (2..8usize).prop_flat_map(|n| (
            Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
            0..n,
            0..n,
        ))
    ) {
        let names = ids(order.len());
        let mut state = ConditionState::new(names.clone());

        // Everything except the two failing positions succeeds first, in
        // shuffled order; then the failures arrive.
        let mut finished = None;
        for &i in order.iter().filter(|&&i| i != first_fail && i != second_fail) {
            prop_assert_eq!(state.apply(satisfied(&names[i])), Decision::Continue);
        }
        for (i, tag) in [(first_fail, "first"), (second_fail, "second")] {
            if let Decision::Finish(outcome) = state.apply(failed(&names[i], tag)) {
                finished = Some(outcome);
                break;
            }
        }

        prop_assert_eq!(
            finished,
            Some(Outcome::Failed { id: names[first_fail].clone(), reason: "first".to_string() })
        );
    }
}
