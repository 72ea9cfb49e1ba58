//! End-to-end engine behaviour across procedures and step counts.

use deep_core::{ElicitationEngine, EngineError, EngineState, Operation, Question};
use deep_types::{Choice, Procedure, ProcedureId, ProcedureKind, Step, StepCount};
use insta::assert_snapshot;

fn procedure(kind: ProcedureKind, steps: u32) -> Procedure {
    Procedure::new(kind, StepCount::try_new(steps).expect("valid step count"))
}

/// Drive a fresh engine with `choices`, returning every step shown and the record.
fn drive(procedure: Procedure, choices: &[u8]) -> (Vec<Step>, String) {
    let mut engine = ElicitationEngine::new(procedure);
    let mut steps = vec![engine.begin().expect("begin")];

    for (i, &choice) in choices.iter().enumerate() {
        engine.save_choice(Some(choice)).expect("save_choice");
        match engine.next_question().expect("next_question") {
            Question::Next(step) => steps.push(step),
            Question::Complete => assert_eq!(i + 1, choices.len(), "completed early"),
        }
    }

    let record = engine.serialize().expect("serialize");
    (steps, record)
}

fn render(steps: &[Step]) -> String {
    steps
        .iter()
        .map(|step| {
            format!(
                "{}. A: {} | B: {}",
                step.index().ordinal(),
                step.pair().option_a,
                step.pair().option_b
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn every_kind_completes_after_exactly_step_count_cycles() {
    for kind in ProcedureKind::ALL {
        for steps in [1, 2, 7, 12, StepCount::MAX as u32] {
            let mut engine = ElicitationEngine::new(procedure(kind, steps));
            engine.begin().unwrap();

            for i in 0..steps {
                assert!(!engine.is_complete());
                engine.save_choice(Some((i % 2) as u8)).unwrap();
                let question = engine.next_question().unwrap();
                assert_eq!(question == Question::Complete, i + 1 == steps);
            }

            assert_eq!(engine.state(), EngineState::Complete);
            assert_eq!(engine.history().len(), steps as usize);
            for (i, response) in engine.history().iter().enumerate() {
                assert_eq!(response.step_index.as_usize(), i);
            }
        }
    }
}

#[test]
fn time_regression_fixture() {
    let (steps, record) = drive(procedure(ProcedureKind::Time, 3), &[0, 1, 0]);

    assert_snapshot!(render(&steps), @r"
    1. A: Receive $50 today | B: Receive $100 in 3 months
    2. A: Receive $25 today | B: Receive $100 in 3 months
    3. A: Receive $37.50 today | B: Receive $100 in 3 months
    ");
    assert_snapshot!(record, @r#"{"format":"DEEP","version":1,"procedure":"TIME","stepCount":3,"responses":[0,1,0],"estimate":{"lowerCents":2500,"upperCents":3750}}"#);
}

#[test]
fn risk_regression_fixture() {
    let (steps, record) = drive(procedure(ProcedureKind::Risk, 4), &[1, 1, 0, 1]);

    assert_snapshot!(render(&steps), @r"
    1. A: Receive $50 for sure | B: 50% chance to win $100, 50% chance to win $0
    2. A: Receive $75 for sure | B: 50% chance to win $100, 50% chance to win $0
    3. A: Receive $87.50 for sure | B: 50% chance to win $100, 50% chance to win $0
    4. A: Receive $81.25 for sure | B: 50% chance to win $100, 50% chance to win $0
    ");
    assert_snapshot!(record, @r#"{"format":"DEEP","version":1,"procedure":"RISK","stepCount":4,"responses":[1,1,0,1],"estimate":{"lowerCents":8125,"upperCents":8750}}"#);
}

#[test]
fn identical_inputs_produce_identical_sessions() {
    let choices = [1, 0, 0, 1, 1, 0, 1, 0];
    for kind in ProcedureKind::ALL {
        let first = drive(procedure(kind, 8), &choices);
        let second = drive(procedure(kind, 8), &choices);
        assert_eq!(first, second);
    }
}

#[test]
fn replay_serializes_like_a_live_session() {
    let choices = [Choice::OptionB, Choice::OptionA, Choice::OptionB];
    let fixture = procedure(ProcedureKind::Time, 3);

    let replayed = ElicitationEngine::replay(fixture, &choices).unwrap();
    let (steps, record) = drive(fixture, &[1, 0, 1]);

    assert_eq!(replayed.serialize().unwrap(), record);
    assert_eq!(replayed.completed().unwrap().steps(), steps);
}

#[test]
fn rejected_input_never_changes_the_outcome() {
    let fixture = procedure(ProcedureKind::Risk, 2);
    let mut engine = ElicitationEngine::new(fixture);
    engine.begin().unwrap();

    for bad in [None, Some(2), Some(255)] {
        let err = engine.save_choice(bad).unwrap_err();
        assert!(err.is_recoverable());
    }
    engine.save_choice(Some(1)).unwrap();
    engine.next_question().unwrap();
    assert!(engine.save_choice(None).unwrap_err().is_recoverable());
    engine.save_choice(Some(0)).unwrap();
    assert_eq!(engine.next_question().unwrap(), Question::Complete);

    let (_, clean) = drive(fixture, &[1, 0]);
    assert_eq!(engine.serialize().unwrap(), clean);
}

#[test]
fn serialize_before_completion_is_a_sequence_error() {
    let mut engine = ElicitationEngine::new(procedure(ProcedureKind::Time, 2));
    engine.begin().unwrap();
    engine.save_choice(Some(0)).unwrap();

    let err = engine.serialize().unwrap_err();
    let EngineError::Sequence(seq) = &err else {
        panic!("expected a sequence error, got {err:?}");
    };
    assert_eq!(seq.operation, Operation::Serialize);
}

#[test]
fn next_question_after_complete_is_a_sequence_error() {
    let mut engine = ElicitationEngine::replay(
        procedure(ProcedureKind::Time, 1),
        &[Choice::OptionA],
    )
    .unwrap();
    assert!(engine.is_complete());

    let err = engine.next_question().unwrap_err();
    assert_eq!(err.operation, Operation::NextQuestion);
    assert_eq!(err.state, EngineState::Complete);
}

#[test]
fn identifier_drives_engine_configuration() {
    let id = ProcedureId::parse("Block 3: deeprisk12 (do not edit)").unwrap();
    let engine = ElicitationEngine::new(id.procedure());
    assert!(engine.is_risk_variant());
    assert_eq!(engine.procedure().step_count().get(), 12);
}
