//! Records written by hosts and read back later.

use std::fs;

use deep_core::record::{decode, encode};
use deep_core::{ElicitationEngine, RecordError, RiskAttitude};
use deep_types::{Cents, Choice, Procedure, ProcedureKind, StepCount};
use deep_utils::{FileSyncPolicy, PersistMode, WriteOptions, write_unique};

const TEST_WRITE: WriteOptions = WriteOptions {
    file_sync: FileSyncPolicy::SkipSync,
    mode: PersistMode::Default,
};

fn finished(kind: ProcedureKind, choices: &[Choice]) -> ElicitationEngine {
    let steps = StepCount::try_new(choices.len() as u32).expect("valid step count");
    ElicitationEngine::replay(Procedure::new(kind, steps), choices).expect("replay")
}

#[test]
fn decoded_record_regenerates_what_the_subject_saw() {
    let choices: Vec<Choice> = (0..12)
        .map(|i| if i % 3 == 0 { Choice::OptionB } else { Choice::OptionA })
        .collect();
    let engine = finished(ProcedureKind::Time, &choices);
    let original = engine.completed().unwrap();

    let decoded = decode(&engine.serialize().unwrap()).unwrap();

    assert_eq!(decoded, original);
    assert_eq!(decoded.steps(), original.steps());
    assert_eq!(decoded.estimate(), original.estimate());
}

#[test]
fn longest_session_round_trips() {
    let choices = vec![Choice::OptionB; usize::from(StepCount::MAX)];
    let session = finished(ProcedureKind::Risk, &choices).completed().unwrap();

    let text = encode(&session).unwrap();
    assert!(text.is_ascii());
    assert_eq!(decode(&text).unwrap(), session);
}

#[test]
fn stored_record_file_decodes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let engine = finished(ProcedureKind::Risk, &[Choice::OptionA, Choice::OptionA]);
    let record = engine.serialize().unwrap();

    let path = write_unique(
        dir.path(),
        &engine.procedure().to_string(),
        "json",
        format!("{record}\n").as_bytes(),
        TEST_WRITE,
    )
    .unwrap();
    assert_eq!(path.file_name().unwrap(), "DEEPRISK2.json");

    let session = decode(&fs::read_to_string(&path).unwrap()).unwrap();
    let estimate = session.estimate();
    assert_eq!(estimate.bracket().upper(), Cents::new(2500));
    assert_eq!(estimate.risk_attitude(), Some(RiskAttitude::Averse));
}

#[test]
fn decode_rejects_extra_fields_and_garbage() {
    let extra = r#"{"format":"DEEP","version":1,"procedure":"TIME","stepCount":1,"responses":[0],"estimate":{"lowerCents":0,"upperCents":5000},"note":"x"}"#;
    assert!(matches!(decode(extra), Err(RecordError::Json(_))));

    assert!(matches!(decode("DEEPTIME3"), Err(RecordError::Json(_))));

    let unknown_kind = r#"{"format":"DEEP","version":1,"procedure":"CORE","stepCount":1,"responses":[0],"estimate":{"lowerCents":0,"upperCents":5000}}"#;
    assert!(matches!(decode(unknown_kind), Err(RecordError::Json(_))));
}
