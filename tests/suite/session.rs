//! Full host sessions driven by scripted subject input.

use deep_cli::{Console, HostError, HostSession, PageError, Placement, SurveyPage};
use deep_config::{DeepConfig, SessionOptions};
use deep_core::record::decode;
use deep_types::{ProcedureId, ProcedureKind};

fn transcript(console: Console<&[u8], Vec<u8>>) -> String {
    String::from_utf8(console.into_output()).expect("utf8 output")
}

#[test]
fn risk_session_with_warm_up_quiz() {
    let mut page = SurveyPage::new();
    let mut session = page
        .load("Gambles block DEEPRISK3", SessionOptions::default())
        .unwrap();
    assert_eq!(session.placement(), Placement::Canonical);

    // Quiz: $20, True, 90%, Losing $1. Then three choices.
    let input = "1\n1\n3\n3\n1\n2\n1\n";
    let mut console = Console::new(input.as_bytes(), Vec::new());
    let record = session.run(&mut console).unwrap();

    let decoded = decode(&record).unwrap();
    assert_eq!(decoded.kind(), ProcedureKind::Risk);
    assert_eq!(decoded.choices().len(), 3);
    assert_eq!(session.engine().history().len(), 3);

    let output = transcript(console);
    let quiz_at = output.find("Warm Up Questions").unwrap();
    let first_step_at = output.find("Question 1 of 3").unwrap();
    assert!(quiz_at < first_step_at);
    assert!(output.contains("  2) 50% chance to win $100, 50% chance to win $0"));
}

#[test]
fn skipped_tutorial_goes_straight_to_the_first_step() {
    let options = SessionOptions {
        skip_tutorial: true,
        shuffle_time_options: false,
        ..SessionOptions::default()
    };
    let mut page = SurveyPage::new();
    let mut session = page.load("DEEPTIME2", options).unwrap();
    let mut console = Console::new("1\n1\n".as_bytes(), Vec::new());

    let record = session.run(&mut console).unwrap();

    assert!(record.contains(r#""responses":[0,0]"#));
    let output = transcript(console);
    assert!(!output.contains("Warm Up Questions"));
    assert!(output.contains("  1) Receive $50 today\n  2) Receive $100 in 3 months"));
}

#[test]
fn session_reports_closed_input() {
    let options = SessionOptions {
        skip_tutorial: true,
        ..SessionOptions::default()
    };
    let procedure = ProcedureId::parse("DEEPRISK5").unwrap().procedure();
    let mut session = HostSession::with_placement(procedure, options, Placement::Canonical);
    let mut console = Console::new("1\n2\n".as_bytes(), Vec::new());

    let err = session.run(&mut console).unwrap_err();
    assert!(matches!(err, HostError::InputClosed));
    assert_eq!(session.engine().history().len(), 2);
}

#[test]
fn page_hosts_a_single_session() {
    let mut page = SurveyPage::new();
    page.load("DEEPTIME4", SessionOptions::default()).unwrap();
    assert!(matches!(
        page.load("DEEPTIME4", SessionOptions::default()),
        Err(PageError::AlreadyLoaded(_))
    ));
}

#[test]
fn config_file_and_environment_shape_session_options() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[session]\nskip_tutorial = true\nshuffle_time_options = false\n",
    )
    .unwrap();

    let config = DeepConfig::load_from(&path).unwrap().unwrap();
    let options = SessionOptions::resolve(Some(&config), |name| {
        (name == "DEEP_DEBUG").then(|| "1".to_string())
    });

    assert!(options.skip_tutorial);
    assert!(options.debug);
    assert!(!options.shuffle_time_options);

    let session = SurveyPage::new().load("DEEPTIME3", options).unwrap();
    assert_eq!(session.placement(), Placement::Canonical);
    assert_eq!(session.options(), options);
}
