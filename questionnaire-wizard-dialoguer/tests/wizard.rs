//! Non-interactive parts of the dialoguer front-end

use questionnaire::{GroupAssignment, QuestionId, RawInput, Session, SessionConfig};
use questionnaire_store::StorageBackend;
use questionnaire_wizard_dialoguer::{AppConfig, Navigation, navigation_choices, page_heading};

#[test]
fn test_navigation_follows_the_session() {
    let q = example_questionnaires::pilot();
    let mut session = Session::start(&q, SessionConfig::fixed(GroupAssignment::A)).unwrap();

    assert_eq!(navigation_choices(&session), vec![Navigation::Next]);
    assert_eq!(page_heading(&session), "--- Page 1 (1/3) ---");

    session
        .answer(&QuestionId::new("first_name"), RawInput::Text("Ada".into()))
        .unwrap();
    session.next().unwrap();
    assert_eq!(
        navigation_choices(&session),
        vec![Navigation::Previous, Navigation::Next]
    );

    for (id, share) in [("supplier_a", 40), ("supplier_b", 35), ("supplier_c", 25)] {
        session
            .answer(&QuestionId::new(id), RawInput::Number(share))
            .unwrap();
    }
    session.next().unwrap();
    assert_eq!(page_heading(&session), "--- Page 3 (3/3) ---");
    assert_eq!(
        navigation_choices(&session),
        vec![Navigation::Previous, Navigation::Submit]
    );
}

#[test]
fn test_navigation_labels() {
    let labels: Vec<String> = [Navigation::Previous, Navigation::Next, Navigation::Submit]
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(labels, ["Previous", "Next", "Submit"]);
}

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.toml");
    std::fs::write(
        &path,
        "[session]\ngroup_selection = \"b\"\nsave_attempts = 5\n\n[storage]\nbackend = \"csv\"\ndirectory = \"out\"\n",
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.session.save_attempts, 5);
    assert_eq!(config.storage.backend, StorageBackend::Csv);
    assert_eq!(config.storage.directory, std::path::PathBuf::from("out"));

    let q = example_questionnaires::full();
    let session = Session::start(&q, config.session).unwrap();
    assert_eq!(session.group(), GroupAssignment::B);
}

#[test]
fn test_missing_config_file_is_reported() {
    let err = AppConfig::load(std::path::Path::new("/nonexistent/survey.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
