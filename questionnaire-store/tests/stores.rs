//! Integration tests for the file stores

use std::sync::Arc;
use std::thread;

use questionnaire::{
    AnswerStore, AnswerValue, GroupAssignment, PersistenceSink, QuestionSpec, Record,
};
use questionnaire_store::{CsvStore, JsonStore, StorageBackend, StorageConfig};
use serde_json::json;

fn record(name: &str, supplier_a: i64) -> Record {
    let mut answers = AnswerStore::new();
    answers
        .set(
            &QuestionSpec::free_text("first_name", "First Name (*)"),
            AnswerValue::Text(name.into()),
        )
        .unwrap();
    answers
        .set(&QuestionSpec::free_text("email", "Email"), AnswerValue::Text(String::new()))
        .unwrap();
    answers
        .set(
            &QuestionSpec::allocation("supplier_a", "Supplier A: in %", "Q3"),
            AnswerValue::Int(supplier_a),
        )
        .unwrap();
    answers
        .set(
            &QuestionSpec::importance_matrix(
                "Q11",
                "Rate the importance",
                ["Initial price", "Warranty"],
            ),
            AnswerValue::Ratings(vec![("Initial price".into(), 4), ("Warranty".into(), 2)]),
        )
        .unwrap();
    answers.snapshot_record(name, GroupAssignment::A)
}

fn with_comment(name: &str) -> Record {
    let mut answers = AnswerStore::new();
    answers
        .set(
            &QuestionSpec::free_text("first_name", "First Name (*)"),
            AnswerValue::Text(name.into()),
        )
        .unwrap();
    answers
        .set(
            &QuestionSpec::free_text("Q14", "Any other comments"),
            AnswerValue::Text("none".into()),
        )
        .unwrap();
    answers.snapshot_record(name, GroupAssignment::B)
}

#[test]
fn test_json_store_appends_and_fetches() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path());

    store.save(&record("Ada Lovelace", 40)).unwrap();
    store.save(&record("Ada Lovelace", 60)).unwrap();

    let rows = store.fetch_all("survey_Ada_Lovelace").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Supplier A: in %"], 40);
    assert_eq!(rows[1]["Supplier A: in %"], 60);
    assert_eq!(rows[0]["Email"], "");
    assert_eq!(rows[0]["Q11. Rate the importance"], json!({"Initial price": 4, "Warranty": 2}));
    assert_eq!(rows[0]["is_control"], 1);
    assert!(dir.path().join("survey_Ada_Lovelace.jsonl").exists());
}

#[test]
fn test_json_store_keeps_column_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path());
    store.save(&record("Ada", 40)).unwrap();

    let row = &store.fetch_all("survey_Ada").unwrap()[0];
    let columns: Vec<&str> = row.keys().map(String::as_str).collect();
    assert_eq!(
        columns,
        vec![
            "First Name (*)",
            "Email",
            "Supplier A: in %",
            "Q11. Rate the importance",
            "group_assignment",
            "is_control",
            "submitted_at",
        ]
    );
}

#[test]
fn test_json_store_accepts_mixed_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path());
    store.save(&record("Ada", 40)).unwrap();
    store.save(&with_comment("Ada")).unwrap();

    let rows = store.fetch_all("survey_Ada").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["Q14. Any other comments"], "none");
}

#[test]
fn test_tables_lists_partitions() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path());
    assert!(store.tables().unwrap().is_empty());

    store.save(&record("Grace", 40)).unwrap();
    store.save(&record("Ada", 40)).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    assert_eq!(store.tables().unwrap(), vec!["survey_Ada", "survey_Grace"]);
    assert!(store.fetch_all("survey_Nobody").unwrap().is_empty());
}

#[test]
fn test_csv_store_writes_header_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path());

    store.save(&record("Ada", 40)).unwrap();
    store.save(&record("Ada", 35)).unwrap();

    let text = std::fs::read_to_string(dir.path().join("survey_Ada.csv")).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.starts_with("First Name (*),Email,Supplier A: in %,Q11. Rate the importance,"));

    let rows = store.fetch_all("survey_Ada").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["Supplier A: in %"], 35);
    assert_eq!(rows[0]["First Name (*)"], "Ada");
    assert_eq!(rows[0]["Email"], "");
    assert_eq!(rows[0]["Q11. Rate the importance"], json!({"Initial price": 4, "Warranty": 2}));
    assert_eq!(rows[0]["group_assignment"], "A");
}

fn variant_record(name: &str, group: GroupAssignment, confidence_label: &str) -> Record {
    let mut answers = AnswerStore::new();
    answers
        .set(
            &QuestionSpec::free_text("first_name", "First Name (*)"),
            AnswerValue::Text(name.into()),
        )
        .unwrap();
    answers
        .set(
            &QuestionSpec::scale("Q2", confidence_label, 1, 10),
            AnswerValue::Int(7),
        )
        .unwrap();
    answers.snapshot_record(name, group)
}

#[test]
fn test_csv_store_widens_header_for_new_columns() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path());

    store
        .save(&variant_record("Ada", GroupAssignment::A, "Rate your confidence"))
        .unwrap();
    store
        .save(&variant_record("Ada", GroupAssignment::B, "Rate your confidence, considering risk"))
        .unwrap();
    store.save(&with_comment("Ada")).unwrap();

    let rows = store.fetch_all("survey_Ada").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Q2. Rate your confidence"], 7);
    assert_eq!(rows[0]["Q2. Rate your confidence, considering risk"], "");
    assert_eq!(rows[0]["Q14. Any other comments"], "");
    assert_eq!(rows[1]["Q2. Rate your confidence"], "");
    assert_eq!(rows[1]["Q2. Rate your confidence, considering risk"], 7);
    assert_eq!(rows[1]["group_assignment"], "B");
    assert_eq!(rows[2]["Q14. Any other comments"], "none");

    let text = std::fs::read_to_string(dir.path().join("survey_Ada.csv")).unwrap();
    assert_eq!(text.lines().count(), 4);
    let header = text.lines().next().unwrap();
    let widened = "\"Q2. Rate your confidence, considering risk\",Q14. Any other comments";
    assert!(header.ends_with(widened));
}

#[test]
fn test_csv_store_keeps_text_that_looks_numeric() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path());

    let mut answers = AnswerStore::new();
    for (id, label, text) in [
        ("postcode", "Postcode", "007"),
        ("note", "Note", "{ \"kept\": true }"),
    ] {
        answers
            .set(&QuestionSpec::free_text(id, label), AnswerValue::Text(text.into()))
            .unwrap();
    }
    store
        .save(&answers.snapshot_record("Ada", GroupAssignment::A))
        .unwrap();

    let rows = store.fetch_all("survey_Ada").unwrap();
    assert_eq!(rows[0]["Postcode"], "007");
    assert_eq!(rows[0]["Note"], "{ \"kept\": true }");
    assert_eq!(rows[0]["is_control"], 1);
}

#[test]
fn test_similar_identities_get_separate_tables() {
    let dir = tempfile::tempdir().unwrap();
    let csv = CsvStore::new(dir.path().join("csv"));
    let json = JsonStore::new(dir.path().join("json"));

    for sink in [&csv as &dyn PersistenceSink, &json] {
        sink.save(&record("Zoë", 40)).unwrap();
        sink.save(&record("Zoé", 60)).unwrap();
        sink.save(&record("a/b", 5)).unwrap();

        assert_eq!(
            sink.tables().unwrap(),
            vec!["survey_Zoé", "survey_Zoë", "survey_a/b"]
        );
        assert_eq!(sink.fetch_all("survey_Zoë").unwrap().len(), 1);
        assert_eq!(sink.fetch_all("survey_Zoé").unwrap()[0]["Supplier A: in %"], 60);
        assert!(sink.fetch_all("survey_a_b").unwrap().is_empty());
    }
}

#[test]
fn test_concurrent_saves_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonStore::new(dir.path()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.save(&record("Ada", i * 5)).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.fetch_all("survey_Ada").unwrap().len(), 8);
}

#[test]
fn test_config_opens_backend() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        backend: StorageBackend::Csv,
        directory: dir.path().to_path_buf(),
    };
    let sink = config.open();
    sink.save(&record("Ada", 40)).unwrap();

    assert!(dir.path().join("survey_Ada.csv").exists());
    assert_eq!(sink.tables().unwrap(), vec!["survey_Ada"]);
}
