//! Integration tests for the aggregator

use questionnaire::{FlatRecord, MemorySink};
use questionnaire_aggregate::{
    PROVENANCE_COLUMN, RawResponseTable, aggregate, load_directory, load_file, load_sink,
};
use serde_json::{Value, json};

fn row(pairs: &[(&str, Value)]) -> FlatRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_reworded_questions_merge_by_number() {
    let pilot = RawResponseTable::new(
        "survey_pilot",
        vec![row(&[("Q9. minimum reliability", json!(4))])],
    );
    let full = RawResponseTable::new(
        "survey_full",
        vec![row(&[("Q9. acceptable reliability", json!(2))])],
    );

    let report = aggregate(&[pilot, full]).unwrap();
    let table = report.table;

    assert!(report.collisions.is_empty());
    assert_eq!(table.columns(), [PROVENANCE_COLUMN, "Q9"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.value(0, "Q9"), Some(&json!(4)));
    assert_eq!(table.value(1, "Q9"), Some(&json!(2)));
    assert_eq!(table.value(0, PROVENANCE_COLUMN), Some(&json!("survey_pilot")));
    assert_eq!(table.value(1, PROVENANCE_COLUMN), Some(&json!("survey_full")));
}

#[test]
fn test_disjoint_versions_are_sparse_filled() {
    let short: Vec<(String, Value)> = (1..=7)
        .map(|n| (format!("Q{n}. short wording"), json!(n)))
        .collect();
    let long: Vec<(String, Value)> = (1..=14)
        .map(|n| (format!("Q{n}. long wording"), json!(n * 10)))
        .collect();
    let pilot = RawResponseTable::new("pilot", vec![short.into_iter().collect()]);
    let full = RawResponseTable::new("full", vec![long.into_iter().collect()]);

    let table = aggregate(&[pilot, full]).unwrap().table;

    let expected: Vec<String> = std::iter::once(PROVENANCE_COLUMN.to_string())
        .chain((1..=14).map(|n| format!("Q{n}")))
        .collect();
    assert_eq!(table.columns(), expected.as_slice());
    assert_eq!(table.value(0, "Q7"), Some(&json!(7)));
    assert_eq!(table.value(0, "Q8"), None);
    assert_eq!(table.value(0, "Q14"), None);
    assert_eq!(table.value(1, "Q14"), Some(&json!(140)));
}

#[test]
fn test_canonical_columns_sort_numerically() {
    let table = RawResponseTable::new(
        "t",
        vec![row(&[
            ("First Name (*)", json!("Ada")),
            ("Q10. late", json!(1)),
            ("Q2. early", json!(2)),
            ("group_assignment", json!("A")),
        ])],
    );
    let unified = aggregate(&[table]).unwrap().table;
    assert_eq!(
        unified.columns(),
        [PROVENANCE_COLUMN, "Q2", "Q10", "First Name (*)", "group_assignment"]
    );
}

#[test]
fn test_passthrough_columns_merge_by_exact_name() {
    let a = RawResponseTable::new("a", vec![row(&[("Supplier A: in %", json!(40))])]);
    let b = RawResponseTable::new(
        "b",
        vec![row(&[
            ("Supplier A: in %", json!(20)),
            ("Supplier A in %", json!(30)),
        ])],
    );
    let table = aggregate(&[a, b]).unwrap().table;

    assert_eq!(
        table.columns(),
        [PROVENANCE_COLUMN, "Supplier A: in %", "Supplier A in %"]
    );
    assert_eq!(table.value(1, "Supplier A: in %"), Some(&json!(20)));
    assert_eq!(table.value(0, "Supplier A in %"), None);
}

#[test]
fn test_same_table_collision_is_reported_without_loss() {
    let table = RawResponseTable::new(
        "survey_v2",
        vec![row(&[
            ("Q5. Would you choose A?", json!("Yes")),
            ("Q5. Why?", json!("price")),
        ])],
    );
    let report = aggregate(&[table]).unwrap();

    assert_eq!(report.collisions.len(), 1);
    let collision = &report.collisions[0];
    assert_eq!(collision.table, "survey_v2");
    assert_eq!(collision.canonical, "Q5");
    assert_eq!(collision.kept, "Q5. Would you choose A?");
    assert_eq!(collision.diverted, "Q5. Why?");

    assert_eq!(report.table.value(0, "Q5"), Some(&json!("Yes")));
    assert_eq!(report.table.value(0, "Q5. Why?"), Some(&json!("price")));
}

#[test]
fn test_collisions_are_decided_per_table() {
    let a = RawResponseTable::new("a", vec![row(&[("Q5. first", json!(1))])]);
    let b = RawResponseTable::new("b", vec![row(&[("Q5. second", json!(2))])]);
    let report = aggregate(&[a, b]).unwrap();
    assert!(report.collisions.is_empty());
    assert_eq!(report.table.columns(), [PROVENANCE_COLUMN, "Q5"]);
}

#[test]
fn test_every_value_lands_once() {
    let a = RawResponseTable::new(
        "a",
        vec![
            row(&[("Q1. x", json!(1)), ("note", json!("n1"))]),
            row(&[("Q1. x", json!(2)), ("Q3. y", json!(3))]),
        ],
    );
    let b = RawResponseTable::new("b", vec![row(&[("q01", json!(9)), ("note", json!("n2"))])]);

    let table = aggregate(&[a, b]).unwrap().table;
    let present: usize = table
        .rows()
        .iter()
        .map(|row| row.iter().skip(1).filter(|cell| cell.is_some()).count())
        .sum();
    assert_eq!(present, 6);
    assert_eq!(table.value(2, "Q1"), Some(&json!(9)));
}

#[test]
fn test_incoming_provenance_column_is_kept() {
    let table = RawResponseTable::new(
        "export",
        vec![row(&[(PROVENANCE_COLUMN, json!("survey_Ada")), ("Q1", json!(1))])],
    );
    let unified = aggregate(&[table]).unwrap().table;
    assert_eq!(unified.value(0, PROVENANCE_COLUMN), Some(&json!("export")));
    assert_eq!(unified.value(0, "source_table_original"), Some(&json!("survey_Ada")));
}

#[test]
fn test_renamed_columns_do_not_overwrite_existing_ones() {
    let table = RawResponseTable::new(
        "t",
        vec![row(&[
            ("Q9. minimum reliability", json!("98%")),
            ("Q9", json!("99%")),
            ("Q9_t", json!("note")),
            (PROVENANCE_COLUMN, json!("survey_Ada")),
            ("source_table_original", json!("older")),
        ])],
    );
    let unified = aggregate(&[table]).unwrap().table;

    assert_eq!(unified.value(0, "Q9"), Some(&json!("98%")));
    assert_eq!(unified.value(0, "Q9_t"), Some(&json!("note")));
    assert_eq!(unified.value(0, "Q9_t_2"), Some(&json!("99%")));
    assert_eq!(unified.value(0, "source_table_original"), Some(&json!("older")));
    assert_eq!(unified.value(0, "source_table_original_2"), Some(&json!("survey_Ada")));
}

#[test]
fn test_load_files_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("pilot.csv"),
        "First Name (*),Q2. confidence,Email\nAda,7,\nBob,N/A,bob@example.com\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("full.jsonl"),
        "{\"First Name (*)\":\"Cy\",\"Q2. Rate your confidence\":9}\n\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("legacy.json"),
        "[{\"Q2. conf\": 3, \"Q14. comments\": \"ok\"}]",
    )
    .unwrap();
    std::fs::write(dir.path().join("README.md"), "ignored").unwrap();

    let pilot = load_file(&dir.path().join("pilot.csv")).unwrap();
    assert_eq!(pilot.name, "pilot");
    assert_eq!(pilot.rows.len(), 2);
    assert!(!pilot.rows[0].contains_key("Email"));

    let tables = load_directory(dir.path()).unwrap();
    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["full", "legacy", "pilot"]);

    let table = aggregate(&tables).unwrap().table;
    assert_eq!(
        table.numeric_column("Q2").unwrap(),
        vec![Some(9.0), Some(3.0), Some(7.0), None]
    );
    assert_eq!(table.filter_rows(PROVENANCE_COLUMN, &["pilot"]).len(), 2);
}

#[test]
fn test_unsupported_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.xlsx");
    std::fs::write(&path, "x").unwrap();
    assert!(load_file(&path).is_err());
}

#[test]
fn test_load_from_sink() {
    use questionnaire::{AnswerStore, AnswerValue, GroupAssignment, PersistenceSink, QuestionSpec};

    let sink = MemorySink::new();
    for (name, confidence) in [("Ada", 7), ("Bob", 4)] {
        let mut answers = AnswerStore::new();
        answers
            .set(
                &QuestionSpec::free_text("first_name", "First Name (*)"),
                AnswerValue::Text(name.into()),
            )
            .unwrap();
        answers
            .set(
                &QuestionSpec::scale("Q2", "Rate your confidence in this decision", 1, 10),
                AnswerValue::Int(confidence),
            )
            .unwrap();
        sink.save(&answers.snapshot_record(name, GroupAssignment::A))
            .unwrap();
    }

    let tables = load_sink(&sink).unwrap();
    assert_eq!(tables.len(), 2);

    let table = aggregate(&tables).unwrap().table;
    assert_eq!(table.numeric_column("Q2").unwrap(), vec![Some(7.0), Some(4.0)]);
    assert_eq!(
        table.categorical_column("is_control").unwrap(),
        vec![Some("1".to_string()), Some("1".to_string())]
    );
    assert_eq!(table.value(0, PROVENANCE_COLUMN), Some(&json!("survey_Ada")));
}
