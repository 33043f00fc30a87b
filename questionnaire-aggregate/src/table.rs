use std::collections::BTreeSet;
use std::io::Write;

use questionnaire_types::{FlatRecord, PersistenceSink, StorageError};
use serde_json::Value;

use crate::AggregateError;

/// The provenance column: the source table of each row.
pub const PROVENANCE_COLUMN: &str = "source_table";

/// Placeholder some legacy tables use for unanswered questions.
pub const MISSING_PLACEHOLDER: &str = "N/A";

/// One named collection of flat records with arbitrary columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponseTable {
    pub name: String,
    pub rows: Vec<FlatRecord>,
}

impl RawResponseTable {
    pub fn new(name: impl Into<String>, rows: Vec<FlatRecord>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Read one table from a sink.
    pub fn from_sink<S: PersistenceSink + ?Sized>(
        sink: &S,
        table: &str,
    ) -> Result<Self, StorageError> {
        Ok(Self::new(table, sink.fetch_all(table)?))
    }

    /// Column names in first-seen order across all rows.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for row in &self.rows {
            for column in row.keys() {
                if !columns.contains(&column.as_str()) {
                    columns.push(column);
                }
            }
        }
        columns
    }
}

/// The merged dataset: one row per source record.
///
/// The first column is always `source_table`. Absent values are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<Value>>>,
}

impl UnifiedTable {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Option<Value>>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<Value>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// A single cell.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_ref()
    }

    /// All values of a column, `None` where absent.
    pub fn column(&self, column: &str) -> Option<Vec<Option<&Value>>> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(|row| row[index].as_ref()).collect())
    }

    /// A column read as numbers.
    ///
    /// Numbers and numeric strings are kept; anything else is absent.
    pub fn numeric_column(&self, column: &str) -> Option<Vec<Option<f64>>> {
        Some(
            self.column(column)?
                .into_iter()
                .map(|value| match value? {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                })
                .collect(),
        )
    }

    /// A column read as categories.
    ///
    /// Numbers are rendered as text. Nulls and the `"N/A"` placeholder are
    /// absent.
    pub fn categorical_column(&self, column: &str) -> Option<Vec<Option<String>>> {
        Some(
            self.column(column)?
                .into_iter()
                .map(|value| value.and_then(category))
                .collect(),
        )
    }

    /// Distinct categories of a column, sorted.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        self.categorical_column(column)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Keep the rows whose category in `column` is one of `allowed`.
    ///
    /// An unknown column keeps no rows.
    pub fn filter_rows(&self, column: &str, allowed: &[&str]) -> UnifiedTable {
        let Some(index) = self.column_index(column) else {
            return UnifiedTable::new(self.columns.clone(), Vec::new());
        };
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                row[index]
                    .as_ref()
                    .and_then(category)
                    .is_some_and(|value| allowed.contains(&value.as_str()))
            })
            .cloned()
            .collect();
        UnifiedTable::new(self.columns.clone(), rows)
    }

    /// Write the table as CSV with a header row. Absent values are empty
    /// cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), AggregateError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(&self.columns)?;
        for row in &self.rows {
            csv.write_record(
                row.iter()
                    .map(|cell| cell.as_ref().map(cell_text).unwrap_or_default()),
            )?;
        }
        csv.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

fn category(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s == MISSING_PLACEHOLDER => None,
        other => Some(cell_text(other)),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> UnifiedTable {
        UnifiedTable::new(
            vec![PROVENANCE_COLUMN.into(), "Q2".into(), "Q5".into()],
            vec![
                vec![Some(json!("survey_Ada")), Some(json!(7)), Some(json!("Yes"))],
                vec![Some(json!("survey_Bob")), Some(json!("4")), Some(json!("N/A"))],
                vec![Some(json!("survey_Cy")), None, Some(json!("No"))],
            ],
        )
    }

    #[test]
    fn numeric_column_parses_strings() {
        assert_eq!(
            table().numeric_column("Q2").unwrap(),
            vec![Some(7.0), Some(4.0), None]
        );
        assert!(table().numeric_column("Q99").is_none());
    }

    #[test]
    fn categorical_column_drops_placeholder() {
        assert_eq!(
            table().categorical_column("Q5").unwrap(),
            vec![Some("Yes".to_string()), None, Some("No".to_string())]
        );
        assert_eq!(table().distinct_values("Q5"), vec!["No", "Yes"]);
    }

    #[test]
    fn filter_rows_by_value() {
        let filtered = table().filter_rows("Q5", &["Yes"]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.value(0, PROVENANCE_COLUMN), Some(&json!("survey_Ada")));
        assert!(table().filter_rows("Q99", &["Yes"]).is_empty());
    }

    #[test]
    fn csv_output() {
        let mut out = Vec::new();
        table().write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "source_table,Q2,Q5\nsurvey_Ada,7,Yes\nsurvey_Bob,4,N/A\nsurvey_Cy,,No\n"
        );
    }

    #[test]
    fn raw_columns_first_seen() {
        let mut a = FlatRecord::new();
        a.insert("x".into(), json!(1));
        let mut b = FlatRecord::new();
        b.insert("y".into(), json!(2));
        b.insert("x".into(), json!(3));
        let raw = RawResponseTable::new("t", vec![a, b]);
        assert_eq!(raw.columns(), vec!["x", "y"]);
    }
}
