//! Schema-normalizing merge of response tables.
//!
//! Column identity is decided per source table. A column whose name carries a
//! `Q<digits>` token is mapped to the canonical id `Q<n>`, so differently
//! worded versions of the same question land in one column. Other columns are
//! merged by exact name. The result is an outer join of all tables with one
//! row per source record and a `source_table` provenance column.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use indexmap::IndexSet;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::canonical::CanonicalIds;
use crate::table::{PROVENANCE_COLUMN, RawResponseTable, UnifiedTable};
use crate::AggregateError;

/// Where a source table's own `source_table` column goes.
pub const ORIGINAL_PROVENANCE_COLUMN: &str = "source_table_original";

/// Two columns of one table mapped to the same canonical id.
///
/// The first column keeps the canonical id; the later one is kept under its
/// original name so no values are lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCollision {
    pub table: String,
    pub canonical: String,
    /// The column that owns the canonical id.
    pub kept: String,
    /// The column left under its original name.
    pub diverted: String,
}

impl fmt::Display for SchemaCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table '{}': '{}' and '{}' both map to {}; '{}' kept as a separate column",
            self.table, self.kept, self.diverted, self.canonical, self.diverted
        )
    }
}

/// The unified table and the collisions found while building it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateReport {
    pub table: UnifiedTable,
    pub collisions: Vec<SchemaCollision>,
}

/// Merge response tables into one `UnifiedTable`.
///
/// Columns are ordered `source_table`, then canonical ids by question
/// number, then the remaining columns in first-seen order. Rows keep the
/// order of the input tables.
pub fn aggregate(tables: &[RawResponseTable]) -> Result<AggregateReport, AggregateError> {
    let ids = CanonicalIds::new()?;

    let mut canonical: BTreeMap<u32, String> = BTreeMap::new();
    let mut passthrough: IndexSet<String> = IndexSet::new();
    let mut collisions = Vec::new();
    let mut mappings: Vec<HashMap<String, String>> = Vec::with_capacity(tables.len());

    for table in tables {
        let mut mapping = HashMap::new();
        let mut owners: HashMap<u32, String> = HashMap::new();
        let source_columns = table.columns();
        let mut taken: HashSet<String> = source_columns.iter().map(|c| c.to_string()).collect();

        for column in source_columns {
            let output = match ids.number(column) {
                Some(number) => match owners.get(&number) {
                    None => {
                        owners.insert(number, column.to_string());
                        let id = canonical
                            .entry(number)
                            .or_insert_with(|| format!("Q{number}"));
                        id.clone()
                    }
                    Some(owner) => {
                        let collision = SchemaCollision {
                            table: table.name.clone(),
                            canonical: format!("Q{number}"),
                            kept: owner.clone(),
                            diverted: column.to_string(),
                        };
                        warn!(%collision, "schema collision");
                        // A diverted column named exactly like the id needs its own name.
                        let output = if column == collision.canonical {
                            unique_name(format!("{column}_{}", table.name), &mut taken)
                        } else {
                            column.to_string()
                        };
                        collisions.push(collision);
                        passthrough.insert(output.clone());
                        output
                    }
                },
                None => {
                    // Keep an incoming provenance column apart from ours.
                    let output = if column == PROVENANCE_COLUMN {
                        unique_name(ORIGINAL_PROVENANCE_COLUMN.to_string(), &mut taken)
                    } else {
                        column.to_string()
                    };
                    passthrough.insert(output.clone());
                    output
                }
            };
            mapping.insert(column.to_string(), output);
        }

        debug!(
            table = %table.name,
            rows = table.rows.len(),
            columns = mapping.len(),
            "table mapped"
        );
        mappings.push(mapping);
    }

    let mut columns = vec![PROVENANCE_COLUMN.to_string()];
    columns.extend(canonical.into_values());
    columns.extend(passthrough);

    let index: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut rows = Vec::new();
    for (table, mapping) in tables.iter().zip(&mappings) {
        for record in &table.rows {
            let mut row: Vec<Option<Value>> = vec![None; columns.len()];
            row[0] = Some(Value::String(table.name.clone()));
            for (column, value) in record {
                if value.is_null() {
                    continue;
                }
                let target = mapping.get(column).and_then(|output| index.get(output.as_str()));
                if let Some(&i) = target {
                    row[i] = Some(value.clone());
                }
            }
            rows.push(row);
        }
    }

    info!(
        tables = tables.len(),
        rows = rows.len(),
        columns = columns.len(),
        collisions = collisions.len(),
        "tables aggregated"
    );
    Ok(AggregateReport {
        table: UnifiedTable::new(columns, rows),
        collisions,
    })
}

/// A generated column name that no column of the same table already uses.
///
/// `base` is tried first, then `base_2`, `base_3` and so on.
fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    let mut name = base.clone();
    let mut suffix = 2;
    while taken.contains(&name) {
        name = format!("{base}_{suffix}");
        suffix += 1;
    }
    taken.insert(name.clone());
    name
}
