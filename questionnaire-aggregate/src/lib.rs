//! Merge questionnaire responses from different survey versions.
//!
//! Survey wording changes between releases while question numbers stay
//! stable, so columns are matched by their `Q<digits>` token rather than by
//! full text. `aggregate` turns any number of `RawResponseTable`s into one
//! `UnifiedTable` with a `source_table` column recording where each row came
//! from.
//!
//! ```rust,ignore
//! use questionnaire_aggregate::{aggregate, load_directory};
//!
//! let tables = load_directory("responses".as_ref())?;
//! let report = aggregate(&tables)?;
//! for collision in &report.collisions {
//!     eprintln!("warning: {collision}");
//! }
//! report.table.write_csv(std::io::stdout())?;
//! ```

mod aggregate;
pub use aggregate::{AggregateReport, ORIGINAL_PROVENANCE_COLUMN, SchemaCollision, aggregate};

mod canonical;
pub use canonical::{CANONICAL_PATTERN, CanonicalIds};

mod error;
pub use error::AggregateError;

mod load;
pub use load::{load_csv, load_directory, load_file, load_json, load_jsonl, load_sink};

mod table;
pub use table::{MISSING_PLACEHOLDER, PROVENANCE_COLUMN, RawResponseTable, UnifiedTable};
