//! # questionnaire
//!
//! Paginated questionnaires with typed questions. Backend-agnostic.
//!
//! A questionnaire is data: pages of `QuestionSpec`s, each with a
//! `QuestionKind` that decides how it is presented and which values it
//! accepts. A `Session` walks one respondent through the pages, gating
//! forward navigation on each page's rules, and hands the finished answers
//! to a `PersistenceSink`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use questionnaire::{
//!     AllocationGroup, MemorySink, PageRule, PageSpec, QuestionSpec, Questionnaire, RawInput,
//!     Session, SessionConfig,
//! };
//!
//! let questionnaire = Questionnaire::new(
//!     "pilot",
//!     "first_name",
//!     vec![
//!         PageSpec::new("Page 1", vec![QuestionSpec::free_text("first_name", "First Name (*)")])
//!             .with_rule(PageRule::required("first_name", "First Name is mandatory.")),
//!         PageSpec::new("Page 2", vec![QuestionSpec::scale("Q2", "Confidence", 1, 10)]),
//!     ],
//! );
//!
//! let sink = MemorySink::new();
//! let mut session = Session::start(&questionnaire, SessionConfig::default())?;
//! session.answer(&"first_name".into(), RawInput::Text("Ada".into()))?;
//! session.next()?;
//! session.answer(&"Q2".into(), RawInput::Number(8))?;
//! let record = session.submit(&sink)?;
//! ```
//!
//! ## Question kinds
//!
//! - `FreeText` - single-line text field
//! - `Scale` - integer slider, defaults to the midpoint
//! - `SingleChoice` - pick one option, defaults to the first
//! - `PercentAllocation` - one share of a three-way group that must total 100
//! - `ImportanceMatrix` - a 1..5 rating per factor, each defaulting to 3
//!
//! ## Backends
//!
//! Storage and front-ends are separate crates:
//! - `questionnaire-store` - JSON lines and CSV file stores
//! - `questionnaire-aggregate` - merges stored tables into one dataset
//! - `questionnaire-wizard-dialoguer` - CLI prompts via dialoguer

// Re-export all types from questionnaire-types
pub use questionnaire_types::*;

mod allocation;
pub use allocation::{ALLOCATION_TOTAL, AllocationReconciler, AllocationStatus, UNBALANCED_MESSAGE};

mod config;
pub use config::{GroupReset, GroupSelection, SessionConfig};

pub mod dispatch;
pub use dispatch::{DispatchError, InputWidget, RawInput};

mod memory_sink;
pub use memory_sink::MemorySink;

mod session;
pub use session::{Session, SessionError, SessionState};

mod validation;
pub use validation::{ValidationFailure, validate_page};
