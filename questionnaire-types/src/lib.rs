//! Core types for the questionnaire crate.
//!
//! This crate provides the foundational types for defining paginated surveys:
//! - `Questionnaire` - One survey version, with a page sequence per variant
//! - `PageSpec` and `PageRule` - Pages and their forward-navigation gates
//! - `QuestionSpec` and `QuestionKind` - Individual questions and their types
//! - `AnswerStore` and `AnswerValue` - Answers collected in one session
//! - `Record` - A submitted, immutable set of answers
//! - `PersistenceSink` trait - For implementing storage backends

mod question_id;
pub use question_id::{GroupId, QuestionId};

mod answer_value;
pub use answer_value::AnswerValue;

mod answers;
pub use answers::{AnswerStore, StoredAnswer};

mod question;
pub use question::{
    ALLOCATION_MAX, ALLOCATION_STEP, AllocationQuestion, ChoiceQuestion, IMPORTANCE_DEFAULT,
    IMPORTANCE_MAX, IMPORTANCE_MIN, MatrixQuestion, QuestionKind, QuestionSpec, ScaleQuestion,
};

mod page;
pub use page::{PageRule, PageSpec, PageValidator};

mod questionnaire;
pub use questionnaire::{AllocationGroup, GroupAssignment, ParseGroupError, Questionnaire};

mod record;
pub use record::{
    FlatRecord, GROUP_COLUMN, IS_CONTROL_COLUMN, Record, SUBMITTED_AT_COLUMN, UNKNOWN_IDENTITY,
    resolve_identity,
};

mod error;
pub use error::{AnswerError, StorageError};

mod traits;
pub use traits::PersistenceSink;
