use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::{AnswerValue, GroupAssignment, QuestionId, StoredAnswer};

/// Identity used when a respondent left the identity question blank.
///
/// Existing stored tables are partitioned under this exact literal.
pub const UNKNOWN_IDENTITY: &str = "Unknown";

/// Metadata column holding the variant (`"A"` or `"B"`).
pub const GROUP_COLUMN: &str = "group_assignment";

/// Legacy metadata column: `1` for the control variant, `0` otherwise.
pub const IS_CONTROL_COLUMN: &str = "is_control";

/// Metadata column holding the submission time (RFC 3339).
pub const SUBMITTED_AT_COLUMN: &str = "submitted_at";

/// A flat column-name to value mapping, as persisted and fetched back.
pub type FlatRecord = Map<String, Value>;

/// One submitted set of answers. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    identity: String,
    group: GroupAssignment,
    submitted_at: DateTime<Utc>,
    answers: IndexMap<QuestionId, StoredAnswer>,
}

impl Record {
    pub(crate) fn new(
        identity: String,
        group: GroupAssignment,
        submitted_at: DateTime<Utc>,
        answers: IndexMap<QuestionId, StoredAnswer>,
    ) -> Self {
        Self {
            identity,
            group,
            submitted_at,
            answers,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn group(&self) -> GroupAssignment {
        self.group
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Get a submitted answer.
    pub fn answer(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.answers.get(id).map(|stored| &stored.value)
    }

    /// Get an iterator over all submitted answers.
    pub fn answers(&self) -> impl Iterator<Item = (&QuestionId, &StoredAnswer)> {
        self.answers.iter()
    }

    /// The table this record is stored in: `survey_<identity>` with spaces
    /// replaced by underscores.
    pub fn partition_key(&self) -> String {
        format!("survey_{}", self.identity.replace(' ', "_"))
    }

    /// The flat representation handed to persistence.
    ///
    /// Answers come first, in first-shown order, keyed by their storage
    /// column; metadata columns follow.
    pub fn to_flat(&self) -> FlatRecord {
        let mut flat = Map::new();
        for stored in self.answers.values() {
            flat.insert(stored.column.clone(), stored.value.to_json());
        }
        flat.insert(
            GROUP_COLUMN.to_string(),
            Value::String(self.group.to_string()),
        );
        flat.insert(
            IS_CONTROL_COLUMN.to_string(),
            Value::from(u8::from(self.group.is_control())),
        );
        flat.insert(
            SUBMITTED_AT_COLUMN.to_string(),
            Value::String(self.submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        flat
    }
}

/// Resolve a respondent identity from the identity answer.
///
/// Blank or missing answers resolve to [`UNKNOWN_IDENTITY`].
pub fn resolve_identity(answer: Option<&AnswerValue>) -> String {
    let text = match answer {
        Some(AnswerValue::Text(s)) | Some(AnswerValue::Choice(s)) => s.trim(),
        _ => "",
    };
    if text.is_empty() {
        UNKNOWN_IDENTITY.to_string()
    } else {
        text.to_string()
    }
}
