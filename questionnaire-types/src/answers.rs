use chrono::Utc;
use indexmap::IndexMap;

use crate::{AnswerError, AnswerValue, GroupAssignment, QuestionId, QuestionSpec, Record};

/// An answer together with the column it is persisted under.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAnswer {
    pub column: String,
    pub value: AnswerValue,
}

/// The answers of one survey session.
///
/// Keys are question ids; insertion order is kept so a snapshot lists answers
/// in the order the questions were first shown. Every value present is
/// consistent with the kind of the question it was set for.
#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    values: IndexMap<QuestionId, StoredAnswer>,
}

impl AnswerStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Set the answer to a question.
    ///
    /// Fails with `TypeMismatch` when the value's shape disagrees with the
    /// question kind, and with `OutOfDomain` when it has the right shape but an
    /// invalid value. The store is left untouched on failure.
    pub fn set(&mut self, question: &QuestionSpec, value: AnswerValue) -> Result<(), AnswerError> {
        if !value.has_shape_of(question.kind()) {
            return Err(AnswerError::TypeMismatch {
                question: question.id().clone(),
                expected: question.kind().name(),
                actual: value.type_name(),
            });
        }
        value
            .check_domain(question.kind())
            .map_err(|reason| AnswerError::OutOfDomain {
                question: question.id().clone(),
                reason,
            })?;

        match self.values.get_mut(question.id()) {
            Some(stored) => stored.value = value,
            None => {
                self.values.insert(
                    question.id().clone(),
                    StoredAnswer {
                        column: question.column_name(),
                        value,
                    },
                );
            }
        }
        Ok(())
    }

    /// Get the answer to a question.
    pub fn get(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.values.get(id).map(|stored| &stored.value)
    }

    /// Check if a question has been answered.
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.values.contains_key(id)
    }

    /// Drop every answer.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Get an iterator over all answers, in first-set order.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &StoredAnswer)> {
        self.values.iter()
    }

    /// Get the number of answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Freeze the answers into a submission record.
    pub fn snapshot_record(&self, identity: impl Into<String>, group: GroupAssignment) -> Record {
        Record::new(identity.into(), group, Utc::now(), self.values.clone())
    }

    // === Convenience accessors ===

    /// Get a text answer.
    pub fn get_text(&self, id: &QuestionId) -> Result<&str, AnswerError> {
        match self.get(id) {
            Some(AnswerValue::Text(s)) => Ok(s),
            Some(other) => Err(AnswerError::TypeMismatch {
                question: id.clone(),
                expected: "Text",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(id.clone())),
        }
    }

    /// Get an integer answer.
    pub fn get_int(&self, id: &QuestionId) -> Result<i64, AnswerError> {
        match self.get(id) {
            Some(AnswerValue::Int(i)) => Ok(*i),
            Some(other) => Err(AnswerError::TypeMismatch {
                question: id.clone(),
                expected: "Int",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(id.clone())),
        }
    }

    /// Get a selected option.
    pub fn get_choice(&self, id: &QuestionId) -> Result<&str, AnswerError> {
        match self.get(id) {
            Some(AnswerValue::Choice(c)) => Ok(c),
            Some(other) => Err(AnswerError::TypeMismatch {
                question: id.clone(),
                expected: "Choice",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(id.clone())),
        }
    }

    /// Check if a question has a non-blank answer.
    ///
    /// Text answers consisting only of whitespace count as blank.
    pub fn has_value(&self, id: &QuestionId) -> bool {
        match self.get(id) {
            Some(AnswerValue::Text(s)) => !s.trim().is_empty(),
            Some(_) => true,
            None => false,
        }
    }
}

impl<'a> IntoIterator for &'a AnswerStore {
    type Item = (&'a QuestionId, &'a StoredAnswer);
    type IntoIter = indexmap::map::Iter<'a, QuestionId, StoredAnswer>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
