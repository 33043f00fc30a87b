use crate::{AnswerStore, GroupId, QuestionId, QuestionSpec};

/// A page-level validator: receives every answer collected so far.
pub type PageValidator = fn(&AnswerStore) -> Result<(), String>;

/// A declarative check run before leaving a page forwards.
#[derive(Debug, Clone)]
pub enum PageRule {
    /// The free-text question must hold a non-blank answer.
    Required {
        question: QuestionId,
        message: String,
    },

    /// The allocation group must sum to exactly 100.
    Balanced(GroupId),

    /// Arbitrary validation over the answers.
    Custom(PageValidator),
}

impl PageRule {
    /// A required answer with the given failure message.
    pub fn required(question: impl Into<QuestionId>, message: impl Into<String>) -> Self {
        Self::Required {
            question: question.into(),
            message: message.into(),
        }
    }

    pub fn balanced(group: impl Into<GroupId>) -> Self {
        Self::Balanced(group.into())
    }
}

/// One page of a survey: an ordered list of questions plus its gate.
#[derive(Debug, Clone)]
pub struct PageSpec {
    /// Page id, e.g. `"Page 2"`.
    id: String,

    /// The questions on this page, in display order.
    questions: Vec<QuestionSpec>,

    /// Checks run before moving forward from this page.
    rules: Vec<PageRule>,

    /// Optional note shown above the questions.
    note: Option<String>,
}

impl PageSpec {
    /// Create a page without validation.
    pub fn new(id: impl Into<String>, questions: Vec<QuestionSpec>) -> Self {
        Self {
            id: id.into(),
            questions,
            rules: Vec::new(),
            note: None,
        }
    }

    /// Add a validation rule.
    pub fn with_rule(mut self, rule: PageRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Set the note shown above the questions.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn questions(&self) -> &[QuestionSpec] {
        &self.questions
    }

    pub fn rules(&self) -> &[PageRule] {
        &self.rules
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Find a question on this page.
    pub fn question(&self, id: &QuestionId) -> Option<&QuestionSpec> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Check if the question is asked on this page.
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.question(id).is_some()
    }

    /// Check if this page has no blocking validation.
    pub fn is_permissive(&self) -> bool {
        self.rules.is_empty()
    }
}
