use crate::{GroupId, QuestionId};

/// A single question of a survey version.
///
/// Immutable once the survey version is defined. The `kind` decides how the
/// question is presented and which values it accepts; the `label` is only ever
/// shown to respondents and written as the storage column name.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSpec {
    /// Stable id, unique within a questionnaire.
    id: QuestionId,

    /// The text shown to the respondent.
    label: String,

    /// The kind of question (determines input type and valid values).
    kind: QuestionKind,
}

impl QuestionSpec {
    /// Create a new question.
    pub fn new(id: impl Into<QuestionId>, label: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }

    pub fn free_text(id: impl Into<QuestionId>, label: impl Into<String>) -> Self {
        Self::new(id, label, QuestionKind::FreeText)
    }

    pub fn scale(id: impl Into<QuestionId>, label: impl Into<String>, min: i64, max: i64) -> Self {
        Self::new(id, label, QuestionKind::Scale(ScaleQuestion::new(min, max)))
    }

    pub fn single_choice<S: Into<String>>(
        id: impl Into<QuestionId>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            id,
            label,
            QuestionKind::SingleChoice(ChoiceQuestion::new(options)),
        )
    }

    pub fn allocation(
        id: impl Into<QuestionId>,
        label: impl Into<String>,
        group: impl Into<GroupId>,
    ) -> Self {
        Self::new(
            id,
            label,
            QuestionKind::PercentAllocation(AllocationQuestion::new(group)),
        )
    }

    pub fn importance_matrix<S: Into<String>>(
        id: impl Into<QuestionId>,
        label: impl Into<String>,
        factors: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            id,
            label,
            QuestionKind::ImportanceMatrix(MatrixQuestion::new(factors)),
        )
    }

    /// Get the question id.
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Get the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the question kind.
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// The column this question's answer is persisted under.
    ///
    /// Numbered questions are prefixed with their id (`"Q9. <label>"`), so the
    /// id survives in stored tables even when the wording changes. A label
    /// that already carries the prefix, and the label of any other question,
    /// is used verbatim.
    pub fn column_name(&self) -> String {
        if self.id.is_numbered() && !self.label_is_prefixed() {
            format!("{}. {}", self.id, self.label)
        } else {
            self.label.clone()
        }
    }

    fn label_is_prefixed(&self) -> bool {
        self.label
            .strip_prefix(self.id.as_str())
            .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// The kind of question, determining input representation and value domain.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Single-line text, stored trimmed.
    FreeText,

    /// Integer rating within inclusive bounds.
    Scale(ScaleQuestion),

    /// Exactly one of a fixed list of options.
    SingleChoice(ChoiceQuestion),

    /// One share of a three-way percentage split.
    PercentAllocation(AllocationQuestion),

    /// One 1..=5 rating per factor.
    ImportanceMatrix(MatrixQuestion),

    /// Modeled as a single selection; no multi-select question is asked.
    MultiChoice(ChoiceQuestion),
}

impl QuestionKind {
    /// Name of the kind for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FreeText => "FreeText",
            Self::Scale(_) => "Scale",
            Self::SingleChoice(_) => "SingleChoice",
            Self::PercentAllocation(_) => "PercentAllocation",
            Self::ImportanceMatrix(_) => "ImportanceMatrix",
            Self::MultiChoice(_) => "MultiChoice",
        }
    }

    /// The options of a choice question.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::SingleChoice(choice) | Self::MultiChoice(choice) => Some(&choice.options),
            _ => None,
        }
    }

    /// The allocation group of a percent allocation question.
    pub fn group(&self) -> Option<&GroupId> {
        match self {
            Self::PercentAllocation(allocation) => Some(&allocation.group),
            _ => None,
        }
    }
}

/// Configuration for a scale question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleQuestion {
    pub min: i64,
    pub max: i64,
}

impl ScaleQuestion {
    /// Create a scale; bounds given in the wrong order are swapped.
    pub fn new(min: i64, max: i64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// The midpoint, rounded down.
    pub fn midpoint(&self) -> i64 {
        self.min + (self.max - self.min) / 2
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Configuration for a choice question.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceQuestion {
    /// The available options, in display order.
    pub options: Vec<String>,
}

impl ChoiceQuestion {
    pub fn new<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of an option, matched exactly.
    pub fn position(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| o == option)
    }
}

/// Configuration for one share of an allocation group.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationQuestion {
    pub group: GroupId,
}

impl AllocationQuestion {
    pub fn new(group: impl Into<GroupId>) -> Self {
        Self {
            group: group.into(),
        }
    }
}

/// Configuration for an importance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixQuestion {
    /// The rated factors, in display order.
    pub factors: Vec<String>,
}

impl MatrixQuestion {
    pub fn new<S: Into<String>>(factors: impl IntoIterator<Item = S>) -> Self {
        Self {
            factors: factors.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lowest rating of an importance matrix factor.
pub const IMPORTANCE_MIN: i64 = 1;

/// Highest rating of an importance matrix factor.
pub const IMPORTANCE_MAX: i64 = 5;

/// Rating every importance factor starts at.
pub const IMPORTANCE_DEFAULT: i64 = 3;

/// Upper bound of an allocation share.
pub const ALLOCATION_MAX: i64 = 100;

/// Granularity of allocation shares.
pub const ALLOCATION_STEP: i64 = 5;
