use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GroupId, PageSpec, QuestionId, QuestionKind, QuestionSpec};

/// The survey variant a session runs.
///
/// Chosen once per session; it selects the page sequence and never changes
/// while the session lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupAssignment {
    /// The control wording.
    A,
    /// The treatment wording.
    B,
}

impl GroupAssignment {
    /// Both variants, in order.
    pub const ALL: [GroupAssignment; 2] = [GroupAssignment::A, GroupAssignment::B];

    /// Variant A is the control group.
    pub fn is_control(self) -> bool {
        self == Self::A
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl fmt::Display for GroupAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a `GroupAssignment` from text.
#[derive(Debug, thiserror::Error)]
#[error("Unknown group '{0}', expected 'A' or 'B'")]
pub struct ParseGroupError(String);

impl FromStr for GroupAssignment {
    type Err = ParseGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            other => Err(ParseGroupError(other.to_string())),
        }
    }
}

/// Three allocation questions whose shares must add up to 100.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationGroup {
    pub id: GroupId,
    pub members: [QuestionId; 3],
}

impl AllocationGroup {
    pub fn new(id: impl Into<GroupId>, members: [QuestionId; 3]) -> Self {
        Self {
            id: id.into(),
            members,
        }
    }

    pub fn contains(&self, question: &QuestionId) -> bool {
        self.members.contains(question)
    }
}

/// One survey version: the page sequence for each variant.
///
/// Pure and stateless; sessions borrow it.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    /// Survey version name, e.g. `"supplier-selection/full"`.
    name: String,

    /// Optional message shown before the first page.
    pub prelude: Option<String>,

    /// Optional message shown after a successful submission.
    pub epilogue: Option<String>,

    /// Page sequence for variant A.
    pages_a: Vec<PageSpec>,

    /// Page sequence for variant B.
    pages_b: Vec<PageSpec>,

    /// Allocation groups referenced by allocation questions.
    groups: Vec<AllocationGroup>,

    /// The question whose answer identifies the respondent.
    identity: QuestionId,
}

impl Questionnaire {
    /// Create a questionnaire where both variants share the same pages.
    pub fn new(
        name: impl Into<String>,
        identity: impl Into<QuestionId>,
        pages: Vec<PageSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            prelude: None,
            epilogue: None,
            pages_a: pages.clone(),
            pages_b: pages,
            groups: Vec::new(),
            identity: identity.into(),
        }
    }

    /// Create a questionnaire with a distinct page sequence per variant.
    pub fn with_variants(
        name: impl Into<String>,
        identity: impl Into<QuestionId>,
        pages_a: Vec<PageSpec>,
        pages_b: Vec<PageSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            prelude: None,
            epilogue: None,
            pages_a,
            pages_b,
            groups: Vec::new(),
            identity: identity.into(),
        }
    }

    /// Register an allocation group.
    pub fn with_group(mut self, group: AllocationGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Set the prelude message.
    pub fn with_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.prelude = Some(prelude.into());
        self
    }

    /// Set the epilogue message.
    pub fn with_epilogue(mut self, epilogue: impl Into<String>) -> Self {
        self.epilogue = Some(epilogue.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identity question.
    pub fn identity_question(&self) -> &QuestionId {
        &self.identity
    }

    /// The ordered pages for a variant.
    pub fn pages_for(&self, group: GroupAssignment) -> &[PageSpec] {
        match group {
            GroupAssignment::A => &self.pages_a,
            GroupAssignment::B => &self.pages_b,
        }
    }

    /// Find a question in a variant's page sequence.
    pub fn question(&self, group: GroupAssignment, id: &QuestionId) -> Option<&QuestionSpec> {
        self.pages_for(group).iter().find_map(|page| page.question(id))
    }

    /// The kind of a question in a variant's page sequence.
    pub fn question_kind(&self, group: GroupAssignment, id: &QuestionId) -> Option<&QuestionKind> {
        self.question(group, id).map(QuestionSpec::kind)
    }

    /// Look up an allocation group.
    pub fn group(&self, id: &GroupId) -> Option<&AllocationGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn groups(&self) -> &[AllocationGroup] {
        &self.groups
    }

    /// All questions of a variant, in page order.
    pub fn questions(&self, group: GroupAssignment) -> impl Iterator<Item = &QuestionSpec> {
        self.pages_for(group).iter().flat_map(|page| page.questions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Questionnaire {
        let page1 = PageSpec::new("Page 1", vec![QuestionSpec::free_text("name", "Name")]);
        let calm = QuestionSpec::scale("Q1", "Calm wording", 1, 5);
        let loud = QuestionSpec::scale("Q1", "Loud wording", 1, 5);
        let page2_a = PageSpec::new("Page 2", vec![calm]);
        let page2_b = PageSpec::new("Page 2", vec![loud]);
        Questionnaire::with_variants(
            "sample",
            "name",
            vec![page1.clone(), page2_a],
            vec![page1, page2_b],
        )
    }

    #[test]
    fn pages_follow_variant() {
        let q = sample();
        let id = QuestionId::new("Q1");
        assert_eq!(q.question(GroupAssignment::A, &id).unwrap().label(), "Calm wording");
        assert_eq!(q.question(GroupAssignment::B, &id).unwrap().label(), "Loud wording");
    }

    #[test]
    fn unknown_question_has_no_kind() {
        let q = sample();
        assert!(q.question_kind(GroupAssignment::A, &QuestionId::new("Q99")).is_none());
    }

    #[test]
    fn parse_group() {
        assert_eq!("a".parse::<GroupAssignment>().unwrap(), GroupAssignment::A);
        assert_eq!(" B ".parse::<GroupAssignment>().unwrap(), GroupAssignment::B);
        assert!("C".parse::<GroupAssignment>().is_err());
    }

    #[test]
    fn control_is_a() {
        assert!(GroupAssignment::A.is_control());
        assert!(!GroupAssignment::B.is_control());
    }
}
