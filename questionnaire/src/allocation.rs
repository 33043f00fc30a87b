//! Three-way percentage allocation.
//!
//! The three shares of a group are independent: setting one share never
//! touches the other two. The 100% invariant is enforced by the page gate,
//! not by redistributing values while the respondent edits them.

use std::fmt;

use tracing::debug;

use crate::dispatch::snap_share;
use crate::{
    AllocationGroup, AnswerError, AnswerStore, AnswerValue, GroupId, QuestionId, QuestionSpec,
};

/// Message shown when a page is left with an unbalanced allocation.
pub const UNBALANCED_MESSAGE: &str =
    "Please ensure the total allocation equals 100% before proceeding.";

/// The total every allocation group must reach.
pub const ALLOCATION_TOTAL: i64 = 100;

/// The current shares of an allocation group and their running total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationStatus {
    pub group: GroupId,
    pub shares: [(QuestionId, i64); 3],
    pub total: i64,
}

impl AllocationStatus {
    /// True iff the shares sum to exactly 100.
    pub fn is_balanced(&self) -> bool {
        self.total == ALLOCATION_TOTAL
    }

    /// Percentage points still to allocate; negative when over-allocated.
    pub fn remaining(&self) -> i64 {
        ALLOCATION_TOTAL - self.total
    }
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [(a, va), (b, vb), (c, vc)] = &self.shares;
        write!(
            f,
            "Total: {}% ({a}: {va}%, {b}: {vb}%, {c}: {vc}%)",
            self.total
        )?;
        if !self.is_balanced() {
            write!(f, " (Please adjust to equal 100%)")?;
        }
        Ok(())
    }
}

/// Reads and writes the shares of one allocation group in an `AnswerStore`.
#[derive(Debug, Clone, Copy)]
pub struct AllocationReconciler<'q> {
    group: &'q AllocationGroup,
}

impl<'q> AllocationReconciler<'q> {
    pub fn new(group: &'q AllocationGroup) -> Self {
        Self { group }
    }

    pub fn group(&self) -> &'q AllocationGroup {
        self.group
    }

    /// A member's current share; unanswered members count as 0.
    pub fn share(&self, answers: &AnswerStore, member: &QuestionId) -> i64 {
        answers
            .get(member)
            .and_then(AnswerValue::as_int)
            .unwrap_or(0)
    }

    /// Compute the shares and running total.
    pub fn status(&self, answers: &AnswerStore) -> AllocationStatus {
        let shares = self
            .group
            .members
            .clone()
            .map(|member| {
                let share = self.share(answers, &member);
                (member, share)
            });
        let total = shares.iter().map(|(_, share)| share).sum();
        AllocationStatus {
            group: self.group.id.clone(),
            shares,
            total,
        }
    }

    /// True iff the three shares sum to exactly 100.
    pub fn is_balanced(&self, answers: &AnswerStore) -> bool {
        self.status(answers).is_balanced()
    }

    /// Set one member's share, leaving the other two untouched.
    ///
    /// The share is snapped to the slider grid. Returns the new status.
    pub fn set_share(
        &self,
        answers: &mut AnswerStore,
        member: &QuestionSpec,
        share: i64,
    ) -> Result<AllocationStatus, AnswerError> {
        if !self.group.contains(member.id()) {
            return Err(AnswerError::OutOfDomain {
                question: member.id().clone(),
                reason: format!("not a member of allocation group '{}'", self.group.id),
            });
        }
        answers.set(member, AnswerValue::Int(snap_share(share)))?;
        let status = self.status(answers);
        debug!(group = %status.group, total = status.total, "allocation updated");
        Ok(status)
    }
}
