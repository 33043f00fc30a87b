//! The paginated survey state machine.
//!
//! A `Session` walks one respondent through the pages of a `Questionnaire`:
//! `previous` always moves back, `next` moves forward only when the current
//! page validates, and `submit` is only available on the last page. A
//! successful submission hands a `Record` to a `PersistenceSink` and resets
//! the session for the next respondent.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::allocation::{AllocationReconciler, AllocationStatus};
use crate::config::{GroupReset, SessionConfig};
use crate::dispatch::{self, DispatchError, InputWidget, RawInput};
use crate::validation::{ValidationFailure, validate_page};
use crate::{
    AnswerError, AnswerStore, AnswerValue, GroupAssignment, GroupId, PageSpec, PersistenceSink,
    QuestionId, QuestionKind, QuestionSpec, Questionnaire, Record, StorageError, resolve_identity,
};

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A variant of the questionnaire has nothing to show.
    #[error("Questionnaire '{questionnaire}' has no pages for group {group}")]
    NoPages {
        questionnaire: String,
        group: GroupAssignment,
    },

    #[error("Already on the first page")]
    NoPreviousPage,

    #[error("Already on the last page; submit instead")]
    NoNextPage,

    #[error("Submit is only available on the last page")]
    SubmitUnavailable,

    #[error("Question '{0}' is not on the current page")]
    NotOnCurrentPage(QuestionId),

    #[error(transparent)]
    Answer(#[from] AnswerError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Validation failed on {}", .0)]
    ValidationFailed(#[from] ValidationFailure),

    /// Saving failed; the answers are still in the session.
    #[error("Could not save the submission after {attempts} attempt(s): {source}")]
    Storage {
        attempts: u32,
        #[source]
        source: StorageError,
    },
}

impl SessionError {
    /// Check if this is a user-correctable validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed(_))
    }
}

/// The explicit, per-respondent state owned by a `Session`.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Index into the active page sequence.
    pub current_page: usize,

    /// Answers collected so far.
    pub answers: AnswerStore,

    /// The variant; fixed for the lifetime of the state.
    pub group: GroupAssignment,
}

impl SessionState {
    fn fresh(group: GroupAssignment) -> Self {
        Self {
            current_page: 0,
            answers: AnswerStore::new(),
            group,
        }
    }
}

/// One respondent's walk through a questionnaire.
///
/// Sessions are independent: each owns its state and shares only the
/// questionnaire (read-only) and the sink passed to `submit`.
#[derive(Debug)]
pub struct Session<'q> {
    questionnaire: &'q Questionnaire,
    config: SessionConfig,
    state: SessionState,
    rng: StdRng,
}

impl<'q> Session<'q> {
    /// Start a session, choosing the variant from OS entropy.
    ///
    /// Both variants must have at least one page, since a reset may switch
    /// to either of them.
    pub fn start(
        questionnaire: &'q Questionnaire,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        Self::with_rng(questionnaire, config, StdRng::from_entropy())
    }

    /// Start a session with a deterministic variant choice.
    pub fn with_seed(
        questionnaire: &'q Questionnaire,
        config: SessionConfig,
        seed: u64,
    ) -> Result<Self, SessionError> {
        Self::with_rng(questionnaire, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        questionnaire: &'q Questionnaire,
        config: SessionConfig,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        if let Some(group) = GroupAssignment::ALL
            .into_iter()
            .find(|group| questionnaire.pages_for(*group).is_empty())
        {
            return Err(SessionError::NoPages {
                questionnaire: questionnaire.name().to_string(),
                group,
            });
        }

        let group = config.group_selection.choose(&mut rng);
        info!(questionnaire = questionnaire.name(), %group, "session started");
        let mut session = Self {
            questionnaire,
            config,
            state: SessionState::fresh(group),
            rng,
        };
        session.enter_page();
        Ok(session)
    }

    pub fn questionnaire(&self) -> &'q Questionnaire {
        self.questionnaire
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn group(&self) -> GroupAssignment {
        self.state.group
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.state.answers
    }

    /// The active page sequence.
    pub fn pages(&self) -> &'q [PageSpec] {
        self.questionnaire.pages_for(self.state.group)
    }

    pub fn page_index(&self) -> usize {
        self.state.current_page
    }

    pub fn page_count(&self) -> usize {
        self.pages().len()
    }

    pub fn current_page(&self) -> &'q PageSpec {
        &self.pages()[self.state.current_page]
    }

    pub fn is_first_page(&self) -> bool {
        self.state.current_page == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.state.current_page + 1 >= self.page_count()
    }

    /// `previous` is enabled everywhere except the first page.
    pub fn can_go_back(&self) -> bool {
        !self.is_first_page()
    }

    /// `next` is enabled everywhere except the last page.
    pub fn can_go_next(&self) -> bool {
        !self.is_last_page()
    }

    /// `submit` is enabled only on the last page.
    pub fn can_submit(&self) -> bool {
        self.is_last_page()
    }

    /// Find a question in the active page sequence.
    pub fn question(&self, id: &QuestionId) -> Option<&'q QuestionSpec> {
        self.questionnaire.question(self.state.group, id)
    }

    /// The input widget for a question.
    pub fn widget(&self, id: &QuestionId) -> Option<InputWidget> {
        self.question(id).map(dispatch::widget_for)
    }

    /// The stored answer, encoded for redisplay.
    pub fn current_input(&self, id: &QuestionId) -> Option<RawInput> {
        let question = self.question(id)?;
        let value = self.state.answers.get(id)?;
        Some(dispatch::encode(question, value))
    }

    /// Get a stored answer.
    pub fn value(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.state.answers.get(id)
    }

    /// Record input for a question on the current page.
    ///
    /// Allocation shares are written through the group's reconciler, which
    /// never changes the other two shares.
    pub fn answer(&mut self, id: &QuestionId, raw: RawInput) -> Result<(), SessionError> {
        let question = self
            .question(id)
            .ok_or_else(|| AnswerError::UnknownQuestion(id.clone()))?;
        if !self.current_page().contains(id) {
            return Err(SessionError::NotOnCurrentPage(id.clone()));
        }

        let value = dispatch::decode(question, raw)?;
        match (question.kind(), value) {
            (QuestionKind::PercentAllocation(allocation), AnswerValue::Int(share)) => {
                let group = self
                    .questionnaire
                    .group(&allocation.group)
                    .ok_or_else(|| AnswerError::OutOfDomain {
                        question: id.clone(),
                        reason: format!("allocation group '{}' is not defined", allocation.group),
                    })?;
                AllocationReconciler::new(group).set_share(
                    &mut self.state.answers,
                    question,
                    share,
                )?;
            }
            (_, value) => {
                debug!(question = %id, value = ?value, "answer recorded");
                self.state.answers.set(question, value)?;
            }
        }
        Ok(())
    }

    /// The running status of an allocation group.
    pub fn allocation_status(&self, group: &GroupId) -> Option<AllocationStatus> {
        self.questionnaire
            .group(group)
            .map(|g| AllocationReconciler::new(g).status(&self.state.answers))
    }

    /// Validate the current page without navigating.
    pub fn validate_current(&self) -> Result<(), ValidationFailure> {
        validate_page(self.questionnaire, self.current_page(), &self.state.answers)
    }

    /// Move back one page. Never validates; answers are kept.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        if !self.can_go_back() {
            return Err(SessionError::NoPreviousPage);
        }
        self.state.current_page -= 1;
        debug!(page = self.current_page().id(), "moved back");
        Ok(())
    }

    /// Move forward one page if the current page validates.
    ///
    /// On failure the session stays on the current page and the failure
    /// carries the message to show there.
    pub fn next(&mut self) -> Result<(), SessionError> {
        if !self.can_go_next() {
            return Err(SessionError::NoNextPage);
        }
        if let Err(failure) = self.validate_current() {
            debug!(%failure, "next refused");
            return Err(failure.into());
        }
        self.state.current_page += 1;
        debug!(page = self.current_page().id(), "moved forward");
        self.enter_page();
        Ok(())
    }

    /// Validate the last page, save the record and reset the session.
    ///
    /// The save is attempted up to `save_attempts` times. If every attempt
    /// fails the error is returned and the session keeps its answers and
    /// page, so the respondent can submit again.
    pub fn submit<S: PersistenceSink + ?Sized>(
        &mut self,
        sink: &S,
    ) -> Result<Record, SessionError> {
        if !self.can_submit() {
            return Err(SessionError::SubmitUnavailable);
        }
        self.validate_current()?;

        let identity = resolve_identity(
            self.state
                .answers
                .get(self.questionnaire.identity_question()),
        );
        let record = self.state.answers.snapshot_record(identity, self.state.group);

        let attempts = self.config.save_attempts.max(1);
        let mut attempt = 1;
        loop {
            match sink.save(&record) {
                Ok(()) => break,
                Err(err) if attempt < attempts => {
                    warn!(attempt, %err, table = %record.partition_key(), "save failed, retrying");
                    attempt += 1;
                }
                Err(err) => {
                    warn!(
                        attempt,
                        %err,
                        table = %record.partition_key(),
                        "save failed, answers kept"
                    );
                    return Err(SessionError::Storage {
                        attempts: attempt,
                        source: err,
                    });
                }
            }
        }

        info!(
            table = %record.partition_key(),
            group = %record.group(),
            answers = self.state.answers.len(),
            "submission saved"
        );
        self.reset();
        Ok(record)
    }

    /// Start over with an empty store on the first page.
    fn reset(&mut self) {
        let group = match self.config.group_on_reset {
            GroupReset::Retain => self.state.group,
            GroupReset::Reroll => self.config.group_selection.choose(&mut self.rng),
        };
        self.state = SessionState::fresh(group);
        self.enter_page();
    }

    /// Record the displayed defaults of the current page's unanswered
    /// questions. Existing answers are never overwritten.
    fn enter_page(&mut self) {
        for question in self.current_page().questions() {
            if self.state.answers.contains(question.id()) {
                continue;
            }
            if let Some(value) = dispatch::default_value(question) {
                if let Err(err) = self.state.answers.set(question, value) {
                    warn!(question = %question.id(), %err, "default rejected");
                }
            }
        }
    }
}
