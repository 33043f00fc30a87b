use crate::allocation::{AllocationReconciler, UNBALANCED_MESSAGE};
use crate::{AnswerStore, PageRule, PageSpec, Questionnaire};

/// A page refused forward navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{page}: {message}")]
pub struct ValidationFailure {
    /// The page that was validated.
    pub page: String,

    /// The message shown on that page.
    pub message: String,
}

/// Run a page's rules against the answers, in declaration order.
///
/// The first failing rule decides the message. Pages without rules always
/// pass; defaults left in place on such pages are valid answers.
pub fn validate_page(
    questionnaire: &Questionnaire,
    page: &PageSpec,
    answers: &AnswerStore,
) -> Result<(), ValidationFailure> {
    let fail = |message: String| ValidationFailure {
        page: page.id().to_string(),
        message,
    };

    for rule in page.rules() {
        match rule {
            PageRule::Required { question, message } => {
                if !answers.has_value(question) {
                    return Err(fail(message.clone()));
                }
            }
            PageRule::Balanced(group_id) => {
                let Some(group) = questionnaire.group(group_id) else {
                    return Err(fail(format!("Allocation group '{group_id}' is not defined")));
                };
                if !AllocationReconciler::new(group).is_balanced(answers) {
                    return Err(fail(UNBALANCED_MESSAGE.to_string()));
                }
            }
            PageRule::Custom(validate) => validate(answers).map_err(fail)?,
        }
    }
    Ok(())
}
