//! Dialoguer driver for a questionnaire `Session`.

use std::fmt;

use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Confirm, Input, Select};
use questionnaire::dispatch::{InputWidget, RawInput};
use questionnaire::{PersistenceSink, QuestionSpec, Record, Session, SessionError};
use thiserror::Error;
use tracing::debug;

/// Error type for the Dialoguer driver.
#[derive(Debug, Error)]
pub enum DialoguerError {
    /// User cancelled the questionnaire (e.g., pressed Ctrl+C or Escape).
    #[error("Questionnaire cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// The session refused an operation the driver cannot recover from.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn prompt_error(err: dialoguer::Error) -> DialoguerError {
    if is_cancelled(&err) {
        DialoguerError::Cancelled
    } else {
        DialoguerError::Dialoguer(err)
    }
}

/// A navigation action offered below a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Previous,
    Next,
    Submit,
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Previous => write!(f, "Previous"),
            Self::Next => write!(f, "Next"),
            Self::Submit => write!(f, "Submit"),
        }
    }
}

/// The actions available on the current page, in display order.
pub fn navigation_choices(session: &Session<'_>) -> Vec<Navigation> {
    let mut choices = Vec::with_capacity(2);
    if session.can_go_back() {
        choices.push(Navigation::Previous);
    }
    if session.can_go_next() {
        choices.push(Navigation::Next);
    }
    if session.can_submit() {
        choices.push(Navigation::Submit);
    }
    choices
}

/// The heading printed above the current page.
pub fn page_heading(session: &Session<'_>) -> String {
    format!(
        "--- {} ({}/{}) ---",
        session.current_page().id(),
        session.page_index() + 1,
        session.page_count()
    )
}

/// Page-by-page command-line driver.
///
/// Every question of the current page is prompted in order, pre-filled with
/// the answer the session already holds, then the respondent picks one of
/// the navigation actions the session allows.
#[derive(Debug, Default, Clone)]
pub struct DialoguerDriver {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerDriver {
    /// Create a new driver with default (colorful) theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a driver with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    /// Walk one respondent through the session until a submission is saved.
    ///
    /// Validation and storage failures are shown and the respondent stays on
    /// the page; the session keeps every answer.
    pub fn run<S: PersistenceSink + ?Sized>(
        &self,
        session: &mut Session<'_>,
        sink: &S,
    ) -> Result<Record, DialoguerError> {
        if let Some(prelude) = &session.questionnaire().prelude {
            println!("{prelude}");
            println!();
        }

        loop {
            self.ask_page(session)?;

            match self.ask_navigation(session)? {
                Navigation::Previous => session.previous()?,
                Navigation::Next => match session.next() {
                    Ok(()) => {}
                    Err(err) if err.is_validation() => println!("Error: {err}"),
                    Err(err) => return Err(err.into()),
                },
                Navigation::Submit => match session.submit(sink) {
                    Ok(record) => {
                        if let Some(epilogue) = &session.questionnaire().epilogue {
                            println!();
                            println!("{epilogue}");
                        }
                        return Ok(record);
                    }
                    Err(err @ SessionError::Storage { .. }) => {
                        println!("Error: {err}");
                        println!("Your answers are kept. Submit again to retry.");
                    }
                    Err(err) if err.is_validation() => println!("Error: {err}"),
                    Err(err) => return Err(err.into()),
                },
            }
        }
    }

    /// Ask a yes/no question outside of a session.
    pub fn confirm(&self, prompt: &str) -> Result<bool, DialoguerError> {
        let theme = self.theme();
        Confirm::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn ask_page(&self, session: &mut Session<'_>) -> Result<(), DialoguerError> {
        let page = session.current_page();
        println!();
        println!("{}", page_heading(session));
        if let Some(note) = page.note() {
            println!("{note}");
        }

        for question in page.questions() {
            self.ask_question(session, question)?;
        }
        Ok(())
    }

    fn ask_navigation(&self, session: &Session<'_>) -> Result<Navigation, DialoguerError> {
        let choices = navigation_choices(session);
        let default = choices
            .iter()
            .position(|c| *c != Navigation::Previous)
            .unwrap_or(0);

        let theme = self.theme();
        let selection = Select::with_theme(theme.as_ref())
            .with_prompt("Continue")
            .items(&choices)
            .default(default)
            .interact()
            .map_err(prompt_error)?;

        let action = choices[selection];
        debug!(page = session.current_page().id(), ?action, "navigation chosen");
        Ok(action)
    }

    /// Prompt until the session accepts the input.
    fn ask_question(
        &self,
        session: &mut Session<'_>,
        question: &QuestionSpec,
    ) -> Result<(), DialoguerError> {
        let id = question.id();
        let Some(widget) = session.widget(id) else {
            return Ok(());
        };

        loop {
            let current = session.current_input(id);
            let raw = match &widget {
                InputWidget::TextField => self.ask_text(question.label(), current)?,
                InputWidget::Slider { min, max, default, .. } => {
                    let prompt = format!("{} [{min}-{max}]", question.label());
                    RawInput::Number(self.ask_number(&prompt, number_or(current, *default))?)
                }
                InputWidget::Radio { options, default } => {
                    let selected = match current {
                        Some(RawInput::Selected(index)) => index,
                        _ => *default,
                    };
                    self.ask_choice(question.label(), options, selected)?
                }
                InputWidget::AllocationSlider { min, max, step, .. } => {
                    let prompt = format!("{} [{min}-{max}, step {step}]", question.label());
                    RawInput::Number(self.ask_number(&prompt, number_or(current, *min))?)
                }
                InputWidget::SliderMatrix {
                    factors,
                    min,
                    max,
                    default,
                } => {
                    println!("{}", question.label());
                    let ratings = match current {
                        Some(RawInput::Ratings(ratings)) => ratings,
                        _ => Vec::new(),
                    };
                    let mut answered = Vec::with_capacity(factors.len());
                    for factor in factors {
                        let shown = ratings
                            .iter()
                            .find(|(f, _)| f == factor)
                            .map_or(*default, |(_, r)| *r);
                        let rating = self.ask_number(&format!("  {factor} [{min}-{max}]"), shown)?;
                        answered.push((factor.clone(), rating));
                    }
                    RawInput::Ratings(answered)
                }
            };

            match session.answer(id, raw) {
                Ok(()) => break,
                Err(err @ (SessionError::Answer(_) | SessionError::Dispatch(_))) => {
                    println!("Error: {err}");
                }
                Err(err) => return Err(err.into()),
            }
        }

        if let InputWidget::AllocationSlider { group, .. } = &widget {
            if let Some(status) = session.allocation_status(group) {
                println!("{status}");
            }
        }
        Ok(())
    }

    fn ask_text(
        &self,
        prompt: &str,
        current: Option<RawInput>,
    ) -> Result<RawInput, DialoguerError> {
        let theme = self.theme();
        let mut builder = Input::<String>::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(RawInput::Text(text)) = current {
            if !text.is_empty() {
                builder = builder.with_initial_text(text);
            }
        }
        builder
            .interact_text()
            .map(RawInput::Text)
            .map_err(prompt_error)
    }

    fn ask_number(&self, prompt: &str, shown: i64) -> Result<i64, DialoguerError> {
        let theme = self.theme();
        Input::<i64>::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .default(shown)
            .interact_text()
            .map_err(prompt_error)
    }

    fn ask_choice(
        &self,
        prompt: &str,
        options: &[String],
        selected: usize,
    ) -> Result<RawInput, DialoguerError> {
        let theme = self.theme();
        Select::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .items(options)
            .default(selected.min(options.len().saturating_sub(1)))
            .interact()
            .map(RawInput::Selected)
            .map_err(prompt_error)
    }
}

fn number_or(current: Option<RawInput>, fallback: i64) -> i64 {
    match current {
        Some(RawInput::Number(n)) => n,
        _ => fallback,
    }
}
