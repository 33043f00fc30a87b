//! Typed question dispatch.
//!
//! Every decision about how a question is presented and which values it
//! accepts is taken from its `QuestionKind`. The display label never
//! influences dispatch.

use std::collections::HashMap;

use crate::{
    ALLOCATION_MAX, ALLOCATION_STEP, AnswerValue, GroupId, IMPORTANCE_DEFAULT, IMPORTANCE_MAX,
    IMPORTANCE_MIN, QuestionId, QuestionKind, QuestionSpec,
};

/// The concrete input representation of a question.
#[derive(Debug, Clone, PartialEq)]
pub enum InputWidget {
    /// Single-line text input.
    TextField,

    /// Integer slider.
    Slider {
        min: i64,
        max: i64,
        step: i64,
        default: i64,
    },

    /// Pick exactly one option.
    Radio { options: Vec<String>, default: usize },

    /// One share of an allocation group.
    AllocationSlider {
        group: GroupId,
        min: i64,
        max: i64,
        step: i64,
    },

    /// One slider per factor.
    SliderMatrix {
        factors: Vec<String>,
        min: i64,
        max: i64,
        default: i64,
    },
}

/// Raw input as produced by a front-end, before decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Typed text (also accepted for numbers and option names).
    Text(String),

    /// A slider position or typed number.
    Number(i64),

    /// The index of the selected option.
    Selected(usize),

    /// Factor ratings; factors left out keep the default rating.
    Ratings(Vec<(String, i64)>),
}

impl RawInput {
    fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Number(_) => "Number",
            Self::Selected(_) => "Selected",
            Self::Ratings(_) => "Ratings",
        }
    }
}

/// Error type for decoding raw input.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Type mismatch for question '{question}': {kind} question cannot take {input} input")]
    TypeMismatch {
        question: QuestionId,
        kind: &'static str,
        input: &'static str,
    },

    #[error("Question '{question}' expects a whole number, got '{input}'")]
    NotANumber { question: QuestionId, input: String },

    #[error("'{value}' is not an option of question '{question}'")]
    InvalidChoice { question: QuestionId, value: String },

    #[error("'{factor}' is not a factor of question '{question}'")]
    UnknownFactor { question: QuestionId, factor: String },
}

/// Decide the input widget for a question.
pub fn widget_for(question: &QuestionSpec) -> InputWidget {
    match question.kind() {
        QuestionKind::FreeText => InputWidget::TextField,
        QuestionKind::Scale(scale) => InputWidget::Slider {
            min: scale.min,
            max: scale.max,
            step: 1,
            default: scale.midpoint(),
        },
        QuestionKind::SingleChoice(choice) | QuestionKind::MultiChoice(choice) => {
            InputWidget::Radio {
                options: choice.options.clone(),
                default: 0,
            }
        }
        QuestionKind::PercentAllocation(allocation) => InputWidget::AllocationSlider {
            group: allocation.group.clone(),
            min: 0,
            max: ALLOCATION_MAX,
            step: ALLOCATION_STEP,
        },
        QuestionKind::ImportanceMatrix(matrix) => InputWidget::SliderMatrix {
            factors: matrix.factors.clone(),
            min: IMPORTANCE_MIN,
            max: IMPORTANCE_MAX,
            default: IMPORTANCE_DEFAULT,
        },
    }
}

/// The value a question shows before the respondent touches it.
///
/// Scales start at their midpoint, choices at their first option,
/// allocation shares at 0 and matrix factors at 3. Choice questions without
/// options have no default.
pub fn default_value(question: &QuestionSpec) -> Option<AnswerValue> {
    match question.kind() {
        QuestionKind::FreeText => Some(AnswerValue::Text(String::new())),
        QuestionKind::Scale(scale) => Some(AnswerValue::Int(scale.midpoint())),
        QuestionKind::SingleChoice(choice) | QuestionKind::MultiChoice(choice) => {
            choice.options.first().cloned().map(AnswerValue::Choice)
        }
        QuestionKind::PercentAllocation(_) => Some(AnswerValue::Int(0)),
        QuestionKind::ImportanceMatrix(matrix) => Some(AnswerValue::Ratings(
            matrix
                .factors
                .iter()
                .map(|factor| (factor.clone(), IMPORTANCE_DEFAULT))
                .collect(),
        )),
    }
}

/// Snap an allocation share to the slider grid: clamp to `0..=100`, then
/// round to the nearest multiple of 5.
pub fn snap_share(value: i64) -> i64 {
    let clamped = value.clamp(0, ALLOCATION_MAX);
    (clamped + ALLOCATION_STEP / 2) / ALLOCATION_STEP * ALLOCATION_STEP
}

/// Decode raw input into a value of the question's kind.
pub fn decode(question: &QuestionSpec, raw: RawInput) -> Result<AnswerValue, DispatchError> {
    let id = question.id();
    let mismatch = |raw: &RawInput| DispatchError::TypeMismatch {
        question: id.clone(),
        kind: question.kind().name(),
        input: raw.name(),
    };

    match question.kind() {
        QuestionKind::FreeText => match raw {
            RawInput::Text(text) => Ok(AnswerValue::Text(text.trim().to_string())),
            other => Err(mismatch(&other)),
        },

        QuestionKind::Scale(scale) => {
            let value = number(id, raw, &mismatch)?;
            Ok(AnswerValue::Int(scale.clamp(value)))
        }

        QuestionKind::PercentAllocation(_) => {
            let value = number(id, raw, &mismatch)?;
            Ok(AnswerValue::Int(snap_share(value)))
        }

        QuestionKind::SingleChoice(choice) | QuestionKind::MultiChoice(choice) => match raw {
            RawInput::Selected(index) => choice
                .options
                .get(index)
                .cloned()
                .map(AnswerValue::Choice)
                .ok_or_else(|| DispatchError::InvalidChoice {
                    question: id.clone(),
                    value: format!("#{index}"),
                }),
            RawInput::Text(text) => {
                let text = text.trim();
                match choice.position(text) {
                    Some(index) => Ok(AnswerValue::Choice(choice.options[index].clone())),
                    None => Err(DispatchError::InvalidChoice {
                        question: id.clone(),
                        value: text.to_string(),
                    }),
                }
            }
            other => Err(mismatch(&other)),
        },

        QuestionKind::ImportanceMatrix(matrix) => match raw {
            RawInput::Ratings(given) => {
                let mut ratings: HashMap<&str, i64> = HashMap::new();
                for (factor, rating) in &given {
                    if !matrix.factors.iter().any(|f| f == factor) {
                        return Err(DispatchError::UnknownFactor {
                            question: id.clone(),
                            factor: factor.clone(),
                        });
                    }
                    let rating = (*rating).clamp(IMPORTANCE_MIN, IMPORTANCE_MAX);
                    ratings.insert(factor.as_str(), rating);
                }
                Ok(AnswerValue::Ratings(
                    matrix
                        .factors
                        .iter()
                        .map(|factor| {
                            let rating = ratings
                                .get(factor.as_str())
                                .copied()
                                .unwrap_or(IMPORTANCE_DEFAULT);
                            (factor.clone(), rating)
                        })
                        .collect(),
                ))
            }
            other => Err(mismatch(&other)),
        },
    }
}

/// Turn a stored value back into input for redisplay.
pub fn encode(question: &QuestionSpec, value: &AnswerValue) -> RawInput {
    match value {
        AnswerValue::Text(text) => RawInput::Text(text.clone()),
        AnswerValue::Int(i) => RawInput::Number(*i),
        AnswerValue::Choice(option) => match question.kind().options() {
            Some(options) => match options.iter().position(|o| o == option) {
                Some(index) => RawInput::Selected(index),
                None => RawInput::Text(option.clone()),
            },
            None => RawInput::Text(option.clone()),
        },
        AnswerValue::Ratings(ratings) => RawInput::Ratings(ratings.clone()),
    }
}

fn number(
    question: &QuestionId,
    raw: RawInput,
    mismatch: &dyn Fn(&RawInput) -> DispatchError,
) -> Result<i64, DispatchError> {
    match raw {
        RawInput::Number(n) => Ok(n),
        RawInput::Text(text) => {
            let trimmed = text.trim();
            trimmed
                .trim_end_matches('%')
                .trim()
                .parse::<i64>()
                .map_err(|_| DispatchError::NotANumber {
                    question: question.clone(),
                    input: trimmed.to_string(),
                })
        }
        other => Err(mismatch(&other)),
    }
}
