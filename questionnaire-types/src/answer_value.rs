use serde_json::{Map, Value};

use crate::QuestionKind;
use crate::question::{ALLOCATION_MAX, ALLOCATION_STEP, IMPORTANCE_MAX, IMPORTANCE_MIN};

/// A single answer stored in an `AnswerStore`.
///
/// The variant mirrors the `QuestionKind` the answer belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue {
    /// Trimmed free text (FreeText questions).
    Text(String),

    /// An integer (Scale and PercentAllocation questions).
    Int(i64),

    /// The selected option text (SingleChoice and MultiChoice questions).
    Choice(String),

    /// One rating per factor, in factor order (ImportanceMatrix questions).
    Ratings(Vec<(String, i64)>),
}

impl AnswerValue {
    /// Try to get this value as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a selected option.
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(c) => Some(c),
            _ => None,
        }
    }

    /// Try to get this value as factor ratings.
    pub fn as_ratings(&self) -> Option<&[(String, i64)]> {
        match self {
            Self::Ratings(r) => Some(r),
            _ => None,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Int(_) => "Int",
            Self::Choice(_) => "Choice",
            Self::Ratings(_) => "Ratings",
        }
    }

    /// Check that the value has the shape the question kind expects.
    pub fn has_shape_of(&self, kind: &QuestionKind) -> bool {
        matches!(
            (self, kind),
            (Self::Text(_), QuestionKind::FreeText)
                | (Self::Int(_), QuestionKind::Scale(_))
                | (Self::Int(_), QuestionKind::PercentAllocation(_))
                | (Self::Choice(_), QuestionKind::SingleChoice(_))
                | (Self::Choice(_), QuestionKind::MultiChoice(_))
                | (Self::Ratings(_), QuestionKind::ImportanceMatrix(_))
        )
    }

    /// Check that the value lies in the question kind's value domain.
    ///
    /// Assumes `has_shape_of(kind)`; a value of the wrong shape is reported
    /// as out of domain.
    pub fn check_domain(&self, kind: &QuestionKind) -> Result<(), String> {
        match (self, kind) {
            (Self::Text(_), QuestionKind::FreeText) => Ok(()),
            (Self::Int(value), QuestionKind::Scale(scale)) => {
                if scale.contains(*value) {
                    Ok(())
                } else {
                    Err(format!(
                        "{value} is outside the scale {}..={}",
                        scale.min, scale.max
                    ))
                }
            }
            (Self::Int(value), QuestionKind::PercentAllocation(_)) => {
                if !(0..=ALLOCATION_MAX).contains(value) {
                    Err(format!("{value}% is outside 0..={ALLOCATION_MAX}"))
                } else if value % ALLOCATION_STEP != 0 {
                    Err(format!("{value}% is not a multiple of {ALLOCATION_STEP}"))
                } else {
                    Ok(())
                }
            }
            (Self::Choice(option), QuestionKind::SingleChoice(choice))
            | (Self::Choice(option), QuestionKind::MultiChoice(choice)) => {
                if choice.position(option).is_some() {
                    Ok(())
                } else {
                    Err(format!("'{option}' is not one of the options"))
                }
            }
            (Self::Ratings(ratings), QuestionKind::ImportanceMatrix(matrix)) => {
                if ratings.len() != matrix.factors.len()
                    || ratings
                        .iter()
                        .zip(&matrix.factors)
                        .any(|((factor, _), expected)| factor != expected)
                {
                    return Err("ratings must list every factor once, in order".to_string());
                }
                match ratings
                    .iter()
                    .find(|(_, r)| !(IMPORTANCE_MIN..=IMPORTANCE_MAX).contains(r))
                {
                    Some((factor, rating)) => Err(format!(
                        "rating {rating} for '{factor}' is outside {IMPORTANCE_MIN}..={IMPORTANCE_MAX}"
                    )),
                    None => Ok(()),
                }
            }
            _ => Err(format!(
                "{} value does not fit a {} question",
                self.type_name(),
                kind.name()
            )),
        }
    }

    /// The JSON representation written to persistence.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) | Self::Choice(s) => Value::String(s.clone()),
            Self::Int(i) => Value::from(*i),
            Self::Ratings(ratings) => {
                let map: Map<String, Value> = ratings
                    .iter()
                    .map(|(factor, rating)| (factor.clone(), Value::from(*rating)))
                    .collect();
                Value::Object(map)
            }
        }
    }
}

impl From<i64> for AnswerValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for AnswerValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{AllocationQuestion, ChoiceQuestion, MatrixQuestion, ScaleQuestion};

    #[test]
    fn shape() {
        let scale = QuestionKind::Scale(ScaleQuestion::new(1, 5));
        assert!(AnswerValue::Int(3).has_shape_of(&scale));
        assert!(!AnswerValue::Text("3".into()).has_shape_of(&scale));
        assert!(!AnswerValue::Choice("A".into()).has_shape_of(&QuestionKind::FreeText));
    }

    #[test]
    fn domain() {
        let scale = QuestionKind::Scale(ScaleQuestion::new(1, 5));
        assert!(AnswerValue::Int(5).check_domain(&scale).is_ok());
        assert!(AnswerValue::Int(6).check_domain(&scale).is_err());

        let choice = QuestionKind::SingleChoice(ChoiceQuestion::new(["Yes", "No"]));
        assert!(AnswerValue::Choice("No".into()).check_domain(&choice).is_ok());
        assert!(AnswerValue::Choice("Maybe".into()).check_domain(&choice).is_err());
    }

    #[test]
    fn allocation_domain_is_the_slider_grid() {
        let share = QuestionKind::PercentAllocation(AllocationQuestion::new("Q3"));
        assert!(AnswerValue::Int(0).check_domain(&share).is_ok());
        assert!(AnswerValue::Int(35).check_domain(&share).is_ok());
        assert!(AnswerValue::Int(100).check_domain(&share).is_ok());

        assert!(AnswerValue::Int(37).check_domain(&share).is_err());
        assert!(AnswerValue::Int(99).check_domain(&share).is_err());
        assert!(AnswerValue::Int(105).check_domain(&share).is_err());
        assert!(AnswerValue::Int(-5).check_domain(&share).is_err());
    }

    #[test]
    fn ratings_domain_requires_every_factor() {
        let matrix = QuestionKind::ImportanceMatrix(MatrixQuestion::new(["Price", "Reliability"]));
        let full = AnswerValue::Ratings(vec![("Price".into(), 2), ("Reliability".into(), 5)]);
        assert!(full.check_domain(&matrix).is_ok());

        let partial = AnswerValue::Ratings(vec![("Price".into(), 2)]);
        assert!(partial.check_domain(&matrix).is_err());
    }

    #[test]
    fn ratings_to_json_keeps_factor_order() {
        let value = AnswerValue::Ratings(vec![("Warranty".into(), 1), ("Price".into(), 4)]);
        assert_eq!(
            value.to_json().to_string(),
            r#"{"Warranty":1,"Price":4}"#
        );
    }
}
