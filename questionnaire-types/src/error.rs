use crate::QuestionId;

/// Error type for answer store operations.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("No answer for question '{0}'")]
    Missing(QuestionId),

    #[error("Unknown question '{0}'")]
    UnknownQuestion(QuestionId),

    #[error("Type mismatch for question '{question}': expected {expected}, got {actual}")]
    TypeMismatch {
        question: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid answer for question '{question}': {reason}")]
    OutOfDomain { question: QuestionId, reason: String },
}

/// Error type for persistence sinks.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing store could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend-specific failure.
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StorageError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }

    pub fn serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization(err.to_string())
    }
}
