use serde::Serialize;
use thiserror::Error;

/// Returned by an [`Encoder`](crate::encoder::Encoder) for a value outside its vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category {value:?}")]
pub struct UnknownCategory {
    pub value: String,
}

/// Which side of the boundary an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Encoding,
    Internal,
}

impl ErrorKind {
    /// User errors can be fixed by changing the input; internal ones cannot.
    pub fn is_user_error(self) -> bool {
        !matches!(self, ErrorKind::Internal)
    }
}

/// Everything a single prediction can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("unknown {field} category {value:?}")]
    Encoding { field: &'static str, value: String },

    // artifact corruption or version skew between expander and model
    #[error("{stage} dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        got: usize,
    },

    // inputs large enough to overflow the polynomial terms
    #[error("model produced a non-finite prediction ({value})")]
    NonFinite { value: f64 },
}

impl PredictError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        PredictError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictError::Validation { .. } => ErrorKind::Validation,
            PredictError::Encoding { .. } => ErrorKind::Encoding,
            PredictError::DimensionMismatch { .. } | PredictError::NonFinite { .. } => {
                ErrorKind::Internal
            }
        }
    }
}
