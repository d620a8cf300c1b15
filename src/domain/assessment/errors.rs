//! Assessment-specific error types.

use thiserror::Error;

use super::AssessmentStatus;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors raised by the assessment aggregate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// Operation not allowed in the current status.
    #[error("cannot {action} assessment in status '{status}'")]
    InvalidStatus {
        action: &'static str,
        status: AssessmentStatus,
    },

    #[error("assessment has no medical scale bound")]
    NoMedicalScale,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AssessmentError {
    pub fn invalid_status(action: &'static str, status: AssessmentStatus) -> Self {
        AssessmentError::InvalidStatus { action, status }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AssessmentError::InvalidArgument(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AssessmentError::InvalidStatus { .. } => ErrorCode::InvalidStatus,
            AssessmentError::NoMedicalScale => ErrorCode::NoMedicalScale,
            AssessmentError::InvalidArgument(_) => ErrorCode::ValidationFailed,
            AssessmentError::MissingField(_) => ErrorCode::EmptyField,
            AssessmentError::Validation(err) => err.code(),
        }
    }
}

impl From<AssessmentError> for DomainError {
    fn from(err: AssessmentError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
