//! Error taxonomy for ledger and assembler operations.
//!
//! Every store failure is converted into one of these kinds at the
//! backend boundary. Callers never see a raw driver error.

use portal_ledger::LedgerError;
use portal_types::{CourseCode, StudentId};

/// Errors surfaced by portal operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortalError {
    /// The student or the course does not exist.
    #[error("{message}")]
    Referential {
        /// Underlying cause as reported by the store.
        message: String,
    },

    /// The (student, course) pair already has a registration.
    #[error("{message}")]
    DuplicateRegistration {
        /// Underlying cause as reported by the store.
        message: String,
    },

    /// No registration matched the pair, so nothing was changed.
    #[error("student {student} has no registration for course {course}")]
    NotFoundOnRemoval {
        /// The student named by the request.
        student: StudentId,
        /// The course named by the request.
        course: CourseCode,
    },

    /// The registration exists but is not waiting, so it cannot be promoted.
    #[error("student {student} is not waiting for course {course}")]
    NotWaiting {
        /// The student named by the request.
        student: StudentId,
        /// The course named by the request.
        course: CourseCode,
    },

    /// No identity record exists for the student.
    #[error("student {student} does not exist")]
    NotFound {
        /// The student named by the request.
        student: StudentId,
    },

    /// Any other store failure (connectivity, constraint, decoding).
    #[error("{message}")]
    Store {
        /// Underlying cause as reported by the store.
        message: String,
    },
}

impl PortalError {
    /// Stable short name of the error kind, for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Referential { .. } => "referential",
            Self::DuplicateRegistration { .. } => "duplicate_registration",
            Self::NotFoundOnRemoval { .. } => "not_found_on_removal",
            Self::NotWaiting { .. } => "not_waiting",
            Self::NotFound { .. } => "not_found",
            Self::Store { .. } => "store",
        }
    }

    /// Shorthand for a [`PortalError::Store`] with the given message.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

impl From<LedgerError> for PortalError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Duplicate { .. } => Self::DuplicateRegistration {
                message: err.to_string(),
            },
            LedgerError::SequenceExhausted => Self::store(err.to_string()),
        }
    }
}
