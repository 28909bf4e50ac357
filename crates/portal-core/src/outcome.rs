//! Caller-facing results.
//!
//! Every public portal operation ends in one of these payloads instead of
//! an error, so a failed registration is reported to the caller rather
//! than aborting anything. Error text is reduced to a single line; quote
//! characters are escaped by the JSON encoder when the payload is rendered.

use portal_types::{StudentDocument, StudentId};
use serde::{Deserialize, Serialize};

use crate::error::PortalError;

/// Error text shown for a student without an identity record.
pub const DOES_NOT_EXIST: &str = "does not exist";

/// Result of `register`, `unregister` or a status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOutcome {
    /// Whether the mutation was applied.
    pub success: bool,
    /// Single-line reason for a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rows affected by a successful mutation.
    #[serde(skip)]
    pub affected: u64,
}

impl MutationOutcome {
    /// A successful mutation that touched `affected` rows.
    pub const fn succeeded(affected: u64) -> Self {
        Self {
            success: true,
            error: None,
            affected,
        }
    }

    /// A rejected mutation.
    pub fn failed(error: &PortalError) -> Self {
        Self {
            success: false,
            error: Some(sanitize_message(&error.to_string())),
            affected: 0,
        }
    }

    /// Render as a compact JSON object.
    ///
    /// # Errors
    ///
    /// Returns the encoder error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Result<u64, PortalError>> for MutationOutcome {
    fn from(result: Result<u64, PortalError>) -> Self {
        match result {
            Ok(affected) => Self::succeeded(affected),
            Err(err) => Self::failed(&err),
        }
    }
}

/// Result of a student document lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentOutcome {
    /// The assembled document.
    Found(Box<StudentDocument>),
    /// The lookup failed for the named student.
    Failed {
        /// The student named by the request.
        student: StudentId,
        /// Single-line reason; [`DOES_NOT_EXIST`] for unknown students.
        error: String,
    },
}

impl DocumentOutcome {
    /// Build the outcome for `student` from an assembler result.
    pub fn from_result(student: &StudentId, result: Result<StudentDocument, PortalError>) -> Self {
        match result {
            Ok(document) => Self::Found(Box::new(document)),
            Err(PortalError::NotFound { .. }) => Self::Failed {
                student: student.clone(),
                error: DOES_NOT_EXIST.to_owned(),
            },
            Err(err) => Self::Failed {
                student: student.clone(),
                error: sanitize_message(&err.to_string()),
            },
        }
    }

    /// The document, if the lookup succeeded.
    pub fn document(&self) -> Option<&StudentDocument> {
        match self {
            Self::Found(document) => Some(&**document),
            Self::Failed { .. } => None,
        }
    }

    /// Render as a compact JSON object.
    ///
    /// # Errors
    ///
    /// Returns the encoder error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Reduce a store diagnostic to its first non-blank line.
///
/// Drivers often append `DETAIL:` and `HINT:` lines; only the headline is
/// passed on to callers.
pub fn sanitize_message(message: &str) -> String {
    message
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default()
        .trim_end()
        .to_owned()
}
