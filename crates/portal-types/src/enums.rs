//! Enumeration types for the portal.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// State of a row in the registration ledger.
///
/// A (student, course) pair has at most one registration, and that row
/// carries exactly one status. Only waiting rows have a queue position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RegistrationStatus {
    /// The student holds a seat on the course.
    Registered,
    /// The student is queued for a seat.
    Waiting,
}

impl RegistrationStatus {
    /// The lowercase name used both in the store and in documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Waiting => "waiting",
        }
    }

    /// Whether rows with this status take part in the waitlist ordering.
    pub const fn is_waiting(self) -> bool {
        matches!(self, Self::Waiting)
    }
}

impl core::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(Self::Registered),
            "waiting" => Ok(Self::Waiting),
            other => Err(format!("unknown registration status: {other}")),
        }
    }
}
