//! Entity records as the store holds them.
//!
//! Identity, catalog, course history and graduation facts are read-only
//! from the core's point of view. [`Registration`] is the only record the
//! enrollment ledger creates, rewrites, or destroys.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::RegistrationStatus;
use crate::ids::{CourseCode, StudentId};

/// Basic identity of a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Identity number.
    pub id: StudentId,
    /// Full name.
    pub name: String,
    /// Login name.
    pub login: String,
    /// Study program.
    pub program: String,
    /// Branch within the program, if one has been chosen.
    pub branch: Option<String>,
}

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Catalog code.
    pub code: CourseCode,
    /// Course name.
    pub name: String,
    /// Credits awarded on completion.
    pub credits: Decimal,
}

/// A graded course a student has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedCourse {
    /// The student who took the course.
    pub student: StudentId,
    /// The course taken.
    pub course: CourseCode,
    /// Credits the course carried.
    pub credits: Decimal,
    /// Grade received (`U`, `3`, `4` or `5`).
    pub grade: String,
}

/// One row of the registration ledger.
///
/// `seq` is the insertion sequence: strictly increasing across the ledger,
/// never reused, and the primary key of waitlist ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// The registered student.
    pub student: StudentId,
    /// The course registered for.
    pub course: CourseCode,
    /// Whether the student holds a seat or is queued.
    pub status: RegistrationStatus,
    /// Insertion sequence number.
    pub seq: u64,
    /// When the row was inserted.
    pub registered_at: DateTime<Utc>,
}

/// Progress-toward-degree facts, computed outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduationPath {
    /// The student these facts describe.
    pub student: StudentId,
    /// Number of passed seminar courses.
    pub seminar_courses: u32,
    /// Credits from mathematical courses.
    pub math_credits: Decimal,
    /// Credits from research courses.
    pub research_credits: Decimal,
    /// Total passed credits.
    pub total_credits: Decimal,
    /// Whether the student meets every graduation requirement.
    pub qualified: bool,
}
