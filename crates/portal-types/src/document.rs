//! The composed per-student document.
//!
//! Field names follow the JSON schema consumers validate against
//! (`camelCase`, `canGraduate` for the qualification flag). Sub-lists are
//! always present, possibly empty. Graduation fields are `null` until the
//! external graduation computation has produced a row for the student.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::RegistrationStatus;
use crate::ids::{CourseCode, StudentId};

/// A finished course as it appears in a [`StudentDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FinishedEntry {
    /// Course code.
    pub code: CourseCode,
    /// Course name.
    pub course: String,
    /// Credits earned.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub credits: Decimal,
    /// Grade received.
    pub grade: String,
}

/// An active registration as it appears in a [`StudentDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegisteredEntry {
    /// Course code.
    pub code: CourseCode,
    /// Course name.
    pub course: String,
    /// Registration status.
    pub status: RegistrationStatus,
    /// 1-based waitlist position; `null` for registered students.
    pub position: Option<u32>,
}

/// Everything the portal knows about one student's academic progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct StudentDocument {
    /// Identity number.
    pub student: StudentId,
    /// Full name.
    pub name: String,
    /// Login name.
    pub login: String,
    /// Study program.
    pub program: String,
    /// Branch, `null` if none chosen.
    pub branch: Option<String>,
    /// Finished courses, one entry per course code.
    pub finished: Vec<FinishedEntry>,
    /// Active registrations, one entry per course code.
    pub registered: Vec<RegisteredEntry>,
    /// Passed seminar courses.
    pub seminar_courses: Option<u32>,
    /// Mathematical credits.
    #[serde(with = "rust_decimal::serde::float_option")]
    #[ts(type = "number | null")]
    pub math_credits: Option<Decimal>,
    /// Research credits.
    #[serde(with = "rust_decimal::serde::float_option")]
    #[ts(type = "number | null")]
    pub research_credits: Option<Decimal>,
    /// Total passed credits.
    #[serde(with = "rust_decimal::serde::float_option")]
    #[ts(type = "number | null")]
    pub total_credits: Option<Decimal>,
    /// Whether the student qualifies for graduation.
    pub can_graduate: Option<bool>,
}
