//! Aggregation of the joined source relations into a [`StudentDocument`].
//!
//! The store returns one row per combination of finished course and
//! registration (an outer join on both sides), so a student with two
//! finished courses and one registration arrives as two rows. The
//! assembler groups those rows back into one document and keeps each
//! nested entry once, keyed by course code.

use std::collections::BTreeMap;

use portal_types::{
    CourseCode, FinishedEntry, GraduationPath, RegisteredEntry, Student, StudentDocument,
    StudentId,
};

use crate::backend::EnrollmentBackend;
use crate::error::PortalError;

/// One row of the student/history/registration/graduation join.
///
/// `finished` and `registered` are `None` when the respective outer join
/// found nothing; `path` is `None` until graduation facts exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    /// Identity record of the student.
    pub student: Student,
    /// Graduation facts, if computed.
    pub path: Option<GraduationPath>,
    /// One finished course, if any.
    pub finished: Option<FinishedEntry>,
    /// One registration with its resolved queue position, if any.
    pub registered: Option<RegisteredEntry>,
}

/// Fold joined rows into a document.
///
/// Returns `None` when there are no rows, i.e. the student has no identity
/// record. Identity and graduation facts are taken from the first row.
/// Entries are de-duplicated per sub-list by course code and emitted in
/// code order. A seated registration never carries a position.
pub fn assemble<I>(rows: I) -> Option<StudentDocument>
where
    I: IntoIterator<Item = JoinedRow>,
{
    let mut rows = rows.into_iter();
    let first = rows.next()?;

    let mut finished: BTreeMap<CourseCode, FinishedEntry> = BTreeMap::new();
    let mut registered: BTreeMap<CourseCode, RegisteredEntry> = BTreeMap::new();

    let JoinedRow {
        student,
        path,
        finished: first_finished,
        registered: first_registered,
    } = first;
    absorb(&mut finished, &mut registered, first_finished, first_registered);

    for row in rows {
        if row.student.id != student.id {
            tracing::warn!(
                expected = %student.id,
                found = %row.student.id,
                "Ignoring joined row for another student"
            );
            continue;
        }
        absorb(&mut finished, &mut registered, row.finished, row.registered);
    }

    Some(StudentDocument {
        student: student.id,
        name: student.name,
        login: student.login,
        program: student.program,
        branch: student.branch,
        finished: finished.into_values().collect(),
        registered: registered.into_values().collect(),
        seminar_courses: path.as_ref().map(|p| p.seminar_courses),
        math_credits: path.as_ref().map(|p| p.math_credits),
        research_credits: path.as_ref().map(|p| p.research_credits),
        total_credits: path.as_ref().map(|p| p.total_credits),
        can_graduate: path.map(|p| p.qualified),
    })
}

fn absorb(
    finished: &mut BTreeMap<CourseCode, FinishedEntry>,
    registered: &mut BTreeMap<CourseCode, RegisteredEntry>,
    finished_entry: Option<FinishedEntry>,
    registered_entry: Option<RegisteredEntry>,
) {
    if let Some(entry) = finished_entry {
        finished.entry(entry.code.clone()).or_insert(entry);
    }
    if let Some(mut entry) = registered_entry {
        if !entry.status.is_waiting() {
            entry.position = None;
        }
        registered.entry(entry.code.clone()).or_insert(entry);
    }
}

/// Read and assemble the document for `student`.
///
/// # Errors
///
/// Returns [`PortalError::NotFound`] if the student has no identity
/// record, or [`PortalError::Store`] if the store cannot be read.
pub async fn build_student_document<B: EnrollmentBackend>(
    backend: &B,
    student: &StudentId,
) -> Result<StudentDocument, PortalError> {
    let rows = backend.student_rows(student).await?;
    let row_count = rows.len();

    let document = assemble(rows).ok_or_else(|| PortalError::NotFound {
        student: student.clone(),
    })?;

    tracing::debug!(
        %student,
        rows = row_count,
        finished = document.finished.len(),
        registered = document.registered.len(),
        "Assembled student document"
    );
    Ok(document)
}
