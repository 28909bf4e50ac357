//! Enrollment ledger operations.
//!
//! These functions own the add/remove contract of the registration
//! relation. Duplicates are never pre-checked: the insert is attempted and
//! the store's uniqueness constraint is the final arbiter, so two racing
//! registrations for the same pair cannot both succeed.
//!
//! Removal is one statement keyed by (student, course) regardless of
//! status. A seated student and a waiting student are the same row with a
//! different status, so there is no second table to sweep.

use portal_types::{CourseCode, RegistrationStatus, StudentId};
use tracing::info;

use crate::backend::EnrollmentBackend;
use crate::error::PortalError;

/// Register a student on a course with status `Registered`.
///
/// # Errors
///
/// Returns [`PortalError::Referential`] for an unknown student or course,
/// [`PortalError::DuplicateRegistration`] if the pair is already present,
/// or [`PortalError::Store`] for any other store failure.
pub async fn register<B: EnrollmentBackend>(
    backend: &B,
    student: &StudentId,
    course: &CourseCode,
) -> Result<u64, PortalError> {
    register_with_status(backend, student, course, RegistrationStatus::Registered).await
}

/// Register a student with the status an external capacity policy chose.
///
/// # Errors
///
/// Same as [`register`].
pub async fn register_with_status<B: EnrollmentBackend>(
    backend: &B,
    student: &StudentId,
    course: &CourseCode,
    status: RegistrationStatus,
) -> Result<u64, PortalError> {
    let inserted = backend.insert_registration(student, course, status).await?;
    if inserted == 0 {
        return Err(PortalError::store(format!(
            "registration of student {student} for course {course} inserted no rows"
        )));
    }

    info!(%student, %course, %status, inserted, "Inserted registration");
    Ok(inserted)
}

/// Remove a student's registration for a course, seated or waiting.
///
/// # Errors
///
/// Returns [`PortalError::NotFoundOnRemoval`] if nothing matched, or
/// [`PortalError::Store`] for a store failure.
pub async fn unregister<B: EnrollmentBackend>(
    backend: &B,
    student: &StudentId,
    course: &CourseCode,
) -> Result<u64, PortalError> {
    let removed = backend.delete_registration(student, course).await?;
    if removed == 0 {
        return Err(PortalError::NotFoundOnRemoval {
            student: student.clone(),
            course: course.clone(),
        });
    }

    info!(%student, %course, removed, "Deleted registration");
    Ok(removed)
}

/// Move a waiting student onto the course.
///
/// This is the only status rewrite the ledger offers: the external
/// promotion policy calls it when a seat frees up. There is no way back
/// from `Registered` to `Waiting` short of unregistering and registering
/// again, which puts the student at the back of the queue.
///
/// # Errors
///
/// Returns [`PortalError::NotFoundOnRemoval`] if no registration exists
/// for the pair, [`PortalError::NotWaiting`] if it is already seated, or
/// [`PortalError::Store`] for a store failure.
pub async fn promote<B: EnrollmentBackend>(
    backend: &B,
    student: &StudentId,
    course: &CourseCode,
) -> Result<u64, PortalError> {
    match backend.promote_registration(student, course).await? {
        Some(RegistrationStatus::Waiting) => {
            info!(%student, %course, "Promoted registration");
            Ok(1)
        }
        Some(RegistrationStatus::Registered) => Err(PortalError::NotWaiting {
            student: student.clone(),
            course: course.clone(),
        }),
        None => Err(PortalError::NotFoundOnRemoval {
            student: student.clone(),
            course: course.clone(),
        }),
    }
}
