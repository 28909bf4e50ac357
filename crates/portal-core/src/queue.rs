//! Queue position resolution.
//!
//! Positions are derived on every read from the ledger's insertion order
//! and are never stored, so resolving a position cannot reorder anyone.

use portal_ledger::WaitlistPosition;
use portal_types::{CourseCode, StudentId};

use crate::backend::EnrollmentBackend;
use crate::error::PortalError;

/// 1-based waitlist position of `student` on `course`.
///
/// Returns `None` when the student holds a seat or has no registration.
///
/// # Errors
///
/// Returns [`PortalError::Store`] if the store cannot be read.
pub async fn position_of<B: EnrollmentBackend>(
    backend: &B,
    student: &StudentId,
    course: &CourseCode,
) -> Result<Option<u32>, PortalError> {
    backend.queue_position(student, course).await
}

/// The full waitlist for `course`, first in line first.
///
/// # Errors
///
/// Returns [`PortalError::Store`] if the store cannot be read.
pub async fn waitlist<B: EnrollmentBackend>(
    backend: &B,
    course: &CourseCode,
) -> Result<Vec<WaitlistPosition>, PortalError> {
    backend.waitlist(course).await
}
