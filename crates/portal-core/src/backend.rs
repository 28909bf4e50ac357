//! The store contract the core is written against.
//!
//! An [`EnrollmentBackend`] provides the primitive reads and writes over the
//! five source relations. Implementations must:
//!
//! - run each mutation as one atomic statement (or one transaction),
//! - let the store's uniqueness constraint decide duplicates and report
//!   them as [`PortalError::DuplicateRegistration`],
//! - report unknown students or courses as [`PortalError::Referential`],
//! - serve [`student_rows`] from a single consistent snapshot,
//! - release every connection or lock on all exit paths.
//!
//! [`student_rows`]: EnrollmentBackend::student_rows

use std::future::Future;

use portal_ledger::WaitlistPosition;
use portal_types::{CourseCode, RegistrationStatus, StudentId};

use crate::assembler::JoinedRow;
use crate::error::PortalError;

/// Primitive operations over the enrollment store.
pub trait EnrollmentBackend: Send + Sync {
    /// Insert one registration row. Returns the number of rows inserted.
    fn insert_registration(
        &self,
        student: &StudentId,
        course: &CourseCode,
        status: RegistrationStatus,
    ) -> impl Future<Output = Result<u64, PortalError>> + Send;

    /// Delete the registration row for the pair, whatever its status.
    /// Returns the number of rows deleted.
    fn delete_registration(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> impl Future<Output = Result<u64, PortalError>> + Send;

    /// Flip a waiting row to `Registered` in one statement, leaving any
    /// other row untouched. Returns the status the row had before, or
    /// `None` if the pair has no row.
    fn promote_registration(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> impl Future<Output = Result<Option<RegistrationStatus>, PortalError>> + Send;

    /// 1-based queue position of a waiting registration, `None` otherwise.
    fn queue_position(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> impl Future<Output = Result<Option<u32>, PortalError>> + Send;

    /// The ranked waitlist for a course.
    fn waitlist(
        &self,
        course: &CourseCode,
    ) -> impl Future<Output = Result<Vec<WaitlistPosition>, PortalError>> + Send;

    /// The joined identity/history/registration/graduation rows for a
    /// student. Empty when the student has no identity record.
    fn student_rows(
        &self,
        student: &StudentId,
    ) -> impl Future<Output = Result<Vec<JoinedRow>, PortalError>> + Send;
}
