//! The facade callers use.
//!
//! [`Portal`] wraps a backend and turns every operation into a caller-facing
//! outcome. The `try_*` methods keep the typed [`PortalError`] for callers
//! that want to branch on the kind.

use portal_ledger::WaitlistPosition;
use portal_types::{CourseCode, RegistrationStatus, StudentDocument, StudentId};
use tracing::warn;

use crate::backend::EnrollmentBackend;
use crate::error::PortalError;
use crate::outcome::{DocumentOutcome, MutationOutcome};
use crate::{assembler, enrollment, queue};

/// Enrollment ledger and document assembly over a backend.
#[derive(Debug)]
pub struct Portal<B> {
    backend: B,
}

impl<B: EnrollmentBackend> Portal<B> {
    /// Wrap a backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Return a reference to the underlying backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Register `student` on `course` as `Registered`.
    pub async fn register(&self, student: &StudentId, course: &CourseCode) -> MutationOutcome {
        self.register_with_status(student, course, RegistrationStatus::Registered)
            .await
    }

    /// Register with the status an external capacity policy decided.
    pub async fn register_with_status(
        &self,
        student: &StudentId,
        course: &CourseCode,
        status: RegistrationStatus,
    ) -> MutationOutcome {
        let result = self.try_register_with_status(student, course, status).await;
        log_rejection("register", student, course, &result);
        result.into()
    }

    /// Remove `student` from `course`, seated or waiting.
    pub async fn unregister(&self, student: &StudentId, course: &CourseCode) -> MutationOutcome {
        let result = self.try_unregister(student, course).await;
        log_rejection("unregister", student, course, &result);
        result.into()
    }

    /// Move a waiting student onto the course.
    pub async fn promote(&self, student: &StudentId, course: &CourseCode) -> MutationOutcome {
        let result = self.try_promote(student, course).await;
        log_rejection("promote", student, course, &result);
        result.into()
    }

    /// The composed document for `student`, or a failure payload.
    pub async fn student_document(&self, student: &StudentId) -> DocumentOutcome {
        let result = self.try_student_document(student).await;
        if let Err(err) = &result {
            warn!(%student, kind = err.kind(), error = %err, "student document unavailable");
        }
        DocumentOutcome::from_result(student, result)
    }

    /// See [`enrollment::register_with_status`].
    ///
    /// # Errors
    ///
    /// Returns the classified [`PortalError`].
    pub async fn try_register_with_status(
        &self,
        student: &StudentId,
        course: &CourseCode,
        status: RegistrationStatus,
    ) -> Result<u64, PortalError> {
        enrollment::register_with_status(&self.backend, student, course, status).await
    }

    /// See [`enrollment::unregister`].
    ///
    /// # Errors
    ///
    /// Returns the classified [`PortalError`].
    pub async fn try_unregister(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<u64, PortalError> {
        enrollment::unregister(&self.backend, student, course).await
    }

    /// See [`enrollment::promote`].
    ///
    /// # Errors
    ///
    /// Returns the classified [`PortalError`].
    pub async fn try_promote(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<u64, PortalError> {
        enrollment::promote(&self.backend, student, course).await
    }

    /// See [`assembler::build_student_document`].
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NotFound`] for an unknown student.
    pub async fn try_student_document(
        &self,
        student: &StudentId,
    ) -> Result<StudentDocument, PortalError> {
        assembler::build_student_document(&self.backend, student).await
    }

    /// See [`queue::position_of`].
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Store`] if the store cannot be read.
    pub async fn position_of(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<Option<u32>, PortalError> {
        queue::position_of(&self.backend, student, course).await
    }

    /// See [`queue::waitlist`].
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Store`] if the store cannot be read.
    pub async fn waitlist(&self, course: &CourseCode) -> Result<Vec<WaitlistPosition>, PortalError> {
        queue::waitlist(&self.backend, course).await
    }
}

fn log_rejection(
    operation: &'static str,
    student: &StudentId,
    course: &CourseCode,
    result: &Result<u64, PortalError>,
) {
    if let Err(err) = result {
        warn!(operation, %student, %course, kind = err.kind(), error = %err, "operation rejected");
    }
}
