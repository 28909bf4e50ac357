//! [`EnrollmentBackend`] implementation for [`PostgresPool`].
//!
//! Each method checks out one pooled connection for one statement and
//! converts driver failures with [`classify`](crate::error::classify).

use portal_core::{EnrollmentBackend, JoinedRow, PortalError};
use portal_ledger::WaitlistPosition;
use portal_types::{CourseCode, RegistrationStatus, StudentId};

use crate::postgres::PostgresPool;
use crate::registration_store::RegistrationStore;
use crate::student_store::StudentStore;

impl EnrollmentBackend for PostgresPool {
    async fn insert_registration(
        &self,
        student: &StudentId,
        course: &CourseCode,
        status: RegistrationStatus,
    ) -> Result<u64, PortalError> {
        Ok(RegistrationStore::new(self.pool())
            .insert(student, course, status)
            .await?)
    }

    async fn delete_registration(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<u64, PortalError> {
        Ok(RegistrationStore::new(self.pool()).delete(student, course).await?)
    }

    async fn promote_registration(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<Option<RegistrationStatus>, PortalError> {
        Ok(RegistrationStore::new(self.pool()).promote(student, course).await?)
    }

    async fn queue_position(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<Option<u32>, PortalError> {
        Ok(RegistrationStore::new(self.pool())
            .queue_position(student, course)
            .await?)
    }

    async fn waitlist(&self, course: &CourseCode) -> Result<Vec<WaitlistPosition>, PortalError> {
        Ok(RegistrationStore::new(self.pool()).waitlist(course).await?)
    }

    async fn student_rows(&self, student: &StudentId) -> Result<Vec<JoinedRow>, PortalError> {
        Ok(StudentStore::new(self.pool()).joined_rows(student).await?)
    }
}
