//! Ledger writes and queue positions over the `registrations` relation.
//!
//! Seated and waiting students share one table with a `status` column, so
//! removal is a single parameterized `DELETE` keyed by (student, course).
//! Queue positions come from the `course_queue_positions` view, which
//! ranks waiting rows by insertion sequence.

use chrono::{DateTime, Utc};
use portal_ledger::WaitlistPosition;
use portal_types::{CourseCode, Registration, RegistrationStatus, StudentId};
use sqlx::PgPool;

use crate::error::DbError;

/// Operations on the `registrations` table.
pub struct RegistrationStore<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationStore<'a> {
    /// Create a new registration store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a registration row with the given status.
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] carrying a unique violation for a
    /// duplicate pair or a foreign-key violation for unknown references.
    pub async fn insert(
        &self,
        student: &StudentId,
        course: &CourseCode,
        status: RegistrationStatus,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            r"INSERT INTO registrations (student, course, status)
              VALUES ($1, $2, $3::registration_status)",
        )
        .bind(student.as_str())
        .bind(course.as_str())
        .bind(status.as_str())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete the registration for the pair, whatever its status.
    ///
    /// Returns the number of rows deleted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&self, student: &StudentId, course: &CourseCode) -> Result<u64, DbError> {
        let result = sqlx::query(r"DELETE FROM registrations WHERE student = $1 AND course = $2")
            .bind(student.as_str())
            .bind(course.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Flip a waiting row to `registered`, keeping its sequence number.
    ///
    /// Only a waiting row is written. Returns the status the row had
    /// before the statement, or `None` if the pair has no row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the statement fails, or
    /// [`DbError::Decode`] for an unknown status label.
    pub async fn promote(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<Option<RegistrationStatus>, DbError> {
        let prior: Option<String> = sqlx::query_scalar(
            r"WITH promoted AS (
                UPDATE registrations SET status = 'registered'
                WHERE student = $1 AND course = $2 AND status = 'waiting'
                RETURNING student
              )
              SELECT CASE
                WHEN EXISTS (SELECT 1 FROM promoted) THEN 'waiting'
                ELSE (SELECT status::TEXT FROM registrations
                      WHERE student = $1 AND course = $2)
              END",
        )
        .bind(student.as_str())
        .bind(course.as_str())
        .fetch_one(self.pool)
        .await?;

        prior.as_deref().map(status_from_db).transpose()
    }

    /// Fetch the row for a pair.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<Option<RegistrationRow>, DbError> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r"SELECT student, course, status::TEXT AS status, seq, created_at
              FROM registrations
              WHERE student = $1 AND course = $2",
        )
        .bind(student.as_str())
        .bind(course.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// 1-based waitlist position, `None` unless the pair is waiting.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails, or
    /// [`DbError::Decode`] if the position does not fit a `u32`.
    pub async fn queue_position(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<Option<u32>, DbError> {
        let place: Option<i64> = sqlx::query_scalar(
            r"SELECT place FROM course_queue_positions WHERE student = $1 AND course = $2",
        )
        .bind(student.as_str())
        .bind(course.as_str())
        .fetch_optional(self.pool)
        .await?;

        place.map(position_from_db).transpose()
    }

    /// The ranked waitlist for a course, first in line first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails, or
    /// [`DbError::Decode`] if a position does not fit a `u32`.
    pub async fn waitlist(&self, course: &CourseCode) -> Result<Vec<WaitlistPosition>, DbError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r"SELECT student, place FROM course_queue_positions
              WHERE course = $1
              ORDER BY place",
        )
        .bind(course.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(student, place)| {
                Ok(WaitlistPosition {
                    student: StudentId::from(student),
                    course: course.clone(),
                    position: position_from_db(place)?,
                })
            })
            .collect()
    }
}

/// A row from the `registrations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegistrationRow {
    /// Student identity number.
    pub student: String,
    /// Course code.
    pub course: String,
    /// Status as a string (cast from the `PostgreSQL` enum).
    pub status: String,
    /// Insertion sequence.
    pub seq: i64,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = DbError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            student: StudentId::from(row.student),
            course: CourseCode::from(row.course),
            status: status_from_db(&row.status)?,
            seq: u64::try_from(row.seq)
                .map_err(|e| DbError::Decode(format!("negative registration seq: {e}")))?,
            registered_at: row.created_at,
        })
    }
}

/// Parse a `registration_status` enum label.
pub(crate) fn status_from_db(label: &str) -> Result<RegistrationStatus, DbError> {
    label.parse().map_err(DbError::Decode)
}

/// Convert a `ROW_NUMBER()` value to a queue position.
pub(crate) fn position_from_db(place: i64) -> Result<u32, DbError> {
    u32::try_from(place).map_err(|e| DbError::Decode(format!("queue position {place}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_to_registration() {
        let row = RegistrationRow {
            student: "1111111111".to_owned(),
            course: "CCC111".to_owned(),
            status: "waiting".to_owned(),
            seq: 7,
            created_at: Utc::now(),
        };
        let reg = Registration::try_from(row).unwrap();
        assert_eq!(reg.status, RegistrationStatus::Waiting);
        assert_eq!(reg.seq, 7);
    }

    #[test]
    fn unknown_status_label_is_a_decode_error() {
        assert!(matches!(status_from_db("pending"), Err(DbError::Decode(_))));
    }

    #[test]
    fn positions_must_be_positive_and_fit() {
        assert_eq!(position_from_db(3).unwrap(), 3);
        assert!(position_from_db(-1).is_err());
        assert!(position_from_db(i64::MAX).is_err());
    }
}
