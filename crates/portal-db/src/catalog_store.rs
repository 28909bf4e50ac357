//! Writes for the relations the portal only reads.
//!
//! Identity, catalog, graded results and graduation facts belong to
//! collaborators. These helpers let those collaborators, fixtures and
//! integration tests populate them through the same pool.

use portal_types::{Course, CourseCode, GraduationPath, Student, StudentId};
use sqlx::PgPool;

use crate::error::DbError;

/// Operations on `students`, `courses`, `taken` and `path_to_graduation`.
pub struct CatalogStore<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogStore<'a> {
    /// Create a new catalog store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a student identity record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert_student(&self, student: &Student) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO students (idnr, name, login, program, branch)
              VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(student.id.as_str())
        .bind(&student.name)
        .bind(&student.login)
        .bind(&student.program)
        .bind(student.branch.as_deref())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Insert a catalog course.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert_course(&self, course: &Course) -> Result<(), DbError> {
        sqlx::query(r"INSERT INTO courses (code, name, credits) VALUES ($1, $2, $3)")
            .bind(course.code.as_str())
            .bind(&course.name)
            .bind(course.credits)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Record a graded result for a student.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails, e.g. for an
    /// unknown student or course or an invalid grade.
    pub async fn record_taken(
        &self,
        student: &StudentId,
        course: &CourseCode,
        grade: &str,
    ) -> Result<(), DbError> {
        sqlx::query(r"INSERT INTO taken (student, course, grade) VALUES ($1, $2, $3)")
            .bind(student.as_str())
            .bind(course.as_str())
            .bind(grade)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Store graduation facts, replacing any previous values.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the upsert fails.
    pub async fn upsert_graduation_path(&self, path: &GraduationPath) -> Result<(), DbError> {
        let seminar = i32::try_from(path.seminar_courses)
            .map_err(|e| DbError::Decode(format!("seminar course count: {e}")))?;

        sqlx::query(
            r"INSERT INTO path_to_graduation
              (student, seminar_courses, math_credits, research_credits, total_credits, qualified)
              VALUES ($1, $2, $3, $4, $5, $6)
              ON CONFLICT (student) DO UPDATE SET
                seminar_courses = EXCLUDED.seminar_courses,
                math_credits = EXCLUDED.math_credits,
                research_credits = EXCLUDED.research_credits,
                total_credits = EXCLUDED.total_credits,
                qualified = EXCLUDED.qualified",
        )
        .bind(path.student.as_str())
        .bind(seminar)
        .bind(path.math_credits)
        .bind(path.research_credits)
        .bind(path.total_credits)
        .bind(path.qualified)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
