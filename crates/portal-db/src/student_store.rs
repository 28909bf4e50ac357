//! The joined student read behind the student document.
//!
//! One statement joins identity, graduation facts, finished courses and
//! registrations (each with its course name) plus the queue position view.
//! Being a single statement it reads one snapshot, so finished courses,
//! registrations and graduation facts reflect the same point in time.
//!
//! Both history joins are outer joins, so the result fans out to
//! `max(1, finished) * max(1, registered)` rows. Collapsing that back into
//! a document is the assembler's job.

use portal_core::JoinedRow;
use portal_types::{
    CourseCode, FinishedEntry, GraduationPath, RegisteredEntry, Student, StudentId,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::DbError;
use crate::registration_store::{position_from_db, status_from_db};

/// Read operations spanning the student-scoped relations.
pub struct StudentStore<'a> {
    pool: &'a PgPool,
}

impl<'a> StudentStore<'a> {
    /// Create a new student store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the raw joined rows for a student.
    ///
    /// Returns no rows when the student has no identity record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn info_rows(&self, student: &StudentId) -> Result<Vec<StudentInfoRow>, DbError> {
        let rows = sqlx::query_as::<_, StudentInfoRow>(
            r"SELECT s.idnr, s.name, s.login, s.program, s.branch,
                     p.seminar_courses, p.math_credits, p.research_credits, p.total_credits, p.qualified,
                     fc.course AS finished_code, fcn.name AS finished_name,
                     fc.credits AS finished_credits, fc.grade AS finished_grade,
                     r.course AS registered_code, rn.name AS registered_name,
                     r.status::TEXT AS registered_status, q.place AS registered_place
              FROM students s
              LEFT JOIN path_to_graduation p ON p.student = s.idnr
              LEFT JOIN finished_courses fc ON fc.student = s.idnr
              LEFT JOIN courses fcn ON fcn.code = fc.course
              LEFT JOIN registrations r ON r.student = s.idnr
              LEFT JOIN courses rn ON rn.code = r.course
              LEFT JOIN course_queue_positions q ON q.student = r.student AND q.course = r.course
              WHERE s.idnr = $1",
        )
        .bind(student.as_str())
        .fetch_all(self.pool)
        .await?;

        tracing::debug!(%student, rows = rows.len(), "Fetched joined student rows");
        Ok(rows)
    }

    /// Fetch the joined rows converted to domain types.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails, or
    /// [`DbError::Decode`] if a column cannot be represented.
    pub async fn joined_rows(&self, student: &StudentId) -> Result<Vec<JoinedRow>, DbError> {
        self.info_rows(student)
            .await?
            .into_iter()
            .map(JoinedRow::try_from)
            .collect()
    }
}

/// One row of the student join.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StudentInfoRow {
    /// Student identity number.
    pub idnr: String,
    /// Full name.
    pub name: String,
    /// Login name.
    pub login: String,
    /// Study program.
    pub program: String,
    /// Branch, if chosen.
    pub branch: Option<String>,
    /// Passed seminar courses.
    pub seminar_courses: Option<i32>,
    /// Mathematical credits.
    pub math_credits: Option<Decimal>,
    /// Research credits.
    pub research_credits: Option<Decimal>,
    /// Total passed credits.
    pub total_credits: Option<Decimal>,
    /// Graduation qualification.
    pub qualified: Option<bool>,
    /// Finished course code.
    pub finished_code: Option<String>,
    /// Finished course name.
    pub finished_name: Option<String>,
    /// Finished course credits.
    pub finished_credits: Option<Decimal>,
    /// Finished course grade.
    pub finished_grade: Option<String>,
    /// Registered course code.
    pub registered_code: Option<String>,
    /// Registered course name.
    pub registered_name: Option<String>,
    /// Registration status as a string.
    pub registered_status: Option<String>,
    /// Queue position, present only for waiting rows.
    pub registered_place: Option<i64>,
}

impl TryFrom<StudentInfoRow> for JoinedRow {
    type Error = DbError;

    fn try_from(row: StudentInfoRow) -> Result<Self, Self::Error> {
        let student = StudentId::from(row.idnr);

        let path = match (
            row.seminar_courses,
            row.math_credits,
            row.research_credits,
            row.total_credits,
            row.qualified,
        ) {
            (Some(seminar), Some(math), Some(research), Some(total), Some(qualified)) => {
                Some(GraduationPath {
                    student: student.clone(),
                    seminar_courses: u32::try_from(seminar).map_err(|e| {
                        DbError::Decode(format!("seminar course count {seminar}: {e}"))
                    })?,
                    math_credits: math,
                    research_credits: research,
                    total_credits: total,
                    qualified,
                })
            }
            _ => None,
        };

        let finished = match (row.finished_code, row.finished_credits, row.finished_grade) {
            (Some(code), Some(credits), Some(grade)) => Some(FinishedEntry {
                code: CourseCode::from(code),
                course: row.finished_name.unwrap_or_default(),
                credits,
                grade,
            }),
            _ => None,
        };

        let registered = match (row.registered_code, row.registered_status) {
            (Some(code), Some(status)) => Some(RegisteredEntry {
                code: CourseCode::from(code),
                course: row.registered_name.unwrap_or_default(),
                status: status_from_db(&status)?,
                position: row.registered_place.map(position_from_db).transpose()?,
            }),
            _ => None,
        };

        Ok(Self {
            student: Student {
                id: student,
                name: row.name,
                login: row.login,
                program: row.program,
                branch: row.branch,
            },
            path,
            finished,
            registered,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use portal_types::RegistrationStatus;

    use super::*;

    fn identity_only() -> StudentInfoRow {
        StudentInfoRow {
            idnr: "1111111111".to_owned(),
            name: "N1".to_owned(),
            login: "ls1".to_owned(),
            program: "Prog1".to_owned(),
            branch: None,
            seminar_courses: None,
            math_credits: None,
            research_credits: None,
            total_credits: None,
            qualified: None,
            finished_code: None,
            finished_name: None,
            finished_credits: None,
            finished_grade: None,
            registered_code: None,
            registered_name: None,
            registered_status: None,
            registered_place: None,
        }
    }

    #[test]
    fn outer_join_nulls_become_none() {
        let joined = JoinedRow::try_from(identity_only()).unwrap();
        assert_eq!(joined.student.id.as_str(), "1111111111");
        assert!(joined.path.is_none());
        assert!(joined.finished.is_none());
        assert!(joined.registered.is_none());
    }

    #[test]
    fn populated_row_converts() {
        let mut row = identity_only();
        row.seminar_courses = Some(1);
        row.math_credits = Some(Decimal::new(20, 0));
        row.research_credits = Some(Decimal::ZERO);
        row.total_credits = Some(Decimal::new(45, 0));
        row.qualified = Some(false);
        row.finished_code = Some("CCC111".to_owned());
        row.finished_name = Some("C1".to_owned());
        row.finished_credits = Some(Decimal::new(225, 1));
        row.finished_grade = Some("5".to_owned());
        row.registered_code = Some("CCC333".to_owned());
        row.registered_name = Some("C3".to_owned());
        row.registered_status = Some("waiting".to_owned());
        row.registered_place = Some(2);

        let joined = JoinedRow::try_from(row).unwrap();
        assert_eq!(joined.path.unwrap().seminar_courses, 1);
        assert_eq!(joined.finished.unwrap().grade, "5");
        let registered = joined.registered.unwrap();
        assert_eq!(registered.status, RegistrationStatus::Waiting);
        assert_eq!(registered.position, Some(2));
    }

    #[test]
    fn bad_status_label_fails_conversion() {
        let mut row = identity_only();
        row.registered_code = Some("CCC333".to_owned());
        row.registered_status = Some("limbo".to_owned());
        assert!(JoinedRow::try_from(row).is_err());
    }
}
