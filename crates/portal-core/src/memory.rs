//! In-process backend.
//!
//! [`MemoryStore`] keeps the five source relations behind one mutex and
//! enforces the same contract as the relational store: referential checks
//! on insert, pair uniqueness via the [`Ledger`], and one lock per
//! operation so every mutation and every document read sees a single
//! consistent state.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use portal_ledger::{Ledger, WaitlistPosition};
use portal_types::{
    Course, CourseCode, FinishedEntry, GraduationPath, RegisteredEntry, RegistrationStatus,
    Student, StudentId,
};

use crate::assembler::JoinedRow;
use crate::backend::EnrollmentBackend;
use crate::error::PortalError;

#[derive(Debug, Default)]
struct State {
    students: BTreeMap<StudentId, Student>,
    courses: BTreeMap<CourseCode, Course>,
    /// Grades keyed by (student, course).
    taken: BTreeMap<(StudentId, CourseCode), String>,
    paths: BTreeMap<StudentId, GraduationPath>,
    ledger: Ledger,
}

impl State {
    fn check_refs(&self, student: &StudentId, course: &CourseCode) -> Result<(), PortalError> {
        if !self.students.contains_key(student) {
            return Err(PortalError::Referential {
                message: format!("unknown student \"{student}\""),
            });
        }
        if !self.courses.contains_key(course) {
            return Err(PortalError::Referential {
                message: format!("unknown course \"{course}\""),
            });
        }
        Ok(())
    }

    fn course_name(&self, course: &CourseCode) -> String {
        self.courses
            .get(course)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    fn finished_entries(&self, student: &StudentId) -> Vec<FinishedEntry> {
        self.taken
            .iter()
            .filter(|((s, _), _)| s == student)
            .filter_map(|((_, code), grade)| {
                self.courses.get(code).map(|course| FinishedEntry {
                    code: code.clone(),
                    course: course.name.clone(),
                    credits: course.credits,
                    grade: grade.clone(),
                })
            })
            .collect()
    }

    fn registered_entries(&self, student: &StudentId) -> Vec<RegisteredEntry> {
        self.ledger
            .registrations_for(student)
            .map(|row| RegisteredEntry {
                code: row.course.clone(),
                course: self.course_name(&row.course),
                status: row.status,
                position: self.ledger.position_of(student, &row.course),
            })
            .collect()
    }
}

/// In-process implementation of [`EnrollmentBackend`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, PortalError> {
        self.state
            .lock()
            .map_err(|e| PortalError::store(format!("memory store lock poisoned: {e}")))
    }

    /// Add or replace a student identity record.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Store`] if the store lock is poisoned.
    pub fn add_student(&self, student: Student) -> Result<(), PortalError> {
        self.lock()?.students.insert(student.id.clone(), student);
        Ok(())
    }

    /// Add or replace a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Store`] if the store lock is poisoned.
    pub fn add_course(&self, course: Course) -> Result<(), PortalError> {
        self.lock()?.courses.insert(course.code.clone(), course);
        Ok(())
    }

    /// Record a graded course result. Credits come from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Referential`] for an unknown student or course.
    pub fn record_finished(
        &self,
        student: &StudentId,
        course: &CourseCode,
        grade: &str,
    ) -> Result<(), PortalError> {
        let mut state = self.lock()?;
        state.check_refs(student, course)?;
        state
            .taken
            .insert((student.clone(), course.clone()), grade.to_owned());
        Ok(())
    }

    /// Store externally computed graduation facts.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Referential`] for an unknown student.
    pub fn set_graduation_path(&self, path: GraduationPath) -> Result<(), PortalError> {
        let mut state = self.lock()?;
        if !state.students.contains_key(&path.student) {
            return Err(PortalError::Referential {
                message: format!("unknown student \"{}\"", path.student),
            });
        }
        state.paths.insert(path.student.clone(), path);
        Ok(())
    }

    /// Number of registration rows currently held.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Store`] if the store lock is poisoned.
    pub fn registration_count(&self) -> Result<usize, PortalError> {
        Ok(self.lock()?.ledger.len())
    }
}

impl EnrollmentBackend for MemoryStore {
    async fn insert_registration(
        &self,
        student: &StudentId,
        course: &CourseCode,
        status: RegistrationStatus,
    ) -> Result<u64, PortalError> {
        let mut state = self.lock()?;
        state.check_refs(student, course)?;
        state.ledger.insert(student, course, status)?;
        Ok(1)
    }

    async fn delete_registration(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<u64, PortalError> {
        Ok(self.lock()?.ledger.remove(student, course))
    }

    async fn promote_registration(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<Option<RegistrationStatus>, PortalError> {
        Ok(self.lock()?.ledger.promote(student, course))
    }

    async fn queue_position(
        &self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Result<Option<u32>, PortalError> {
        Ok(self.lock()?.ledger.position_of(student, course))
    }

    async fn waitlist(&self, course: &CourseCode) -> Result<Vec<WaitlistPosition>, PortalError> {
        Ok(self.lock()?.ledger.waitlist(course))
    }

    async fn student_rows(&self, student: &StudentId) -> Result<Vec<JoinedRow>, PortalError> {
        let state = self.lock()?;
        let Some(identity) = state.students.get(student) else {
            return Ok(Vec::new());
        };
        let path = state.paths.get(student).cloned();

        // Outer join on both sides: an empty side still contributes one
        // `None` so the identity row survives.
        let finished: Vec<Option<FinishedEntry>> =
            pad_outer(state.finished_entries(student).into_iter().map(Some).collect());
        let registered: Vec<Option<RegisteredEntry>> =
            pad_outer(state.registered_entries(student).into_iter().map(Some).collect());

        let mut rows = Vec::with_capacity(finished.len().saturating_mul(registered.len()));
        for f in &finished {
            for r in &registered {
                rows.push(JoinedRow {
                    student: identity.clone(),
                    path: path.clone(),
                    finished: f.clone(),
                    registered: r.clone(),
                });
            }
        }
        Ok(rows)
    }
}

fn pad_outer<T>(mut items: Vec<Option<T>>) -> Vec<Option<T>> {
    if items.is_empty() {
        items.push(None);
    }
    items
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .add_student(Student {
                id: StudentId::from("1111111111"),
                name: "N1".to_owned(),
                login: "ls1".to_owned(),
                program: "Prog1".to_owned(),
                branch: None,
            })
            .unwrap();
        for code in ["CCC111", "CCC222", "CCC333"] {
            store
                .add_course(Course {
                    code: CourseCode::from(code),
                    name: format!("C{code}"),
                    credits: Decimal::new(225, 1),
                })
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn fan_out_rows_are_the_product_of_both_sides() {
        let store = seeded();
        let s1 = StudentId::from("1111111111");
        store.record_finished(&s1, &CourseCode::from("CCC111"), "5").unwrap();
        store.record_finished(&s1, &CourseCode::from("CCC222"), "3").unwrap();
        store
            .insert_registration(&s1, &CourseCode::from("CCC333"), RegistrationStatus::Registered)
            .await
            .unwrap();

        let rows = store.student_rows(&s1).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.registered.is_some()));
    }

    #[tokio::test]
    async fn identity_without_history_yields_one_padded_row() {
        let store = seeded();
        let rows = store.student_rows(&StudentId::from("1111111111")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].finished.is_none());
        assert!(rows[0].registered.is_none());
        assert!(rows[0].path.is_none());
    }

    #[tokio::test]
    async fn unknown_course_is_referential() {
        let store = seeded();
        let err = store
            .insert_registration(
                &StudentId::from("1111111111"),
                &CourseCode::from("XXX000"),
                RegistrationStatus::Registered,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "referential");
        assert_eq!(store.registration_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn promoting_a_seated_row_keeps_it_off_the_waitlist() {
        let store = seeded();
        store
            .add_student(Student {
                id: StudentId::from("2222222222"),
                name: "N2".to_owned(),
                login: "ls2".to_owned(),
                program: "Prog1".to_owned(),
                branch: None,
            })
            .unwrap();
        let s1 = StudentId::from("1111111111");
        let s2 = StudentId::from("2222222222");
        let course = CourseCode::from("CCC333");
        store
            .insert_registration(&s1, &course, RegistrationStatus::Registered)
            .await
            .unwrap();
        store
            .insert_registration(&s2, &course, RegistrationStatus::Waiting)
            .await
            .unwrap();

        let prior = store.promote_registration(&s1, &course).await.unwrap();

        assert_eq!(prior, Some(RegistrationStatus::Registered));
        assert_eq!(store.queue_position(&s1, &course).await.unwrap(), None);
        assert_eq!(store.queue_position(&s2, &course).await.unwrap(), Some(1));
        assert_eq!(
            store.promote_registration(&s2, &course).await.unwrap(),
            Some(RegistrationStatus::Waiting)
        );
        assert!(store.waitlist(&course).await.unwrap().is_empty());
    }

    #[test]
    fn finished_course_requires_known_refs() {
        let store = seeded();
        let err = store
            .record_finished(&StudentId::from("0"), &CourseCode::from("CCC111"), "5")
            .unwrap_err();
        assert!(matches!(err, PortalError::Referential { .. }));
    }
}
