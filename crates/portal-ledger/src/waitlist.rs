//! Waitlist ranking.
//!
//! A course's waitlist is first-come first-served: the row with the lowest
//! insertion sequence is first in line. Two rows never share a sequence
//! number inside one ledger, but ranking still breaks ties by student id
//! so the order is total for rows assembled from other sources.

use portal_types::{CourseCode, Registration, StudentId};

/// A waiting student together with their 1-based queue position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistPosition {
    /// The waiting student.
    pub student: StudentId,
    /// The course being waited for.
    pub course: CourseCode,
    /// 1-based position in the queue.
    pub position: u32,
}

/// Rank the waiting rows for `course` among `rows`.
///
/// Rows for other courses and rows that hold a seat are ignored. The
/// result is ordered by position, which starts at 1 and has no gaps.
/// Ranking is a pure function of its input and never mutates anything.
pub fn rank_waitlist<'a, I>(rows: I, course: &CourseCode) -> Vec<WaitlistPosition>
where
    I: IntoIterator<Item = &'a Registration>,
{
    let mut waiting: Vec<&Registration> = rows
        .into_iter()
        .filter(|r| &r.course == course && r.status.is_waiting())
        .collect();
    waiting.sort_by(|a, b| a.seq.cmp(&b.seq).then_with(|| a.student.cmp(&b.student)));

    (1_u32..)
        .zip(waiting)
        .map(|(position, row)| WaitlistPosition {
            student: row.student.clone(),
            course: row.course.clone(),
            position,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;
    use portal_types::RegistrationStatus;

    use super::*;

    fn row(student: &str, course: &str, status: RegistrationStatus, seq: u64) -> Registration {
        Registration {
            student: StudentId::from(student),
            course: CourseCode::from(course),
            status,
            seq,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn ranks_by_insertion_sequence() {
        let rows = vec![
            row("s3", "C1", RegistrationStatus::Waiting, 30),
            row("s1", "C1", RegistrationStatus::Waiting, 10),
            row("s2", "C1", RegistrationStatus::Waiting, 20),
        ];
        let ranked = rank_waitlist(&rows, &CourseCode::from("C1"));
        let order: Vec<(&str, u32)> = ranked
            .iter()
            .map(|p| (p.student.as_str(), p.position))
            .collect();
        assert_eq!(order, vec![("s1", 1), ("s2", 2), ("s3", 3)]);
    }

    #[test]
    fn skips_seated_rows_and_other_courses() {
        let rows = vec![
            row("s1", "C1", RegistrationStatus::Registered, 1),
            row("s2", "C2", RegistrationStatus::Waiting, 2),
            row("s3", "C1", RegistrationStatus::Waiting, 3),
        ];
        let ranked = rank_waitlist(&rows, &CourseCode::from("C1"));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].student.as_str(), "s3");
        assert_eq!(ranked[0].position, 1);
    }

    #[test]
    fn equal_sequence_falls_back_to_student_id() {
        let rows = vec![
            row("b", "C1", RegistrationStatus::Waiting, 5),
            row("a", "C1", RegistrationStatus::Waiting, 5),
        ];
        let ranked = rank_waitlist(&rows, &CourseCode::from("C1"));
        assert_eq!(ranked[0].student.as_str(), "a");
        assert_eq!(ranked[1].student.as_str(), "b");
    }

    #[test]
    fn empty_waitlist() {
        let rows: Vec<Registration> = Vec::new();
        assert!(rank_waitlist(&rows, &CourseCode::from("C1")).is_empty());
    }
}
