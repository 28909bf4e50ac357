//! The registration ledger: one row per (student, course) pair.
//!
//! The [`Ledger`] struct is the in-memory form of the `registrations`
//! relation. It enforces the pair-uniqueness invariant itself and stamps
//! every inserted row with the next insertion sequence number.
//!
//! # Design
//!
//! - **Unique pairs**: a second insert for the same pair is rejected with
//!   [`LedgerError::Duplicate`] and leaves the ledger untouched.
//! - **One status per row**: seated and waiting students live in the same
//!   map, so removal clears either state in a single step.
//! - **FIFO waitlist**: sequence numbers only grow and a row can only leave
//!   the waitlist by promotion or removal, never re-enter it in place, so
//!   nobody jumps the queue.

use std::collections::BTreeMap;

use chrono::Utc;
use portal_types::{CourseCode, Registration, RegistrationStatus, StudentId};

use crate::LedgerError;
use crate::waitlist::{WaitlistPosition, rank_waitlist};

/// The registration ledger.
#[derive(Debug)]
pub struct Ledger {
    /// Rows keyed by (student, course).
    rows: BTreeMap<(StudentId, CourseCode), Registration>,
    /// Sequence number for the next inserted row.
    next_seq: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create a new empty ledger.
    pub const fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_seq: 1,
        }
    }

    /// Return the number of registration rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return whether the ledger has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert a registration row with the given status.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Duplicate`] if the pair already has a row, or
    /// [`LedgerError::SequenceExhausted`] if no sequence number is left.
    pub fn insert(
        &mut self,
        student: &StudentId,
        course: &CourseCode,
        status: RegistrationStatus,
    ) -> Result<&Registration, LedgerError> {
        let key = (student.clone(), course.clone());
        if self.rows.contains_key(&key) {
            return Err(LedgerError::Duplicate {
                student: student.clone(),
                course: course.clone(),
            });
        }

        let seq = self.next_seq;
        self.next_seq = seq.checked_add(1).ok_or(LedgerError::SequenceExhausted)?;

        let row = Registration {
            student: student.clone(),
            course: course.clone(),
            status,
            seq,
            registered_at: Utc::now(),
        };
        tracing::debug!(%student, %course, %status, seq, "ledger row inserted");

        Ok(self.rows.entry(key).or_insert(row))
    }

    /// Remove the row for the pair, whatever its status.
    ///
    /// Returns the number of rows removed (0 or 1).
    pub fn remove(&mut self, student: &StudentId, course: &CourseCode) -> u64 {
        let key = (student.clone(), course.clone());
        u64::from(self.rows.remove(&key).is_some())
    }

    /// Promote a waiting row to `Registered`, keeping its sequence number.
    ///
    /// Returns the status the row had before the call, or `None` if the
    /// pair has no row. Only a `Waiting` row is changed.
    pub fn promote(
        &mut self,
        student: &StudentId,
        course: &CourseCode,
    ) -> Option<RegistrationStatus> {
        let key = (student.clone(), course.clone());
        let row = self.rows.get_mut(&key)?;
        let prior = row.status;
        if prior.is_waiting() {
            row.status = RegistrationStatus::Registered;
            tracing::debug!(%student, %course, seq = row.seq, "ledger row promoted");
        }
        Some(prior)
    }

    /// Look up the row for a pair.
    pub fn get(&self, student: &StudentId, course: &CourseCode) -> Option<&Registration> {
        self.rows.get(&(student.clone(), course.clone()))
    }

    /// All rows belonging to a student, ordered by course code.
    pub fn registrations_for<'a>(
        &'a self,
        student: &'a StudentId,
    ) -> impl Iterator<Item = &'a Registration> + 'a {
        self.rows
            .iter()
            .filter(move |((s, _), _)| s == student)
            .map(|(_, row)| row)
    }

    /// The ranked waitlist for a course.
    pub fn waitlist(&self, course: &CourseCode) -> Vec<WaitlistPosition> {
        rank_waitlist(self.rows.values(), course)
    }

    /// 1-based waitlist position of a student, `None` unless waiting.
    pub fn position_of(&self, student: &StudentId, course: &CourseCode) -> Option<u32> {
        let row = self.get(student, course)?;
        if !row.status.is_waiting() {
            return None;
        }
        self.waitlist(course)
            .into_iter()
            .find(|p| &p.student == student)
            .map(|p| p.position)
    }
}
