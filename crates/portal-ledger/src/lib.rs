//! Registration ledger and waitlist ordering for the student portal.
//!
//! The ledger is the authoritative mutable relation of
//! (student, course, status) rows. Every row is stamped with an insertion
//! sequence number when it is created; the waitlist for a course is the
//! set of its `Waiting` rows ordered by that sequence.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`Ledger`] struct: keyed registration rows with
//!   insert, remove, and status-only update.
//! - [`waitlist`] -- Pure ranking of waiting rows into 1-based positions.
//!
//! # Usage
//!
//! ```
//! use portal_ledger::Ledger;
//! use portal_types::{CourseCode, RegistrationStatus, StudentId};
//!
//! let mut ledger = Ledger::new();
//! let course = CourseCode::from("CCC333");
//! let s1 = StudentId::from("1111111111");
//! let s2 = StudentId::from("2222222222");
//!
//! ledger.insert(&s1, &course, RegistrationStatus::Waiting).ok();
//! ledger.insert(&s2, &course, RegistrationStatus::Waiting).ok();
//!
//! assert_eq!(ledger.position_of(&s2, &course), Some(2));
//! ledger.remove(&s1, &course);
//! assert_eq!(ledger.position_of(&s2, &course), Some(1));
//! ```

pub mod ledger;
pub mod waitlist;

// Re-export primary types at crate root.
pub use ledger::Ledger;
pub use waitlist::{WaitlistPosition, rank_waitlist};

use portal_types::{CourseCode, StudentId};

/// Errors that can occur when mutating the ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The (student, course) pair already has a registration row.
    #[error("student {student} is already registered for course {course}")]
    Duplicate {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },

    /// The insertion sequence cannot advance any further.
    #[error("registration sequence exhausted")]
    SequenceExhausted,
}
