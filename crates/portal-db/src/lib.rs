//! `PostgreSQL` backend for the student portal.
//!
//! The relational store is the source of truth for identity, catalog,
//! course history, graduation facts and the registration ledger. This
//! crate owns the schema (embedded migrations), the pooled connection,
//! and the [`EnrollmentBackend`] implementation the core runs against.
//!
//! # Architecture
//!
//! ```text
//! Portal (portal-core)
//!     |
//!     +-- EnrollmentBackend --> PostgresPool
//!         |-- RegistrationStore  (registrations, course_queue_positions)
//!         |-- StudentStore       (joined read for the student document)
//!         +-- CatalogStore       (students, courses, taken, path_to_graduation)
//! ```
//!
//! All statements are parameterized. Every mutation is a single statement,
//! so it is atomic without an explicit transaction.
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool and configuration
//! - [`registration_store`] -- Ledger writes and queue positions
//! - [`student_store`] -- The joined student read
//! - [`catalog_store`] -- Writes for the collaborator-owned relations
//! - [`backend`] -- [`EnrollmentBackend`] for [`PostgresPool`]
//! - [`error`] -- [`DbError`] and SQLSTATE classification
//!
//! [`EnrollmentBackend`]: portal_core::EnrollmentBackend

pub mod backend;
pub mod catalog_store;
pub mod error;
pub mod postgres;
pub mod registration_store;
pub mod student_store;

// Re-export primary types for convenience.
pub use catalog_store::CatalogStore;
pub use error::{DbError, classify};
pub use postgres::{PostgresConfig, PostgresPool};
pub use registration_store::{RegistrationRow, RegistrationStore};
pub use student_store::{StudentInfoRow, StudentStore};
