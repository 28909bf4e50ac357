//! Shared type definitions for the student portal.
//!
//! This crate is the single source of truth for the entities the
//! enrollment ledger and the aggregation assembler pass around. The nested
//! [`StudentDocument`] and its items export `TypeScript` bindings via
//! `ts-rs` so that consumers of the JSON document share one schema.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string keys for students and courses
//! - [`enums`] -- [`RegistrationStatus`]
//! - [`structs`] -- Entity records (identity, catalog, history, ledger rows)
//! - [`document`] -- The composed per-student document

pub mod document;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use document::{FinishedEntry, RegisteredEntry, StudentDocument};
pub use enums::RegistrationStatus;
pub use ids::{CourseCode, StudentId};
pub use structs::{Course, FinishedCourse, GraduationPath, Registration, Student};
