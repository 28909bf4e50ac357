//! Enrollment ledger operations and student document assembly.
//!
//! This crate holds the rules of the portal: what counts as a valid
//! registration or unregistration, how a waitlist position is derived, and
//! how identity, catalog, course history, registrations and graduation
//! facts are folded into one [`StudentDocument`]. It is written against
//! the [`EnrollmentBackend`] seam; the relational store lives in
//! `portal-db`, and [`MemoryStore`] provides the same contract in process.
//!
//! # Modules
//!
//! - [`backend`] -- [`EnrollmentBackend`]: the store contract.
//! - [`enrollment`] -- Register, unregister and status-only updates.
//! - [`queue`] -- Queue position resolution.
//! - [`assembler`] -- Joined rows to nested document, with de-duplication.
//! - [`outcome`] -- Caller-facing success/failure payloads.
//! - [`portal`] -- [`Portal`]: the facade callers use.
//! - [`memory`] -- [`MemoryStore`]: in-process backend.
//! - [`config`] -- Configuration loading from `portal-config.yaml`.
//! - [`error`] -- [`PortalError`] taxonomy.
//!
//! [`StudentDocument`]: portal_types::StudentDocument
//! [`EnrollmentBackend`]: backend::EnrollmentBackend
//! [`MemoryStore`]: memory::MemoryStore
//! [`Portal`]: portal::Portal
//! [`PortalError`]: error::PortalError

pub mod assembler;
pub mod backend;
pub mod config;
pub mod enrollment;
pub mod error;
pub mod memory;
pub mod outcome;
pub mod portal;
pub mod queue;

pub use assembler::JoinedRow;
pub use backend::EnrollmentBackend;
pub use error::PortalError;
pub use memory::MemoryStore;
pub use outcome::{DocumentOutcome, MutationOutcome};
pub use portal::Portal;
