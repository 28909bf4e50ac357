//! Error types for the data layer.
//!
//! [`DbError`] wraps the underlying [`sqlx`] errors. At the backend
//! boundary it is converted into a [`PortalError`] by SQLSTATE class, so a
//! unique violation raised inside the insert itself is the duplicate
//! signal and no pre-check is needed.

use portal_core::PortalError;
use sqlx::error::ErrorKind;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A column held a value the domain types cannot represent.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<DbError> for PortalError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Postgres(e) => classify(&e),
            other => Self::store(other.to_string()),
        }
    }
}

/// Map a driver error onto the portal error taxonomy.
///
/// Constraint violations carry the server's primary message (without the
/// `DETAIL` line). Anything that is not a constraint violation is a
/// [`PortalError::Store`].
pub fn classify(err: &sqlx::Error) -> PortalError {
    let sqlx::Error::Database(db) = err else {
        return PortalError::store(err.to_string());
    };

    let message = db.message().to_owned();
    match db.kind() {
        ErrorKind::UniqueViolation => PortalError::DuplicateRegistration { message },
        ErrorKind::ForeignKeyViolation => PortalError::Referential { message },
        _ => PortalError::Store { message },
    }
}
