//! Error types for the portal binary.
//!
//! Only startup can fail the process. Once the pool is up, every portal
//! operation reports its result as an outcome document on stdout.

/// Top-level error for the portal binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: portal_core::config::ConfigError,
    },

    /// Connecting to or migrating the store failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying data layer error.
        #[from]
        source: portal_db::DbError,
    },

    /// A read that has no outcome document failed.
    #[error("query error: {source}")]
    Query {
        /// The classified portal error.
        #[from]
        source: portal_core::PortalError,
    },

    /// Rendering the result failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
