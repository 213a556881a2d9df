//! Introspection error types.

use thiserror::Error;

/// Introspection errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The database rejected or failed the catalog query (connectivity,
    /// permissions, decoding of the returned document).
    #[error("introspection failed: {0}")]
    Database(#[from] sqlx::Error),

    /// A schema or relation name cannot be used as an identifier.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

/// Result alias for introspection operations.
pub type Result<T> = std::result::Result<T, Error>;
