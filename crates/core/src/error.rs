//! Domain-level error taxonomy shared by every layer.

use crate::types::DbId;

/// A domain-level error.
///
/// The API layer maps each variant to an HTTP status; the variants here
/// carry no transport concerns.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist (or is not visible to the caller).
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Bad input shape: empty name, malformed URL, invalid enum value,
    /// pin/order contradiction. Always recoverable by the caller.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A uniqueness or concurrency conflict that survived to commit time.
    /// The caller may retry.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A blob-store (upload/delete) failure that blocks forward progress.
    #[error("External store error: {0}")]
    ExternalStore(String),

    /// An unexpected internal error. Details are logged server-side only.
    #[error("Internal error: {0}")]
    Internal(String),
}
