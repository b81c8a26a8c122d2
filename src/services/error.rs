//! Domain error taxonomy for the catalog services
//!
//! NotFound, validation, and conflict errors are client-caused and carry
//! enough context (entity kind + id, or field + reason) to act on. Storage
//! failures are logged and surfaced as a generic internal error.

use async_graphql::ErrorExtensions;
use thiserror::Error;
use uuid::Uuid;

use crate::db::CursorError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Author not found with id: {0}")]
    AuthorNotFound(Uuid),

    #[error("Book not found with id: {0}")]
    BookNotFound(Uuid),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(#[from] CursorError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl CatalogError {
    /// Machine-readable error code exposed in GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::AuthorNotFound(_) | CatalogError::BookNotFound(_) => "NOT_FOUND",
            CatalogError::InvalidInput(_) => "BAD_USER_INPUT",
            CatalogError::DuplicateIsbn(_) => "CONFLICT",
            CatalogError::InvalidCursor(_) => "INVALID_CURSOR",
            CatalogError::Database(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ErrorExtensions for CatalogError {
    fn extend(&self) -> async_graphql::Error {
        let message = match self {
            // Storage failures must not leak internal detail to the caller.
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", self.code()))
    }
}
