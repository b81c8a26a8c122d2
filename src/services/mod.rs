//! Domain services enforcing the catalog's write-path invariants
//!
//! Services own the [Database](crate::db::Database) and run every multi-step
//! write (create/update with cross-entity checks, cascade delete) inside an
//! explicit sqlx transaction; an error exit rolls back via the transaction's
//! Drop.

pub mod authors;
pub mod books;
mod error;
mod validate;

pub use authors::{AuthorService, UpdateAuthor};
pub use books::{BookService, UpdateBook};
pub use error::CatalogError;
