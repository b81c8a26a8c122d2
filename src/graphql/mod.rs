//! GraphQL API for the catalog
//!
//! This is the single API surface for the Bibliotek backend: queries and
//! mutations over authors and books, with dataloader-batched Book → Author
//! resolution.

pub mod helpers;
pub mod loaders;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use schema::{BibliotekSchema, build_schema};
