//! GraphQL schema definition with queries and mutations

use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::{AuthorService, BookService};

use super::loaders::AuthorLoader;
use super::mutations::{AuthorMutations, BookMutations};
use super::queries::{AuthorQueries, BookQueries};

/// The GraphQL schema type
pub type BibliotekSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(AuthorQueries, BookQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthorMutations, BookMutations);

/// Build the GraphQL schema with all resolvers and shared state
pub fn build_schema(
    author_service: AuthorService,
    book_service: BookService,
    db: Database,
) -> BibliotekSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(author_service)
    .data(book_service)
    .data(DataLoader::new(AuthorLoader::new(db), tokio::spawn))
    .finish()
}
