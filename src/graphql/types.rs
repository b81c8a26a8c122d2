//! GraphQL object and input types for the catalog

use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, ErrorExtensions, InputObject, Result, SimpleObject};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::{AuthorFilter, BookFilter, CreateAuthor, CreateBook};
use crate::services::{CatalogError, UpdateAuthor, UpdateBook};

use super::helpers::author_record_to_graphql;
use super::loaders::AuthorLoader;

/// A catalog author
#[derive(SimpleObject, Clone, Debug)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A catalog book
#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub isbn: String,
    pub published_year: i32,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl Book {
    /// The book's author. Resolved through a dataloader: all distinct author
    /// ids requested within one outer operation coalesce into a single
    /// lookup.
    async fn author(&self, ctx: &Context<'_>) -> Result<Author> {
        let loader = ctx.data_unchecked::<DataLoader<AuthorLoader>>();
        let record = loader
            .load_one(self.author_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Author batch load failed");
                async_graphql::Error::new("internal error")
            })?
            .ok_or_else(|| CatalogError::AuthorNotFound(self.author_id).extend())?;

        Ok(author_record_to_graphql(record))
    }
}

/// Pagination metadata for the book listing
#[derive(SimpleObject, Clone, Debug)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One page of books plus pagination metadata
#[derive(SimpleObject, Clone, Debug)]
pub struct BookList {
    pub books: Vec<Book>,
    pub page_info: PageInfo,
}

#[derive(InputObject, Debug)]
pub struct CreateAuthorInput {
    pub name: String,
    pub surname: String,
    pub bio: Option<String>,
}

impl From<CreateAuthorInput> for CreateAuthor {
    fn from(input: CreateAuthorInput) -> Self {
        Self {
            name: input.name,
            surname: input.surname,
            bio: input.bio,
        }
    }
}

/// Partial author update; omitted fields are left unchanged
#[derive(InputObject, Debug, Default)]
pub struct UpdateAuthorInput {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub bio: Option<String>,
}

impl From<UpdateAuthorInput> for UpdateAuthor {
    fn from(input: UpdateAuthorInput) -> Self {
        Self {
            name: input.name,
            surname: input.surname,
            bio: input.bio,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct CreateBookInput {
    pub title: String,
    pub isbn: String,
    pub published_year: i32,
    pub author_id: Uuid,
}

impl From<CreateBookInput> for CreateBook {
    fn from(input: CreateBookInput) -> Self {
        Self {
            title: input.title,
            isbn: input.isbn,
            published_year: input.published_year,
            author_id: input.author_id,
        }
    }
}

/// Partial book update; omitted fields are left unchanged
#[derive(InputObject, Debug, Default)]
pub struct UpdateBookInput {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub author_id: Option<Uuid>,
}

impl From<UpdateBookInput> for UpdateBook {
    fn from(input: UpdateBookInput) -> Self {
        Self {
            title: input.title,
            isbn: input.isbn,
            published_year: input.published_year,
            author_id: input.author_id,
        }
    }
}

/// Optional criteria ANDed together; omitted criteria impose no constraint
#[derive(InputObject, Debug, Default)]
pub struct AuthorFilterInput {
    /// Case-insensitive substring match
    pub name: Option<String>,
    /// Case-insensitive substring match
    pub surname: Option<String>,
}

impl From<AuthorFilterInput> for AuthorFilter {
    fn from(input: AuthorFilterInput) -> Self {
        Self {
            name: input.name,
            surname: input.surname,
        }
    }
}

/// Optional criteria ANDed together; omitted criteria impose no constraint
#[derive(InputObject, Debug, Default)]
pub struct BookFilterInput {
    /// Case-insensitive substring match
    pub title: Option<String>,
    /// Exact match
    pub isbn: Option<String>,
    /// Exact match
    pub published_year: Option<i32>,
    /// Exact match
    pub author_id: Option<Uuid>,
}

impl From<BookFilterInput> for BookFilter {
    fn from(input: BookFilterInput) -> Self {
        Self {
            title: input.title,
            isbn: input.isbn,
            published_year: input.published_year,
            author_id: input.author_id,
        }
    }
}
