//! Book domain service: field validation, referential integrity against
//! authors, ISBN uniqueness, and the paginated listing.
//!
//! Write-path checks run in a fixed order so error precedence is
//! deterministic: validation, then author existence, then ISBN uniqueness.

use uuid::Uuid;

use crate::db::{BookFilter, BookPage, BookRecord, CreateBook, Cursor, Database};
use crate::db::{authors, books};

use super::CatalogError;
use super::validate::non_blank;

/// ISBN-13 length, enforced on every write
const ISBN_LENGTH: usize = 13;

/// Publication years are plain 4-digit years
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1000..=9999;

/// Partial update: `None` fields keep their existing value
#[derive(Debug, Clone, Default)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub author_id: Option<Uuid>,
}

/// Service enforcing the book write-path rules. Cheap to clone; shares the
/// underlying pool.
#[derive(Clone)]
pub struct BookService {
    db: Database,
}

impl BookService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<BookRecord, CatalogError> {
        self.db
            .books()
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::BookNotFound(id))
    }

    pub async fn find_all(&self, filter: &BookFilter) -> Result<Vec<BookRecord>, CatalogError> {
        Ok(self.db.books().find_all(filter).await?)
    }

    /// Cursor-paginated listing. A malformed cursor fails the whole call; it
    /// never silently resets to the first page.
    pub async fn find_paginated(
        &self,
        filter: &BookFilter,
        cursor: Option<&str>,
        limit: i64,
    ) -> Result<BookPage, CatalogError> {
        if limit < 0 {
            return Err(CatalogError::InvalidInput(
                "Limit must not be negative".to_string(),
            ));
        }
        let cursor = cursor.map(Cursor::decode).transpose()?;

        Ok(self.db.books().find_paginated(filter, cursor, limit).await?)
    }

    pub async fn create(&self, command: CreateBook) -> Result<BookRecord, CatalogError> {
        validate_book(&command.title, &command.isbn, command.published_year)?;

        let mut tx = self.db.pool().begin().await?;

        authors::find_by_id(&mut *tx, command.author_id)
            .await?
            .ok_or(CatalogError::AuthorNotFound(command.author_id))?;

        if books::find_by_isbn(&mut *tx, &command.isbn).await?.is_some() {
            return Err(CatalogError::DuplicateIsbn(command.isbn));
        }

        let record = books::insert(&mut *tx, &command).await?;
        tx.commit().await?;

        tracing::info!(book_id = %record.id, author_id = %record.author_id, "Book created");
        Ok(record)
    }

    /// Partial update: merge the command over the existing record, validate
    /// the merged result, re-check the cross-entity invariants for the fields
    /// that changed, then persist with a bumped `updated_at`.
    pub async fn update(&self, id: Uuid, command: UpdateBook) -> Result<BookRecord, CatalogError> {
        let mut tx = self.db.pool().begin().await?;

        let existing = books::find_by_id(&mut *tx, id)
            .await?
            .ok_or(CatalogError::BookNotFound(id))?;

        let merged = BookRecord {
            id: existing.id,
            title: command.title.unwrap_or_else(|| existing.title.clone()),
            isbn: command.isbn.unwrap_or_else(|| existing.isbn.clone()),
            published_year: command.published_year.unwrap_or(existing.published_year),
            author_id: command.author_id.unwrap_or(existing.author_id),
            created_at: existing.created_at,
            updated_at: crate::db::sqlite_helpers::now_utc(),
        };

        validate_book(&merged.title, &merged.isbn, merged.published_year)?;

        if let Some(author_id) = command.author_id {
            authors::find_by_id(&mut *tx, author_id)
                .await?
                .ok_or(CatalogError::AuthorNotFound(author_id))?;
        }

        // Uniqueness only applies when the ISBN actually changes; writing the
        // same value back must not conflict with the book itself.
        if merged.isbn != existing.isbn
            && books::find_by_isbn(&mut *tx, &merged.isbn).await?.is_some()
        {
            return Err(CatalogError::DuplicateIsbn(merged.isbn));
        }

        if !books::update(&mut *tx, &merged).await? {
            return Err(CatalogError::BookNotFound(id));
        }
        tx.commit().await?;

        tracing::info!(book_id = %id, "Book updated");
        Ok(merged)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let mut tx = self.db.pool().begin().await?;

        books::find_by_id(&mut *tx, id)
            .await?
            .ok_or(CatalogError::BookNotFound(id))?;

        let removed = books::delete_many(&mut *tx, &[id]).await?;
        tx.commit().await?;

        tracing::info!(book_id = %id, "Book deleted");
        Ok(removed > 0)
    }

    /// Best-effort batch removal; returns the count actually removed
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, CatalogError> {
        Ok(books::delete_many(self.db.pool(), ids).await?)
    }
}

fn validate_book(title: &str, isbn: &str, published_year: i32) -> Result<(), CatalogError> {
    non_blank(title, "Book title")?;
    non_blank(isbn, "Book ISBN")?;
    if isbn.chars().count() != ISBN_LENGTH {
        return Err(CatalogError::InvalidInput(format!(
            "Book ISBN must be {} characters",
            ISBN_LENGTH
        )));
    }
    if !YEAR_RANGE.contains(&published_year) {
        return Err(CatalogError::InvalidInput(
            "Book published year must be a valid 4-digit year".to_string(),
        ));
    }
    Ok(())
}
