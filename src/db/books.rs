//! Book database operations, including the cursor-paginated listing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use super::cursor::Cursor;
use super::sqlite_helpers::{datetime_to_str, now_utc, str_to_datetime, str_to_uuid, uuid_to_str};

/// A book record in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub isbn: String,
    pub published_year: i32,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for BookRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let id_str: String = row.try_get("id")?;
        let author_id_str: String = row.try_get("author_id")?;
        let created_at_str: String = row.try_get("created_at")?;
        let updated_at_str: String = row.try_get("updated_at")?;

        Ok(Self {
            id: str_to_uuid(&id_str).map_err(|e| sqlx::Error::Decode(e.into()))?,
            title: row.try_get("title")?,
            isbn: row.try_get("isbn")?,
            published_year: row.try_get("published_year")?,
            author_id: str_to_uuid(&author_id_str).map_err(|e| sqlx::Error::Decode(e.into()))?,
            created_at: str_to_datetime(&created_at_str)
                .map_err(|e| sqlx::Error::Decode(e.into()))?,
            updated_at: str_to_datetime(&updated_at_str)
                .map_err(|e| sqlx::Error::Decode(e.into()))?,
        })
    }
}

/// Input for creating a new book
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub isbn: String,
    pub published_year: i32,
    pub author_id: Uuid,
}

/// Filter options for querying books. Absent criteria impose no constraint;
/// present criteria are ANDed.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Case-insensitive substring match on title
    pub title: Option<String>,
    /// Exact match on ISBN
    pub isbn: Option<String>,
    /// Exact match on published year
    pub published_year: Option<i32>,
    /// Exact match on author id
    pub author_id: Option<Uuid>,
}

impl BookFilter {
    fn conditions(&self) -> Vec<&'static str> {
        let mut conditions = Vec::new();
        if self.title.is_some() {
            conditions.push("lower(title) LIKE lower(?)");
        }
        if self.isbn.is_some() {
            conditions.push("isbn = ?");
        }
        if self.published_year.is_some() {
            conditions.push("published_year = ?");
        }
        if self.author_id.is_some() {
            conditions.push("author_id = ?");
        }
        conditions
    }

    fn bind<'q, O>(
        &self,
        mut query: sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
        if let Some(ref title) = self.title {
            query = query.bind(format!("%{}%", title));
        }
        if let Some(ref isbn) = self.isbn {
            query = query.bind(isbn.clone());
        }
        if let Some(year) = self.published_year {
            query = query.bind(year);
        }
        if let Some(author_id) = self.author_id {
            query = query.bind(uuid_to_str(author_id));
        }
        query
    }
}

/// One page of the book listing, ordered by creation time descending
#[derive(Debug, Clone)]
pub struct BookPage {
    pub books: Vec<BookRecord>,
    pub has_next_page: bool,
    /// Resume token for the next page; absent when the page is empty
    pub end_cursor: Option<String>,
}

/// Find a book by id
pub async fn find_by_id<'e>(
    exec: impl SqliteExecutor<'e>,
    id: Uuid,
) -> sqlx::Result<Option<BookRecord>> {
    sqlx::query_as::<_, BookRecord>("SELECT * FROM books WHERE id = ?1")
        .bind(uuid_to_str(id))
        .fetch_optional(exec)
        .await
}

/// Find a book by its ISBN (the uniqueness probe on the write path)
pub async fn find_by_isbn<'e>(
    exec: impl SqliteExecutor<'e>,
    isbn: &str,
) -> sqlx::Result<Option<BookRecord>> {
    sqlx::query_as::<_, BookRecord>("SELECT * FROM books WHERE isbn = ?1 LIMIT 1")
        .bind(isbn)
        .fetch_optional(exec)
        .await
}

/// List books matching the filter (no pagination)
pub async fn find_all<'e>(
    exec: impl SqliteExecutor<'e>,
    filter: &BookFilter,
) -> sqlx::Result<Vec<BookRecord>> {
    let conditions = filter.conditions();
    let sql = if conditions.is_empty() {
        "SELECT * FROM books".to_string()
    } else {
        format!("SELECT * FROM books WHERE {}", conditions.join(" AND "))
    };

    let query = filter.bind(sqlx::query_as::<_, BookRecord>(&sql));
    query.fetch_all(exec).await
}

/// Cursor-paginated book listing.
///
/// Walks backward from the resume point (the cursor's timestamp, or "now" for
/// the first page), ordered by creation time descending with a strict seek
/// (`created_at < resume`). Fetches `limit + 1` rows: the extra row only
/// decides `has_next_page` and is discarded. `limit = 0` returns no rows but
/// still reports whether anything exists before the seek point. The probe-row
/// addition saturates so a huge limit cannot overflow into a negative LIMIT.
pub async fn find_paginated<'e>(
    exec: impl SqliteExecutor<'e>,
    filter: &BookFilter,
    cursor: Option<Cursor>,
    limit: i64,
) -> sqlx::Result<BookPage> {
    let seek = cursor.map(|c| c.created_at).unwrap_or_else(now_utc);

    let mut conditions = filter.conditions();
    conditions.push("created_at < ?");

    let sql = format!(
        "SELECT * FROM books WHERE {} ORDER BY created_at DESC LIMIT ?",
        conditions.join(" AND ")
    );

    let query = filter
        .bind(sqlx::query_as::<_, BookRecord>(&sql))
        .bind(datetime_to_str(seek))
        .bind(limit.saturating_add(1));

    let mut books = query.fetch_all(exec).await?;

    let has_next_page = books.len() as i64 > limit;
    books.truncate(limit.max(0) as usize);
    let end_cursor = books.last().map(|b| Cursor::new(b.created_at).encode());

    Ok(BookPage {
        books,
        has_next_page,
        end_cursor,
    })
}

/// Insert a new book and return the stored record
pub async fn insert<'e>(
    exec: impl SqliteExecutor<'e>,
    input: &CreateBook,
) -> sqlx::Result<BookRecord> {
    let now = now_utc();
    let record = BookRecord {
        id: Uuid::new_v4(),
        title: input.title.clone(),
        isbn: input.isbn.clone(),
        published_year: input.published_year,
        author_id: input.author_id,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO books (id, title, isbn, published_year, author_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(uuid_to_str(record.id))
    .bind(&record.title)
    .bind(&record.isbn)
    .bind(record.published_year)
    .bind(uuid_to_str(record.author_id))
    .bind(datetime_to_str(record.created_at))
    .bind(datetime_to_str(record.updated_at))
    .execute(exec)
    .await?;

    Ok(record)
}

/// Write the full state of a book (the caller has already merged any partial
/// update against the existing record)
pub async fn update<'e>(exec: impl SqliteExecutor<'e>, record: &BookRecord) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE books
        SET title = ?2, isbn = ?3, published_year = ?4, author_id = ?5, updated_at = ?6
        WHERE id = ?1
        "#,
    )
    .bind(uuid_to_str(record.id))
    .bind(&record.title)
    .bind(&record.isbn)
    .bind(record.published_year)
    .bind(uuid_to_str(record.author_id))
    .bind(datetime_to_str(record.updated_at))
    .execute(exec)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Best-effort batch delete; returns the number of rows actually removed
pub async fn delete_many<'e>(exec: impl SqliteExecutor<'e>, ids: &[Uuid]) -> sqlx::Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let placeholders: Vec<&str> = ids.iter().map(|_| "?").collect();
    let sql = format!("DELETE FROM books WHERE id IN ({})", placeholders.join(", "));

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(uuid_to_str(*id));
    }

    let result = query.execute(exec).await?;
    Ok(result.rows_affected())
}

/// Book repository for pool-bound reads. Write paths go through the
/// executor-generic functions above so services can run them inside a
/// transaction.
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<BookRecord>> {
        find_by_id(&self.pool, id).await
    }

    pub async fn find_by_isbn(&self, isbn: &str) -> sqlx::Result<Option<BookRecord>> {
        find_by_isbn(&self.pool, isbn).await
    }

    pub async fn find_all(&self, filter: &BookFilter) -> sqlx::Result<Vec<BookRecord>> {
        find_all(&self.pool, filter).await
    }

    pub async fn find_paginated(
        &self,
        filter: &BookFilter,
        cursor: Option<Cursor>,
        limit: i64,
    ) -> sqlx::Result<BookPage> {
        find_paginated(&self.pool, filter, cursor, limit).await
    }
}
