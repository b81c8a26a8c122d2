//! Author database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use super::sqlite_helpers::{datetime_to_str, now_utc, str_to_datetime, str_to_uuid, uuid_to_str};

/// An author record in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for AuthorRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let id_str: String = row.try_get("id")?;
        let created_at_str: String = row.try_get("created_at")?;
        let updated_at_str: String = row.try_get("updated_at")?;

        Ok(Self {
            id: str_to_uuid(&id_str).map_err(|e| sqlx::Error::Decode(e.into()))?,
            name: row.try_get("name")?,
            surname: row.try_get("surname")?,
            bio: row.try_get("bio")?,
            created_at: str_to_datetime(&created_at_str)
                .map_err(|e| sqlx::Error::Decode(e.into()))?,
            updated_at: str_to_datetime(&updated_at_str)
                .map_err(|e| sqlx::Error::Decode(e.into()))?,
        })
    }
}

/// Input for creating a new author
#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
    pub surname: String,
    pub bio: Option<String>,
}

/// Filter options for querying authors. Absent criteria impose no constraint;
/// present criteria are ANDed.
#[derive(Debug, Clone, Default)]
pub struct AuthorFilter {
    /// Case-insensitive substring match on name
    pub name: Option<String>,
    /// Case-insensitive substring match on surname
    pub surname: Option<String>,
}

/// Find an author by id
pub async fn find_by_id<'e>(
    exec: impl SqliteExecutor<'e>,
    id: Uuid,
) -> sqlx::Result<Option<AuthorRecord>> {
    sqlx::query_as::<_, AuthorRecord>("SELECT * FROM authors WHERE id = ?1")
        .bind(uuid_to_str(id))
        .fetch_optional(exec)
        .await
}

/// Batch-find authors by id. Used by the dataloader to resolve all authors of
/// a page of books in a single query.
pub async fn find_by_ids<'e>(
    exec: impl SqliteExecutor<'e>,
    ids: &[Uuid],
) -> sqlx::Result<Vec<AuthorRecord>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<&str> = ids.iter().map(|_| "?").collect();
    let sql = format!(
        "SELECT * FROM authors WHERE id IN ({})",
        placeholders.join(", ")
    );

    let mut query = sqlx::query_as::<_, AuthorRecord>(&sql);
    for id in ids {
        query = query.bind(uuid_to_str(*id));
    }

    query.fetch_all(exec).await
}

/// List authors matching the filter (no pagination)
pub async fn find_all<'e>(
    exec: impl SqliteExecutor<'e>,
    filter: &AuthorFilter,
) -> sqlx::Result<Vec<AuthorRecord>> {
    let mut conditions = Vec::new();
    if filter.name.is_some() {
        conditions.push("lower(name) LIKE lower(?)");
    }
    if filter.surname.is_some() {
        conditions.push("lower(surname) LIKE lower(?)");
    }

    let sql = if conditions.is_empty() {
        "SELECT * FROM authors".to_string()
    } else {
        format!("SELECT * FROM authors WHERE {}", conditions.join(" AND "))
    };

    let mut query = sqlx::query_as::<_, AuthorRecord>(&sql);
    if let Some(ref name) = filter.name {
        query = query.bind(format!("%{}%", name));
    }
    if let Some(ref surname) = filter.surname {
        query = query.bind(format!("%{}%", surname));
    }

    query.fetch_all(exec).await
}

/// Insert a new author and return the stored record
pub async fn insert<'e>(
    exec: impl SqliteExecutor<'e>,
    input: &CreateAuthor,
) -> sqlx::Result<AuthorRecord> {
    let now = now_utc();
    let record = AuthorRecord {
        id: Uuid::new_v4(),
        name: input.name.clone(),
        surname: input.surname.clone(),
        bio: input.bio.clone(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO authors (id, name, surname, bio, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(uuid_to_str(record.id))
    .bind(&record.name)
    .bind(&record.surname)
    .bind(&record.bio)
    .bind(datetime_to_str(record.created_at))
    .bind(datetime_to_str(record.updated_at))
    .execute(exec)
    .await?;

    Ok(record)
}

/// Write the full state of an author (the caller has already merged any
/// partial update against the existing record)
pub async fn update<'e>(exec: impl SqliteExecutor<'e>, record: &AuthorRecord) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE authors
        SET name = ?2, surname = ?3, bio = ?4, updated_at = ?5
        WHERE id = ?1
        "#,
    )
    .bind(uuid_to_str(record.id))
    .bind(&record.name)
    .bind(&record.surname)
    .bind(&record.bio)
    .bind(datetime_to_str(record.updated_at))
    .execute(exec)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete an author row
pub async fn delete<'e>(exec: impl SqliteExecutor<'e>, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM authors WHERE id = ?1")
        .bind(uuid_to_str(id))
        .execute(exec)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Author repository for pool-bound reads. Write paths go through the
/// executor-generic functions above so services can run them inside a
/// transaction.
pub struct AuthorRepository {
    pool: SqlitePool,
}

impl AuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<AuthorRecord>> {
        find_by_id(&self.pool, id).await
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> sqlx::Result<Vec<AuthorRecord>> {
        find_by_ids(&self.pool, ids).await
    }

    pub async fn find_all(&self, filter: &AuthorFilter) -> sqlx::Result<Vec<AuthorRecord>> {
        find_all(&self.pool, filter).await
    }
}
