//! Author domain service: validation, partial updates, and the transactional
//! cascade delete of an author's books.

use uuid::Uuid;

use crate::db::{AuthorFilter, AuthorRecord, BookFilter, CreateAuthor, Database};
use crate::db::{authors, books};

use super::CatalogError;
use super::validate::non_blank;

/// Partial update: `None` fields keep their existing value
#[derive(Debug, Clone, Default)]
pub struct UpdateAuthor {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub bio: Option<String>,
}

/// Service enforcing the author write-path rules. Cheap to clone; shares the
/// underlying pool.
#[derive(Clone)]
pub struct AuthorService {
    db: Database,
}

impl AuthorService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<AuthorRecord, CatalogError> {
        self.db
            .authors()
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::AuthorNotFound(id))
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<AuthorRecord>, CatalogError> {
        Ok(self.db.authors().find_by_ids(ids).await?)
    }

    pub async fn find_all(&self, filter: &AuthorFilter) -> Result<Vec<AuthorRecord>, CatalogError> {
        Ok(self.db.authors().find_all(filter).await?)
    }

    pub async fn create(&self, command: CreateAuthor) -> Result<AuthorRecord, CatalogError> {
        validate_author(&command.name, &command.surname)?;

        let record = authors::insert(self.db.pool(), &command).await?;
        tracing::info!(author_id = %record.id, "Author created");
        Ok(record)
    }

    /// Partial update: merge the command over the existing record, validate
    /// the merged result, then persist it with a bumped `updated_at`.
    pub async fn update(
        &self,
        id: Uuid,
        command: UpdateAuthor,
    ) -> Result<AuthorRecord, CatalogError> {
        let mut tx = self.db.pool().begin().await?;

        let existing = authors::find_by_id(&mut *tx, id)
            .await?
            .ok_or(CatalogError::AuthorNotFound(id))?;

        let merged = AuthorRecord {
            id: existing.id,
            name: command.name.unwrap_or(existing.name),
            surname: command.surname.unwrap_or(existing.surname),
            bio: command.bio.or(existing.bio),
            created_at: existing.created_at,
            updated_at: crate::db::sqlite_helpers::now_utc(),
        };

        validate_author(&merged.name, &merged.surname)?;

        if !authors::update(&mut *tx, &merged).await? {
            return Err(CatalogError::AuthorNotFound(id));
        }
        tx.commit().await?;

        tracing::info!(author_id = %id, "Author updated");
        Ok(merged)
    }

    /// Delete an author and every book referencing it. The dependent deletes
    /// and the parent delete commit together or not at all.
    pub async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let mut tx = self.db.pool().begin().await?;

        authors::find_by_id(&mut *tx, id)
            .await?
            .ok_or(CatalogError::AuthorNotFound(id))?;

        let filter = BookFilter {
            author_id: Some(id),
            ..Default::default()
        };
        let book_ids: Vec<Uuid> = books::find_all(&mut *tx, &filter)
            .await?
            .into_iter()
            .map(|b| b.id)
            .collect();

        let books_removed = books::delete_many(&mut *tx, &book_ids).await?;
        let deleted = authors::delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(
            author_id = %id,
            books_removed = books_removed,
            "Author deleted with dependent books"
        );
        Ok(deleted)
    }
}

fn validate_author(name: &str, surname: &str) -> Result<(), CatalogError> {
    non_blank(name, "Author name")?;
    non_blank(surname, "Author surname")?;
    Ok(())
}
