//! GraphQL dataloader for batching author lookups
//!
//! Resolving `Book.author` naively issues one query per book row. The loader
//! collects every author id requested within the same request tick and
//! fetches them with a single `WHERE id IN (...)` query.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use uuid::Uuid;

use crate::db::{AuthorRecord, Database, authors};

pub struct AuthorLoader {
    db: Database,
}

impl AuthorLoader {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Loader<Uuid> for AuthorLoader {
    type Value = AuthorRecord;
    type Error = Arc<sqlx::Error>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        tracing::debug!(author_count = keys.len(), "Batch loading authors");

        let records = authors::find_by_ids(self.db.pool(), keys)
            .await
            .map_err(Arc::new)?;

        Ok(records.into_iter().map(|r| (r.id, r)).collect())
    }
}
