use super::prelude::*;

#[derive(Default)]
pub struct AuthorQueries;

#[Object]
impl AuthorQueries {
    /// Get an author by id
    async fn author(&self, ctx: &Context<'_>, id: Uuid) -> Result<Author> {
        let service = ctx.data_unchecked::<AuthorService>();
        let record = service.find_by_id(id).await.map_err(|e| e.extend())?;
        Ok(author_record_to_graphql(record))
    }

    /// List all authors matching the optional filter
    async fn authors(
        &self,
        ctx: &Context<'_>,
        filter: Option<AuthorFilterInput>,
    ) -> Result<Vec<Author>> {
        let service = ctx.data_unchecked::<AuthorService>();
        let filter = filter.map(Into::into).unwrap_or_default();

        let records = service.find_all(&filter).await.map_err(|e| e.extend())?;
        Ok(records.into_iter().map(author_record_to_graphql).collect())
    }
}
