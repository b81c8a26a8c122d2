use super::prelude::*;

#[derive(Default)]
pub struct AuthorMutations;

#[Object]
impl AuthorMutations {
    /// Create a new author
    async fn create_author(&self, ctx: &Context<'_>, input: CreateAuthorInput) -> Result<Author> {
        let service = ctx.data_unchecked::<AuthorService>();
        let record = service.create(input.into()).await.map_err(|e| e.extend())?;
        Ok(author_record_to_graphql(record))
    }

    /// Update an author. Omitted fields keep their current value.
    async fn update_author(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateAuthorInput,
    ) -> Result<Author> {
        let service = ctx.data_unchecked::<AuthorService>();
        let record = service
            .update(id, input.into())
            .await
            .map_err(|e| e.extend())?;
        Ok(author_record_to_graphql(record))
    }

    /// Delete an author and all books referencing it
    async fn delete_author(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let service = ctx.data_unchecked::<AuthorService>();
        service.delete(id).await.map_err(|e| e.extend())
    }
}
