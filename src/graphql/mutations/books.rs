use super::prelude::*;

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Create a new book. The referenced author must exist and the ISBN must
    /// not already be in use.
    async fn create_book(&self, ctx: &Context<'_>, input: CreateBookInput) -> Result<Book> {
        let service = ctx.data_unchecked::<BookService>();
        let record = service.create(input.into()).await.map_err(|e| e.extend())?;
        Ok(book_record_to_graphql(record))
    }

    /// Update a book. Omitted fields keep their current value; the checks run
    /// against the merged result.
    async fn update_book(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateBookInput,
    ) -> Result<Book> {
        let service = ctx.data_unchecked::<BookService>();
        let record = service
            .update(id, input.into())
            .await
            .map_err(|e| e.extend())?;
        Ok(book_record_to_graphql(record))
    }

    /// Delete a book by id
    async fn delete_book(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let service = ctx.data_unchecked::<BookService>();
        service.delete(id).await.map_err(|e| e.extend())
    }
}
