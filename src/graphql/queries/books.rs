use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// Get a book by id
    async fn book(&self, ctx: &Context<'_>, id: Uuid) -> Result<Book> {
        let service = ctx.data_unchecked::<BookService>();
        let record = service.find_by_id(id).await.map_err(|e| e.extend())?;
        Ok(book_record_to_graphql(record))
    }

    /// List books with filtering and cursor-based pagination. Feed the
    /// returned `endCursor` into `cursor` to fetch the next page.
    async fn books(
        &self,
        ctx: &Context<'_>,
        filter: Option<BookFilterInput>,
        cursor: Option<String>,
        #[graphql(default = 10)] limit: i64,
    ) -> Result<BookList> {
        let service = ctx.data_unchecked::<BookService>();
        let filter = filter.map(Into::into).unwrap_or_default();

        let page = service
            .find_paginated(&filter, cursor.as_deref(), limit)
            .await
            .map_err(|e| e.extend())?;

        Ok(book_page_to_graphql(page))
    }
}
