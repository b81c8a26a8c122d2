//! Record to GraphQL type conversion helpers

use crate::db::{AuthorRecord, BookPage, BookRecord};

use super::types::{Author, Book, BookList, PageInfo};

pub fn author_record_to_graphql(record: AuthorRecord) -> Author {
    Author {
        id: record.id,
        name: record.name,
        surname: record.surname,
        bio: record.bio,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

pub fn book_record_to_graphql(record: BookRecord) -> Book {
    Book {
        id: record.id,
        title: record.title,
        isbn: record.isbn,
        published_year: record.published_year,
        author_id: record.author_id,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

pub fn book_page_to_graphql(page: BookPage) -> BookList {
    BookList {
        books: page.books.into_iter().map(book_record_to_graphql).collect(),
        page_info: PageInfo {
            has_next_page: page.has_next_page,
            end_cursor: page.end_cursor,
        },
    }
}
