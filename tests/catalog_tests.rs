//! Integration tests for the catalog services
//!
//! These run against an in-memory SQLite database and exercise the full
//! write-path invariants (validation order, referential integrity, ISBN
//! uniqueness, cascade delete) and the cursor-paginated listing.

use std::time::Duration;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use bibliotek::db::{AuthorFilter, BookFilter, CreateAuthor, CreateBook, Database};
use bibliotek::services::{AuthorService, BookService, CatalogError, UpdateAuthor, UpdateBook};

async fn test_db() -> Database {
    // One connection: every handle sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    let db = Database::new(pool);
    db.migrate().await.expect("migrations");
    db
}

async fn services() -> (AuthorService, BookService) {
    let db = test_db().await;
    (AuthorService::new(db.clone()), BookService::new(db))
}

#[tokio::test]
async fn connect_with_retry_returns_once_the_database_is_reachable() {
    let db = Database::connect_with_retry("sqlite::memory:", Duration::from_millis(10)).await;
    db.migrate().await.expect("migrations");

    let authors = AuthorService::new(db);
    create_author(&authors, "John", "Tolkien").await;
}

async fn create_author(authors: &AuthorService, name: &str, surname: &str) -> Uuid {
    authors
        .create(CreateAuthor {
            name: name.to_string(),
            surname: surname.to_string(),
            bio: None,
        })
        .await
        .expect("create author")
        .id
}

async fn create_book(books: &BookService, author_id: Uuid, title: &str, isbn: &str) -> Uuid {
    books
        .create(CreateBook {
            title: title.to_string(),
            isbn: isbn.to_string(),
            published_year: 1954,
            author_id,
        })
        .await
        .expect("create book")
        .id
}

/// Creation timestamps are the pagination sort key; keep them distinct.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(2)).await;
}

// ============================================================================
// Book create
// ============================================================================

#[tokio::test]
async fn create_book_echoes_input_and_sets_timestamps() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;

    let book = books
        .create(CreateBook {
            title: "The Hobbit".to_string(),
            isbn: "9780261103252".to_string(),
            published_year: 1937,
            author_id,
        })
        .await
        .unwrap();

    assert_eq!(book.title, "The Hobbit");
    assert_eq!(book.isbn, "9780261103252");
    assert_eq!(book.published_year, 1937);
    assert_eq!(book.author_id, author_id);
    assert_eq!(book.created_at, book.updated_at);
}

#[tokio::test]
async fn create_book_with_missing_author_fails_before_any_write() {
    let (_, books) = services().await;
    let ghost = Uuid::new_v4();

    let err = books
        .create(CreateBook {
            title: "Orphan".to_string(),
            isbn: "9780000000001".to_string(),
            published_year: 2000,
            author_id: ghost,
        })
        .await
        .unwrap_err();

    assert_matches!(err, CatalogError::AuthorNotFound(id) if id == ghost);

    let all = books.find_all(&BookFilter::default()).await.unwrap();
    assert!(all.is_empty(), "no row may be written on a failed create");
}

#[tokio::test]
async fn create_book_with_duplicate_isbn_fails_conflict() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;
    create_book(&books, author_id, "First", "9780000000001").await;

    // Same ISBN, every other field different.
    let err = books
        .create(CreateBook {
            title: "Second".to_string(),
            isbn: "9780000000001".to_string(),
            published_year: 2020,
            author_id,
        })
        .await
        .unwrap_err();

    assert_matches!(err, CatalogError::DuplicateIsbn(isbn) if isbn == "9780000000001");
}

#[tokio::test]
async fn create_book_error_precedence_is_deterministic() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;
    create_book(&books, author_id, "Taken", "9780000000001").await;

    // Validation beats not-found.
    let err = books
        .create(CreateBook {
            title: "  ".to_string(),
            isbn: "9780000000002".to_string(),
            published_year: 2000,
            author_id: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::InvalidInput(_));

    // Not-found beats conflict.
    let err = books
        .create(CreateBook {
            title: "Valid".to_string(),
            isbn: "9780000000001".to_string(),
            published_year: 2000,
            author_id: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::AuthorNotFound(_));
}

#[tokio::test]
async fn get_book_after_create_returns_equal_value() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;

    let created = books
        .create(CreateBook {
            title: "The Hobbit".to_string(),
            isbn: "9780261103252".to_string(),
            published_year: 1937,
            author_id,
        })
        .await
        .unwrap();

    let fetched = books.find_by_id(created.id).await.unwrap();
    assert_eq!(created, fetched);
}

// ============================================================================
// Book update
// ============================================================================

#[tokio::test]
async fn update_single_field_leaves_others_untouched() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;
    let id = create_book(&books, author_id, "The Hobbit", "9780261103252").await;
    let before = books.find_by_id(id).await.unwrap();

    tick().await;
    let updated = books
        .update(
            id,
            UpdateBook {
                title: Some("The Hobbit, Revised".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "The Hobbit, Revised");
    assert_eq!(updated.isbn, before.isbn);
    assert_eq!(updated.published_year, before.published_year);
    assert_eq!(updated.author_id, before.author_id);
    assert_eq!(updated.created_at, before.created_at);
    assert!(updated.updated_at > before.updated_at);

    let fetched = books.find_by_id(id).await.unwrap();
    assert_eq!(updated, fetched);
}

#[tokio::test]
async fn update_with_same_isbn_does_not_conflict() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;
    let id = create_book(&books, author_id, "The Hobbit", "9780261103252").await;

    let updated = books
        .update(
            id,
            UpdateBook {
                isbn: Some("9780261103252".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.isbn, "9780261103252");
}

#[tokio::test]
async fn update_to_existing_isbn_conflicts() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;
    create_book(&books, author_id, "First", "9780000000001").await;
    let second = create_book(&books, author_id, "Second", "9780000000002").await;

    let err = books
        .update(
            second,
            UpdateBook {
                isbn: Some("9780000000001".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, CatalogError::DuplicateIsbn(_));
}

#[tokio::test]
async fn update_validates_the_merged_result() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;
    let id = create_book(&books, author_id, "The Hobbit", "9780261103252").await;

    let err = books
        .update(
            id,
            UpdateBook {
                published_year: Some(50),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::InvalidInput(_));

    // The failed update must not be persisted.
    let fetched = books.find_by_id(id).await.unwrap();
    assert_eq!(fetched.published_year, 1954);
}

#[tokio::test]
async fn update_missing_book_or_author_fails_not_found() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;
    let id = create_book(&books, author_id, "The Hobbit", "9780261103252").await;

    let err = books
        .update(Uuid::new_v4(), UpdateBook::default())
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::BookNotFound(_));

    let ghost = Uuid::new_v4();
    let err = books
        .update(
            id,
            UpdateBook {
                author_id: Some(ghost),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::AuthorNotFound(got) if got == ghost);
}

// ============================================================================
// Book delete
// ============================================================================

#[tokio::test]
async fn delete_book_then_delete_again_fails_not_found() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;
    let id = create_book(&books, author_id, "The Hobbit", "9780261103252").await;

    assert!(books.delete(id).await.unwrap());
    assert_matches!(books.delete(id).await, Err(CatalogError::BookNotFound(_)));
}

#[tokio::test]
async fn delete_many_is_best_effort() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;
    let a = create_book(&books, author_id, "A", "9780000000001").await;
    let b = create_book(&books, author_id, "B", "9780000000002").await;

    let removed = books
        .delete_many(&[a, b, Uuid::new_v4(), Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(removed, 2);

    assert_eq!(books.delete_many(&[]).await.unwrap(), 0);
}

// ============================================================================
// Cascade delete
// ============================================================================

#[tokio::test]
async fn deleting_an_author_removes_all_its_books() {
    let (authors, books) = services().await;
    let tolkien = create_author(&authors, "John", "Tolkien").await;
    let herbert = create_author(&authors, "Frank", "Herbert").await;

    let mut tolkien_books = Vec::new();
    for n in 0..3 {
        tolkien_books
            .push(create_book(&books, tolkien, &format!("Vol {}", n), &format!("978000000000{}", n)).await);
    }
    let dune = create_book(&books, herbert, "Dune", "9780000000009").await;

    assert!(authors.delete(tolkien).await.unwrap());

    for id in tolkien_books {
        assert_matches!(
            books.find_by_id(id).await,
            Err(CatalogError::BookNotFound(got)) if got == id
        );
    }
    assert_matches!(
        authors.find_by_id(tolkien).await,
        Err(CatalogError::AuthorNotFound(_))
    );

    // The other author's catalog is untouched.
    assert_eq!(books.find_by_id(dune).await.unwrap().title, "Dune");
}

#[tokio::test]
async fn deleting_a_missing_author_fails_not_found() {
    let (authors, _) = services().await;
    assert_matches!(
        authors.delete(Uuid::new_v4()).await,
        Err(CatalogError::AuthorNotFound(_))
    );
}

// ============================================================================
// Author service
// ============================================================================

#[tokio::test]
async fn author_partial_update_merges_fields() {
    let (authors, _) = services().await;
    let id = create_author(&authors, "John", "Tolkien").await;
    let before = authors.find_by_id(id).await.unwrap();

    tick().await;
    let updated = authors
        .update(
            id,
            UpdateAuthor {
                bio: Some("Philologist".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "John");
    assert_eq!(updated.surname, "Tolkien");
    assert_eq!(updated.bio.as_deref(), Some("Philologist"));
    assert!(updated.updated_at > before.updated_at);

    // A partial update may not blank out a required field.
    let err = authors
        .update(
            id,
            UpdateAuthor {
                name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::InvalidInput(_));
}

#[tokio::test]
async fn author_filter_is_case_insensitive_substring() {
    let (authors, _) = services().await;
    create_author(&authors, "John", "Tolkien").await;
    create_author(&authors, "Frank", "Herbert").await;
    create_author(&authors, "Johanna", "Spyri").await;

    let matched = authors
        .find_all(&AuthorFilter {
            name: Some("joh".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(matched.len(), 2);

    let matched = authors
        .find_all(&AuthorFilter {
            name: Some("joh".to_string()),
            surname: Some("TOLK".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].surname, "Tolkien");

    let all = authors.find_all(&AuthorFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn authors_batch_lookup_by_ids() {
    let (authors, _) = services().await;
    let a = create_author(&authors, "John", "Tolkien").await;
    let b = create_author(&authors, "Frank", "Herbert").await;
    create_author(&authors, "Johanna", "Spyri").await;

    let found = authors.find_by_ids(&[a, b, Uuid::new_v4()]).await.unwrap();
    assert_eq!(found.len(), 2);

    let none = authors.find_by_ids(&[]).await.unwrap();
    assert!(none.is_empty());
}

// ============================================================================
// Book filters
// ============================================================================

#[tokio::test]
async fn book_filters_are_anded() {
    let (authors, books) = services().await;
    let tolkien = create_author(&authors, "John", "Tolkien").await;
    let herbert = create_author(&authors, "Frank", "Herbert").await;

    create_book(&books, tolkien, "The Hobbit", "9780000000001").await;
    create_book(&books, tolkien, "The Silmarillion", "9780000000002").await;
    create_book(&books, herbert, "Dune", "9780000000003").await;

    let matched = books
        .find_all(&BookFilter {
            title: Some("the".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(matched.len(), 2);

    let matched = books
        .find_all(&BookFilter {
            title: Some("the".to_string()),
            isbn: Some("9780000000002".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].title, "The Silmarillion");

    let matched = books
        .find_all(&BookFilter {
            author_id: Some(herbert),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].title, "Dune");

    let matched = books
        .find_all(&BookFilter {
            published_year: Some(1954),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(matched.len(), 3);
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn pagination_visits_every_row_exactly_once_in_order() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;

    let mut created = Vec::new();
    for n in 0..7 {
        created.push(create_book(&books, author_id, &format!("Vol {}", n), &format!("978000000000{}", n)).await);
        tick().await;
    }

    let filter = BookFilter::default();
    let mut visited = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;
    loop {
        let page = books
            .find_paginated(&filter, cursor.as_deref(), 3)
            .await
            .unwrap();
        visited.extend(page.books.iter().map(|b| b.id));
        pages += 1;
        if !page.has_next_page {
            assert!(page.books.len() <= 3);
            break;
        }
        cursor = page.end_cursor.clone();
        assert!(cursor.is_some());
    }

    assert_eq!(pages, 3);
    // Descending creation time: newest first.
    let expected: Vec<Uuid> = created.iter().rev().copied().collect();
    assert_eq!(visited, expected);

    // Walking past the end yields an empty page with no cursor.
    let last = books
        .find_paginated(&filter, cursor.as_deref(), 3)
        .await
        .unwrap();
    let beyond = books
        .find_paginated(&filter, last.end_cursor.as_deref(), 3)
        .await
        .unwrap();
    assert!(beyond.books.is_empty());
    assert!(!beyond.has_next_page);
    assert_eq!(beyond.end_cursor, None);
}

#[tokio::test]
async fn pagination_respects_the_filter() {
    let (authors, books) = services().await;
    let tolkien = create_author(&authors, "John", "Tolkien").await;
    let herbert = create_author(&authors, "Frank", "Herbert").await;

    for n in 0..4 {
        create_book(&books, tolkien, &format!("T {}", n), &format!("978000000001{}", n)).await;
        tick().await;
        create_book(&books, herbert, &format!("H {}", n), &format!("978000000002{}", n)).await;
        tick().await;
    }

    let filter = BookFilter {
        author_id: Some(tolkien),
        ..Default::default()
    };
    let first = books.find_paginated(&filter, None, 3).await.unwrap();
    assert_eq!(first.books.len(), 3);
    assert!(first.has_next_page);
    assert!(first.books.iter().all(|b| b.author_id == tolkien));

    let second = books
        .find_paginated(&filter, first.end_cursor.as_deref(), 3)
        .await
        .unwrap();
    assert_eq!(second.books.len(), 1);
    assert!(!second.has_next_page);
}

#[tokio::test]
async fn limit_zero_returns_no_rows_but_reports_next_page() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;

    let empty = books
        .find_paginated(&BookFilter::default(), None, 0)
        .await
        .unwrap();
    assert!(empty.books.is_empty());
    assert!(!empty.has_next_page);
    assert_eq!(empty.end_cursor, None);

    create_book(&books, author_id, "The Hobbit", "9780261103252").await;

    let probe = books
        .find_paginated(&BookFilter::default(), None, 0)
        .await
        .unwrap();
    assert!(probe.books.is_empty());
    assert!(probe.has_next_page);
    assert_eq!(probe.end_cursor, None);
}

#[tokio::test]
async fn limit_at_i64_max_returns_all_rows() {
    let (authors, books) = services().await;
    let author_id = create_author(&authors, "John", "Tolkien").await;
    for n in 0..3 {
        create_book(&books, author_id, &format!("Vol {}", n), &format!("978000000000{}", n)).await;
        tick().await;
    }

    // The probe-row fetch must not wrap the limit negative.
    let page = books
        .find_paginated(&BookFilter::default(), None, i64::MAX)
        .await
        .unwrap();
    assert_eq!(page.books.len(), 3);
    assert!(!page.has_next_page);
    assert!(page.end_cursor.is_some());
}

#[tokio::test]
async fn malformed_cursor_fails_the_listing() {
    let (_, books) = services().await;
    let filter = BookFilter::default();

    let err = books
        .find_paginated(&filter, Some("%%% not base64 %%%"), 10)
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::InvalidCursor(_));

    // Valid base64, but the payload is not a timestamp.
    use base64::Engine as _;
    let bogus = base64::engine::general_purpose::STANDARD.encode("not a timestamp");
    let err = books
        .find_paginated(&filter, Some(&bogus), 10)
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::InvalidCursor(_));

    let err = books.find_paginated(&filter, None, -1).await.unwrap_err();
    assert_matches!(err, CatalogError::InvalidInput(_));
}
