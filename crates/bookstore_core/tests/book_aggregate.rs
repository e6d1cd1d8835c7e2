use bookstore_core::db::open_db_in_memory;
use bookstore_core::{
    Author, AuthorRepository, BookService, BookServiceError, CreateBookRequest,
    SqliteAuthorRepository, SqliteBookRepository, UpdateBookRequest, UpdateMode,
};
use rusqlite::{params, Connection};

fn service(
    conn: &Connection,
) -> BookService<SqliteBookRepository<'_>, SqliteAuthorRepository<'_>> {
    BookService::new(
        SqliteBookRepository::new(conn),
        SqliteAuthorRepository::new(conn),
    )
}

fn seed_authors(conn: &Connection, names: &[&str]) -> Vec<Author> {
    let repo = SqliteAuthorRepository::new(conn);
    names
        .iter()
        .map(|name| repo.create_author(name).unwrap())
        .collect()
}

fn create_request(author_ids: Vec<i64>) -> CreateBookRequest {
    CreateBookRequest {
        name: "The Catcher in the Rye".to_string(),
        edition: 1,
        publication_year: 1951,
        author_ids,
    }
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn create_returns_book_with_resolved_authors() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["J.D Salinger", "Hugo Pellissari"]);
    let service = service(&conn);

    let book = service.create(create_request(vec![authors[0].id])).unwrap();

    assert_eq!(book.name, "The Catcher in the Rye");
    assert_eq!(book.edition, 1);
    assert_eq!(book.publication_year, 1951);
    assert_eq!(book.authors, vec![authors[0].clone()]);
}

#[test]
fn create_preserves_input_author_order_and_drops_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["First", "Second", "Third"]);
    let service = service(&conn);

    let book = service
        .create(create_request(vec![
            authors[2].id,
            authors[0].id,
            authors[2].id,
            authors[1].id,
        ]))
        .unwrap();

    assert_eq!(
        book.author_ids(),
        vec![authors[2].id, authors[0].id, authors[1].id]
    );
    let reloaded = service.get(book.id).unwrap();
    assert_eq!(reloaded.authors, book.authors);
}

#[test]
fn create_without_authors_fails_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.create(create_request(Vec::new())).unwrap_err();

    match err {
        BookServiceError::Validation(message) => {
            assert_eq!(message, "at least one author is required")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM books;"), 0);
}

#[test]
fn create_with_unknown_author_fails_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["J.D Salinger"]);
    let service = service(&conn);

    let err = service
        .create(create_request(vec![authors[0].id, 999]))
        .unwrap_err();

    match err {
        BookServiceError::Validation(message) => assert_eq!(message, "author does not exist"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM books;"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM book_authors;"), 0);
}

#[test]
fn create_rejects_out_of_range_scalars() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["J.D Salinger"]);
    let service = service(&conn);

    let mut request = create_request(vec![authors[0].id]);
    request.edition = -1;
    assert!(matches!(
        service.create(request).unwrap_err(),
        BookServiceError::Validation(_)
    ));

    let mut request = create_request(vec![authors[0].id]);
    request.name = "  ".to_string();
    assert!(matches!(
        service.create(request).unwrap_err(),
        BookServiceError::Validation(_)
    ));
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM books;"), 0);
}

#[test]
fn replacing_authors_removes_old_associations_but_keeps_authors() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["A", "B"]);
    let service = service(&conn);
    let book = service
        .create(create_request(vec![authors[0].id, authors[1].id]))
        .unwrap();

    let mut request = UpdateBookRequest::new(UpdateMode::Replace);
    request.author_ids = Some(vec![authors[1].id]);
    let updated = service.update(book.id, request).unwrap();

    assert_eq!(updated.authors, vec![authors[1].clone()]);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM book_authors;"), 1);
    let remaining_for_a: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM book_authors WHERE author_id = ?1;",
            params![authors[0].id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining_for_a, 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM authors;"), 2);
}

#[test]
fn partial_update_without_authors_keeps_associations_and_other_fields() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["A", "B"]);
    let service = service(&conn);
    let book = service
        .create(create_request(vec![authors[0].id, authors[1].id]))
        .unwrap();

    let mut request = UpdateBookRequest::new(UpdateMode::Partial);
    request.edition = Some(2);
    let updated = service.update(book.id, request).unwrap();

    assert_eq!(updated.edition, 2);
    assert_eq!(updated.name, book.name);
    assert_eq!(updated.publication_year, book.publication_year);
    assert_eq!(updated.authors, book.authors);
}

#[test]
fn partial_update_with_empty_author_list_keeps_associations() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["A"]);
    let service = service(&conn);
    let book = service.create(create_request(vec![authors[0].id])).unwrap();

    let mut request = UpdateBookRequest::new(UpdateMode::Partial);
    request.author_ids = Some(Vec::new());
    let updated = service.update(book.id, request).unwrap();

    assert_eq!(updated.authors, book.authors);
}

#[test]
fn replace_update_without_authors_is_rejected_before_any_change() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["A"]);
    let service = service(&conn);
    let book = service.create(create_request(vec![authors[0].id])).unwrap();

    let mut request = UpdateBookRequest::new(UpdateMode::Replace);
    request.name = Some("Renamed".to_string());
    let err = service.update(book.id, request).unwrap_err();

    assert!(matches!(err, BookServiceError::Validation(_)));
    assert_eq!(service.get(book.id).unwrap(), book);
}

#[test]
fn replace_update_keeps_omitted_scalars() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["A", "B"]);
    let service = service(&conn);
    let book = service.create(create_request(vec![authors[0].id])).unwrap();

    let mut request = UpdateBookRequest::new(UpdateMode::Replace);
    request.author_ids = Some(vec![authors[1].id]);
    request.name = Some("Franny and Zooey".to_string());
    let updated = service.update(book.id, request).unwrap();

    assert_eq!(updated.name, "Franny and Zooey");
    assert_eq!(updated.edition, book.edition);
    assert_eq!(updated.publication_year, book.publication_year);
}

#[test]
fn update_with_unknown_author_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["A", "B"]);
    let service = service(&conn);
    let book = service.create(create_request(vec![authors[0].id])).unwrap();

    let mut request = UpdateBookRequest::new(UpdateMode::Partial);
    request.name = Some("Renamed".to_string());
    request.author_ids = Some(vec![authors[1].id, 404]);
    let err = service.update(book.id, request).unwrap_err();

    assert!(matches!(err, BookServiceError::Validation(_)));
    assert_eq!(service.get(book.id).unwrap(), book);
}

#[test]
fn update_missing_book_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .update(77, UpdateBookRequest::new(UpdateMode::Partial))
        .unwrap_err();
    assert!(matches!(err, BookServiceError::BookNotFound(77)));
}

#[test]
fn delete_removes_book_and_associations_only() {
    let conn = open_db_in_memory().unwrap();
    let authors = seed_authors(&conn, &["A", "B"]);
    let service = service(&conn);
    let book = service
        .create(create_request(vec![authors[0].id, authors[1].id]))
        .unwrap();

    service.delete(book.id).unwrap();

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM books;"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM book_authors;"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM authors;"), 2);
    assert!(matches!(
        service.delete(book.id).unwrap_err(),
        BookServiceError::BookNotFound(_)
    ));
}
