use bookstore_core::db::open_db_in_memory;
use bookstore_core::{
    AuthorRepository, BookFilter, BookService, CreateBookRequest, PageRequest,
    SqliteAuthorRepository, SqliteBookRepository,
};
use rusqlite::Connection;

fn service(
    conn: &Connection,
) -> BookService<SqliteBookRepository<'_>, SqliteAuthorRepository<'_>> {
    BookService::new(
        SqliteBookRepository::new(conn),
        SqliteAuthorRepository::new(conn),
    )
}

/// Seeds three books; returns the ids of the two authors.
fn seed_catalog(conn: &Connection) -> (i64, i64) {
    let authors = SqliteAuthorRepository::new(conn);
    let salinger = authors.create_author("J.D Salinger").unwrap().id;
    let tolkien = authors.create_author("J.R.R Tolkien").unwrap().id;

    let service = service(conn);
    for (name, edition, year, author_ids) in [
        ("The Catcher in the Rye", 1, 1951, vec![salinger]),
        ("The Hobbit", 1, 1937, vec![tolkien]),
        ("The Hobbit", 2, 1951, vec![tolkien, salinger]),
    ] {
        service
            .create(CreateBookRequest {
                name: name.to_string(),
                edition,
                publication_year: year,
                author_ids,
            })
            .unwrap();
    }

    (salinger, tolkien)
}

fn names_for(conn: &Connection, pairs: &[(&str, &str)]) -> Vec<(String, u16)> {
    let filter = BookFilter::from_pairs(pairs.iter().copied()).unwrap();
    service(conn)
        .list(filter, PageRequest::default())
        .unwrap()
        .items
        .into_iter()
        .map(|book| (book.name, book.edition))
        .collect()
}

#[test]
fn no_filter_returns_every_book_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);

    let page = service(&conn)
        .list(BookFilter::default(), PageRequest::default())
        .unwrap();
    assert_eq!(page.count, 3);
    assert_eq!(page.items.len(), 3);
    assert!(page.items.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[test]
fn scalar_filters_narrow_by_exact_match() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);

    assert_eq!(
        names_for(&conn, &[("name", "The Hobbit")]),
        vec![("The Hobbit".to_string(), 1), ("The Hobbit".to_string(), 2)]
    );
    assert_eq!(
        names_for(&conn, &[("name", "The Hobbit"), ("edition", "2")]),
        vec![("The Hobbit".to_string(), 2)]
    );
    assert_eq!(names_for(&conn, &[("publication_year", "1951")]).len(), 2);
    assert!(names_for(&conn, &[("name", "the hobbit")]).is_empty());
}

#[test]
fn authors_filter_is_a_membership_test() {
    let conn = open_db_in_memory().unwrap();
    let (salinger, tolkien) = seed_catalog(&conn);
    let salinger = salinger.to_string();
    let tolkien = tolkien.to_string();

    assert_eq!(names_for(&conn, &[("authors", salinger.as_str())]).len(), 2);
    assert_eq!(names_for(&conn, &[("authors", tolkien.as_str())]).len(), 2);
    assert_eq!(
        names_for(
            &conn,
            &[("authors", salinger.as_str()), ("authors", tolkien.as_str())]
        )
        .len(),
        3
    );
    assert!(names_for(&conn, &[("authors", "999")]).is_empty());
}

#[test]
fn unknown_keys_are_ignored() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);

    assert_eq!(
        names_for(&conn, &[("title", "nothing"), ("ordering", "-id")]).len(),
        3
    );
}

#[test]
fn count_reflects_filter_while_items_reflect_window() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);

    let filter = BookFilter::from_pairs([("publication_year", "1951")]).unwrap();
    let page = service(&conn)
        .list(filter, PageRequest::for_page(2, 1))
        .unwrap();

    assert_eq!(page.count, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "The Hobbit");
}
