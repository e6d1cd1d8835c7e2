use bookstore_api::{build_router, ApiConfig, AppState};
use bookstore_core::db::open_db_in_memory;
use bookstore_core::{AuthorRepository, SqliteAuthorRepository};
use rusqlite::Connection;

/// Opens an in-memory catalog seeded with authors, in id order.
pub fn seeded_connection(author_names: &[&str]) -> Connection {
    let conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteAuthorRepository::new(&conn);
        for name in author_names {
            repo.create_author(name).unwrap();
        }
    }
    conn
}

/// Spins up the HTTP server on an OS-assigned port, returning the base URL.
pub async fn spawn_test_server(conn: Connection, page_size: u32) -> String {
    let app = build_router(AppState::new(conn, ApiConfig::new(page_size)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}
