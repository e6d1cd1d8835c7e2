//! Book CRUD and listing endpoints.

use crate::error::{ApiError, ApiResult};
use crate::pagination::{paginate, requested_page, Paginated};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bookstore_core::service::book_service::AUTHORS_REQUIRED_MESSAGE;
use bookstore_core::{
    AuthorId, Book, BookFilter, BookId, BookService, CreateBookRequest, PageRequest,
    SqliteAuthorRepository, SqliteBookRepository, UpdateBookRequest, UpdateMode,
};
use rusqlite::Connection;
use serde::Deserialize;

/// Author reference inside a book payload. Extra keys such as `name` are
/// accepted and ignored.
#[derive(Debug, Deserialize)]
struct AuthorRef {
    id: AuthorId,
}

/// Loosely-shaped book body shared by POST, PUT and PATCH.
#[derive(Debug, Deserialize)]
pub(super) struct BookPayload {
    name: Option<String>,
    edition: Option<i64>,
    publication_year: Option<i64>,
    authors: Option<Vec<AuthorRef>>,
}

impl BookPayload {
    fn author_ids(authors: Option<Vec<AuthorRef>>) -> Option<Vec<AuthorId>> {
        authors.map(|refs| refs.into_iter().map(|author| author.id).collect())
    }

    fn into_create_request(self) -> ApiResult<CreateBookRequest> {
        Ok(CreateBookRequest {
            name: required("name", self.name)?,
            edition: required("edition", self.edition)?,
            publication_year: required("publication_year", self.publication_year)?,
            author_ids: Self::author_ids(self.authors)
                .ok_or_else(|| ApiError::Validation(AUTHORS_REQUIRED_MESSAGE.to_string()))?,
        })
    }

    fn into_update_request(self, mode: UpdateMode) -> UpdateBookRequest {
        UpdateBookRequest {
            mode,
            name: self.name,
            edition: self.edition,
            publication_year: self.publication_year,
            author_ids: Self::author_ids(self.authors),
        }
    }
}

fn required<T>(field: &str, value: Option<T>) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::Validation(format!("{field} is required")))
}

/// Non-numeric ids cannot name a book, so they read as a missed lookup.
fn book_id(path: Result<Path<BookId>, PathRejection>) -> ApiResult<BookId> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound("Not found.".to_string()))
}

fn book_service(
    conn: &Connection,
) -> BookService<SqliteBookRepository<'_>, SqliteAuthorRepository<'_>> {
    BookService::new(
        SqliteBookRepository::new(conn),
        SqliteAuthorRepository::new(conn),
    )
}

pub(super) async fn list_books(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Paginated<Book>>> {
    let page = requested_page(&pairs)?;
    let filter = BookFilter::from_pairs(pairs.iter().map(|(key, value)| (key, value)))?;
    let page_size = state.config.page_size;

    let fetched = state
        .with_conn(move |conn| {
            book_service(conn)
                .list(filter, PageRequest::for_page(page, page_size))
                .map_err(ApiError::from)
        })
        .await?;

    paginate("/books", &pairs, page, page_size, fetched).map(Json)
}

pub(super) async fn get_book(
    State(state): State<AppState>,
    id: Result<Path<BookId>, PathRejection>,
) -> ApiResult<Json<Book>> {
    let id = book_id(id)?;
    state
        .with_conn(move |conn| book_service(conn).get(id).map_err(ApiError::from))
        .await
        .map(Json)
}

pub(super) async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let Json(payload) = payload?;
    let request = payload.into_create_request()?;

    let book = state
        .with_conn(move |conn| book_service(conn).create(request).map_err(ApiError::from))
        .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub(super) async fn replace_book(
    State(state): State<AppState>,
    id: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    update_book(state, id, payload, UpdateMode::Replace).await
}

pub(super) async fn patch_book(
    State(state): State<AppState>,
    id: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    update_book(state, id, payload, UpdateMode::Partial).await
}

pub(super) async fn delete_book(
    State(state): State<AppState>,
    id: Result<Path<BookId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = book_id(id)?;
    state
        .with_conn(move |conn| book_service(conn).delete(id).map_err(ApiError::from))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_book(
    state: AppState,
    id: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
    mode: UpdateMode,
) -> ApiResult<Json<Book>> {
    let id = book_id(id)?;
    let Json(payload) = payload?;
    let request = payload.into_update_request(mode);

    state
        .with_conn(move |conn| book_service(conn).update(id, request).map_err(ApiError::from))
        .await
        .map(Json)
}
