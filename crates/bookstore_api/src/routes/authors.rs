//! Read-only author endpoints.

use crate::error::{ApiError, ApiResult};
use crate::pagination::{paginate, requested_page, Paginated};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use bookstore_core::{Author, AuthorService, PageRequest, SqliteAuthorRepository};

pub(super) async fn list_authors(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Paginated<Author>>> {
    let page = requested_page(&pairs)?;
    let page_size = state.config.page_size;

    let fetched = state
        .with_conn(move |conn| {
            AuthorService::new(SqliteAuthorRepository::new(conn))
                .list(PageRequest::for_page(page, page_size))
                .map_err(ApiError::from)
        })
        .await?;

    paginate("/authors", &pairs, page, page_size, fetched).map(Json)
}

pub(super) async fn get_author(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Author>> {
    state
        .with_conn(move |conn| {
            AuthorService::new(SqliteAuthorRepository::new(conn))
                .get_by_name(&name)
                .map_err(ApiError::from)
        })
        .await
        .map(Json)
}
