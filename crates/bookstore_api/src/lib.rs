//! HTTP API for the bookstore catalog.
//!
//! # Responsibility
//! - Expose `/authors` (read-only) and `/books` (CRUD + filters) over axum.
//! - Translate JSON payloads into validated core requests.
//!
//! # Invariants
//! - Every error response body is `{"detail": "..."}`.
//! - Store access is serialized through one connection lock; no request
//!   holds it across an await point.

pub mod error;
pub mod pagination;
pub mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use pagination::Paginated;
pub use routes::build_router;
pub use state::{ApiConfig, AppState};

/// Serves the catalog router on `listener` until the process stops.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("event=http_listen module=api status=ok addr={addr}");
    }
    axum::serve(listener, build_router(state)).await
}
