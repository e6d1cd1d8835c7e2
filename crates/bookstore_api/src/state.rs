//! Shared router state.

use crate::error::{ApiError, ApiResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Runtime options for the HTTP surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    /// Items per listing page, clamped to `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
}

impl ApiConfig {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Router state: the catalog connection plus API options.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
    pub config: ApiConfig,
}

impl AppState {
    /// Wraps a migrated connection.
    pub fn new(conn: Connection, config: ApiConfig) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        }
    }

    /// Runs `work` with exclusive access to the catalog connection on the
    /// blocking thread pool, keeping SQLite I/O off the async workers.
    pub async fn with_conn<T, F>(&self, work: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> ApiResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| ApiError::Internal("catalog connection lock poisoned".to_string()))?;
            work(&conn)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("catalog task failed: {err}")))?
    }
}
