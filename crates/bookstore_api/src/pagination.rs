//! Page-number pagination envelope for list endpoints.
//!
//! # Invariants
//! - Page numbers are 1-based; a missing or empty `page` means page 1.
//! - Page 1 always exists, even for an empty listing.
//! - `next`/`previous` links keep every other query pair of the request.

use crate::error::{ApiError, ApiResult};
use bookstore_core::Page;
use serde::{Deserialize, Serialize};

pub const PAGE_QUERY_KEY: &str = "page";
const INVALID_PAGE_MESSAGE: &str = "Invalid page.";

/// Paginated list response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Reads the requested page number from raw query pairs.
///
/// # Errors
/// - `NotFound("Invalid page.")` when the value is not a positive integer.
pub fn requested_page(pairs: &[(String, String)]) -> ApiResult<u32> {
    let value = pairs
        .iter()
        .rev()
        .find(|(key, _)| key == PAGE_QUERY_KEY)
        .map(|(_, value)| value.trim());

    match value {
        None | Some("") => Ok(1),
        Some(value) => match value.parse::<u32>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(invalid_page()),
        },
    }
}

/// Wraps one fetched window into the response envelope.
///
/// # Errors
/// - `NotFound("Invalid page.")` when `page` lies past the last page.
pub fn paginate<T>(
    path: &str,
    pairs: &[(String, String)],
    page: u32,
    page_size: u32,
    fetched: Page<T>,
) -> ApiResult<Paginated<T>> {
    let skipped = u64::from(page - 1) * u64::from(page_size);
    if page > 1 && skipped >= fetched.count {
        return Err(invalid_page());
    }

    let next = (skipped + u64::from(page_size) < fetched.count)
        .then(|| page_link(path, pairs, Some(page + 1)));
    let previous = (page > 1).then(|| {
        let target = page - 1;
        page_link(path, pairs, (target > 1).then_some(target))
    });

    Ok(Paginated {
        count: fetched.count,
        next,
        previous,
        results: fetched.items,
    })
}

fn page_link(path: &str, pairs: &[(String, String)], page: Option<u32>) -> String {
    let mut query: Vec<String> = pairs
        .iter()
        .filter(|(key, _)| key != PAGE_QUERY_KEY)
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect();
    if let Some(page) = page {
        query.push(format!("{PAGE_QUERY_KEY}={page}"));
    }

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", query.join("&"))
    }
}

fn invalid_page() -> ApiError {
    ApiError::NotFound(INVALID_PAGE_MESSAGE.to_string())
}
