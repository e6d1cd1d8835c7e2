//! Listing filters built from request query parameters.
//!
//! # Responsibility
//! - Translate loosely-typed query pairs into typed filter values.
//! - Keep the set of recognized filter keys in one place.

pub mod book_filter;
