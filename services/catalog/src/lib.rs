//! Catalog service: movie CRUD, filtered search, and token-based
//! authentication
//!
//! The service exposes an axum HTTP surface over a PostgreSQL-backed movie
//! store, with paginated and filterable search, typeahead instant search,
//! and JWT bearer tokens for registered users.

pub mod error;
pub mod jwt;
pub mod models;
pub mod pagination;
pub mod password;
pub mod query;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
