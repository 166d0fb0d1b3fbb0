//! Common library for the cineshelf services
//!
//! This crate provides shared infrastructure used by the catalog service:
//! PostgreSQL connection pooling, configuration, and the database error
//! taxonomy.

pub mod database;
pub mod error;
