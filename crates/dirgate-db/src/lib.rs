//! dirgate database layer: SurrealDB connection management, schema
//! migrations and repository implementations.
//!
//! This crate provides:
//! - Opening a migrated session ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - Repository implementations of the `dirgate-core` traits

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::run_migrations;
