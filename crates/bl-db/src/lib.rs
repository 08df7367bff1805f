//! bl-db: database access and persistence layer.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, row mapping for reviews, the low-level review
//! queries, and [`catalog::ReviewCatalog`], the service that enforces the
//! review lifecycle on top of them.

pub mod catalog;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;

pub use catalog::ReviewCatalog;
