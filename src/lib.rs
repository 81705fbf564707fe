//! Feed backend for a trailer-first title catalog.
//!
//! Requests flow filter translation → keyset page fetch → genre
//! diversification → per-title trailer selection. Storage sits behind
//! [`db::CatalogStore`] so the pipeline can run against Postgres, a Redis
//! read-through cache, or an in-memory catalog.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
