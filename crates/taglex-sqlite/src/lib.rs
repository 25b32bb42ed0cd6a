//! SQLite storage backend for Taglex
//!
//! This crate provides a SQLite-based implementation of the
//! [`TagStore`](taglex_core::TagStore) trait.
//!
//! ## Features
//!
//! - **Per-tenant uniqueness**: `UNIQUE(tenant_id, name_key)` index on the
//!   byte-level comparison key, the only concurrency control the resolver needs
//! - **Counter cache**: triggers on `taggings` maintain `tags.taggings_count`
//! - **WAL Mode**: Optimized for concurrent read access with write-ahead logging
//! - **Thread Safety**: Arc<Mutex<Connection>> pattern for concurrent access
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use taglex_sqlite::{SqliteConfig, SqlitePool, SqliteTagStore};
//! use taglex_core::{TagResolver, TenantId};
//!
//! let pool = SqlitePool::new(SqliteConfig::new("./taglex.db"))?;
//! let resolver = TagResolver::new(Arc::new(SqliteTagStore::new(pool)), &Default::default());
//! let tags = resolver.resolve_or_create(TenantId(1), &["rust", "sqlite"]).await?;
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod schema;
pub mod tag_store;

// Re-exports
pub use config::SqliteConfig;
pub use connection::SqlitePool;
pub use error::{SqliteError, SqliteResult};
pub use tag_store::SqliteTagStore;
