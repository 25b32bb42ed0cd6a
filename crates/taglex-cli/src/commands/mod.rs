//! Command implementations
//!
//! Each command returns the lines it would print so it can be driven from
//! tests without capturing stdout.

pub mod context;
pub mod delete;
pub mod resolve;
pub mod search;
pub mod top;

use anyhow::Result;
use std::sync::Arc;
use taglex_config::TaglexConfig;
use taglex_core::{Tag, TagResolver};
use taglex_sqlite::{SqliteConfig, SqlitePool, SqliteTagStore};

/// Resolver over the SQLite store described by `config`
pub type SqliteResolver = TagResolver<SqliteTagStore>;

/// Open the database and build a resolver for it
pub fn open(config: &TaglexConfig) -> Result<SqliteResolver> {
    let pool = SqlitePool::new(SqliteConfig::from(&config.storage))?;
    Ok(resolver_for(pool, config))
}

/// Build a resolver over an already opened pool
pub fn resolver_for(pool: SqlitePool, config: &TaglexConfig) -> SqliteResolver {
    TagResolver::new(Arc::new(SqliteTagStore::new(pool)), &config.tagging)
}

/// `id<TAB>name<TAB>taggings_count`
pub(crate) fn format_tag(tag: &Tag) -> String {
    format!("{}\t{}\t{}", tag.id, tag.name, tag.taggings_count)
}
