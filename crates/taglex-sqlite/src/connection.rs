//! Shared SQLite connection
//!
//! One connection behind a mutex. Each statement takes the lock separately,
//! so a lookup and a later insert from the same resolver can interleave with
//! other resolvers; the UNIQUE index decides who wins.

use crate::config::SqliteConfig;
use crate::error::{SqliteError, SqliteResult};
use crate::schema;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::sync::Arc;
use tracing::{debug, info};

/// Cloneable handle to the tag database
#[derive(Clone)]
pub struct SqlitePool {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePool {
    /// Open the tag database, tune it and bring the schema up to date
    pub fn new(config: SqliteConfig) -> SqliteResult<Self> {
        info!(path = ?config.path, "Opening tag database");

        let conn = open_connection(&config)?;
        for pragma in pragma_statements(&config) {
            debug!(%pragma, "Applying pragma");
            conn.execute_batch(&pragma)?;
        }
        schema::apply_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Private in-memory database, mostly for tests
    pub fn memory() -> SqliteResult<Self> {
        Self::new(SqliteConfig::memory())
    }

    /// Run `f` while holding the connection lock
    pub fn with_connection<F, T>(&self, f: F) -> SqliteResult<T>
    where
        F: FnOnce(&Connection) -> SqliteResult<T>,
    {
        f(&self.conn.lock())
    }

    /// Like [`with_connection`](Self::with_connection), for transactions
    pub fn with_connection_mut<F, T>(&self, f: F) -> SqliteResult<T>
    where
        F: FnOnce(&mut Connection) -> SqliteResult<T>,
    {
        f(&mut self.conn.lock())
    }
}

fn open_connection(config: &SqliteConfig) -> SqliteResult<Connection> {
    if config.is_memory() {
        return Ok(Connection::open_in_memory()?);
    }

    if let Some(dir) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| {
            SqliteError::Connection(format!("cannot create {}: {}", dir.display(), e))
        })?;
    }
    Ok(Connection::open(&config.path)?)
}

/// Pragmas for `config`, in the order they must run
fn pragma_statements(config: &SqliteConfig) -> Vec<String> {
    let mut pragmas = Vec::new();

    if config.wal_mode {
        pragmas.push("PRAGMA journal_mode = WAL;".to_string());
        pragmas.push("PRAGMA synchronous = NORMAL;".to_string());
    }
    // Tagging rows cascade on tag deletion
    if config.foreign_keys {
        pragmas.push("PRAGMA foreign_keys = ON;".to_string());
    }
    pragmas.push(format!("PRAGMA busy_timeout = {};", config.busy_timeout_ms));
    pragmas.push(format!("PRAGMA cache_size = {};", config.cache_size));
    if config.mmap_size > 0 {
        pragmas.push(format!("PRAGMA mmap_size = {};", config.mmap_size));
    }
    pragmas.push("PRAGMA temp_store = MEMORY;".to_string());

    pragmas
}
