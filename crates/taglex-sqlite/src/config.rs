//! SQLite connection configuration

use std::path::{Path, PathBuf};
use taglex_config::StorageConfig;

/// Path used for in-memory databases
pub const MEMORY_PATH: &str = ":memory:";

/// SQLite connection settings
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub path: PathBuf,
    pub wal_mode: bool,
    pub foreign_keys: bool,
    pub busy_timeout_ms: u32,
    pub cache_size: i32,
    pub mmap_size: u64,
}

impl SqliteConfig {
    /// File-backed database with default tuning
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::from(&StorageConfig::default())
        }
    }

    /// Private in-memory database, mostly for tests
    pub fn memory() -> Self {
        Self {
            wal_mode: false,
            ..Self::new(MEMORY_PATH)
        }
    }

    pub fn is_memory(&self) -> bool {
        self.path.to_str() == Some(MEMORY_PATH)
    }
}

impl From<&StorageConfig> for SqliteConfig {
    fn from(config: &StorageConfig) -> Self {
        Self {
            path: config.path.clone(),
            wal_mode: config.wal_mode,
            foreign_keys: config.foreign_keys,
            busy_timeout_ms: config.busy_timeout_ms,
            cache_size: config.cache_size,
            mmap_size: config.mmap_size,
        }
    }
}
