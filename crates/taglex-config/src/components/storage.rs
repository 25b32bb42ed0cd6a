//! Storage component configuration
//!
//! Database location and SQLite tuning knobs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage component configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path, or `:memory:`
    pub path: PathBuf,
    /// Enable write-ahead logging
    pub wal_mode: bool,
    /// Enforce foreign keys (needed for tagging cascades)
    pub foreign_keys: bool,
    /// How long a statement waits on a locked database
    pub busy_timeout_ms: u32,
    /// Page cache size (negative values are KiB)
    pub cache_size: i32,
    /// Memory-mapped I/O size in bytes, 0 disables it
    pub mmap_size: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./taglex.db"),
            wal_mode: true,
            foreign_keys: true,
            busy_timeout_ms: 5000,
            cache_size: -8000,
            mmap_size: 0,
        }
    }
}
