//! Schema management and migrations

use crate::error::{SqliteError, SqliteResult};
use rusqlite::Connection;
use tracing::{debug, info};

/// Schema version - increment when making schema changes
const SCHEMA_VERSION: i32 = 1;

/// Apply all pending migrations
pub fn apply_migrations(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current_version = get_current_version(conn)?;
    debug!(current_version, target_version = SCHEMA_VERSION, "Checking migrations");

    if current_version < SCHEMA_VERSION {
        info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Applying schema migrations"
        );
        apply_migration_v1(conn)?;
    }

    Ok(())
}

/// Get current schema version
fn get_current_version(conn: &Connection) -> SqliteResult<i32> {
    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })?;

    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version) VALUES (?)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: tags, taggings and the usage counter triggers
fn apply_migration_v1(conn: &Connection) -> SqliteResult<()> {
    debug!("Applying migration v1: tags and taggings");

    conn.execute_batch(SCHEMA_V1)
        .map_err(|e| SqliteError::Schema(format!("Failed to apply v1 schema: {}", e)))?;

    record_migration(conn, 1)?;
    info!("Migration v1 applied successfully");
    Ok(())
}

/// Initial schema SQL
const SCHEMA_V1: &str = r#"
-- ============================================================================
-- TABLE: tags
-- ============================================================================
-- name_key is the byte-level comparison key computed by the normalizer under
-- the policy in effect at insert time. Uniqueness is enforced on the key, per
-- tenant; this index is what arbitrates concurrent creators.

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id INTEGER NOT NULL,
    name TEXT NOT NULL CHECK (length(name) > 0),
    name_key BLOB NOT NULL,
    taggings_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_tags_tenant_key ON tags(tenant_id, name_key);
CREATE INDEX IF NOT EXISTS idx_tags_tenant_usage ON tags(tenant_id, taggings_count);

-- ============================================================================
-- TABLE: taggings
-- ============================================================================
-- Written by the association layer. Rows go away with their tag.

CREATE TABLE IF NOT EXISTS taggings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id INTEGER NOT NULL,
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    taggable_type TEXT NOT NULL,
    taggable_id TEXT NOT NULL,
    context TEXT NOT NULL DEFAULT 'tags',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(tag_id, taggable_type, taggable_id, context)
);

CREATE INDEX IF NOT EXISTS idx_taggings_tag ON taggings(tag_id);
CREATE INDEX IF NOT EXISTS idx_taggings_context ON taggings(tenant_id, context);

-- Counter cache for most_used / least_used
CREATE TRIGGER IF NOT EXISTS taggings_count_insert
AFTER INSERT ON taggings
BEGIN
    UPDATE tags SET taggings_count = taggings_count + 1 WHERE id = NEW.tag_id;
END;

CREATE TRIGGER IF NOT EXISTS taggings_count_delete
AFTER DELETE ON taggings
BEGIN
    UPDATE tags SET taggings_count = taggings_count - 1 WHERE id = OLD.tag_id;
END;
"#;
