//! TagStore implementation for SQLite

use crate::connection::SqlitePool;
use crate::error::{SqliteError, SqliteResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use taglex_core::store::LIKE_ESCAPE;
use taglex_core::{
    like_pattern, ComparisonKey, KeyedTag, StoreError, StoreResult, Tag, TagId, TagStore,
    TenantId, UsageOrder,
};
use tracing::debug;

const TAG_COLUMNS: &str = "t.id, t.tenant_id, t.name, t.taggings_count, t.created_at";

/// Keys per `IN (...)` list, well under SQLite's bound-parameter limit
const MAX_KEYS_PER_QUERY: usize = 500;

/// SQLite implementation of TagStore
#[derive(Clone)]
pub struct SqliteTagStore {
    pool: SqlitePool,
}

impl SqliteTagStore {
    /// Create a new TagStore with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run a closure against the connection on the blocking thread pool
    async fn blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            pool.with_connection(|conn| Ok(f(conn)))
                .map_err(StoreError::from)
                .and_then(|result| result)
        })
        .await
        .map_err(|e| StoreError::from(SqliteError::Task(e.to_string())))?
    }
}

#[async_trait]
impl TagStore for SqliteTagStore {
    async fn find_exact(&self, tenant: TenantId, key: &ComparisonKey) -> StoreResult<Option<Tag>> {
        let key = key.as_bytes().to_vec();

        self.blocking(move |conn| {
            let sql = format!(
                "SELECT {TAG_COLUMNS} FROM tags t WHERE t.tenant_id = ?1 AND t.name_key = ?2"
            );
            let tag = conn
                .query_row(&sql, params![tenant.0, key], row_to_tag)
                .optional()
                .map_err(SqliteError::from)?;
            Ok(tag)
        })
        .await
    }

    async fn find_any_of(
        &self,
        tenant: TenantId,
        keys: &[ComparisonKey],
    ) -> StoreResult<Vec<KeyedTag>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<Vec<u8>> = keys.iter().map(|k| k.as_bytes().to_vec()).collect();

        self.blocking(move |conn| {
            let mut found = Vec::new();
            for chunk in keys.chunks(MAX_KEYS_PER_QUERY) {
                let sql = format!(
                    "SELECT {TAG_COLUMNS}, t.name_key FROM tags t \
                     WHERE t.tenant_id = ?1 AND t.name_key IN ({})",
                    placeholders(2, chunk.len())
                );
                let mut values = Vec::with_capacity(chunk.len() + 1);
                values.push(Value::Integer(tenant.0));
                values.extend(chunk.iter().cloned().map(Value::Blob));

                let mut stmt = conn.prepare(&sql).map_err(SqliteError::from)?;
                let rows = stmt
                    .query_map(params_from_iter(values.iter()), |row| {
                        Ok(KeyedTag {
                            tag: row_to_tag(row)?,
                            key: ComparisonKey::from_bytes(row.get(5)?),
                        })
                    })
                    .map_err(SqliteError::from)?;
                for row in rows {
                    found.push(row.map_err(SqliteError::from)?);
                }
            }
            debug!(%tenant, found = found.len(), "Batched key lookup");
            Ok(found)
        })
        .await
    }

    async fn find_like(&self, tenant: TenantId, substring: &str) -> StoreResult<Vec<Tag>> {
        self.find_like_any(tenant, &[substring.to_string()]).await
    }

    async fn find_like_any(
        &self,
        tenant: TenantId,
        substrings: &[String],
    ) -> StoreResult<Vec<Tag>> {
        if substrings.is_empty() {
            return Ok(Vec::new());
        }
        let patterns: Vec<String> = substrings.iter().map(|s| like_pattern(s)).collect();

        self.blocking(move |conn| {
            let clause = (0..patterns.len())
                .map(|i| format!("t.name LIKE ?{} ESCAPE '{}'", i + 2, LIKE_ESCAPE))
                .collect::<Vec<_>>()
                .join(" OR ");
            let sql = format!(
                "SELECT {TAG_COLUMNS} FROM tags t WHERE t.tenant_id = ?1 AND ({clause}) ORDER BY t.name"
            );
            let mut values = Vec::with_capacity(patterns.len() + 1);
            values.push(Value::Integer(tenant.0));
            values.extend(patterns.into_iter().map(Value::Text));

            Ok(query_tags(conn, &sql, values)?)
        })
        .await
    }

    async fn find_by_context(&self, tenant: TenantId, context: &str) -> StoreResult<Vec<Tag>> {
        let context = context.to_string();

        self.blocking(move |conn| {
            let sql = format!(
                r#"
                SELECT DISTINCT {TAG_COLUMNS}
                FROM tags t
                JOIN taggings tg ON tg.tag_id = t.id
                WHERE t.tenant_id = ?1 AND tg.context = ?2
                ORDER BY t.name
                "#
            );
            let values = vec![Value::Integer(tenant.0), Value::Text(context)];
            Ok(query_tags(conn, &sql, values)?)
        })
        .await
    }

    async fn insert_if_absent(
        &self,
        tenant: TenantId,
        name: &str,
        key: &ComparisonKey,
    ) -> StoreResult<Tag> {
        let name = name.to_string();
        let key = key.as_bytes().to_vec();

        self.blocking(move |conn| {
            let now = Utc::now();
            let inserted = conn.execute(
                r#"
                INSERT INTO tags (tenant_id, name, name_key, taggings_count, created_at)
                VALUES (?1, ?2, ?3, 0, ?4)
                "#,
                params![tenant.0, name, key, now.to_rfc3339()],
            );

            match inserted.map_err(SqliteError::from) {
                Ok(_) => {
                    let id = TagId(conn.last_insert_rowid());
                    debug!(%tenant, %id, %name, "Inserted tag");
                    Ok(Tag {
                        id,
                        tenant_id: tenant,
                        name,
                        taggings_count: 0,
                        created_at: now,
                    })
                }
                Err(e) if e.is_unique_violation() => {
                    debug!(%tenant, %name, "Tag key already taken");
                    Err(StoreError::DuplicateKey { name })
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn order_by_usage(
        &self,
        tenant: TenantId,
        order: UsageOrder,
        limit: usize,
    ) -> StoreResult<Vec<Tag>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let direction = match order {
            UsageOrder::MostUsed => "DESC",
            UsageOrder::LeastUsed => "ASC",
        };

        self.blocking(move |conn| {
            let sql = format!(
                "SELECT {TAG_COLUMNS} FROM tags t WHERE t.tenant_id = ?1 \
                 ORDER BY t.taggings_count {direction}, t.name ASC LIMIT ?2"
            );
            let values = vec![Value::Integer(tenant.0), Value::Integer(limit)];
            Ok(query_tags(conn, &sql, values)?)
        })
        .await
    }

    async fn get(&self, tenant: TenantId, id: TagId) -> StoreResult<Option<Tag>> {
        self.blocking(move |conn| {
            let sql = format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.tenant_id = ?1 AND t.id = ?2");
            let tag = conn
                .query_row(&sql, params![tenant.0, id.0], row_to_tag)
                .optional()
                .map_err(SqliteError::from)?;
            Ok(tag)
        })
        .await
    }

    async fn delete(&self, tenant: TenantId, id: TagId) -> StoreResult<bool> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            pool.with_connection_mut(|conn| {
                let tx = conn.transaction()?;

                // Explicit so the cascade holds even with foreign_keys off
                tx.execute(
                    "DELETE FROM taggings WHERE tag_id IN \
                     (SELECT id FROM tags WHERE id = ?1 AND tenant_id = ?2)",
                    params![id.0, tenant.0],
                )?;
                let deleted = tx.execute(
                    "DELETE FROM tags WHERE id = ?1 AND tenant_id = ?2",
                    params![id.0, tenant.0],
                )?;
                tx.commit()?;

                debug!(%tenant, %id, deleted, "Deleted tag");
                Ok(deleted > 0)
            })
        })
        .await
        .map_err(|e| StoreError::from(SqliteError::Task(e.to_string())))?
        .map_err(Into::into)
    }
}

/// `?start, ?start+1, ...` for `count` parameters
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn query_tags(conn: &Connection, sql: &str, values: Vec<Value>) -> SqliteResult<Vec<Tag>> {
    let mut stmt = conn.prepare(sql)?;
    let tags = stmt
        .query_map(params_from_iter(values.iter()), row_to_tag)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tags)
}

/// Convert a database row to a Tag
fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
    let created_at: String = row.get(4)?;

    Ok(Tag {
        id: TagId(row.get(0)?),
        tenant_id: TenantId(row.get(1)?),
        name: row.get(2)?,
        taggings_count: row.get(3)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
