//! Integration tests for tag resolution over SQLite
//!
//! Exercises the resolver and query builder against a real SqlitePool, both
//! in memory and on disk with several connections racing.

use std::sync::Arc;
use taglex_config::TaggingConfig;
use taglex_core::{TagError, TagQuery, TagResolver, TagStore, TenantId, ValidationError};
use taglex_sqlite::{SqliteConfig, SqlitePool, SqliteTagStore};
use tempfile::TempDir;

const T1: TenantId = TenantId(1);
const T2: TenantId = TenantId(2);

fn resolver_on(pool: SqlitePool, config: &TaggingConfig) -> TagResolver<SqliteTagStore> {
    TagResolver::new(Arc::new(SqliteTagStore::new(pool)), config)
}

fn count_tags(pool: &SqlitePool, tenant: TenantId) -> i64 {
    pool.with_connection(|conn| {
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM tags WHERE tenant_id = ?1",
            [tenant.0],
            |row| row.get(0),
        )?)
    })
    .unwrap()
}

#[tokio::test]
async fn test_second_call_creates_nothing() {
    let pool = SqlitePool::memory().unwrap();
    let resolver = resolver_on(pool.clone(), &TaggingConfig::default());
    let names = ["rust", "sqlite", "Async"];

    let first = resolver.resolve_or_create(T1, &names).await.unwrap();
    let second = resolver.resolve_or_create(T1, &names).await.unwrap();

    let ids: Vec<_> = first.iter().map(|t| t.id).collect();
    assert_eq!(ids, second.iter().map(|t| t.id).collect::<Vec<_>>());
    assert_eq!(count_tags(&pool, T1), 3);
}

#[tokio::test]
async fn test_order_and_duplicate_inputs() {
    let resolver = resolver_on(SqlitePool::memory().unwrap(), &TaggingConfig::default());
    let tags = resolver.resolve_or_create(T1, &["b", "a", "b"]).await.unwrap();

    let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a", "b"]);
    assert_eq!(tags[0].id, tags[2].id);
}

#[tokio::test]
async fn test_case_policies() {
    let loose = resolver_on(SqlitePool::memory().unwrap(), &TaggingConfig::default());
    let a = loose.resolve_one_or_create(T1, "Ruby").await.unwrap();
    let b = loose.resolve_one_or_create(T1, "ruby").await.unwrap();
    assert_eq!(a.id, b.id);

    let strict = resolver_on(SqlitePool::memory().unwrap(), &TaggingConfig::strict());
    let a = strict.resolve_one_or_create(T1, "Ruby").await.unwrap();
    let b = strict.resolve_one_or_create(T1, "ruby").await.unwrap();
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn test_multibyte_case_folding() {
    let resolver = resolver_on(SqlitePool::memory().unwrap(), &TaggingConfig::default());
    let a = resolver.resolve_one_or_create(T1, "ÜBER").await.unwrap();
    let b = resolver.resolve_one_or_create(T1, "über").await.unwrap();
    assert_eq!(a.id, b.id);
}

#[tokio::test]
async fn test_tenant_isolation() {
    let pool = SqlitePool::memory().unwrap();
    let resolver = resolver_on(pool.clone(), &TaggingConfig::default());

    let a = resolver.resolve_one_or_create(T1, "shared").await.unwrap();
    let b = resolver.resolve_one_or_create(T2, "shared").await.unwrap();
    assert_ne!(a.id, b.id);
    assert!(resolver.store().get(T2, a.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_validation_rejects_before_write() {
    let pool = SqlitePool::memory().unwrap();
    let resolver = resolver_on(pool.clone(), &TaggingConfig::default());

    let err = resolver.resolve_or_create(T1, &[""]).await.unwrap_err();
    assert_eq!(err, TagError::Validation(ValidationError::Blank));

    let long = "x".repeat(256);
    let err = resolver.resolve_or_create(T1, &[long]).await.unwrap_err();
    assert!(matches!(err, TagError::Validation(ValidationError::TooLong { .. })));

    assert_eq!(count_tags(&pool, T1), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creation_shared_pool() {
    let pool = SqlitePool::memory().unwrap();
    let resolver = resolver_on(pool.clone(), &TaggingConfig::default());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve_or_create(T1, &["newtag"]).await })
        })
        .collect();

    let mut ids = Vec::new();
    for joined in futures::future::join_all(handles).await {
        let tags = joined.unwrap().unwrap();
        ids.push(tags[0].id);
    }

    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(count_tags(&pool, T1), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creation_separate_connections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tags.db");

    // One pool per writer: each holds its own SQLite connection to the file
    let pools: Vec<SqlitePool> = (0..6)
        .map(|_| SqlitePool::new(SqliteConfig::new(&path)).unwrap())
        .collect();

    let handles: Vec<_> = pools
        .iter()
        .cloned()
        .map(|pool| {
            let resolver = resolver_on(pool, &TaggingConfig::default());
            tokio::spawn(async move {
                resolver
                    .resolve_or_create(T1, &["NewTag", "other", "newtag"])
                    .await
            })
        })
        .collect();

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    for tags in &results {
        assert_eq!(tags[0].id, results[0][0].id);
        assert_eq!(tags[1].id, results[0][1].id);
        assert_eq!(tags[0].id, tags[2].id);
    }
    assert_eq!(count_tags(&pools[0], T1), 2);
}

#[tokio::test]
async fn test_query_builder_over_sqlite() {
    let pool = SqlitePool::memory().unwrap();
    let resolver = resolver_on(pool.clone(), &TaggingConfig::default());
    let tags = resolver
        .resolve_or_create(T1, &["50%_off", "500 off", "rust"])
        .await
        .unwrap();

    pool.with_connection(|conn| {
        conn.execute(
            "INSERT INTO taggings (tenant_id, tag_id, taggable_type, taggable_id, context)
             VALUES (?1, ?2, 'post', '1', 'promos')",
            [T1.0, tags[0].id.0],
        )?;
        Ok(())
    })
    .unwrap();

    let store = resolver.store();
    let literal = TagQuery::new(T1).named_like("50%_").fetch(store.as_ref()).await.unwrap();
    assert_eq!(literal.len(), 1);
    assert_eq!(literal[0].name, "50%_off");

    let top = TagQuery::new(T1).most_used().limit(1).fetch(store.as_ref()).await.unwrap();
    assert_eq!(top[0].id, tags[0].id);
    assert_eq!(top[0].taggings_count, 1);

    let promos = TagQuery::new(T1).for_context("promos").fetch(store.as_ref()).await.unwrap();
    assert_eq!(promos.len(), 1);
}

#[tokio::test]
async fn test_direct_create_reports_taken() {
    let resolver = resolver_on(SqlitePool::memory().unwrap(), &TaggingConfig::default());
    resolver.create(T1, "Rust").await.unwrap();

    let err = resolver.create(T1, "rust").await.unwrap_err();
    assert!(matches!(err, TagError::Validation(ValidationError::Taken { .. })));
}
