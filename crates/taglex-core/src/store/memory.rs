//! In-memory [`TagStore`]
//!
//! Enforces the same `(tenant, key)` uniqueness constraint as the SQL
//! backends. Substring matching follows SQLite's default `LIKE`: ASCII
//! case-insensitive, no wildcards in user input.

use super::{KeyedTag, TagStore, UsageOrder};
use crate::error::{StoreError, StoreResult};
use crate::normalize::ComparisonKey;
use crate::tag::{Tag, TagId, TenantId};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};

struct Row {
    tag: Tag,
    key: ComparisonKey,
}

struct Tagging {
    tag_id: TagId,
    context: String,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<TagId, Row>,
    taggings: Vec<Tagging>,
}

impl Inner {
    fn tenant_rows(&self, tenant: TenantId) -> impl Iterator<Item = &Row> {
        self.rows.values().filter(move |row| row.tag.tenant_id == tenant)
    }
}

/// Thread-safe in-memory tag store
#[derive(Default)]
pub struct MemoryTagStore {
    inner: Mutex<Inner>,
}

impl MemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tagging link, standing in for the association layer.
    ///
    /// Bumps the tag's `taggings_count`. Returns `false` for an unknown tag.
    pub fn add_tagging(&self, tag_id: TagId, context: impl Into<String>) -> bool {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        match inner.rows.get_mut(&tag_id) {
            Some(row) => {
                row.tag.taggings_count += 1;
                inner.taggings.push(Tagging {
                    tag_id,
                    context: context.into(),
                });
                true
            }
            None => false,
        }
    }

    /// Number of tags stored for `tenant`
    pub fn count(&self, tenant: TenantId) -> usize {
        self.inner.lock().tenant_rows(tenant).count()
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

fn sorted_by_name(mut tags: Vec<Tag>) -> Vec<Tag> {
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    tags
}

#[async_trait]
impl TagStore for MemoryTagStore {
    async fn find_exact(&self, tenant: TenantId, key: &ComparisonKey) -> StoreResult<Option<Tag>> {
        let inner = self.inner.lock();
        let tag = inner
            .tenant_rows(tenant)
            .find(|row| &row.key == key)
            .map(|row| row.tag.clone());
        Ok(tag)
    }

    async fn find_any_of(
        &self,
        tenant: TenantId,
        keys: &[ComparisonKey],
    ) -> StoreResult<Vec<KeyedTag>> {
        let wanted: BTreeSet<&ComparisonKey> = keys.iter().collect();
        let inner = self.inner.lock();
        let found = inner
            .tenant_rows(tenant)
            .filter(|row| wanted.contains(&row.key))
            .map(|row| KeyedTag {
                key: row.key.clone(),
                tag: row.tag.clone(),
            })
            .collect();
        Ok(found)
    }

    async fn find_like(&self, tenant: TenantId, substring: &str) -> StoreResult<Vec<Tag>> {
        self.find_like_any(tenant, &[substring.to_string()]).await
    }

    async fn find_like_any(
        &self,
        tenant: TenantId,
        substrings: &[String],
    ) -> StoreResult<Vec<Tag>> {
        let inner = self.inner.lock();
        let tags = inner
            .tenant_rows(tenant)
            .filter(|row| {
                substrings
                    .iter()
                    .any(|s| contains_ignore_ascii_case(&row.tag.name, s))
            })
            .map(|row| row.tag.clone())
            .collect();
        Ok(sorted_by_name(tags))
    }

    async fn find_by_context(&self, tenant: TenantId, context: &str) -> StoreResult<Vec<Tag>> {
        let inner = self.inner.lock();
        let ids: BTreeSet<TagId> = inner
            .taggings
            .iter()
            .filter(|t| t.context == context)
            .map(|t| t.tag_id)
            .collect();
        let tags = ids
            .iter()
            .filter_map(|id| inner.rows.get(id))
            .filter(|row| row.tag.tenant_id == tenant)
            .map(|row| row.tag.clone())
            .collect();
        Ok(sorted_by_name(tags))
    }

    async fn insert_if_absent(
        &self,
        tenant: TenantId,
        name: &str,
        key: &ComparisonKey,
    ) -> StoreResult<Tag> {
        let mut inner = self.inner.lock();
        if inner.tenant_rows(tenant).any(|row| &row.key == key) {
            return Err(StoreError::DuplicateKey {
                name: name.to_string(),
            });
        }

        inner.next_id += 1;
        let id = TagId(inner.next_id);
        let tag = Tag {
            id,
            tenant_id: tenant,
            name: name.to_string(),
            taggings_count: 0,
            created_at: Utc::now(),
        };
        inner.rows.insert(
            id,
            Row {
                tag: tag.clone(),
                key: key.clone(),
            },
        );
        Ok(tag)
    }

    async fn order_by_usage(
        &self,
        tenant: TenantId,
        order: UsageOrder,
        limit: usize,
    ) -> StoreResult<Vec<Tag>> {
        let inner = self.inner.lock();
        let mut tags: Vec<Tag> = inner.tenant_rows(tenant).map(|row| row.tag.clone()).collect();
        tags.sort_by(|a, b| {
            let by_count = match order {
                UsageOrder::MostUsed => b.taggings_count.cmp(&a.taggings_count),
                UsageOrder::LeastUsed => a.taggings_count.cmp(&b.taggings_count),
            };
            by_count.then_with(|| a.name.cmp(&b.name))
        });
        tags.truncate(limit);
        Ok(tags)
    }

    async fn get(&self, tenant: TenantId, id: TagId) -> StoreResult<Option<Tag>> {
        let inner = self.inner.lock();
        Ok(inner
            .rows
            .get(&id)
            .filter(|row| row.tag.tenant_id == tenant)
            .map(|row| row.tag.clone()))
    }

    async fn delete(&self, tenant: TenantId, id: TagId) -> StoreResult<bool> {
        let mut inner = self.inner.lock();
        let owned = inner
            .rows
            .get(&id)
            .is_some_and(|row| row.tag.tenant_id == tenant);
        if !owned {
            return Ok(false);
        }
        inner.rows.remove(&id);
        inner.taggings.retain(|t| t.tag_id != id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, CaseMatch};

    const T1: TenantId = TenantId(1);
    const T2: TenantId = TenantId(2);

    fn key(name: &str) -> ComparisonKey {
        normalize(name, CaseMatch::Insensitive)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryTagStore::new();
        let tag = store.insert_if_absent(T1, "Rust", &key("Rust")).await.unwrap();

        let found = store.find_exact(T1, &key("rust")).await.unwrap().unwrap();
        assert_eq!(found.id, tag.id);
        assert_eq!(found.name, "Rust");
        assert!(store.find_exact(T2, &key("rust")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_key_is_per_tenant() {
        let store = MemoryTagStore::new();
        store.insert_if_absent(T1, "rust", &key("rust")).await.unwrap();

        let err = store.insert_if_absent(T1, "RUST", &key("RUST")).await.unwrap_err();
        assert!(err.is_duplicate_key());
        assert!(store.insert_if_absent(T2, "rust", &key("rust")).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_any_of() {
        let store = MemoryTagStore::new();
        for name in ["a", "b", "c"] {
            store.insert_if_absent(T1, name, &key(name)).await.unwrap();
        }
        let found = store.find_any_of(T1, &[key("a"), key("c"), key("zzz")]).await.unwrap();
        let mut names: Vec<_> = found.iter().map(|k| k.tag.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["a", "c"]);
        assert!(found.iter().all(|k| k.key == key(&k.tag.name)));
    }

    #[tokio::test]
    async fn test_find_exact_returns_owned_tag() {
        let store = MemoryTagStore::new();
        store.insert_if_absent(T1, "Zig", &key("Zig")).await.unwrap();

        let first = store.find_exact(T1, &key("zig")).await.unwrap();
        let second = store.find_exact(T1, &key("ZIG")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.count(T1), 1);
    }

    #[tokio::test]
    async fn test_like_is_literal() {
        let store = MemoryTagStore::new();
        for name in ["50%_off", "500 off", "Sale 50%_OFF now"] {
            store.insert_if_absent(T1, name, &key(name)).await.unwrap();
        }
        let found = store.find_like(T1, "50%_off").await.unwrap();
        let names: Vec<_> = found.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["50%_off", "Sale 50%_OFF now"]);
    }

    #[tokio::test]
    async fn test_taggings_drive_usage_and_context() {
        let store = MemoryTagStore::new();
        let a = store.insert_if_absent(T1, "a", &key("a")).await.unwrap();
        let b = store.insert_if_absent(T1, "b", &key("b")).await.unwrap();
        assert!(store.add_tagging(b.id, "skills"));
        assert!(store.add_tagging(b.id, "skills"));
        assert!(store.add_tagging(a.id, "interests"));
        assert!(!store.add_tagging(TagId(999), "skills"));

        let top = store.order_by_usage(T1, UsageOrder::MostUsed, 1).await.unwrap();
        assert_eq!(top[0].name, "b");
        assert_eq!(top[0].taggings_count, 2);

        let skills = store.find_by_context(T1, "skills").await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].id, b.id);
    }

    #[tokio::test]
    async fn test_delete_is_tenant_scoped() {
        let store = MemoryTagStore::new();
        let tag = store.insert_if_absent(T1, "a", &key("a")).await.unwrap();
        store.add_tagging(tag.id, "tags");

        assert!(!store.delete(T2, tag.id).await.unwrap());
        assert!(store.delete(T1, tag.id).await.unwrap());
        assert!(store.get(T1, tag.id).await.unwrap().is_none());
        assert!(store.find_by_context(T1, "tags").await.unwrap().is_empty());
    }
}
