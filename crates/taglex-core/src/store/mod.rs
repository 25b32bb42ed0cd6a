//! Tag persistence abstraction
//!
//! Every operation is scoped to one tenant. Names are matched through their
//! [`ComparisonKey`], computed by the caller under the active policy, so a
//! backend only ever compares bytes.
//!
//! Backends must enforce uniqueness of `(tenant, key)` themselves: the
//! resolver treats [`StoreError::DuplicateKey`] from
//! [`TagStore::insert_if_absent`] as the signal that a concurrent writer won.

mod like;
mod memory;

pub use like::{escape_like, like_pattern, LIKE_ESCAPE};
pub use memory::MemoryTagStore;

use crate::error::StoreResult;
use crate::normalize::ComparisonKey;
use crate::tag::{Tag, TagId, TenantId};
use async_trait::async_trait;

/// Ordering by `taggings_count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsageOrder {
    #[default]
    MostUsed,
    LeastUsed,
}

/// A tag together with the key it is stored under
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedTag {
    pub key: ComparisonKey,
    pub tag: Tag,
}

/// Tenant-scoped tag storage
#[async_trait]
pub trait TagStore: Send + Sync {
    /// Tag whose key equals `key`, if any
    async fn find_exact(&self, tenant: TenantId, key: &ComparisonKey) -> StoreResult<Option<Tag>>;

    /// Every tag whose stored key is in `keys`, in one round trip
    async fn find_any_of(
        &self,
        tenant: TenantId,
        keys: &[ComparisonKey],
    ) -> StoreResult<Vec<KeyedTag>>;

    /// Tags whose name contains `substring` literally (wildcards escaped)
    async fn find_like(&self, tenant: TenantId, substring: &str) -> StoreResult<Vec<Tag>>;

    /// Tags whose name contains any of `substrings`, in one round trip
    async fn find_like_any(&self, tenant: TenantId, substrings: &[String])
        -> StoreResult<Vec<Tag>>;

    /// Distinct tags with at least one tagging in `context`
    async fn find_by_context(&self, tenant: TenantId, context: &str) -> StoreResult<Vec<Tag>>;

    /// Create a tag, or fail with `DuplicateKey` if the key is taken
    async fn insert_if_absent(
        &self,
        tenant: TenantId,
        name: &str,
        key: &ComparisonKey,
    ) -> StoreResult<Tag>;

    /// Tags ordered by usage count, ties broken by name
    async fn order_by_usage(
        &self,
        tenant: TenantId,
        order: UsageOrder,
        limit: usize,
    ) -> StoreResult<Vec<Tag>>;

    async fn get(&self, tenant: TenantId, id: TagId) -> StoreResult<Option<Tag>>;

    /// Delete a tag together with its taggings. Returns whether a row existed.
    async fn delete(&self, tenant: TenantId, id: TagId) -> StoreResult<bool>;
}
