//! Tag query builder
//!
//! Assembles the "most used", "least used", substring and context queries on
//! top of a [`TagStore`]. A filter picks the store operation; ordering on a
//! filtered result is applied in memory.

use crate::error::StoreResult;
use crate::store::{TagStore, UsageOrder};
use crate::tag::{Tag, TenantId};
use std::cmp::Ordering;

/// Limit applied to usage-ordered queries when none is given
pub const DEFAULT_LIMIT: usize = 20;

/// Which tags a query selects
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    NamedLike(String),
    NamedLikeAny(Vec<String>),
    ForContext(String),
}

/// Builder for read-only tag queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    tenant: TenantId,
    filter: TagFilter,
    order: Option<UsageOrder>,
    limit: Option<usize>,
}

impl TagQuery {
    pub fn new(tenant: TenantId) -> Self {
        Self {
            tenant,
            filter: TagFilter::All,
            order: None,
            limit: None,
        }
    }

    /// Names containing `substring` literally
    pub fn named_like(mut self, substring: impl Into<String>) -> Self {
        self.filter = TagFilter::NamedLike(substring.into());
        self
    }

    /// Names containing any of `substrings`
    pub fn named_like_any<I, T>(mut self, substrings: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.filter = TagFilter::NamedLikeAny(substrings.into_iter().map(Into::into).collect());
        self
    }

    /// Tags used by taggings in `context`
    pub fn for_context(mut self, context: impl Into<String>) -> Self {
        self.filter = TagFilter::ForContext(context.into());
        self
    }

    pub fn most_used(self) -> Self {
        self.order_by(UsageOrder::MostUsed)
    }

    pub fn least_used(self) -> Self {
        self.order_by(UsageOrder::LeastUsed)
    }

    pub fn order_by(mut self, order: UsageOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Limit that will be applied: explicit, else [`DEFAULT_LIMIT`] when
    /// ordering by usage or listing everything, else none.
    pub fn effective_limit(&self) -> Option<usize> {
        match (self.limit, self.order, &self.filter) {
            (Some(limit), _, _) => Some(limit),
            (None, Some(_), _) | (None, None, TagFilter::All) => Some(DEFAULT_LIMIT),
            (None, None, _) => None,
        }
    }

    /// Run the query against `store`
    pub async fn fetch<S: TagStore + ?Sized>(&self, store: &S) -> StoreResult<Vec<Tag>> {
        let mut tags = match &self.filter {
            TagFilter::All => {
                let order = self.order.unwrap_or_default();
                let limit = self.effective_limit().unwrap_or(DEFAULT_LIMIT);
                return store.order_by_usage(self.tenant, order, limit).await;
            }
            TagFilter::NamedLike(substring) => store.find_like(self.tenant, substring).await?,
            TagFilter::NamedLikeAny(substrings) => {
                if substrings.is_empty() {
                    return Ok(Vec::new());
                }
                store.find_like_any(self.tenant, substrings).await?
            }
            TagFilter::ForContext(context) => store.find_by_context(self.tenant, context).await?,
        };

        if let Some(order) = self.order {
            tags.sort_by(|a, b| usage_cmp(order, a, b));
        }
        if let Some(limit) = self.effective_limit() {
            tags.truncate(limit);
        }
        Ok(tags)
    }
}

fn usage_cmp(order: UsageOrder, a: &Tag, b: &Tag) -> Ordering {
    let by_count = match order {
        UsageOrder::MostUsed => b.taggings_count.cmp(&a.taggings_count),
        UsageOrder::LeastUsed => a.taggings_count.cmp(&b.taggings_count),
    };
    by_count.then_with(|| a.name.cmp(&b.name))
}
