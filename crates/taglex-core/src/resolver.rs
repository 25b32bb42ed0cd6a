//! Race-safe resolution of tag names to tags
//!
//! The resolver looks every requested key up in one batched query, creates
//! whatever is missing, and leans on the store's `(tenant, key)` uniqueness
//! constraint when another writer gets there first: a `DuplicateKey` from the
//! insert means the row now exists, so the batched lookup is simply re-run.
//! No application-level lock is held at any point.

use crate::error::{StoreError, TagError, TagResult};
use crate::normalize::{normalize, CaseMatch, ComparisonKey};
use crate::store::{KeyedTag, TagStore};
use crate::tag::{Tag, TenantId};
use crate::validation::{NameRules, ValidationError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use taglex_config::TaggingConfig;
use tracing::{debug, warn};

/// Resolves free-text names into canonical tags for a tenant
pub struct TagResolver<S: ?Sized> {
    store: Arc<S>,
    policy: CaseMatch,
    rules: NameRules,
    max_attempts: u32,
}

impl<S: ?Sized> Clone for TagResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy,
            rules: self.rules,
            max_attempts: self.max_attempts,
        }
    }
}

/// A key still waiting for a tag, with the spelling used to create it
struct Pending<'a> {
    key: ComparisonKey,
    name: &'a str,
}

impl<S: TagStore + ?Sized> TagResolver<S> {
    pub fn new(store: Arc<S>, config: &TaggingConfig) -> Self {
        Self {
            store,
            policy: CaseMatch::from(config),
            rules: NameRules::from(config),
            max_attempts: config.max_retries,
        }
    }

    /// Override the comparison policy taken from the config
    pub fn with_policy(mut self, policy: CaseMatch) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CaseMatch {
        self.policy
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Resolve each name to its tag, creating the missing ones.
    ///
    /// Returns one tag per input name in input order. Names sharing a
    /// comparison key resolve to the same tag; the first spelling is the one
    /// stored when the tag is new. Either every name resolves or the call
    /// fails as a whole.
    pub async fn resolve_or_create<N: AsRef<str>>(
        &self,
        tenant: TenantId,
        names: &[N],
    ) -> TagResult<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        for name in names {
            self.rules.check(name.as_ref())?;
        }

        let keys: Vec<ComparisonKey> = names
            .iter()
            .map(|name| normalize(name.as_ref(), self.policy))
            .collect();

        let mut seen = HashSet::with_capacity(keys.len());
        let mut pending: Vec<Pending<'_>> = keys
            .iter()
            .zip(names)
            .filter(|(key, _)| seen.insert(*key))
            .map(|(key, name)| Pending {
                key: key.clone(),
                name: name.as_ref(),
            })
            .collect();

        let mut resolved: HashMap<ComparisonKey, Tag> = HashMap::with_capacity(pending.len());
        let mut attempts = 0;

        loop {
            attempts += 1;
            self.bind_existing(tenant, &mut pending, &mut resolved).await?;

            let mut conflicted = Vec::new();
            for entry in pending.drain(..) {
                match self.store.insert_if_absent(tenant, entry.name, &entry.key).await {
                    Ok(tag) => {
                        debug!(%tenant, id = %tag.id, name = %tag.name, "Created tag");
                        resolved.insert(entry.key, tag);
                    }
                    Err(StoreError::DuplicateKey { .. }) => conflicted.push(entry),
                    Err(e) => return Err(e.into()),
                }
            }

            if conflicted.is_empty() {
                break;
            }

            if attempts >= self.max_attempts {
                let name = conflicted[0].name.to_string();
                warn!(%tenant, %name, attempts, "Giving up on duplicate tag creation");
                return Err(TagError::DuplicateTagCreationFailed { name });
            }

            warn!(
                %tenant,
                attempt = attempts,
                conflicts = conflicted.len(),
                "Duplicate key on tag insert, re-running lookup"
            );
            pending = conflicted;
        }

        keys.iter()
            .zip(names)
            .map(|(key, name)| {
                resolved
                    .get(key)
                    .cloned()
                    .ok_or_else(|| TagError::DuplicateTagCreationFailed {
                        name: name.as_ref().to_string(),
                    })
            })
            .collect()
    }

    /// Single-name form of [`resolve_or_create`](Self::resolve_or_create).
    ///
    /// Uses the same key matching as the batch path, so one name resolves
    /// exactly as it would inside a list.
    pub async fn resolve_one_or_create(&self, tenant: TenantId, name: &str) -> TagResult<Tag> {
        let mut tags = self.resolve_or_create(tenant, &[name]).await?;
        tags.pop().ok_or_else(|| TagError::DuplicateTagCreationFailed {
            name: name.to_string(),
        })
    }

    /// Create a tag directly, failing if the name is already present.
    ///
    /// With uniqueness validation enabled an existing name is reported before
    /// the insert is attempted. A lost race at the constraint reports the
    /// same `Taken` error.
    pub async fn create(&self, tenant: TenantId, name: &str) -> TagResult<Tag> {
        self.rules.check(name)?;
        let key = normalize(name, self.policy);

        if self.rules.validate_uniqueness && self.store.find_exact(tenant, &key).await?.is_some() {
            return Err(ValidationError::Taken {
                name: name.to_string(),
            }
            .into());
        }

        match self.store.insert_if_absent(tenant, name, &key).await {
            Ok(tag) => Ok(tag),
            Err(StoreError::DuplicateKey { name }) => Err(ValidationError::Taken { name }.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Look a name up without creating it
    pub async fn find(&self, tenant: TenantId, name: &str) -> TagResult<Option<Tag>> {
        let key = normalize(name, self.policy);
        Ok(self.store.find_exact(tenant, &key).await?)
    }

    /// Batched lookup of every pending key; found keys leave `pending`
    async fn bind_existing(
        &self,
        tenant: TenantId,
        pending: &mut Vec<Pending<'_>>,
        resolved: &mut HashMap<ComparisonKey, Tag>,
    ) -> TagResult<()> {
        if pending.is_empty() {
            return Ok(());
        }

        let keys: Vec<ComparisonKey> = pending.iter().map(|p| p.key.clone()).collect();
        let existing = self.store.find_any_of(tenant, &keys).await?;
        debug!(%tenant, requested = keys.len(), found = existing.len(), "Batched tag lookup");

        for KeyedTag { key, tag } in existing {
            resolved.entry(key).or_insert(tag);
        }
        pending.retain(|p| !resolved.contains_key(&p.key));
        Ok(())
    }
}
