//! Tag entity and identifier types

use crate::normalize::{normalize, CaseMatch, ComparisonKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Owning tenant (account scope) of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub i64);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned tag identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub i64);

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A canonical named label scoped to one tenant.
///
/// Two values compare equal when they belong to the same tenant and carry
/// the same name, whatever their `id` or counter. Separately fetched copies
/// of one row are therefore interchangeable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub tenant_id: TenantId,
    pub name: String,
    /// Number of tagging links, maintained by the association layer
    pub taggings_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(id: TagId, tenant_id: TenantId, name: impl Into<String>) -> Self {
        Self {
            id,
            tenant_id,
            name: name.into(),
            taggings_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Comparison key of this tag's name under `policy`
    pub fn comparison_key(&self, policy: CaseMatch) -> ComparisonKey {
        normalize(&self.name, policy)
    }

    /// Policy-aware identity: same tenant and same comparison key
    pub fn same_identity(&self, other: &Tag, policy: CaseMatch) -> bool {
        self.tenant_id == other.tenant_id
            && self.comparison_key(policy) == other.comparison_key(policy)
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.tenant_id == other.tenant_id && self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tenant_id.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_id() {
        let a = Tag::new(TagId(1), TenantId(7), "rust");
        let mut b = Tag::new(TagId(2), TenantId(7), "rust");
        b.taggings_count = 12;
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_respects_tenant_and_case() {
        let a = Tag::new(TagId(1), TenantId(1), "rust");
        assert_ne!(a, Tag::new(TagId(1), TenantId(2), "rust"));
        assert_ne!(a, Tag::new(TagId(1), TenantId(1), "Rust"));
    }

    #[test]
    fn test_same_identity_follows_policy() {
        let a = Tag::new(TagId(1), TenantId(1), "Rust");
        let b = Tag::new(TagId(2), TenantId(1), "rust");
        assert!(a.same_identity(&b, CaseMatch::Insensitive));
        assert!(!a.same_identity(&b, CaseMatch::Strict));
        assert!(!a.same_identity(&Tag::new(TagId(3), TenantId(2), "rust"), CaseMatch::Insensitive));
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(Tag::new(TagId(1), TenantId(1), "café").to_string(), "café");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let tag = Tag::new(TagId(42), TenantId(3), "x");
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["tenant_id"], 3);
    }
}
