//! Taglex core
//!
//! Domain types and the race-safe name resolver for a tenant-scoped tag
//! vocabulary.
//!
//! ## Architecture
//!
//! Core defines the [`TagStore`] trait; storage backends implement it in
//! their own crates (`taglex-sqlite`), and [`MemoryTagStore`] ships here for
//! tests and embedding. The resolver only relies on the store's uniqueness
//! constraint for correctness under concurrent writers, it takes no locks of
//! its own.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use taglex_core::{MemoryTagStore, TagResolver, TenantId};
//! use taglex_config::TaggingConfig;
//!
//! let resolver = TagResolver::new(Arc::new(MemoryTagStore::new()), &TaggingConfig::default());
//! let tags = resolver.resolve_or_create(TenantId(1), &["rust", "Rust", "sqlite"]).await?;
//! assert_eq!(tags[0].id, tags[1].id);
//! ```

pub mod error;
pub mod normalize;
pub mod query;
pub mod resolver;
pub mod store;
pub mod tag;
pub mod validation;

pub use error::{StoreError, StoreResult, TagError, TagResult};
pub use normalize::{normalize, CaseMatch, ComparisonKey};
pub use query::{TagFilter, TagQuery};
pub use resolver::TagResolver;
pub use store::{escape_like, like_pattern, KeyedTag, MemoryTagStore, TagStore, UsageOrder};
pub use tag::{Tag, TagId, TenantId};
pub use validation::{NameRules, ValidationError};
