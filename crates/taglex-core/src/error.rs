//! Error types for tag storage and resolution

use crate::validation::ValidationError;
use thiserror::Error;

/// Errors reported by a [`TagStore`](crate::store::TagStore)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The per-tenant uniqueness constraint rejected an insert
    #[error("Duplicate key for tag '{name}'")]
    DuplicateKey { name: String },

    /// The backing store could not be reached or is locked
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::Backend(msg.into())
    }

    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

/// Errors surfaced by the resolver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Duplicate-key attempts ran out without the conflicting row showing up
    #[error("'{name}' has already been taken")]
    DuplicateTagCreationFailed { name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for resolver operations
pub type TagResult<T> = Result<T, TagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_carries_name() {
        let err = TagError::DuplicateTagCreationFailed {
            name: "rust".to_string(),
        };
        assert_eq!(err.to_string(), "'rust' has already been taken");
    }
}
