//! Tagging component configuration
//!
//! Name comparison policy, name validation rules and the attempt budget
//! used when concurrent writers race to create the same tag.

use serde::{Deserialize, Serialize};

/// Default maximum tag name length, in characters
pub const DEFAULT_MAX_NAME_LENGTH: usize = 255;

/// Default number of lookup-and-insert attempts when racing on a duplicate key
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Tagging component configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Compare names byte-for-byte instead of case-insensitively.
    ///
    /// Changing this only affects names resolved afterwards; keys of
    /// existing rows are not recomputed.
    pub strict_case_match: bool,
    /// Reject direct creation of a name that already exists for the tenant
    pub validate_name_uniqueness: bool,
    /// Maximum name length in characters
    pub max_name_length: usize,
    /// Lookup-and-insert attempts before a duplicate-key conflict is reported
    pub max_retries: u32,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            strict_case_match: false,
            validate_name_uniqueness: true,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl TaggingConfig {
    /// Strict (case-sensitive) variant of the defaults
    pub fn strict() -> Self {
        Self {
            strict_case_match: true,
            ..Self::default()
        }
    }
}
