//! Name normalization
//!
//! Turns a raw tag name into the [`ComparisonKey`] used for equality and for
//! the per-tenant uniqueness constraint. Keys are plain bytes so that every
//! backend compares them the same way, without locale-aware collation.

use serde::{Deserialize, Serialize};
use taglex_config::TaggingConfig;

/// Name comparison policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMatch {
    /// Unicode lowercase, then byte comparison
    #[default]
    Insensitive,
    /// Byte-for-byte comparison of the raw name
    Strict,
}

impl CaseMatch {
    /// Map the `strict_case_match` flag to a policy
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Insensitive
        }
    }

    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl From<&TaggingConfig> for CaseMatch {
    fn from(config: &TaggingConfig) -> Self {
        Self::from_strict_flag(config.strict_case_match)
    }
}

/// Normalized form of a tag name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComparisonKey(Vec<u8>);

impl ComparisonKey {
    /// Wrap bytes read back from storage
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compute the comparison key of `raw` under `policy`.
///
/// Never fails; blank names are rejected by validation before they get here.
pub fn normalize(raw: &str, policy: CaseMatch) -> ComparisonKey {
    match policy {
        CaseMatch::Strict => ComparisonKey(raw.as_bytes().to_vec()),
        CaseMatch::Insensitive => ComparisonKey(fold_case(raw).into_bytes()),
    }
}

/// Unicode lowercase without the word-final sigma rule.
///
/// `str::to_lowercase` turns a trailing 'Σ' into 'ς', so "ΑΣ" and "ασ" would
/// get different keys. Every sigma folds to 'σ' here.
fn fold_case(raw: &str) -> String {
    let lower = raw.to_lowercase();
    if lower.contains('ς') {
        lower.replace('ς', "σ")
    } else {
        lower
    }
}
