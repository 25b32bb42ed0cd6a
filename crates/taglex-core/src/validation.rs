//! Tag name validation
//!
//! Runs before any store mutation so invalid input never reaches the store.

use taglex_config::TaggingConfig;
use thiserror::Error;

/// Name validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Tag name can't be blank")]
    Blank,

    #[error("Tag name is too long ({length} characters, maximum is {max})")]
    TooLong { length: usize, max: usize },

    #[error("Tag name '{name}' has already been taken")]
    Taken { name: String },
}

/// Validation rules applied to incoming names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRules {
    /// Maximum length in characters
    pub max_length: usize,
    /// Check for an existing name before direct creation
    pub validate_uniqueness: bool,
}

impl Default for NameRules {
    fn default() -> Self {
        Self::from(&TaggingConfig::default())
    }
}

impl From<&TaggingConfig> for NameRules {
    fn from(config: &TaggingConfig) -> Self {
        Self {
            max_length: config.max_name_length,
            validate_uniqueness: config.validate_name_uniqueness,
        }
    }
}

impl NameRules {
    /// Presence and length checks
    pub fn check(&self, name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::Blank);
        }

        let length = name.chars().count();
        if length > self.max_length {
            return Err(ValidationError::TooLong {
                length,
                max: self.max_length,
            });
        }

        Ok(())
    }
}
