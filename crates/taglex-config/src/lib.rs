//! # Taglex Configuration Library
//!
//! Type-safe configuration for the tag resolver, the storage backend and
//! logging. Configuration is plain data: it is loaded once and then injected
//! into the components that need it, never read from process-global state.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taglex_config::TaglexConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TaglexConfig::load_from_file("taglex.toml").await?;
//!     println!("strict case match: {}", config.tagging.strict_case_match);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod components;
mod loader;

pub use components::{LoggingConfig, StorageConfig, TaggingConfig};
pub use loader::{ConfigError, ConfigResult, TaglexConfig};
