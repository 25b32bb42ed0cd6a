//! Component configuration sections

mod logging;
mod storage;
mod tagging;

pub use logging::LoggingConfig;
pub use storage::StorageConfig;
pub use tagging::TaggingConfig;
