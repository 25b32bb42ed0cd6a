use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "taglex")]
#[command(about = "taglex - tenant-scoped tag vocabulary")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses config file value
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (TOML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path (overrides config file)
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Compare names case-sensitively (overrides config file)
    #[arg(long, global = true)]
    pub strict_case: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Resolve names to tags, creating missing ones
    Resolve {
        #[arg(short, long)]
        tenant: i64,

        /// Tag names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Substring search (wildcards in the input are matched literally)
    Search {
        #[arg(short, long)]
        tenant: i64,

        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Most (or least) used tags
    Top {
        #[arg(short, long)]
        tenant: i64,

        /// Least used first
        #[arg(long)]
        least: bool,

        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Tags used in a tagging context
    Context {
        #[arg(short, long)]
        tenant: i64,

        context: String,
    },

    /// Delete a tag and its taggings
    Delete {
        #[arg(short, long)]
        tenant: i64,

        id: i64,
    },
}

/// Crates whose events the CLI shows
const LOG_TARGETS: [&str; 4] = ["taglex_cli", "taglex_config", "taglex_core", "taglex_sqlite"];

impl Cli {
    /// Level forced on the command line, if any
    pub fn flag_level(&self) -> Option<LevelFilter> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level.into()),
            (None, true) => Some(LevelFilter::DEBUG),
            (None, false) => None,
        }
    }

    /// Effective log level: --log-level, then --verbose, then config
    pub fn level_filter(&self, configured: &str) -> LevelFilter {
        self.flag_level()
            .unwrap_or_else(|| configured.parse().unwrap_or(LevelFilter::INFO))
    }

    /// `EnvFilter` directives: command-line flags, then `RUST_LOG`, then the
    /// configured level
    pub fn filter_directives(&self, configured: &str, rust_log: Option<&str>) -> String {
        if self.flag_level().is_none() {
            if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
                return directives.to_string();
            }
        }
        let level = self.level_filter(configured).to_string().to_lowercase();
        LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}
