//! Taglex command-line interface
//!
//! Thin wrapper over the resolver and query builder backed by SQLite.

pub mod cli;
pub mod commands;
pub mod config;
