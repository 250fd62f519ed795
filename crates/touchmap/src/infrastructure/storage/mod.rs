//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module handles:
//!
//! - Locating `config.toml` under the XDG config directory.
//! - Providing defaults when the file does not exist yet (first run).
//! - Translating the file's overrides into detection options and tool paths.

pub mod config;
