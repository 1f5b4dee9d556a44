//! Configuration management for the roster binary.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default location of the bundled catalog
pub const DEFAULT_CATALOG_PATH: &str = "roster/data/catalog.json";

/// Default organizer named in host summaries
pub const DEFAULT_ORGANIZER: &str = "GHW Team";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path of the catalog JSON document
    pub catalog_path: PathBuf,
    /// Organizer named in host summaries
    pub organizer: String,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            catalog_path: lookup("ROSTER_CATALOG_PATH")
                .filter(|s| !s.trim().is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH), PathBuf::from),
            organizer: lookup("ROSTER_ORGANIZER")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ORGANIZER.to_string()),
            pretty: lookup("ROSTER_PRETTY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
