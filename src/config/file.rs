// src/config/file.rs
// File-based configuration from ~/.metacog/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that points at an alternate config file
pub const CONFIG_ENV: &str = "METACOG_CONFIG";

/// Top-level config structure. Every key is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetacogConfig {
    /// Session records kept per project before cleanup deletes the oldest
    pub max_records: usize,
    /// Cap on the "other files changed" list
    pub recent_files_limit: usize,
    /// Interventions shown after compaction
    pub max_interventions: usize,
    /// Depth at which the project tree collapses directories
    pub tree_depth: usize,
    /// How many times the fresh-session orientation is repeated
    pub repetition_count: usize,
    /// Hard timeout for each git invocation
    pub git_timeout_secs: u64,
    /// Substring identifying the sibling memory plugin in enabledPlugins
    pub memory_plugin_pattern: String,
    /// trace | debug | info | warn | error
    pub log_level: Option<String>,
}

impl Default for MetacogConfig {
    fn default() -> Self {
        Self {
            max_records: crate::state::store::DEFAULT_MAX_RECORDS,
            recent_files_limit: crate::scan::recent::DEFAULT_RECENT_LIMIT,
            max_interventions: 5,
            tree_depth: crate::scan::tree::DEFAULT_TREE_DEPTH,
            repetition_count: 2,
            git_timeout_secs: 5,
            memory_plugin_pattern: "memory".to_string(),
            log_level: None,
        }
    }
}

impl MetacogConfig {
    /// Ok(None) when the file doesn't exist; Err when it exists but is invalid
    pub fn try_load_from(path: &Path) -> crate::Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::parse(&contents)?;
                debug!(path = %path.display(), "Loaded config from file");
                Ok(Some(config))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(contents: &str) -> crate::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.trim().is_empty()
        {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".metacog")
            .join("config.toml")
    }

    /// Parse the configured log level, if any
    pub fn tracing_level(&self) -> Option<tracing::Level> {
        self.log_level
            .as_deref()
            .and_then(|l| l.trim().parse::<tracing::Level>().ok())
    }
}
