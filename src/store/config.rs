//! Store configuration
//!
//! The backing file location is always explicit. A config can be built in
//! code or loaded from a JSON file:
//!
//! ```json
//! { "path": "./data/blog.store", "durability": "fsync", "create_dirs": true }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How hard a commit pushes bytes to the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
    /// fsync the store file and its directory on every commit
    #[default]
    Fsync,
    /// Leave flushing to the OS page cache
    Buffered,
}

impl Durability {
    /// Whether commits must fsync
    pub fn syncs(&self) -> bool {
        matches!(self, Durability::Fsync)
    }
}

/// Configuration for a single-file store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the backing file (required)
    pub path: PathBuf,

    /// Commit durability (optional, default "fsync")
    #[serde(default)]
    pub durability: Durability,

    /// Create missing parent directories on open (optional, default true)
    #[serde(default = "default_create_dirs")]
    pub create_dirs: bool,
}

fn default_create_dirs() -> bool {
    true
}

impl StoreConfig {
    /// Config for the given backing file with default settings
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: Durability::default(),
            create_dirs: default_create_dirs(),
        }
    }

    /// Set commit durability
    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    /// Set whether missing parent directories are created
    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: StoreConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("path must not be empty".into()));
        }

        if self.path.file_name().is_none() {
            return Err(ConfigError::Invalid(format!(
                "path '{}' does not name a file",
                self.path.display()
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
