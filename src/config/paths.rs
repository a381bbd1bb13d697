//! Path management for aegis
//!
//! ## Path Resolution Order
//!
//! 1. `AEGIS_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/aegis` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::AegisError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "AEGIS_CONFIG_DIR";

/// Manages all paths used by aegis
#[derive(Debug, Clone)]
pub struct AegisPaths {
    /// Directory holding settings and the journal
    base_dir: PathBuf,
}

impl AegisPaths {
    /// Resolve the config directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and no
    /// override is set.
    pub fn new() -> Result<Self, AegisError> {
        let base_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create AegisPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the operation journal
    pub fn journal_file(&self) -> PathBuf {
        self.base_dir.join("journal.log")
    }

    /// Ensure the config directory exists
    pub fn ensure_directories(&self) -> Result<(), AegisError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AegisError::Io(format!("Failed to create config directory: {}", e)))
    }
}

fn resolve_default_path() -> Result<PathBuf, AegisError> {
    ProjectDirs::from("", "", "aegis")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| AegisError::Config("Could not determine home directory".into()))
}
