//! User settings for aegis
//!
//! Persistent defaults for excluded directories, the journal and worker
//! count. Command-line flags override them per run.

use serde::{Deserialize, Serialize};

use super::paths::AegisPaths;
use crate::error::AegisError;
use crate::storage::{read_json, write_json_atomic};
use crate::traversal::{ExclusionSet, DEFAULT_EXCLUDED_DIRS};

/// User settings for aegis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Directory names never descended into
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,

    /// Whether runs are recorded in the journal
    #[serde(default = "default_journal_enabled")]
    pub journal_enabled: bool,

    /// Files transformed concurrently
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_excluded_dirs() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect()
}

fn default_journal_enabled() -> bool {
    true
}

fn default_jobs() -> usize {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            excluded_dirs: default_excluded_dirs(),
            journal_enabled: default_journal_enabled(),
            jobs: default_jobs(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// Defaults are not written back; the caller decides when to persist.
    pub fn load_or_create(paths: &AegisPaths) -> Result<Self, AegisError> {
        read_json(paths.settings_file()).map_err(|e| match e {
            AegisError::Json(msg) => AegisError::Config(msg),
            other => other,
        })
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AegisPaths) -> Result<(), AegisError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// The configured exclusions as a set
    pub fn exclusion_set(&self) -> ExclusionSet {
        ExclusionSet::from_names(self.excluded_dirs.iter().map(String::as_str))
    }
}
