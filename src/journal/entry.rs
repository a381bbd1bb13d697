//! Journal entry data structures
//!
//! One entry per processed path, recording what happened without ever
//! touching file content or passwords.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{FileOutcome, FileReport, OperationOutcome};
use crate::error::AegisError;
use crate::traversal::Mode;

/// How one path fared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Output written
    Succeeded,
    /// Left alone by the traversal policy
    Skipped,
    /// Recoverable failure; the source is untouched
    Failed,
    /// The walk failed and the run was aborted
    Fatal,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Succeeded => write!(f, "SUCCEEDED"),
            EntryStatus::Skipped => write!(f, "SKIPPED"),
            EntryStatus::Failed => write!(f, "FAILED"),
            EntryStatus::Fatal => write!(f, "FATAL"),
        }
    }
}

/// A single journal line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// When the entry was recorded (UTC)
    pub timestamp: DateTime<Utc>,

    /// Direction of the run
    pub operation: Mode,

    /// The processed path
    pub path: PathBuf,

    /// Where the output went, for succeeded entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    pub status: EntryStatus,

    /// Skip reason, error message or warnings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl JournalEntry {
    /// Build an entry from one file report
    pub fn from_report(operation: Mode, report: &FileReport) -> Self {
        let (output, status, detail) = match &report.outcome {
            FileOutcome::Transformed { output, warnings } => {
                let detail = if warnings.is_empty() {
                    None
                } else {
                    Some(
                        warnings
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; "),
                    )
                };
                (Some(output.clone()), EntryStatus::Succeeded, detail)
            }
            FileOutcome::Skipped(decision) => (
                None,
                EntryStatus::Skipped,
                Some(decision.describe().to_string()),
            ),
            FileOutcome::Failed(err) => (None, EntryStatus::Failed, Some(err.to_string())),
        };

        Self {
            timestamp: Utc::now(),
            operation,
            path: report.path.clone(),
            output,
            status,
            detail,
        }
    }

    /// Build the entry recording an aborted run
    pub fn fatal(operation: Mode, root: &Path, err: &AegisError) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            path: root.to_path_buf(),
            output: None,
            status: EntryStatus::Fatal,
            detail: Some(err.to_string()),
        }
    }

    /// All entries for a finished or aborted run, in processing order
    pub fn for_outcome(outcome: &OperationOutcome) -> Vec<Self> {
        let mut entries: Vec<Self> = outcome
            .reports
            .iter()
            .map(|report| Self::from_report(outcome.mode, report))
            .collect();

        if let Some(err) = &outcome.fatal {
            entries.push(Self::fatal(outcome.mode, &outcome.root, err));
        }
        entries
    }
}
