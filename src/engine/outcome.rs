//! Per-file reports and run totals

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::AegisError;
use crate::traversal::{Mode, TraversalDecision};

/// A caveat attached to an otherwise successful transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileWarning {
    /// The artifact carried no extension; restored without one
    LegacyFormat,
    /// Output written but the source could not be removed
    SourceNotRemoved(String),
}

impl fmt::Display for FileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileWarning::LegacyFormat => {
                write!(f, "original extension not found, assuming old format")
            }
            FileWarning::SourceNotRemoved(reason) => {
                write!(f, "failed to remove source: {}", reason)
            }
        }
    }
}

/// What happened to one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Output written; source removed unless a warning says otherwise
    Transformed {
        output: PathBuf,
        warnings: Vec<FileWarning>,
    },
    /// Left alone by the traversal policy
    Skipped(TraversalDecision),
    /// Recoverable per-file failure; the source is untouched
    Failed(AegisError),
}

/// One entry's path and outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn new(path: impl Into<PathBuf>, outcome: FileOutcome) -> Self {
        Self {
            path: path.into(),
            outcome,
        }
    }
}

/// Running totals
///
/// Owned by the orchestrator in sequential runs; in parallel runs each report
/// is folded in after the workers have joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Succeeded entries that carry at least one warning
    pub warned: usize,
}

impl Tally {
    /// Count one outcome
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Transformed { warnings, .. } => {
                self.succeeded += 1;
                if !warnings.is_empty() {
                    self.warned += 1;
                }
            }
            FileOutcome::Skipped(_) => self.skipped += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Combine two partial tallies
    pub fn merge(self, other: Tally) -> Tally {
        Tally {
            succeeded: self.succeeded + other.succeeded,
            failed: self.failed + other.failed,
            skipped: self.skipped + other.skipped,
            warned: self.warned + other.warned,
        }
    }
}

/// Where a run ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Walking,
    Finished,
    FatalAborted,
}

/// Result of one seal or unseal run
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub mode: Mode,
    pub root: PathBuf,
    pub tally: Tally,
    /// Reports in processing order (excluding plain directory descents)
    pub reports: Vec<FileReport>,
    /// Set when the walk itself failed; files processed before it stay
    /// transformed
    pub fatal: Option<AegisError>,
    state: RunState,
}

impl OperationOutcome {
    pub(crate) fn new(mode: Mode, root: &Path) -> Self {
        Self {
            mode,
            root: root.to_path_buf(),
            tally: Tally::default(),
            reports: Vec::new(),
            fatal: None,
            state: RunState::Init,
        }
    }

    pub(crate) fn start(&mut self) {
        self.state = RunState::Walking;
    }

    pub(crate) fn record(&mut self, report: FileReport) {
        self.tally.record(&report.outcome);
        self.reports.push(report);
    }

    pub(crate) fn finish(&mut self) {
        self.state = RunState::Finished;
    }

    pub(crate) fn abort(&mut self, err: AegisError) {
        self.fatal = Some(err);
        self.state = RunState::FatalAborted;
    }

    /// Current state of the run
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Files transformed
    pub fn succeeded(&self) -> usize {
        self.tally.succeeded
    }

    /// Files that could not be transformed
    pub fn failed(&self) -> usize {
        self.tally.failed
    }

    /// Entries left alone
    pub fn skipped(&self) -> usize {
        self.tally.skipped
    }

    /// Whether the run was cut short by a fatal error
    pub fn is_aborted(&self) -> bool {
        self.fatal.is_some()
    }

    /// Whether the run finished with every included file transformed
    pub fn is_clean(&self) -> bool {
        !self.is_aborted() && self.tally.failed == 0
    }

    /// Reports for files that failed
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &AegisError)> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Failed(err) => Some((r.path.as_path(), err)),
            _ => None,
        })
    }
}
