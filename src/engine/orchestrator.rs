//! Seal and unseal runs over a directory tree
//!
//! The engine drives a [`Traversal`], transforms every included file and
//! folds each per-file result into an [`OperationOutcome`]. A failing file is
//! recorded and the run moves on; a failing walk stops the run.

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use zeroize::Zeroizing;

use crate::crypto::{self, KdfParams, Password};
use crate::error::{AegisError, AegisResult};
use crate::storage::write_new_atomic;
use crate::traversal::{ExclusionSet, Mode, Traversal, TraversalDecision, TraversalEntry, TraversalPolicy};

use super::naming::{seal_target, unseal_output};
use super::outcome::{FileOutcome, FileReport, FileWarning, OperationOutcome};

/// Sealing engine configuration
#[derive(Debug, Clone)]
pub struct Engine {
    kdf: KdfParams,
    exclusions: ExclusionSet,
    jobs: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with standard KDF cost, the default exclusions and one worker
    pub fn new() -> Self {
        Self {
            kdf: KdfParams::STANDARD,
            exclusions: ExclusionSet::default(),
            jobs: 1,
        }
    }

    /// Replace the set of excluded directory names
    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Number of files transformed concurrently (0 is treated as 1)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Override the key derivation cost
    pub fn with_kdf_params(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Seal every plain file under `root`
    pub fn seal(&self, root: &Path, password: &Password) -> OperationOutcome {
        self.run(Mode::Seal, root, password)
    }

    /// Unseal every artifact under `root`
    pub fn unseal(&self, root: &Path, password: &Password) -> OperationOutcome {
        self.run(Mode::Unseal, root, password)
    }

    /// Run one pass over `root` in the given direction
    pub fn run(&self, mode: Mode, root: &Path, password: &Password) -> OperationOutcome {
        self.run_with(mode, root, password, |_| {})
    }

    /// Run one pass, handing each report to `on_report` as soon as it exists
    ///
    /// Sequential runs call back as each file finishes. Parallel runs call
    /// back in walk order once the workers have joined.
    pub fn run_with<F>(
        &self,
        mode: Mode,
        root: &Path,
        password: &Password,
        mut on_report: F,
    ) -> OperationOutcome
    where
        F: FnMut(&FileReport),
    {
        let mut outcome = OperationOutcome::new(mode, root);
        let policy = TraversalPolicy::new(mode, self.exclusions.clone());

        tracing::info!(%mode, root = %root.display(), jobs = self.jobs, "starting run");
        outcome.start();

        if self.jobs > 1 {
            self.run_parallel(policy, root, password, &mut outcome, &mut on_report);
        } else {
            self.run_sequential(policy, root, password, &mut outcome, &mut on_report);
        }

        if !outcome.is_aborted() {
            outcome.finish();
        }

        tracing::info!(
            %mode,
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            skipped = outcome.skipped(),
            aborted = outcome.is_aborted(),
            "run complete"
        );
        outcome
    }

    fn run_sequential(
        &self,
        policy: TraversalPolicy,
        root: &Path,
        password: &Password,
        outcome: &mut OperationOutcome,
        on_report: &mut dyn FnMut(&FileReport),
    ) {
        let mode = policy.mode();
        for entry in Traversal::new(root, policy) {
            match entry {
                Ok(entry) => {
                    if let Some(report) = self.report_for(mode, entry, password) {
                        on_report(&report);
                        outcome.record(report);
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "walk aborted");
                    outcome.abort(err);
                    return;
                }
            }
        }
    }

    /// Walk first, then transform the included files on a worker pool
    ///
    /// Reports keep walk order. A walk error aborts before any file is
    /// touched.
    fn run_parallel(
        &self,
        policy: TraversalPolicy,
        root: &Path,
        password: &Password,
        outcome: &mut OperationOutcome,
        on_report: &mut dyn FnMut(&FileReport),
    ) {
        let mode = policy.mode();
        let entries: Vec<TraversalEntry> =
            match Traversal::new(root, policy).collect::<AegisResult<_>>() {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::error!(error = %err, "walk aborted");
                    outcome.abort(err);
                    return;
                }
            };

        let reports: Vec<FileReport> =
            match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
                Ok(pool) => pool.install(|| {
                    entries
                        .into_par_iter()
                        .filter_map(|entry| self.report_for(mode, entry, password))
                        .collect()
                }),
                Err(e) => {
                    tracing::warn!(error = %e, "could not start worker pool, running sequentially");
                    entries
                        .into_iter()
                        .filter_map(|entry| self.report_for(mode, entry, password))
                        .collect()
                }
            };

        for report in reports {
            on_report(&report);
            outcome.record(report);
        }
    }

    /// Turn one walk entry into a report; plain directory descents have none
    fn report_for(
        &self,
        mode: Mode,
        entry: TraversalEntry,
        password: &Password,
    ) -> Option<FileReport> {
        let outcome = match entry.decision {
            TraversalDecision::Descend => return None,
            TraversalDecision::Include => self.process_file(mode, &entry.path, password),
            skip => {
                tracing::debug!(path = %entry.path.display(), reason = skip.describe(), "skipped");
                FileOutcome::Skipped(skip)
            }
        };
        Some(FileReport::new(entry.path, outcome))
    }

    fn process_file(&self, mode: Mode, path: &Path, password: &Password) -> FileOutcome {
        let result = match mode {
            Mode::Seal => self.seal_file(path, password),
            Mode::Unseal => self.unseal_file(path, password),
        };

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "file failed");
                FileOutcome::Failed(err)
            }
        }
    }

    fn seal_file(&self, path: &Path, password: &Password) -> AegisResult<FileOutcome> {
        let target = seal_target(path)?;

        // Fail before paying for key derivation
        if target.output.symlink_metadata().is_ok() {
            return Err(AegisError::OutputExists(target.output));
        }

        let content = Zeroizing::new(
            fs::read(path).map_err(|e| AegisError::io_at(path, format!("Failed to read: {}", e)))?,
        );
        let sealed = crypto::seal(&content, &target.extension, password.as_bytes(), &self.kdf)?;
        write_new_atomic(&target.output, &sealed)?;

        tracing::debug!(path = %path.display(), output = %target.output.display(), "sealed");

        let warnings = remove_source(path).into_iter().collect();
        Ok(FileOutcome::Transformed {
            output: target.output,
            warnings,
        })
    }

    fn unseal_file(&self, path: &Path, password: &Password) -> AegisResult<FileOutcome> {
        let bytes =
            fs::read(path).map_err(|e| AegisError::io_at(path, format!("Failed to read: {}", e)))?;
        let unsealed = crypto::unseal(&bytes, password.as_bytes(), &self.kdf)?;
        let output = unseal_output(path, unsealed.extension.as_deref())?;

        let mut warnings = Vec::new();
        if unsealed.is_legacy() {
            tracing::warn!(path = %path.display(), "original extension not found, assuming old format");
            warnings.push(FileWarning::LegacyFormat);
        }

        write_new_atomic(&output, &unsealed.content)?;

        tracing::debug!(path = %path.display(), output = %output.display(), "unsealed");

        warnings.extend(remove_source(path));
        Ok(FileOutcome::Transformed { output, warnings })
    }
}

/// Remove a source whose replacement is already durable
///
/// Failure leaves both files in place and is reported as a warning.
fn remove_source(path: &Path) -> Option<FileWarning> {
    match fs::remove_file(path) {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove source");
            Some(FileWarning::SourceNotRemoved(e.to_string()))
        }
    }
}
