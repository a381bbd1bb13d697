//! Run output formatting
//!
//! One line per noteworthy report plus a closing summary.

use std::path::Path;

use crate::engine::{FileOutcome, FileReport, OperationOutcome};
use crate::traversal::{Mode, TraversalDecision};

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format the opening line of a run
pub fn format_run_header(mode: Mode, root: &Path) -> String {
    match mode {
        Mode::Seal => format!("Sealing directory '{}'...", root.display()),
        Mode::Unseal => format!("Unsealing files in directory '{}'...", root.display()),
    }
}

/// Format one report, or `None` for entries not worth a line
///
/// Files filtered out by suffix are silent; excluded directories, links,
/// special files and leftover temporary files are named.
pub fn format_report(mode: Mode, report: &FileReport) -> Option<String> {
    let path = &report.path;
    match &report.outcome {
        FileOutcome::Transformed { output, warnings } => {
            let verb = match mode {
                Mode::Seal => "Sealed",
                Mode::Unseal => "Unsealed",
            };
            let mut line = format!("{} '{}' -> '{}'", verb, path.display(), file_name(output));
            for warning in warnings {
                line.push_str(&format!("\n  Warning: {}", warning));
            }
            Some(line)
        }
        FileOutcome::Skipped(decision) => match decision {
            TraversalDecision::SkipExcludedDir => {
                Some(format!("  Skipping excluded directory: {}", file_name(path)))
            }
            TraversalDecision::SkipSymlink => {
                Some(format!("  Skipping symbolic link: {}", path.display()))
            }
            TraversalDecision::SkipSpecial => {
                Some(format!("  Skipping special file: {}", path.display()))
            }
            TraversalDecision::SkipTempFile => {
                Some(format!("  Skipping leftover temporary file: {}", path.display()))
            }
            _ => None,
        },
        FileOutcome::Failed(err) => Some(format!("Failed '{}': {}", path.display(), err)),
    }
}

/// Format the closing summary of a run
pub fn format_summary(outcome: &OperationOutcome) -> String {
    let mut output = String::new();

    if let Some(err) = &outcome.fatal {
        output.push_str(&format!("Fatal error during {}: {}\n", outcome.mode, err));
        output.push_str(&format!(
            "  Run aborted after {} files; files already processed stay processed.\n",
            outcome.succeeded()
        ));
        return output;
    }

    let (done, verb) = match outcome.mode {
        Mode::Seal => ("Sealing", "sealed"),
        Mode::Unseal => ("Unsealing", "unsealed"),
    };

    output.push_str(&format!(
        "{} complete for directory '{}'.\n",
        done,
        outcome.root.display()
    ));
    output.push_str(&format!("  Successfully {} {} files.\n", verb, outcome.succeeded()));

    if outcome.tally.warned > 0 {
        output.push_str(&format!(
            "  {} files finished with warnings.\n",
            outcome.tally.warned
        ));
    }
    if outcome.failed() > 0 {
        let hint = match outcome.mode {
            Mode::Seal => "unreadable, or output already exists",
            Mode::Unseal => "wrong password, corruption, or output already exists",
        };
        output.push_str(&format!(
            "  Failed to {} {} files ({}).\n",
            outcome.mode,
            outcome.failed(),
            hint
        ));
    }
    if outcome.skipped() > 0 {
        let hint = match outcome.mode {
            Mode::Seal => "already sealed, symlinks, or excluded",
            Mode::Unseal => "not sealed, symlinks, or excluded",
        };
        output.push_str(&format!("  Skipped {} items ({}).\n", outcome.skipped(), hint));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FileWarning;
    use crate::error::AegisError;
    use std::path::PathBuf;

    fn sample_outcome() -> OperationOutcome {
        let mut outcome = OperationOutcome::new(Mode::Unseal, Path::new("proj"));
        outcome.start();
        outcome.record(FileReport::new(
            "proj/a.aegis",
            FileOutcome::Transformed {
                output: PathBuf::from("proj/a.txt"),
                warnings: vec![],
            },
        ));
        outcome.record(FileReport::new(
            "proj/b.aegis",
            FileOutcome::Failed(AegisError::AuthenticationFailed),
        ));
        outcome.record(FileReport::new(
            "proj/c.txt",
            FileOutcome::Skipped(TraversalDecision::SkipNotSealed),
        ));
        outcome.finish();
        outcome
    }

    #[test]
    fn test_format_transformed() {
        let report = FileReport::new(
            "proj/old.aegis",
            FileOutcome::Transformed {
                output: PathBuf::from("proj/old"),
                warnings: vec![FileWarning::LegacyFormat],
            },
        );
        let line = format_report(Mode::Unseal, &report).unwrap();
        assert!(line.starts_with("Unsealed 'proj/old.aegis' -> 'old'"));
        assert!(line.contains("Warning: original extension not found"));
    }

    #[test]
    fn test_format_skips() {
        let excluded = FileReport::new(
            "proj/vendor",
            FileOutcome::Skipped(TraversalDecision::SkipExcludedDir),
        );
        assert_eq!(
            format_report(Mode::Seal, &excluded).as_deref(),
            Some("  Skipping excluded directory: vendor")
        );

        let filtered = FileReport::new(
            "proj/a.aegis",
            FileOutcome::Skipped(TraversalDecision::SkipAlreadySealed),
        );
        assert!(format_report(Mode::Seal, &filtered).is_none());

        let leftover = FileReport::new(
            "proj/.aegis-Ab12cd.tmp",
            FileOutcome::Skipped(TraversalDecision::SkipTempFile),
        );
        assert_eq!(
            format_report(Mode::Seal, &leftover).as_deref(),
            Some("  Skipping leftover temporary file: proj/.aegis-Ab12cd.tmp")
        );
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(&sample_outcome());
        assert!(summary.contains("Unsealing complete for directory 'proj'"));
        assert!(summary.contains("Successfully unsealed 1 files"));
        assert!(summary.contains("Failed to unseal 1 files"));
        assert!(summary.contains("Skipped 1 items"));
    }

    #[test]
    fn test_format_fatal_summary() {
        let mut outcome = OperationOutcome::new(Mode::Seal, Path::new("missing"));
        outcome.abort(AegisError::Traversal {
            path: PathBuf::from("missing"),
            message: "No such file or directory".into(),
        });

        let summary = format_summary(&outcome);
        assert!(summary.starts_with("Fatal error during seal"));
        assert!(summary.contains("No such file or directory"));
    }

    #[test]
    fn test_format_header() {
        assert_eq!(
            format_run_header(Mode::Seal, Path::new("proj")),
            "Sealing directory 'proj'..."
        );
    }
}
