//! Journal display formatting

use crate::journal::JournalEntry;

/// Format a single journal entry (one register row)
pub fn format_journal_entry(entry: &JournalEntry) -> String {
    let mut line = format!(
        "{} {:6} {:9} {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.operation.to_string(),
        entry.status.to_string(),
        entry.path.display()
    );

    if let Some(output) = &entry.output {
        line.push_str(&format!(" -> {}", output.display()));
    }
    if let Some(detail) = &entry.detail {
        line.push_str(&format!(" ({})", detail));
    }
    line
}

/// Format recent journal entries, oldest first
pub fn format_journal_entries(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return "  No journal entries.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str("  ");
        output.push_str(&format_journal_entry(entry));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FileOutcome, FileReport};
    use crate::error::AegisError;
    use crate::traversal::Mode;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn entry(outcome: FileOutcome) -> JournalEntry {
        let report = FileReport::new("proj/a.txt", outcome);
        let mut entry = JournalEntry::from_report(Mode::Seal, &report);
        entry.timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        entry
    }

    #[test]
    fn test_format_succeeded_entry() {
        let line = format_journal_entry(&entry(FileOutcome::Transformed {
            output: PathBuf::from("proj/a.aegis"),
            warnings: vec![],
        }));
        assert_eq!(
            line,
            "2024-03-01 09:30:00 seal   SUCCEEDED proj/a.txt -> proj/a.aegis"
        );
    }

    #[test]
    fn test_format_failed_entry_carries_detail() {
        let line = format_journal_entry(&entry(FileOutcome::Failed(AegisError::OutputExists(
            PathBuf::from("proj/a.aegis"),
        ))));
        assert!(line.contains("FAILED"));
        assert!(line.ends_with(")"));
        assert!(line.contains("proj/a.aegis"));
    }

    #[test]
    fn test_format_empty_journal() {
        assert_eq!(format_journal_entries(&[]), "  No journal entries.\n");
    }
}
