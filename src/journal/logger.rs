//! Append-only journal writer
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{AegisError, AegisResult};

use super::entry::JournalEntry;

/// Handles writing journal entries to the journal file
///
/// The file uses a line-delimited JSON format (JSONL) where each line is a
/// complete JSON object representing one entry.
pub struct JournalLogger {
    /// Path to the journal file
    log_path: PathBuf,
}

impl JournalLogger {
    /// Create a new JournalLogger that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open_for_append(&self) -> AegisResult<File> {
        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AegisError::Io(format!("Failed to create journal directory: {}", e))
                })?;
            }
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| AegisError::Io(format!("Failed to open journal: {}", e)))
    }

    /// Append one entry
    pub fn log(&self, entry: &JournalEntry) -> AegisResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries, flushing once at the end
    pub fn log_batch(&self, entries: &[JournalEntry]) -> AegisResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = self.open_for_append()?;

        for entry in entries {
            let json = serde_json::to_string(entry)
                .map_err(|e| AegisError::Json(format!("Failed to serialize journal entry: {}", e)))?;

            writeln!(file, "{}", json)
                .map_err(|e| AegisError::Io(format!("Failed to write journal entry: {}", e)))?;
        }

        file.flush()
            .map_err(|e| AegisError::Io(format!("Failed to flush journal: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> AegisResult<Vec<JournalEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AegisError::Io(format!("Failed to open journal: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                AegisError::Io(format!("Failed to read journal line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: JournalEntry = serde_json::from_str(&line).map_err(|e| {
                AegisError::Json(format!(
                    "Failed to parse journal entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Read the most recent N entries
    pub fn read_recent(&self, count: usize) -> AegisResult<Vec<JournalEntry>> {
        let mut all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries.split_off(start))
    }

    /// Number of entries in the journal
    pub fn entry_count(&self) -> AegisResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AegisError::Io(format!("Failed to open journal: {}", e)))?;

        let reader = BufReader::new(file);
        let count = reader
            .lines()
            .map_while(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count();

        Ok(count)
    }

    /// Get the path to the journal file
    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FileOutcome, FileReport};
    use crate::journal::entry::EntryStatus;
    use crate::traversal::{Mode, TraversalDecision};
    use tempfile::TempDir;

    fn create_test_logger() -> (JournalLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("journal.log");
        let logger = JournalLogger::new(log_path);
        (logger, temp_dir)
    }

    fn skipped_entry(name: &str) -> JournalEntry {
        JournalEntry::from_report(
            Mode::Seal,
            &FileReport::new(name, FileOutcome::Skipped(TraversalDecision::SkipSymlink)),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&skipped_entry("link")).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Mode::Seal);
        assert_eq!(entries[0].status, EntryStatus::Skipped);
    }

    #[test]
    fn test_log_batch_and_recent() {
        let (logger, _temp) = create_test_logger();

        let entries: Vec<JournalEntry> = (0..10)
            .map(|i| skipped_entry(&format!("link-{}", i)))
            .collect();
        logger.log_batch(&entries).unwrap();

        assert_eq!(logger.entry_count().unwrap(), 10);

        let recent = logger.read_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].path, PathBuf::from("link-7"));
        assert_eq!(recent[2].path, PathBuf::from("link-9"));
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();

        assert_eq!(logger.entry_count().unwrap(), 0);
        assert!(logger.read_all().unwrap().is_empty());
        logger.log_batch(&[]).unwrap();
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let logger = JournalLogger::new(temp_dir.path().join("nested").join("journal.log"));

        logger.log(&skipped_entry("x")).unwrap();
        assert_eq!(logger.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_survives_restart() {
        let (logger, temp) = create_test_logger();
        logger.log(&skipped_entry("x")).unwrap();

        let reopened = JournalLogger::new(temp.path().join("journal.log"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }
}
