//! Display formatting for terminal output

pub mod journal;
pub mod outcome;

pub use journal::{format_journal_entries, format_journal_entry};
pub use outcome::{format_report, format_run_header, format_summary};
