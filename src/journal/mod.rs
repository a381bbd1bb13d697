//! Operation journal for aegis
//!
//! Records every entry a seal or unseal run touched, with its status, in an
//! append-only log next to the settings file.
//!
//! # Example
//!
//! ```rust,ignore
//! use aegis::journal::{JournalEntry, JournalLogger};
//!
//! let outcome = engine.seal(root, &password);
//! let logger = JournalLogger::new(paths.journal_file());
//! logger.log_batch(&JournalEntry::for_outcome(&outcome))?;
//! ```

mod entry;
mod logger;

pub use entry::{EntryStatus, JournalEntry};
pub use logger::JournalLogger;
