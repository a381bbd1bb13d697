//! Seal, unseal and config commands
//!
//! Bridges clap argument parsing with the engine: settings and flags are
//! merged, the password is read, the run is printed and journaled.

use std::path::PathBuf;

use clap::Args;

use crate::config::{AegisPaths, Settings};
use crate::crypto::Password;
use crate::display::{format_journal_entries, format_report, format_run_header, format_summary};
use crate::engine::{Engine, OperationOutcome};
use crate::error::AegisResult;
use crate::journal::{JournalEntry, JournalLogger};
use crate::traversal::{ExclusionSet, Mode};

use super::password::read_password;

/// Journal entries shown by `config`
const RECENT_JOURNAL_ENTRIES: usize = 5;

/// Arguments shared by `seal` and `unseal`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Directory to process
    pub directory: PathBuf,

    /// Additional directory name to skip (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Do not skip the configured directory names
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Number of files to process concurrently
    #[arg(short, long, env = "AEGIS_JOBS")]
    pub jobs: Option<usize>,

    /// Read the password from the first line of standard input
    #[arg(long)]
    pub password_stdin: bool,

    /// Do not record this run in the journal
    #[arg(long)]
    pub no_journal: bool,
}

impl RunArgs {
    /// Merge settings and flags into an exclusion set
    pub fn exclusion_set(&self, settings: &Settings) -> ExclusionSet {
        let mut set = if self.no_default_excludes {
            ExclusionSet::empty()
        } else {
            settings.exclusion_set()
        };
        for name in &self.exclude {
            set.insert(name.as_str());
        }
        set
    }

    /// Build the engine for this run
    pub fn engine(&self, settings: &Settings) -> Engine {
        Engine::new()
            .with_exclusions(self.exclusion_set(settings))
            .with_jobs(self.jobs.unwrap_or(settings.jobs))
    }

    fn journal_enabled(&self, settings: &Settings) -> bool {
        settings.journal_enabled && !self.no_journal
    }
}

/// Handle `seal` or `unseal`
///
/// Returns the outcome so the caller can choose the exit status. Only
/// problems before the walk starts (bad password input) are errors here.
pub fn handle_run_command(
    paths: &AegisPaths,
    settings: &Settings,
    mode: Mode,
    args: &RunArgs,
) -> AegisResult<OperationOutcome> {
    let engine = args.engine(settings);

    println!("{}", format_run_header(mode, &args.directory));
    let password: Password = read_password(args.password_stdin, mode == Mode::Seal)?;

    let outcome = engine.run_with(mode, &args.directory, &password, |report| {
        if let Some(line) = format_report(mode, report) {
            println!("{}", line);
        }
    });
    drop(password);

    println!();
    print!("{}", format_summary(&outcome));

    if args.journal_enabled(settings) {
        let logger = JournalLogger::new(paths.journal_file());
        if let Err(e) = logger.log_batch(&JournalEntry::for_outcome(&outcome)) {
            tracing::warn!(error = %e, "could not write journal");
        }
    }

    Ok(outcome)
}

/// Handle `config`: show resolved paths, settings and the latest journal entries
pub fn handle_config_command(paths: &AegisPaths, settings: &Settings) -> AegisResult<()> {
    let journal = JournalLogger::new(paths.journal_file());
    let excluded = if settings.excluded_dirs.is_empty() {
        "(none)".to_string()
    } else {
        settings.excluded_dirs.join(", ")
    };

    println!("aegis Configuration");
    println!("===================");
    println!("Config directory: {}", paths.base_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Journal file:     {}", paths.journal_file().display());
    println!();
    println!("Settings:");
    println!("  Excluded directories: {}", excluded);
    println!("  Journal enabled:      {}", settings.journal_enabled);
    println!("  Jobs:                 {}", settings.jobs);
    println!("  Journal entries:      {}", journal.entry_count()?);
    println!();
    println!("Recent journal entries:");
    match journal.read_recent(RECENT_JOURNAL_ENTRIES) {
        Ok(entries) => print!("{}", format_journal_entries(&entries)),
        Err(e) => println!("  (journal unreadable: {})", e),
    }

    Ok(())
}
