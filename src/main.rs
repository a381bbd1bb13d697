use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use aegis::cli::{handle_config_command, handle_run_command, RunArgs};
use aegis::config::{AegisPaths, Settings};
use aegis::Mode;

#[derive(Parser)]
#[command(
    name = "aegis",
    version,
    about = "Seal and unseal directories with a password",
    long_about = "aegis replaces every file in a directory tree with a password-encrypted \
                  .aegis artifact, and restores the originals on unseal. Version control, \
                  dependency and build directories are skipped by default."
)]
struct Cli {
    /// Increase diagnostic output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Seal (encrypt) a directory and all its contents
    Seal(RunArgs),

    /// Unseal (decrypt) all sealed files in a directory
    Unseal(RunArgs),

    /// Show current configuration and paths
    Config,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = AegisPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let (mode, args) = match cli.command {
        Some(Commands::Seal(args)) => (Mode::Seal, args),
        Some(Commands::Unseal(args)) => (Mode::Unseal, args),
        Some(Commands::Config) => {
            handle_config_command(&paths, &settings)?;
            return Ok(ExitCode::SUCCESS);
        }
        None => {
            println!("aegis - seal and unseal directories with a password");
            println!();
            println!("Run 'aegis --help' for usage information.");
            return Ok(ExitCode::SUCCESS);
        }
    };

    let outcome = handle_run_command(&paths, &settings, mode, &args)?;

    let code = if outcome.is_aborted() {
        ExitCode::FAILURE
    } else if outcome.failed() > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };
    Ok(code)
}
