//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the sealing engine.

pub mod password;
pub mod run;

pub use password::{read_password, read_password_line};
pub use run::{handle_config_command, handle_run_command, RunArgs};
