//! aegis - seal and unseal directory trees with a password
//!
//! Every regular file under a directory is replaced by an authenticated,
//! password-encrypted artifact bearing the `.aegis` suffix, and restored
//! later with its original name.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `crypto`: Key derivation, artifact format and authenticated encryption
//! - `traversal`: Directory walk and per-entry decisions
//! - `storage`: Crash-safe file writes
//! - `engine`: Seal and unseal runs with per-file outcomes
//! - `journal`: Append-only operation journal
//! - `display`, `cli`: Terminal output and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use aegis::{seal_directory, Password};
//!
//! let outcome = seal_directory("project", &Password::from("correct horse"));
//! println!("{} sealed, {} failed", outcome.succeeded(), outcome.failed());
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod engine;
pub mod error;
pub mod journal;
pub mod storage;
pub mod traversal;

use std::path::Path;

pub use crypto::Password;
pub use engine::{Engine, OperationOutcome};
pub use error::{AegisError, AegisResult};
pub use traversal::Mode;

/// Seal every plain file under `root` with default settings
pub fn seal_directory(root: impl AsRef<Path>, password: &Password) -> OperationOutcome {
    Engine::new().seal(root.as_ref(), password)
}

/// Unseal every artifact under `root` with default settings
pub fn unseal_directory(root: impl AsRef<Path>, password: &Password) -> OperationOutcome {
    Engine::new().unseal(root.as_ref(), password)
}
