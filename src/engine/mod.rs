//! Directory sealing engine
//!
//! Ties traversal, naming, cryptography and storage together into seal and
//! unseal runs that report per-file outcomes.

pub mod naming;
pub mod orchestrator;
pub mod outcome;

pub use naming::{seal_target, unseal_output, SealTarget};
pub use orchestrator::Engine;
pub use outcome::{FileOutcome, FileReport, FileWarning, OperationOutcome, RunState, Tally};
