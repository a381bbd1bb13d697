//! Directory traversal for sealing runs
//!
//! `policy` decides what happens to each entry; `walker` turns a directory
//! tree into a lazy sequence of those decisions.

pub mod policy;
pub mod walker;

pub use policy::{
    has_artifact_suffix, EntryKind, ExclusionSet, Mode, TraversalDecision, TraversalPolicy,
    ARTIFACT_SUFFIX, DEFAULT_EXCLUDED_DIRS,
};
pub use walker::{Traversal, TraversalEntry};
